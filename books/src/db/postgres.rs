// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Implementation of the database abstraction using PostgreSQL.

use crate::db::BookStore;
use crate::model::*;
use futures::TryStreamExt;
use iii_iv_core::db::postgres::{self, PostgresOptions, map_sqlx_error};
use iii_iv_core::db::{DbError, DbResult};
use log::info;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

/// Schema to use to initialize the production database.
const SCHEMA: &str = include_str!("postgres.sql");

/// Converts a `row` from the `books` table into a `Book`, validating its contents.
fn book_from_row(row: PgRow) -> DbResult<Book> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let title: String = row.try_get("title").map_err(map_sqlx_error)?;
    let author: String = row.try_get("author").map_err(map_sqlx_error)?;
    let available: bool = row.try_get("available").map_err(map_sqlx_error)?;

    Ok(Book::new(BookId::new(id), Title::new(title)?, Author::new(author)?)
        .with_available(available))
}

/// A store backed by a PostgreSQL database.
pub(crate) struct PostgresBookStore {
    /// Connection pool to the database.
    pool: PgPool,
}

impl PostgresBookStore {
    /// Connects to the database described by `opts` and ensures the schema exists.
    pub(crate) async fn connect(opts: PostgresOptions) -> DbResult<Self> {
        let pool = postgres::connect(opts).await?;
        Self::attach(pool).await
    }

    /// Wraps an already-open `pool` and ensures the schema exists.
    pub(crate) async fn attach(pool: PgPool) -> DbResult<Self> {
        postgres::run_schema(&pool, SCHEMA).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl BookStore for PostgresBookStore {
    async fn list_books(&self) -> DbResult<Vec<Book>> {
        let query_str = "SELECT id, title, author, available FROM books ORDER BY id";
        let mut rows = sqlx::query(query_str).fetch(&self.pool);

        let mut books = vec![];
        while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
            books.push(book_from_row(row)?);
        }
        Ok(books)
    }

    async fn get_book(&self, id: BookId) -> DbResult<Option<Book>> {
        let query_str = "SELECT id, title, author, available FROM books WHERE id = $1";
        let maybe_row = sqlx::query(query_str)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        match maybe_row {
            None => Ok(None),
            Some(row) => Ok(Some(book_from_row(row)?)),
        }
    }

    async fn create_book(&self, book: NewBook) -> DbResult<Book> {
        let query_str = "
            INSERT INTO books (title, author, available)
            VALUES ($1, $2, COALESCE($3, TRUE))
            RETURNING id
        ";
        let row = sqlx::query(query_str)
            .bind(book.title().as_str())
            .bind(book.author().as_str())
            .bind(*book.available())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let id = BookId::new(row.try_get("id").map_err(map_sqlx_error)?);

        match self.get_book(id).await? {
            Some(book) => Ok(book),
            None => Err(DbError::BackendError(format!("Book {} vanished after insertion", id))),
        }
    }

    async fn update_book(&self, id: BookId, update: BookUpdate) -> DbResult<Option<Book>> {
        let query_str = "
            UPDATE books
            SET
                title = COALESCE($1, title),
                author = COALESCE($2, author),
                available = COALESCE($3, available)
            WHERE id = $4
        ";
        let done = sqlx::query(query_str)
            .bind(update.title().as_ref().map(Title::as_str))
            .bind(update.author().as_ref().map(Author::as_str))
            .bind(*update.available())
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if done.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_book(id).await
    }

    async fn delete_book(&self, id: BookId) -> DbResult<bool> {
        let query_str = "DELETE FROM books WHERE id = $1";
        let done = sqlx::query(query_str)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        match done.rows_affected() {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
        }
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}
