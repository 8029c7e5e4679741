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

//! Implementation of the database abstraction using SQLite.

use crate::db::BookStore;
use crate::model::*;
use futures::TryStreamExt;
use iii_iv_core::db::sqlite::{self, map_sqlx_error};
use iii_iv_core::db::{DbError, DbResult};
use log::info;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

/// Schema to use to initialize the database.
const SCHEMA: &str = include_str!("sqlite.sql");

/// Converts a `row` from the `books` table into a `Book`, validating its contents.
fn book_from_row(row: SqliteRow) -> DbResult<Book> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let title: String = row.try_get("title").map_err(map_sqlx_error)?;
    let author: String = row.try_get("author").map_err(map_sqlx_error)?;
    let available: bool = row.try_get("available").map_err(map_sqlx_error)?;

    Ok(Book::new(BookId::new(id), Title::new(title)?, Author::new(author)?)
        .with_available(available))
}

/// A store backed by an SQLite database.
pub(crate) struct SqliteBookStore {
    /// Connection pool to the database.
    pool: SqlitePool,
}

impl SqliteBookStore {
    /// Opens the database at `uri` and ensures the schema exists.
    pub(crate) async fn connect(uri: &str) -> DbResult<Self> {
        let pool = sqlite::connect(uri).await?;
        Self::attach(pool).await
    }

    /// Wraps an already-open `pool` and ensures the schema exists.
    pub(crate) async fn attach(pool: SqlitePool) -> DbResult<Self> {
        sqlite::run_schema(&pool, SCHEMA).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl BookStore for SqliteBookStore {
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
        let query_str = "SELECT id, title, author, available FROM books WHERE id = ?";
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
            VALUES (?, ?, COALESCE(?, TRUE))
        ";
        let done = sqlx::query(query_str)
            .bind(book.title().as_str())
            .bind(book.author().as_str())
            .bind(*book.available())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let id = BookId::new(done.last_insert_rowid());

        match self.get_book(id).await? {
            Some(book) => Ok(book),
            None => Err(DbError::BackendError(format!("Book {} vanished after insertion", id))),
        }
    }

    async fn update_book(&self, id: BookId, update: BookUpdate) -> DbResult<Option<Book>> {
        let query_str = "
            UPDATE books
            SET
                title = COALESCE(?, title),
                author = COALESCE(?, author),
                available = COALESCE(?, available)
            WHERE id = ?
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
        let query_str = "DELETE FROM books WHERE id = ?";
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
        info!("SQLite connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::generate_db_tests;
    use iii_iv_core::db::sqlite::testutils::setup;

    generate_db_tests!(SqliteBookStore::attach(setup().await).await.unwrap());

    #[tokio::test]
    async fn test_invalid_stored_data_is_integrity_error() {
        let store = SqliteBookStore::attach(setup().await).await.unwrap();
        sqlx::query("INSERT INTO books (title, author) VALUES ('ab', 'Someone')")
            .execute(&store.pool)
            .await
            .unwrap();

        match store.list_books().await {
            Err(DbError::DataIntegrityError(e)) => assert!(e.contains("\"title\" length")),
            result => panic!("Unexpected result {:?}", result),
        }
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let pool = setup().await;
        let store = SqliteBookStore::attach(pool.clone()).await.unwrap();
        let book = store
            .create_book(NewBook::new("Dune".into(), "Frank Herbert".into()))
            .await
            .unwrap();
        assert_eq!(&Some(true), book.available());

        let store = SqliteBookStore::attach(pool).await.unwrap();
        assert_eq!(vec![book], store.list_books().await.unwrap());
    }
}
