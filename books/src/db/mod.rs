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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::*;
use iii_iv_core::db::DbResult;
use iii_iv_core::db::postgres::PostgresOptions;
use iii_iv_core::env::get_optional_var;
use std::sync::Arc;

pub(crate) mod memory;
use memory::MemoryBookStore;
pub(crate) mod postgres;
use postgres::PostgresBookStore;
pub(crate) mod sqlite;
use sqlite::SqliteBookStore;
#[cfg(test)]
pub(crate) mod testutils;

/// Storage of the books collection with high-level operations that deal with our types.
///
/// Lookups of identifiers that do not exist are not errors: they are reported via `None` or `false`
/// so that callers can decide how to present them.
#[async_trait::async_trait]
pub(crate) trait BookStore {
    /// Gets all books in the collection.
    async fn list_books(&self) -> DbResult<Vec<Book>>;

    /// Gets the book identified by `id`, if any.
    async fn get_book(&self, id: BookId) -> DbResult<Option<Book>>;

    /// Adds `book` to the collection and returns the stored record with its new identifier.
    async fn create_book(&self, book: NewBook) -> DbResult<Book>;

    /// Merges the fields set in `update` into the book identified by `id` and returns the
    /// resulting record, or `None` if the book does not exist.
    async fn update_book(&self, id: BookId, update: BookUpdate) -> DbResult<Option<Book>>;

    /// Removes the book identified by `id`, returning whether it existed.
    async fn delete_book(&self, id: BookId) -> DbResult<bool>;

    /// Releases any resources held by the store.
    async fn close(&self) {}
}

/// Storage backend selection and its connection details.
#[derive(Debug)]
pub enum StorageOptions {
    /// Keep the collection in process memory, seeded with sample books.
    Memory,

    /// Keep the collection in the SQLite database at the given URI.
    Sqlite(String),

    /// Keep the collection in a PostgreSQL database.
    Postgres(PostgresOptions),
}

impl StorageOptions {
    /// Initializes the storage options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// `<prefix>_STORAGE` selects the backend among `memory` (the default), `sqlite` and
    /// `postgres`.  The SQLite backend needs `<prefix>_SQLITE_URI` and the PostgreSQL backend
    /// takes its settings from the `<prefix>_PGSQL_*` variables.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        match get_optional_var::<String>(prefix, "STORAGE")?.as_deref() {
            None | Some("memory") => Ok(StorageOptions::Memory),
            Some("sqlite") => {
                match get_optional_var::<String>(prefix, "SQLITE_URI")? {
                    Some(uri) => Ok(StorageOptions::Sqlite(uri)),
                    None => Err(format!(
                        "Required environment variable {}_SQLITE_URI not present",
                        prefix
                    )),
                }
            }
            Some("postgres") => {
                let opts = PostgresOptions::from_env(&format!("{}_PGSQL", prefix))?;
                Ok(StorageOptions::Postgres(opts))
            }
            Some(other) => Err(format!(
                "Invalid value in environment variable {}_STORAGE: unknown backend '{}'",
                prefix, other
            )),
        }
    }
}

/// Opens the store described by `opts`, initializing its schema if necessary.
pub(crate) async fn open(opts: StorageOptions) -> DbResult<Arc<dyn BookStore + Send + Sync>> {
    match opts {
        StorageOptions::Memory => Ok(Arc::new(MemoryBookStore::with_sample_books())),
        StorageOptions::Sqlite(uri) => Ok(Arc::new(SqliteBookStore::connect(&uri).await?)),
        StorageOptions::Postgres(opts) => Ok(Arc::new(PostgresBookStore::connect(opts).await?)),
    }
}
