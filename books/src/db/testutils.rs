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

//! Test utilities for the database layer.

use crate::db::BookStore;
use crate::model::*;
use iii_iv_core::db::{DbError, DbResult};

/// A store whose operations all fail with a backend error.
pub(crate) struct FailingBookStore;

impl FailingBookStore {
    /// Returns the error that every operation yields.
    fn error<T>() -> DbResult<T> {
        Err(DbError::BackendError("connection reset by peer".to_owned()))
    }
}

#[async_trait::async_trait]
impl BookStore for FailingBookStore {
    async fn list_books(&self) -> DbResult<Vec<Book>> {
        Self::error()
    }

    async fn get_book(&self, _id: BookId) -> DbResult<Option<Book>> {
        Self::error()
    }

    async fn create_book(&self, _book: NewBook) -> DbResult<Book> {
        Self::error()
    }

    async fn update_book(&self, _id: BookId, _update: BookUpdate) -> DbResult<Option<Book>> {
        Self::error()
    }

    async fn delete_book(&self, _id: BookId) -> DbResult<bool> {
        Self::error()
    }
}
