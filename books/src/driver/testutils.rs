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

//! Test utilities for the business layer.

use crate::db::BookStore;
use crate::db::memory::MemoryBookStore;
use crate::db::testutils::FailingBookStore;
use crate::driver::Driver;
use crate::model::*;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The store backing the driver, for direct inspection and setup.
    store: Arc<MemoryBookStore>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver backed by an empty in-memory store.
    pub(crate) fn setup() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let store = Arc::from(MemoryBookStore::with_books(vec![]));
        let driver = Driver::new(store.clone());
        Self { store, driver }
    }

    /// Returns the store backing the driver.
    pub(crate) fn store(&self) -> &MemoryBookStore {
        &self.store
    }

    /// Returns a copy of the driver to issue one operation.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Stores a new available book with the given details and returns it.
    pub(crate) async fn add_book(&self, title: &'static str, author: &'static str) -> Book {
        let book = NewBook::new(title.into(), author.into()).with_available(true);
        self.store.create_book(book).await.unwrap()
    }
}

/// Returns a driver whose storage operations all fail.
pub(crate) fn failing_driver() -> Driver {
    let _can_fail = env_logger::builder().is_test(true).try_init();

    Driver::new(Arc::new(FailingBookStore))
}
