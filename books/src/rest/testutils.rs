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

//! Test utilities for the REST API.

use crate::db::BookStore;
use crate::driver::testutils::{TestContext as DriverContext, failing_driver};
use crate::model::*;
use crate::rest::app;
use axum::Router;

/// State of a running test.
pub(crate) struct TestContext {
    /// Access to the driver and the store backing the app.
    context: DriverContext,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes an app backed by an empty in-memory store.
    pub(crate) fn setup() -> Self {
        let context = DriverContext::setup();
        let app = app(context.driver());
        Self { context, app }
    }

    /// Returns a copy of the app to issue one request.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Stores a new available book with the given details and returns it.
    pub(crate) async fn add_book(&self, title: &'static str, author: &'static str) -> Book {
        self.context.add_book(title, author).await
    }

    /// Gets the book identified by `id` straight from the store.
    pub(crate) async fn get_book(&self, id: BookId) -> Option<Book> {
        self.context.store().get_book(id).await.unwrap()
    }

    /// Gets all books straight from the store.
    pub(crate) async fn list_books(&self) -> Vec<Book> {
        self.context.store().list_books().await.unwrap()
    }
}

/// Returns an app whose storage operations all fail.
pub(crate) fn failing_app() -> Router {
    app(failing_driver())
}
