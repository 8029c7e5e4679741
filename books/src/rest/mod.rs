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

//! Entry point to the REST server.

use crate::driver::{BOOK_NOT_FOUND, Driver};
use crate::model::BookId;
use axum::Router;
use iii_iv_core::driver::DriverError;
use iii_iv_core::rest::{RestError, RestResult};
use log::error;

mod book_availability_patch;
mod book_delete;
mod book_get;
mod book_put;
mod books_get;
mod books_post;
#[cfg(test)]
mod testutils;
mod validate_book;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, patch};
    Router::new()
        .route("/books", get(books_get::handler).post(books_post::handler))
        .route(
            "/books/:id",
            get(book_get::handler).put(book_put::handler).delete(book_delete::handler),
        )
        .route("/books/:id/availability", patch(book_availability_patch::handler))
        .with_state(driver)
}

/// Parses the `raw` book identifier taken from a request path.
///
/// Identifiers that are not integers cannot name any book, so they are reported as missing.
fn parse_book_id(raw: &str) -> RestResult<BookId> {
    BookId::parse(raw).map_err(|_| RestError::NotFound(BOOK_NOT_FOUND.to_owned()))
}

/// Converts a driver error `e` into the error returned to the client.
///
/// Missing books are reported as is.  Any other failure is logged and replaced by the fixed
/// `message` so that no storage details leak to the client.
fn map_driver_error(e: DriverError, message: &str) -> RestError {
    match e {
        DriverError::NotFound(_) => RestError::from(e),
        e => {
            error!("{}: {}", message, e);
            RestError::InternalError(message.to_owned())
        }
    }
}
