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

//! API to add a book to the collection.

use crate::driver::Driver;
use crate::model::Book;
use crate::rest::map_driver_error;
use crate::rest::validate_book::ValidBook;
use axum::extract::State;
use axum::{Json, http};
use iii_iv_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    ValidBook(book): ValidBook,
) -> Result<(http::StatusCode, Json<Book>), RestError> {
    let book =
        driver.create_book(book).await.map_err(|e| map_driver_error(e, "Error creating book"))?;
    Ok((http::StatusCode::CREATED, Json(book)))
}
