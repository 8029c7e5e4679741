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

//! API to change whether a book is available.

use crate::driver::Driver;
use crate::model::Book;
use crate::rest::{map_driver_error, parse_book_id};
use axum::Json;
use axum::extract::{Path, State};
use iii_iv_core::rest::RestError;
use serde::Deserialize;

/// Message returned when the availability of a book cannot be updated.
const UPDATE_ERROR: &str = "Error updating book availability";

/// Contents of the request.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct AvailabilityRequest {
    /// New availability of the book.
    available: bool,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<Json<Book>, RestError> {
    let id = parse_book_id(&id)?;
    let book = driver
        .set_book_availability(id, request.available)
        .await
        .map_err(|e| map_driver_error(e, UPDATE_ERROR))?;
    Ok(Json(book))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use iii_iv_core::rest::testutils::*;
    use std::fmt::Display;

    fn route<I: Display>(id: I) -> (http::Method, String) {
        (http::Method::PATCH, format!("/books/{}/availability", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup();
        let book = context.add_book("Dune", "Frank Herbert").await;

        let response = OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(AvailabilityRequest { available: false })
            .await
            .expect_json::<Book>()
            .await;
        assert_eq!(book.clone().with_available(false), response);
        assert_eq!(Some(response), context.get_book(*book.id()).await);

        let response = OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(AvailabilityRequest { available: true })
            .await
            .expect_json::<Book>()
            .await;
        assert_eq!(book, response);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup();

        OneShotBuilder::new(context.app(), route(42))
            .send_json(AvailabilityRequest { available: true })
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_text("^Book not found$")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_id() {
        OneShotBuilder::new(TestContext::setup().into_app(), route("x"))
            .send_json(AvailabilityRequest { available: true })
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_text("^Book not found$")
            .await;
    }

    #[tokio::test]
    async fn test_storage_error() {
        OneShotBuilder::new(failing_app(), route(1))
            .send_json(AvailabilityRequest { available: true })
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_text("^Error updating book availability$")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().into_app(), route(1));
}
