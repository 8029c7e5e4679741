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

//! API to update an existing book.

use crate::driver::Driver;
use crate::model::{Book, BookUpdate};
use crate::rest::validate_book::ValidBook;
use crate::rest::{map_driver_error, parse_book_id};
use axum::Json;
use axum::extract::{Path, State};
use iii_iv_core::rest::RestError;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    ValidBook(book): ValidBook,
) -> Result<Json<Book>, RestError> {
    let id = parse_book_id(&id)?;
    let book = driver
        .update_book(id, BookUpdate::from(book))
        .await
        .map_err(|e| map_driver_error(e, "Error updating book"))?;
    Ok(Json(book))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use iii_iv_core::rest::testutils::*;
    use serde_json::json;
    use std::fmt::Display;

    fn route<I: Display>(id: I) -> (http::Method, String) {
        (http::Method::PUT, format!("/books/{}", id))
    }

    #[tokio::test]
    async fn test_update() {
        let context = TestContext::setup();
        let book = context.add_book("Dune", "Frank Herbert").await;
        let other = context.add_book("Emma", "Jane Austen").await;

        let response = OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(json!({"title": "Dune Messiah", "author": "F. Herbert"}))
            .await
            .expect_json::<Book>()
            .await;
        let exp_book = Book::new(*book.id(), "Dune Messiah".into(), "F. Herbert".into())
            .with_available(true);
        assert_eq!(exp_book, response);

        assert_eq!(Some(exp_book), context.get_book(*book.id()).await);
        assert_eq!(Some(other.clone()), context.get_book(*other.id()).await);
    }

    #[tokio::test]
    async fn test_update_availability_too() {
        let context = TestContext::setup();
        let book = context.add_book("Dune", "Frank Herbert").await;

        let response = OneShotBuilder::new(context.app(), route(book.id()))
            .send_form(vec![("title", "Dune"), ("author", "Frank Herbert"), ("available", "false")])
            .await
            .expect_json::<Book>()
            .await;
        assert_eq!(book.with_available(false), response);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup();

        OneShotBuilder::new(context.app(), route(999))
            .send_json(json!({"title": "Dune", "author": "Herbert"}))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_text("^Book not found$")
            .await;

        assert!(context.list_books().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let context = TestContext::setup();

        OneShotBuilder::new(context.app(), route("first"))
            .send_json(json!({"title": "Dune", "author": "Herbert"}))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_text("^Book not found$")
            .await;
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let context = TestContext::setup();
        let book = context.add_book("Dune", "Frank Herbert").await;

        let response = OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(json!({"title": "Dune", "available": "maybe"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^Validation error$")
            .await;
        assert_eq!(
            vec!["\"author\" is required".to_owned(), "\"available\" must be a boolean".to_owned()],
            response.errors
        );

        assert_eq!(Some(book), context.get_book(BookId::new(1)).await);
    }

    #[tokio::test]
    async fn test_cannot_overwrite_id() {
        let context = TestContext::setup();
        let book = context.add_book("Dune", "Frank Herbert").await;

        let response = OneShotBuilder::new(context.app(), route(book.id()))
            .send_json(json!({"id": 500, "title": "Dune", "author": "Herbert"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^Validation error$")
            .await;
        assert_eq!(vec!["\"id\" is not allowed".to_owned()], response.errors);

        assert_eq!(Some(book), context.get_book(BookId::new(1)).await);
        assert_eq!(None, context.get_book(BookId::new(500)).await);
    }

    #[tokio::test]
    async fn test_storage_error() {
        OneShotBuilder::new(failing_app(), route(1))
            .send_json(json!({"title": "Dune", "author": "Herbert"}))
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_text("^Error updating book$")
            .await;
    }
}
