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

//! Validation of the request bodies that describe a book.
//!
//! Bodies may come as JSON or as a URL-encoded form.  Bodies in any other format, as well as empty
//! bodies, are treated as an empty object so that they are reported as missing all their fields.

use crate::model::{Author, NewBook, Title};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use iii_iv_core::model::ModelResult;
use iii_iv_core::rest::RestError;
use serde_json::{Map, Value};

/// Error reported for bodies that cannot be interpreted as an object.
const NOT_AN_OBJECT: &str = "\"value\" must be of type object";

/// Names of the properties a book body may carry.
const KNOWN_FIELDS: &[&str] = &["title", "author", "available"];

/// Request body extractor that only succeeds if the body describes a valid book.
///
/// Rejected requests never reach the handler: they get a 400 response listing every problem found
/// in the body.
pub(crate) struct ValidBook(pub(crate) NewBook);

#[async_trait]
impl<S> FromRequest<S> for ValidBook
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<mime::Mime>().ok());

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::InvalidRequest(e.body_text()))?;

        let fields = parse_fields(content_type.as_ref(), &body)
            .map_err(|e| RestError::ValidationFailed(vec![e]))?;
        validate(&fields).map(ValidBook).map_err(RestError::ValidationFailed)
    }
}

/// Parses the raw `body` into a set of properties according to its `content_type`.
fn parse_fields(
    content_type: Option<&mime::Mime>,
    body: &[u8],
) -> Result<Map<String, Value>, String> {
    if body.is_empty() {
        return Ok(Map::new());
    }

    let essence = content_type.map(|ct| ct.essence_str());
    if essence == Some(mime::APPLICATION_JSON.essence_str()) {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(fields),
            _ => Err(NOT_AN_OBJECT.to_owned()),
        }
    } else if essence == Some(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()) {
        match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
            Ok(pairs) => Ok(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect()),
            Err(_) => Err(NOT_AN_OBJECT.to_owned()),
        }
    } else {
        Ok(Map::new())
    }
}

/// Validates the required text property `name` in `fields` via the `parse` constructor.
fn validate_text<T>(
    fields: &Map<String, Value>,
    name: &str,
    parse: fn(String) -> ModelResult<T>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match fields.get(name) {
        None => {
            errors.push(format!("\"{}\" is required", name));
            None
        }
        Some(Value::String(s)) => match parse(s.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        },
        Some(_) => {
            errors.push(format!("\"{}\" must be a string", name));
            None
        }
    }
}

/// Validates the optional `available` property in `fields`.
fn validate_available(fields: &Map<String, Value>, errors: &mut Vec<String>) -> Option<bool> {
    match fields.get("available") {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) if s == "true" => Some(true),
        Some(Value::String(s)) if s == "false" => Some(false),
        Some(_) => {
            errors.push("\"available\" must be a boolean".to_owned());
            None
        }
    }
}

/// Validates all `fields` of a book body, collecting every problem found.
fn validate(fields: &Map<String, Value>) -> Result<NewBook, Vec<String>> {
    let mut errors = vec![];

    let title = validate_text(fields, "title", Title::new::<String>, &mut errors);
    let author = validate_text(fields, "author", Author::new::<String>, &mut errors);
    let available = validate_available(fields, &mut errors);
    for key in fields.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            errors.push(format!("\"{}\" is not allowed", key));
        }
    }

    match (title, author) {
        (Some(title), Some(author)) if errors.is_empty() => {
            let book = NewBook::new(title, author);
            Ok(match available {
                Some(available) => book.with_available(available),
                None => book,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Validates the JSON `value`, which must be an object.
    fn validate_json(value: Value) -> Result<NewBook, Vec<String>> {
        match value {
            Value::Object(fields) => validate(&fields),
            _ => panic!("Test values must be objects"),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(
            Ok(NewBook::new("Dune".into(), "Frank Herbert".into())),
            validate_json(json!({"title": "Dune", "author": "Frank Herbert"}))
        );
        assert_eq!(
            Ok(NewBook::new("Dune".into(), "Frank Herbert".into()).with_available(false)),
            validate_json(json!({"title": "Dune", "author": "Frank Herbert", "available": false}))
        );
    }

    #[test]
    fn test_validate_available_strings() {
        assert_eq!(
            Ok(NewBook::new("Dune".into(), "Frank Herbert".into()).with_available(true)),
            validate_json(json!({"title": "Dune", "author": "Frank Herbert", "available": "true"}))
        );
        assert_eq!(
            Err(vec!["\"available\" must be a boolean".to_owned()]),
            validate_json(json!({"title": "Dune", "author": "Frank Herbert", "available": "yes"}))
        );
        assert_eq!(
            Err(vec!["\"available\" must be a boolean".to_owned()]),
            validate_json(json!({"title": "Dune", "author": "Frank Herbert", "available": 1}))
        );
    }

    #[test]
    fn test_validate_missing_everything() {
        assert_eq!(
            Err(vec!["\"title\" is required".to_owned(), "\"author\" is required".to_owned()]),
            validate_json(json!({}))
        );
    }

    #[test]
    fn test_validate_wrong_types() {
        assert_eq!(
            Err(vec![
                "\"title\" must be a string".to_owned(),
                "\"author\" must be a string".to_owned(),
            ]),
            validate_json(json!({"title": 42, "author": null}))
        );
    }

    #[test]
    fn test_validate_lengths() {
        assert_eq!(
            Err(vec![
                "\"title\" is not allowed to be empty".to_owned(),
                "\"author\" length must be at least 3 characters long".to_owned(),
            ]),
            validate_json(json!({"title": "", "author": "Al"}))
        );
        assert_eq!(
            Err(vec![
                "\"title\" length must be less than or equal to 50 characters long".to_owned()
            ]),
            validate_json(json!({"title": "x".repeat(51), "author": "Someone"}))
        );
    }

    #[test]
    fn test_validate_unknown_keys() {
        assert_eq!(
            Err(vec!["\"id\" is not allowed".to_owned(), "\"isbn\" is not allowed".to_owned()]),
            validate_json(json!({"title": "Dune", "author": "Frank Herbert", "id": 7, "isbn": "x"}))
        );
    }

    #[test]
    fn test_parse_fields_json() {
        let json = mime::APPLICATION_JSON;
        let fields = parse_fields(Some(&json), br#"{"title": "Dune"}"#).unwrap();
        assert_eq!(Some(&json!("Dune")), fields.get("title"));

        assert_eq!(Err(NOT_AN_OBJECT.to_owned()), parse_fields(Some(&json), b"[1, 2]"));
        assert_eq!(Err(NOT_AN_OBJECT.to_owned()), parse_fields(Some(&json), b"{not json"));
        assert_eq!(Ok(Map::new()), parse_fields(Some(&json), b""));
    }

    #[test]
    fn test_parse_fields_json_with_charset() {
        let json: mime::Mime = "application/json; charset=utf-8".parse().unwrap();
        let fields = parse_fields(Some(&json), br#"{"author": "Herbert"}"#).unwrap();
        assert_eq!(Some(&json!("Herbert")), fields.get("author"));
    }

    #[test]
    fn test_parse_fields_form() {
        let form = mime::APPLICATION_WWW_FORM_URLENCODED;
        let fields = parse_fields(Some(&form), b"title=Dune&author=Frank+Herbert&available=false")
            .unwrap();
        assert_eq!(Some(&json!("Dune")), fields.get("title"));
        assert_eq!(Some(&json!("Frank Herbert")), fields.get("author"));
        assert_eq!(Some(&json!("false")), fields.get("available"));
    }

    #[test]
    fn test_parse_fields_other_content_types() {
        assert_eq!(Ok(Map::new()), parse_fields(None, br#"{"title": "Dune"}"#));
        assert_eq!(Ok(Map::new()), parse_fields(Some(&mime::TEXT_PLAIN), b"title=Dune"));
    }
}
