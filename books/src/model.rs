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

//! High-level data types.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use iii_iv_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Minimum number of characters accepted in titles and author names.
pub(crate) const MIN_TEXT_LENGTH: usize = 3;

/// Maximum number of characters accepted in titles and author names.
pub(crate) const MAX_TEXT_LENGTH: usize = 50;

/// Checks that the contents `s` of the `field` text property have a valid length.
///
/// Lengths are counted in Unicode scalar values, not bytes nor UTF-16 code units, so a character
/// outside the Basic Multilingual Plane such as an emoji counts once.
fn validate_text(field: &str, s: String) -> ModelResult<String> {
    let length = s.chars().count();
    if length == 0 {
        return Err(ModelError(format!("\"{}\" is not allowed to be empty", field)));
    }
    if length < MIN_TEXT_LENGTH {
        return Err(ModelError(format!(
            "\"{}\" length must be at least {} characters long",
            field, MIN_TEXT_LENGTH
        )));
    }
    if length > MAX_TEXT_LENGTH {
        return Err(ModelError(format!(
            "\"{}\" length must be less than or equal to {} characters long",
            field, MAX_TEXT_LENGTH
        )));
    }
    Ok(s)
}

/// Unique identifier of a book.  Identifiers are assigned by the storage layer and never change.
#[derive(Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Serialize)]
#[serde(transparent)]
pub(crate) struct BookId(i64);

impl BookId {
    /// Parses an identifier from its textual representation, as found in request paths.
    ///
    /// The whole of `raw` must be a decimal integer: fractional values and trailing garbage such
    /// as `1.5` or `12abc` are rejected instead of being truncated to a leading number.
    pub(crate) fn parse(raw: &str) -> ModelResult<Self> {
        match raw.parse::<i64>() {
            Ok(id) => Ok(BookId(id)),
            Err(e) => Err(ModelError(format!("Invalid book identifier '{}': {}", raw, e))),
        }
    }

    /// Returns the identifier as an `i64` for storage purposes.
    pub(crate) fn as_i64(self) -> i64 {
        self.0
    }
}

/// The title of a book.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct Title(String);

impl Title {
    /// Creates a new title from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        validate_text("title", s.into()).map(Title)
    }

    /// Returns a string view of the title.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&'static str> for Title {
    fn from(s: &'static str) -> Self {
        Title::new(s).expect("Hardcoded titles must be valid")
    }
}

/// The name of the author of a book.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct Author(String);

impl Author {
    /// Creates a new author name from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        validate_text("author", s.into()).map(Author)
    }

    /// Returns a string view of the author name.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&'static str> for Author {
    fn from(s: &'static str) -> Self {
        Author::new(s).expect("Hardcoded authors must be valid")
    }
}

/// A book as stored in the collection.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct Book {
    /// Identifier of the book.
    id: BookId,

    /// Title of the book.
    title: Title,

    /// Author of the book.
    author: Author,

    /// Whether the book is available for lending.  Unknown for books that never had it set in
    /// storage backends that do not track it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    available: Option<bool>,
}

impl Book {
    /// Creates a new book with unknown availability.
    pub(crate) fn new(id: BookId, title: Title, author: Author) -> Self {
        Self { id, title, author, available: None }
    }

    /// Sets the availability of the book.
    pub(crate) fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }
}

/// The details of a book that is yet to be stored and thus has no identifier.
#[derive(Clone, Debug, Getters, PartialEq)]
pub(crate) struct NewBook {
    /// Title of the book.
    title: Title,

    /// Author of the book.
    author: Author,

    /// Initial availability of the book, if specified.
    available: Option<bool>,
}

impl NewBook {
    /// Creates the details of a new book with unspecified availability.
    pub(crate) fn new(title: Title, author: Author) -> Self {
        Self { title, author, available: None }
    }

    /// Sets the initial availability of the book.
    pub(crate) fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }
}

/// A partial set of changes to apply to a stored book.  Fields set to `None` are left untouched.
#[derive(Clone, Debug, Default, Getters, PartialEq)]
pub(crate) struct BookUpdate {
    /// New title for the book.
    title: Option<Title>,

    /// New author for the book.
    author: Option<Author>,

    /// New availability for the book.
    available: Option<bool>,
}

impl BookUpdate {
    /// Sets the new title for the book.
    #[cfg(test)]
    pub(crate) fn with_title(mut self, title: Title) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the new author for the book.
    #[cfg(test)]
    pub(crate) fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    /// Sets the new availability for the book.
    pub(crate) fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }
}

impl From<NewBook> for BookUpdate {
    fn from(book: NewBook) -> Self {
        Self { title: Some(book.title), author: Some(book.author), available: book.available }
    }
}
