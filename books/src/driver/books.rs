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

//! Operations on the books collection.

use crate::driver::{BOOK_NOT_FOUND, Driver};
use crate::model::*;
use iii_iv_core::driver::{DriverError, DriverResult};
use log::debug;

impl Driver {
    /// Gets all books in the collection.
    pub(crate) async fn list_books(self) -> DriverResult<Vec<Book>> {
        let books = self.store.list_books().await?;
        debug!("Listed {} books", books.len());
        Ok(books)
    }

    /// Gets the book identified by `id`.
    pub(crate) async fn get_book(self, id: BookId) -> DriverResult<Book> {
        match self.store.get_book(id).await? {
            Some(book) => Ok(book),
            None => Err(DriverError::NotFound(BOOK_NOT_FOUND.to_owned())),
        }
    }

    /// Adds a new book to the collection and returns it with its assigned identifier.
    pub(crate) async fn create_book(self, book: NewBook) -> DriverResult<Book> {
        let book = self.store.create_book(book).await?;
        debug!("Created book {}", book.id());
        Ok(book)
    }

    /// Applies `update` to the book identified by `id` and returns the updated book.
    pub(crate) async fn update_book(self, id: BookId, update: BookUpdate) -> DriverResult<Book> {
        match self.store.update_book(id, update).await? {
            Some(book) => {
                debug!("Updated book {}", id);
                Ok(book)
            }
            None => Err(DriverError::NotFound(BOOK_NOT_FOUND.to_owned())),
        }
    }

    /// Sets whether the book identified by `id` is `available` and returns the updated book.
    pub(crate) async fn set_book_availability(
        self,
        id: BookId,
        available: bool,
    ) -> DriverResult<Book> {
        self.update_book(id, BookUpdate::default().with_available(available)).await
    }

    /// Deletes the book identified by `id`.
    pub(crate) async fn delete_book(self, id: BookId) -> DriverResult<()> {
        if !self.store.delete_book(id).await? {
            return Err(DriverError::NotFound(BOOK_NOT_FOUND.to_owned()));
        }
        debug!("Deleted book {}", id);
        Ok(())
    }
}
