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

//! Implementation of the database abstraction that keeps the collection in memory.

use crate::db::BookStore;
use crate::model::*;
use futures::lock::Mutex;
use iii_iv_core::db::DbResult;
use iii_iv_core::model::ModelResult;

/// Mutable state of the in-memory store.
struct Collection {
    /// Books in insertion order.
    books: Vec<Book>,

    /// Identifier to assign to the next created book.  Never decreases.
    next_id: i64,
}

/// A store that keeps all books in process memory.  Contents are lost on restart.
pub(crate) struct MemoryBookStore {
    /// The collection, locked for the duration of each operation.
    collection: Mutex<Collection>,
}

impl MemoryBookStore {
    /// Creates a store that holds `books` and that assigns identifiers past the largest one in it.
    pub(crate) fn with_books(books: Vec<Book>) -> Self {
        let next_id = books.iter().map(|b| b.id().as_i64()).max().unwrap_or(0) + 1;
        Self { collection: Mutex::new(Collection { books, next_id }) }
    }

    /// Creates a store seeded with a couple of well-known books.
    pub(crate) fn with_sample_books() -> Self {
        let sample = |id, title: &str, author: &str| -> ModelResult<Book> {
            Ok(Book::new(BookId::new(id), Title::new(title)?, Author::new(author)?))
        };

        let books = vec![
            sample(1, "The Lord of the Rings", "J.R.R. Tolkien"),
            sample(2, "Pride and Prejudice", "Jane Austen"),
        ];
        let books = books
            .into_iter()
            .collect::<ModelResult<Vec<Book>>>()
            .expect("Hardcoded sample books must be valid");
        Self::with_books(books)
    }
}

/// Returns a copy of `book` with the fields set in `update` replacing its current values.
fn merge(book: &Book, update: BookUpdate) -> Book {
    let title = update.title().clone().unwrap_or_else(|| book.title().clone());
    let author = update.author().clone().unwrap_or_else(|| book.author().clone());
    let merged = Book::new(*book.id(), title, author);
    match (*update.available()).or(*book.available()) {
        Some(available) => merged.with_available(available),
        None => merged,
    }
}

#[async_trait::async_trait]
impl BookStore for MemoryBookStore {
    async fn list_books(&self) -> DbResult<Vec<Book>> {
        let collection = self.collection.lock().await;
        Ok(collection.books.clone())
    }

    async fn get_book(&self, id: BookId) -> DbResult<Option<Book>> {
        let collection = self.collection.lock().await;
        Ok(collection.books.iter().find(|b| *b.id() == id).cloned())
    }

    async fn create_book(&self, book: NewBook) -> DbResult<Book> {
        let mut collection = self.collection.lock().await;

        let id = BookId::new(collection.next_id);
        collection.next_id += 1;

        let mut stored = Book::new(id, book.title().clone(), book.author().clone());
        if let Some(available) = book.available() {
            stored = stored.with_available(*available);
        }
        collection.books.push(stored.clone());
        Ok(stored)
    }

    async fn update_book(&self, id: BookId, update: BookUpdate) -> DbResult<Option<Book>> {
        let mut collection = self.collection.lock().await;
        match collection.books.iter_mut().find(|b| *b.id() == id) {
            None => Ok(None),
            Some(book) => {
                *book = merge(book, update);
                Ok(Some(book.clone()))
            }
        }
    }

    async fn delete_book(&self, id: BookId) -> DbResult<bool> {
        let mut collection = self.collection.lock().await;
        match collection.books.iter().position(|b| *b.id() == id) {
            None => Ok(false),
            Some(index) => {
                collection.books.remove(index);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::generate_db_tests;

    generate_db_tests!(MemoryBookStore::with_books(vec![]));

    #[tokio::test]
    async fn test_sample_books() {
        let store = MemoryBookStore::with_sample_books();
        let books = store.list_books().await.unwrap();
        assert_eq!(
            vec![
                Book::new(BookId::new(1), "The Lord of the Rings".into(), "J.R.R. Tolkien".into()),
                Book::new(BookId::new(2), "Pride and Prejudice".into(), "Jane Austen".into()),
            ],
            books
        );

        let book = store.create_book(NewBook::new("Dune".into(), "Herbert".into())).await.unwrap();
        assert_eq!(BookId::new(3), *book.id());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = MemoryBookStore::with_books(vec![]);
        let first =
            store.create_book(NewBook::new("First".into(), "Someone".into())).await.unwrap();
        let second =
            store.create_book(NewBook::new("Second".into(), "Someone".into())).await.unwrap();
        assert!(store.delete_book(*second.id()).await.unwrap());

        let third =
            store.create_book(NewBook::new("Third".into(), "Someone".into())).await.unwrap();
        assert!(third.id() > second.id());
        assert!(second.id() > first.id());
    }

    #[tokio::test]
    async fn test_availability_unknown_until_set() {
        let store = MemoryBookStore::with_books(vec![]);
        let book = store.create_book(NewBook::new("Dune".into(), "Herbert".into())).await.unwrap();
        assert_eq!(&None, book.available());

        let book = store
            .update_book(*book.id(), BookUpdate::default().with_title("Dune Messiah".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&None, book.available());

        let book = store
            .update_book(*book.id(), BookUpdate::default().with_available(false))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&Some(false), book.available());
        assert_eq!("Dune Messiah", book.title().as_str());
    }
}
