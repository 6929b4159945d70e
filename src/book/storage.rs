//! Book list persistence
//!
//! The catalogue loads and saves the whole list at once, so the file backend
//! uses the store's bulk rewrite rather than keyed updates.

use super::book::Book;
use crate::storage::{RecordStore, StoreError, StoreResult};

/// Whole-list book persistence.
pub trait BookStorage {
    fn load_books(&self) -> StoreResult<Vec<Book>>;

    /// Replaces the stored list. `DuplicateKey` if two books share an ISBN.
    fn save_books(&mut self, books: &[Book]) -> StoreResult<()>;
}

impl BookStorage for RecordStore<Book> {
    fn load_books(&self) -> StoreResult<Vec<Book>> {
        self.load_all()
    }

    fn save_books(&mut self, books: &[Book]) -> StoreResult<()> {
        self.save_all(books)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryBookStore {
    books: Vec<Book>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }
}

impl BookStorage for MemoryBookStore {
    fn load_books(&self) -> StoreResult<Vec<Book>> {
        Ok(self.books.clone())
    }

    fn save_books(&mut self, books: &[Book]) -> StoreResult<()> {
        for (i, book) in books.iter().enumerate() {
            if books[..i].iter().any(|b| b.isbn() == book.isbn()) {
                return Err(StoreError::DuplicateKey(book.isbn().to_string()));
            }
        }
        self.books = books.to_vec();
        Ok(())
    }
}
