//! In-memory book list backed by a [`BookStorage`]
//!
//! The list is loaded once by [`BookListService::open`] and only written back
//! on [`BookListService::save`]. ISBNs are unique within the list.

use std::cmp::Ordering;

use tracing::{debug, info};

use super::book::Book;
use super::errors::{BookError, BookResult};
use super::storage::BookStorage;

pub struct BookListService<S> {
    books: Vec<Book>,
    storage: S,
}

impl<S: BookStorage> BookListService<S> {
    /// Loads every stored book.
    pub fn open(storage: S) -> BookResult<Self> {
        let books = storage.load_books()?;
        debug!(count = books.len(), "book list loaded");
        Self::with_books(storage, books)
    }

    /// Builds a list from `books` without reading `storage`.
    ///
    /// # Errors
    ///
    /// `DuplicateIsbn` if two books share an ISBN.
    pub fn with_books(storage: S, books: impl IntoIterator<Item = Book>) -> BookResult<Self> {
        let mut service = Self {
            books: Vec::new(),
            storage,
        };
        for book in books {
            service.add_book(book)?;
        }
        Ok(service)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add_book(&mut self, book: Book) -> BookResult<()> {
        if self.books.iter().any(|b| b.isbn() == book.isbn()) {
            return Err(BookError::DuplicateIsbn(book.isbn().to_string()));
        }
        self.books.push(book);
        Ok(())
    }

    /// Removes and returns the book with `isbn`.
    pub fn remove_book(&mut self, isbn: &str) -> BookResult<Book> {
        let idx = self
            .books
            .iter()
            .position(|b| b.isbn() == isbn)
            .ok_or_else(|| BookError::NotFound(isbn.to_string()))?;
        Ok(self.books.remove(idx))
    }

    /// First book in list order matching `predicate`.
    pub fn find_book<P>(&self, predicate: P) -> Option<&Book>
    where
        P: Fn(&Book) -> bool,
    {
        self.books.iter().find(|b| predicate(b))
    }

    /// Stable sort by `compare`.
    pub fn sort_books_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Book, &Book) -> Ordering,
    {
        self.books.sort_by(compare);
    }

    /// Sorts by author, then title.
    pub fn sort_books(&mut self) {
        self.sort_books_by(Book::cmp_by_author_title);
    }

    /// Writes the whole list to storage in its current order.
    pub fn save(&mut self) -> BookResult<()> {
        self.storage.save_books(&self.books)?;
        info!(count = self.books.len(), "book list saved");
        Ok(())
    }
}
