//! Book catalogue error types

use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum BookError {
    /// Field value rejected by `Book::new`
    #[error("invalid book: {0}")]
    Validation(String),

    #[error("the book list already contains a book with ISBN {0}")]
    DuplicateIsbn(String),

    #[error("the book list does not contain a book with ISBN {0}")]
    NotFound(String),

    /// Unknown format letter or named format
    #[error("invalid format: {0}")]
    Format(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BookError::Validation(msg.into())
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            BookError::Validation(_) => "LEDGER_BOOK_VALIDATION",
            BookError::DuplicateIsbn(_) => "LEDGER_BOOK_DUPLICATE_ISBN",
            BookError::NotFound(_) => "LEDGER_BOOK_NOT_FOUND",
            BookError::Format(_) => "LEDGER_BOOK_FORMAT",
            BookError::Store(e) => e.code(),
        }
    }
}

pub type BookResult<T> = Result<T, BookError>;
