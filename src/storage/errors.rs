//! Record store error types
//!
//! Error codes:
//! - LEDGER_STORE_IO_ERROR (ERROR severity)
//! - LEDGER_STORE_NOT_FOUND (ERROR severity)
//! - LEDGER_STORE_DUPLICATE_KEY (ERROR severity)
//! - LEDGER_STORE_LAYOUT_MISMATCH (ERROR severity)
//! - LEDGER_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

use thiserror::Error;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the file is still usable
    Error,
    /// The file can no longer be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Errors raised by [`RecordStore`](super::RecordStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file could not be opened, read or written
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// No record with this key exists in the file
    #[error("record with key \"{0}\" not found")]
    NotFound(String),

    /// A record with this key is already present
    #[error("record with key \"{0}\" already exists")]
    DuplicateKey(String),

    /// `save` was asked to change bytes outside the fixed-width mutable block
    #[error("record \"{0}\" cannot be saved in place: only fixed-width fields may change")]
    LayoutMismatch(String),

    /// Bytes at `offset` do not decode as a record
    #[error("data corruption at byte offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },
}

impl StoreError {
    /// Wrap an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a corruption error for the record starting at `offset`.
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        StoreError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "LEDGER_STORE_IO_ERROR",
            StoreError::NotFound(_) => "LEDGER_STORE_NOT_FOUND",
            StoreError::DuplicateKey(_) => "LEDGER_STORE_DUPLICATE_KEY",
            StoreError::LayoutMismatch(_) => "LEDGER_STORE_LAYOUT_MISMATCH",
            StoreError::Corruption { .. } => "LEDGER_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            StoreError::Corruption { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// Returns whether the file should be considered unusable
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            StoreError::NotFound("k".into()).code(),
            "LEDGER_STORE_NOT_FOUND"
        );
        assert_eq!(
            StoreError::DuplicateKey("k".into()).code(),
            "LEDGER_STORE_DUPLICATE_KEY"
        );
        assert_eq!(
            StoreError::LayoutMismatch("k".into()).code(),
            "LEDGER_STORE_LAYOUT_MISMATCH"
        );
        assert_eq!(
            StoreError::corruption_at_offset(0, "x").code(),
            "LEDGER_DATA_CORRUPTION"
        );
    }

    #[test]
    fn test_only_corruption_is_fatal() {
        assert!(StoreError::corruption_at_offset(12, "truncated").is_fatal());
        assert!(!StoreError::NotFound("k".into()).is_fatal());
        assert!(!StoreError::io("open", io::Error::new(io::ErrorKind::Other, "boom")).is_fatal());
    }

    #[test]
    fn test_display_contains_offset() {
        let err = StoreError::corruption_at_offset(1024, "invalid UTF-8");
        let display = err.to_string();
        assert!(display.contains("1024"));
        assert!(display.contains("invalid UTF-8"));
    }
}
