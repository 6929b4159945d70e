//! Book catalogue
//!
//! - `book`: the book record and its tick-based publication date
//! - `format`: field-letter and named text formats
//! - `storage`: whole-list persistence seam
//! - `service`: the in-memory list with add/remove/find/sort/save

#[allow(clippy::module_inception)]
mod book;
mod errors;
mod format;
mod service;
mod storage;

pub use book::{datetime_to_ticks, ticks_to_datetime, Book, MAX_TICKS};
pub use errors::{BookError, BookResult};
pub use format::BookFormatter;
pub use service::BookListService;
pub use storage::{BookStorage, MemoryBookStore};
