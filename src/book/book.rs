//! Book record
//!
//! On-disk layout:
//!
//! ```text
//! [isbn][author][title][publisher]   length-prefixed strings
//! [ticks: i64][pages: u16][price: decimal 16]
//! ```
//!
//! Publication dates are stored as ticks: 100-nanosecond intervals since
//! 0001-01-01T00:00:00. The 26 trailing bytes form the mutable block.

use std::cmp::Ordering;
use std::io::{self, Read};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::errors::{BookError, BookResult};
use crate::storage::{
    decode_decimal, decode_i64, decode_string, decode_u16, encode_decimal, encode_i64,
    encode_string, encode_u16, string_len, Record, DECIMAL_LEN,
};

const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;

/// Ticks of 9999-12-31T23:59:59.9999999.
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

fn tick_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Converts a timestamp to ticks. `None` outside years 1 to 9999.
pub fn datetime_to_ticks(value: &NaiveDateTime) -> Option<i64> {
    let delta = value.signed_duration_since(tick_epoch());
    let seconds = delta.num_seconds();
    if seconds < 0 {
        return None;
    }
    let sub_ticks = i64::from(delta.subsec_nanos()) / NANOS_PER_TICK;
    let ticks = seconds
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(sub_ticks)?;
    (0..=MAX_TICKS).contains(&ticks).then_some(ticks)
}

/// Converts ticks back to a timestamp. `None` outside `0..=MAX_TICKS`.
pub fn ticks_to_datetime(ticks: i64) -> Option<NaiveDateTime> {
    if !(0..=MAX_TICKS).contains(&ticks) {
        return None;
    }
    let whole = Duration::seconds(ticks / TICKS_PER_SECOND);
    let frac = Duration::nanoseconds((ticks % TICKS_PER_SECOND) * NANOS_PER_TICK);
    tick_epoch()
        .checked_add_signed(whole)?
        .checked_add_signed(frac)
}

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    isbn: String,
    author: String,
    title: String,
    publisher: String,
    published: NaiveDateTime,
    pages: u16,
    price: Decimal,
}

fn require(field: &str, value: &str) -> BookResult<()> {
    if value.trim().is_empty() {
        return Err(BookError::validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

impl Book {
    /// # Errors
    ///
    /// `Validation` if any text field is blank, the price is negative, or the
    /// publication date falls outside years 1 to 9999.
    ///
    /// `published` is truncated to whole ticks (100 ns).
    pub fn new(
        isbn: impl Into<String>,
        author: impl Into<String>,
        title: impl Into<String>,
        publisher: impl Into<String>,
        published: NaiveDateTime,
        pages: u16,
        price: Decimal,
    ) -> BookResult<Self> {
        // Truncated to tick precision so the stored value is what we hold
        let published = datetime_to_ticks(&published)
            .and_then(ticks_to_datetime)
            .ok_or_else(|| {
                BookError::validation(format!("publication date {} is out of range", published))
            })?;

        let book = Self {
            isbn: isbn.into(),
            author: author.into(),
            title: title.into(),
            publisher: publisher.into(),
            published,
            pages,
            price,
        };

        require("isbn", &book.isbn)?;
        require("author", &book.author)?;
        require("title", &book.title)?;
        require("publisher", &book.publisher)?;
        if book.price.is_sign_negative() && !book.price.is_zero() {
            return Err(BookError::validation("price cannot be negative"));
        }
        Ok(book)
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn published(&self) -> NaiveDateTime {
        self.published
    }

    pub fn pages(&self) -> u16 {
        self.pages
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Default catalogue order: author, then title.
    pub fn cmp_by_author_title(&self, other: &Book) -> Ordering {
        self.author
            .cmp(&other.author)
            .then_with(|| self.title.cmp(&other.title))
    }

    fn ticks(&self) -> i64 {
        // Range checked in `new`
        datetime_to_ticks(&self.published).unwrap_or_default()
    }
}

fn invalid_data(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

impl Record for Book {
    const KIND: &'static str = "book";
    const MUTABLE_LEN: usize = 8 + 2 + DECIMAL_LEN;

    fn key(&self) -> &str {
        &self.isbn
    }

    fn encoded_len(&self) -> usize {
        self.mutable_offset() + Self::MUTABLE_LEN
    }

    fn encode_into(&self, buf: &mut Vec<u8>) {
        encode_string(buf, &self.isbn);
        encode_string(buf, &self.author);
        encode_string(buf, &self.title);
        encode_string(buf, &self.publisher);
        self.encode_mutable(buf);
    }

    fn decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let isbn = decode_string(reader)?;
        let author = decode_string(reader)?;
        let title = decode_string(reader)?;
        let publisher = decode_string(reader)?;
        let ticks = decode_i64(reader)?;
        let pages = decode_u16(reader)?;
        let price = decode_decimal(reader)?;

        let published = ticks_to_datetime(ticks)
            .ok_or_else(|| invalid_data(format!("Publication ticks out of range: {}", ticks)))?;
        Book::new(isbn, author, title, publisher, published, pages, price)
            .map_err(|e| invalid_data(e.to_string()))
    }

    fn mutable_offset(&self) -> usize {
        string_len(&self.isbn)
            + string_len(&self.author)
            + string_len(&self.title)
            + string_len(&self.publisher)
    }

    fn encode_mutable(&self, buf: &mut Vec<u8>) {
        encode_i64(buf, self.ticks());
        encode_u16(buf, self.pages);
        encode_decimal(buf, self.price);
    }

    fn same_layout(&self, other: &Self) -> bool {
        self.isbn == other.isbn
            && self.author == other.author
            && self.title == other.title
            && self.publisher == other.publisher
    }
}
