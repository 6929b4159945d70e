//! Textual renderings of a book
//!
//! Two families of format strings:
//!
//! - field letters, combined freely and case-insensitive:
//!   `I` ISBN, `A` author, `T` title, `B` publisher, `Y` year, `P` pages,
//!   `C` price. `"ATY"` renders `Jeffrey Richter, CLR via C#, 2012`.
//! - named formats understood by [`BookFormatter`]: `G` general, `L` long.

use std::fmt;

use chrono::Datelike;

use super::book::Book;
use super::errors::{BookError, BookResult};
use crate::display::DisplayOptions;

impl Book {
    /// `CLR via C# (2012) by Jeffrey Richter for $59.99`
    pub fn general(&self, options: &DisplayOptions) -> String {
        format!(
            "{} ({}) by {} for {}",
            self.title(),
            self.published().year(),
            self.author(),
            options.currency(self.price())
        )
    }

    /// One `Label: value` line per field.
    pub fn long(&self, options: &DisplayOptions) -> String {
        [
            format!("ISBN: {}", self.isbn()),
            format!("Author: {}", self.author()),
            format!("Title: {}", self.title()),
            format!("Publisher: {}", self.publisher()),
            format!("Publication date: {}", options.short_date(&self.published())),
            format!("Pages: {}", self.pages()),
            format!("Price: {}", options.currency(self.price())),
        ]
        .join("\n")
    }

    /// Renders the fields named by `format`, joined by `", "`.
    ///
    /// `None` or an empty string gives the general form.
    ///
    /// # Errors
    ///
    /// `Format` on any character that is not a field letter, whitespace
    /// included.
    pub fn format_fields(&self, format: Option<&str>, options: &DisplayOptions) -> BookResult<String> {
        let format = match format {
            Some(f) if !f.is_empty() => f,
            _ => return Ok(self.general(options)),
        };

        let mut parts = Vec::with_capacity(format.len());
        for ch in format.chars() {
            let part = match ch.to_ascii_uppercase() {
                'I' => format!("ISBN 13: {}", self.isbn()),
                'A' => self.author().to_string(),
                'T' => self.title().to_string(),
                'B' => format!("\"{}\"", self.publisher()),
                'Y' => self.published().year().to_string(),
                'P' => format!("P. {}", self.pages()),
                'C' => format!("{}$", self.price()),
                other => {
                    return Err(BookError::Format(format!(
                        "invalid format identifier {:?}",
                        other
                    )))
                }
            };
            parts.push(part);
        }
        Ok(parts.join(", "))
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.general(&DisplayOptions::default()))
    }
}

/// Renders books by named format.
#[derive(Debug, Clone, Default)]
pub struct BookFormatter {
    options: DisplayOptions,
}

impl BookFormatter {
    pub fn new(options: DisplayOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// `G`/`g` general, `L`/`l` long; `None` or empty falls back to general.
    pub fn format(&self, book: &Book, format: Option<&str>) -> BookResult<String> {
        match format {
            None | Some("") | Some("G") | Some("g") => Ok(book.general(&self.options)),
            Some("L") | Some("l") => Ok(book.long(&self.options)),
            Some(other) => Err(BookError::Format(format!(
                "invalid format specifier {:?}",
                other
            ))),
        }
    }
}
