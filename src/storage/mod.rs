//! Flat-file record storage for ledgerfile
//!
//! The store holds every record of one kind in a single binary file.
//! Records are laid end to end with no header, footer, separator or index:
//!
//! ```text
//! [record 0][record 1][record 2]...
//! ```
//!
//! # Design Principles
//!
//! - Linear scan from offset 0 for every lookup
//! - Record width derived from field contents (`Record::encoded_len`)
//! - Deletion compacts the file (shift tail left, truncate)
//! - In-place update restricted to a fixed-width mutable block
//! - Key uniqueness enforced on insert
//! - Every operation opens and releases its own file handle

mod codec;
mod errors;
mod reader;
mod record;
mod store;

pub use codec::{
    decode_decimal, decode_f32, decode_i64, decode_string, decode_u16, encode_decimal,
    encode_f32, encode_i64, encode_string, encode_u16, string_len, DECIMAL_LEN,
};
pub use errors::{Severity, StoreError, StoreResult};
pub use reader::{RecordEntry, RecordReader};
pub use record::Record;
pub use store::RecordStore;
