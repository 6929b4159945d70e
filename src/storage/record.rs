//! Record kinds persisted by the store
//!
//! A record is a sequence of fields with no length header of its own:
//!
//! ```text
//! +------------------+
//! | Key              | (length-prefixed string)
//! +------------------+
//! | Layout fields    | (variable width, never rewritten in place)
//! +------------------+
//! | Mutable block    | (fixed width, MUTABLE_LEN bytes)
//! +------------------+
//! | Layout fields    | (variable width, optional)
//! +------------------+
//! ```
//!
//! The reader finds the end of a record by decoding it field by field, so
//! `encoded_len` must agree with `encode_into` byte for byte. The store uses
//! `encoded_len` for every offset computation (scan, compaction, in-place
//! update).

use std::io::{self, Read};

/// A record kind the [`RecordStore`](super::RecordStore) can persist.
pub trait Record: Sized {
    /// Short lowercase name of the record kind, used in log events.
    const KIND: &'static str;

    /// Width of the fixed-width block `save` may overwrite.
    const MUTABLE_LEN: usize;

    /// Unique, immutable key.
    fn key(&self) -> &str;

    /// Exact number of bytes `encode_into` appends.
    fn encoded_len(&self) -> usize;

    /// Appends the encoded record.
    fn encode_into(&self, buf: &mut Vec<u8>);

    /// Reads one record, consuming exactly `encoded_len` bytes.
    ///
    /// Field values that a constructor would reject are reported as
    /// `InvalidData`.
    fn decode<R: Read>(reader: &mut R) -> io::Result<Self>;

    /// Byte offset of the mutable block from the start of the record.
    fn mutable_offset(&self) -> usize;

    /// Appends the `MUTABLE_LEN` bytes of the mutable block.
    fn encode_mutable(&self, buf: &mut Vec<u8>);

    /// Whether every field outside the mutable block is equal.
    ///
    /// Two records with the same layout occupy the same bytes except for the
    /// mutable block, so one can replace the other in place.
    fn same_layout(&self, other: &Self) -> bool;

    /// Encodes the full record into a fresh buffer.
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }
}
