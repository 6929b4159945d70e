//! Field-level binary encoding shared by every record kind
//!
//! Layout of each primitive:
//!
//! ```text
//! string   : [7-bit encoded byte length][UTF-8 bytes]
//! decimal  : [lo u32 LE][mid u32 LE][hi u32 LE][flags u32 LE]   (16 bytes)
//! f32      : IEEE-754, LE (4 bytes)
//! i64      : LE (8 bytes)
//! u16      : LE (2 bytes)
//! ```
//!
//! Decimal flags carry the scale in bits 16-23 and the sign in bit 31.
//! Encoders append to a `Vec<u8>` and cannot fail; decoders read exactly the
//! bytes their encoder wrote and report malformed input as `InvalidData`.

use std::io::{self, Read};

use rust_decimal::Decimal;

/// Encoded width of a decimal field.
pub const DECIMAL_LEN: usize = 16;

/// Largest scale a decimal may carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Bits of the decimal flags word that may be set (scale + sign).
const DECIMAL_FLAGS_MASK: u32 = 0x80FF_0000;

/// A 7-bit encoded `i32` length never needs more than five bytes.
const MAX_LENGTH_PREFIX: usize = 5;

/// Number of bytes the 7-bit length prefix for `len` occupies.
fn length_prefix_len(mut len: usize) -> usize {
    let mut n = 1;
    while len >= 0x80 {
        len >>= 7;
        n += 1;
    }
    n
}

/// Total encoded width of a length-prefixed string.
pub fn string_len(s: &str) -> usize {
    length_prefix_len(s.len()) + s.len()
}

fn write_length_prefix(buf: &mut Vec<u8>, mut len: usize) {
    while len >= 0x80 {
        buf.push((len as u8 & 0x7F) | 0x80);
        len >>= 7;
    }
    buf.push(len as u8);
}

fn read_length_prefix<R: Read>(reader: &mut R) -> io::Result<usize> {
    let mut len: u64 = 0;
    for i in 0..MAX_LENGTH_PREFIX {
        let byte = read_array::<R, 1>(reader)?[0];
        len |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            if len > i32::MAX as u64 {
                break;
            }
            return Ok(len as usize);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "Malformed 7-bit length prefix",
    ))
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Appends a length-prefixed UTF-8 string.
pub fn encode_string(buf: &mut Vec<u8>, s: &str) {
    write_length_prefix(buf, s.len());
    buf.extend_from_slice(s.as_bytes());
}

/// Reads a length-prefixed UTF-8 string.
pub fn decode_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let len = read_length_prefix(reader)?;

    let mut buf = Vec::with_capacity(len.min(4096));
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("String truncated: expected {} bytes, got {}", len, buf.len()),
        ));
    }

    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))
}

/// Appends a 16-byte scaled-integer decimal.
pub fn encode_decimal(buf: &mut Vec<u8>, value: Decimal) {
    // serialize() yields [flags][lo][mid][hi]; on disk flags come last
    let raw = value.serialize();
    buf.extend_from_slice(&raw[4..16]);
    buf.extend_from_slice(&raw[0..4]);
}

/// Reads a 16-byte scaled-integer decimal.
pub fn decode_decimal<R: Read>(reader: &mut R) -> io::Result<Decimal> {
    let raw = read_array::<R, DECIMAL_LEN>(reader)?;
    let word = |i: usize| u32::from_le_bytes([raw[i], raw[i + 1], raw[i + 2], raw[i + 3]]);
    let (lo, mid, hi, flags) = (word(0), word(4), word(8), word(12));

    if flags & !DECIMAL_FLAGS_MASK != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid decimal flags: {:08x}", flags),
        ));
    }
    let scale = (flags >> 16) & 0xFF;
    if scale > MAX_DECIMAL_SCALE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid decimal scale: {}", scale),
        ));
    }

    Ok(Decimal::from_parts(lo, mid, hi, flags & 0x8000_0000 != 0, scale))
}

pub fn encode_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn decode_f32<R: Read>(reader: &mut R) -> io::Result<f32> {
    Ok(f32::from_le_bytes(read_array(reader)?))
}

pub fn encode_i64(buf: &mut Vec<u8>, value: i64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn decode_i64<R: Read>(reader: &mut R) -> io::Result<i64> {
    Ok(i64::from_le_bytes(read_array(reader)?))
}

pub fn encode_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn decode_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    Ok(u16::from_le_bytes(read_array(reader)?))
}
