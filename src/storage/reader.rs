//! Sequential record reader
//!
//! Records carry no length header, so the only way to find record `n` is to
//! decode records `0..n`. Every scan starts at offset 0 and walks the file
//! front to back; no cursor survives between store operations.
//!
//! A record that cannot be decoded, or whose decoded width disagrees with
//! `Record::encoded_len`, is reported as corruption at its starting offset.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use super::errors::{StoreError, StoreResult};
use super::record::Record;

/// One decoded record together with its position in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry<T> {
    /// Byte offset of the first byte of the record
    pub offset: u64,
    /// Encoded width in bytes
    pub len: usize,
    /// Decoded record
    pub record: T,
}

impl<T> RecordEntry<T> {
    /// Offset one past the last byte of the record.
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }
}

/// Counts bytes pulled through a reader.
struct Counted<'a, R> {
    inner: &'a mut R,
    count: u64,
}

impl<R: Read> Read for Counted<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Forward-only reader over a record file.
pub struct RecordReader<T> {
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
    _kind: PhantomData<T>,
}

impl<T: Record> RecordReader<T> {
    /// Opens the file at `path` for scanning from offset 0.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).map_err(|e| {
            StoreError::io(format!("Failed to open record file: {}", path.display()), e)
        })?;
        Self::from_file(file)
    }

    /// Wraps an already opened handle positioned at offset 0.
    pub fn from_file(file: File) -> StoreResult<Self> {
        let file_size = file
            .metadata()
            .map_err(|e| StoreError::io("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
            _kind: PhantomData,
        })
    }

    /// Returns the offset of the next record to be read.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Returns the file size observed when the reader was opened.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Returns whether there are more records to read.
    pub fn has_more(&self) -> bool {
        self.current_offset < self.file_size
    }

    /// Reads the next record.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(LEDGER_DATA_CORRUPTION)` if the bytes do not form a record
    pub fn read_next(&mut self) -> StoreResult<Option<RecordEntry<T>>> {
        if !self.has_more() {
            return Ok(None);
        }

        let offset = self.current_offset;
        let remaining = self.file_size - offset;
        let mut counted = Counted {
            inner: &mut self.reader,
            count: 0,
        };

        let record = T::decode(&mut counted).map_err(|e| {
            let reason = match e.kind() {
                io::ErrorKind::UnexpectedEof => format!(
                    "Truncated {} record: {} bytes remaining",
                    T::KIND, remaining
                ),
                _ => format!("Undecodable {} record: {}", T::KIND, e),
            };
            StoreError::corruption_at_offset(offset, reason)
        })?;

        let consumed = counted.count;
        let len = record.encoded_len();
        if consumed != len as u64 {
            return Err(StoreError::corruption_at_offset(
                offset,
                format!(
                    "Decoded {} bytes but record measures {} bytes",
                    consumed, len
                ),
            ));
        }

        self.current_offset += consumed;

        Ok(Some(RecordEntry {
            offset,
            len,
            record,
        }))
    }

    /// Reads all remaining records.
    pub fn read_all(&mut self) -> StoreResult<Vec<RecordEntry<T>>> {
        let mut entries = Vec::new();
        while let Some(entry) = self.read_next()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Scans forward until a record with `key` is found.
    ///
    /// Stops at the first match; keys are unique.
    pub fn find(&mut self, key: &str) -> StoreResult<Option<RecordEntry<T>>> {
        while let Some(entry) = self.read_next()? {
            if entry.record.key() == key {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Gives back the underlying file handle. Its position is unspecified.
    pub fn into_inner(self) -> File {
        self.reader.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::record::testing::Note;
    use std::fs;
    use tempfile::TempDir;

    fn write_notes(dir: &TempDir, notes: &[Note]) -> std::path::PathBuf {
        let path = dir.path().join("notes.bin");
        let mut bytes = Vec::new();
        for note in notes {
            note.encode_into(&mut bytes);
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_notes(&temp_dir, &[]);

        let mut reader = RecordReader::<Note>::open(&path).unwrap();
        assert!(!reader.has_more());
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_entries_are_contiguous() {
        let temp_dir = TempDir::new().unwrap();
        let notes = vec![
            Note::new("a", "first", 1),
            Note::new("bb", "second note", 2),
            Note::new("ccc", "", 3),
        ];
        let path = write_notes(&temp_dir, &notes);

        let mut reader = RecordReader::<Note>::open(&path).unwrap();
        let entries = reader.read_all().unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].offset, 0);
        for pair in entries.windows(2) {
            assert_eq!(pair[0].end(), pair[1].offset);
        }
        assert_eq!(entries[2].end(), fs::metadata(&path).unwrap().len());
        let decoded: Vec<Note> = entries.into_iter().map(|e| e.record).collect();
        assert_eq!(decoded, notes);
    }

    #[test]
    fn test_find_stops_at_match() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_notes(
            &temp_dir,
            &[Note::new("a", "x", 1), Note::new("b", "y", 2), Note::new("c", "z", 3)],
        );

        let mut reader = RecordReader::<Note>::open(&path).unwrap();
        let entry = reader.find("b").unwrap().unwrap();
        assert_eq!(entry.record.counter, 2);
        assert_eq!(reader.current_offset(), entry.end());
        assert!(reader.has_more());
    }

    #[test]
    fn test_find_missing_key_reaches_eof() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_notes(&temp_dir, &[Note::new("a", "x", 1)]);

        let mut reader = RecordReader::<Note>::open(&path).unwrap();
        assert!(reader.find("zzz").unwrap().is_none());
        assert!(!reader.has_more());
    }

    #[test]
    fn test_truncated_tail_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_notes(&temp_dir, &[Note::new("a", "x", 1), Note::new("b", "y", 2)]);

        let mut bytes = fs::read(&path).unwrap();
        bytes.truncate(bytes.len() - 3);
        fs::write(&path, &bytes).unwrap();

        let mut reader = RecordReader::<Note>::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());

        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
        match err {
            StoreError::Corruption { offset, reason } => {
                assert_eq!(offset, Note::new("a", "x", 1).encoded_len() as u64);
                assert!(reason.contains("Truncated"));
            }
            other => panic!("expected corruption, got {other}"),
        }
    }
}
