//! Record store over a single flat file
//!
//! Every operation opens the file, does its scan/seek/write and drops the
//! handle before returning. Nothing is cached between calls.
//!
//! - `add` appends after checking the key is absent
//! - `get` scans from offset 0 until the key matches
//! - `remove` shifts every byte after the record left by the record's
//!   width and truncates the file
//! - `save` overwrites the record's fixed-width mutable block in place
//!
//! An I/O failure in the middle of `remove` or `save` can leave the file
//! partially rewritten. Treat such an error as fatal for the file.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::errors::{StoreError, StoreResult};
use super::reader::{RecordEntry, RecordReader};
use super::record::Record;

/// Persistent store of one record kind, keyed by `Record::key`.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    /// Path to the record file
    path: PathBuf,
    /// Whether writes are followed by fsync
    sync_writes: bool,
    _kind: PhantomData<T>,
}

fn io_context<'a>(
    what: &'static str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> StoreError + 'a {
    move |e| StoreError::io(format!("{} {}", what, path.display()), e)
}

impl<T: Record> RecordStore<T> {
    /// Opens the record file at `path`, creating it (and its parent
    /// directories) empty if it does not exist.
    ///
    /// Does not read the file.
    ///
    /// # Errors
    ///
    /// Returns `LEDGER_STORE_IO_ERROR` if the file cannot be created.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_context("Failed to create directory", parent))?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_context("Failed to create record file", &path))?;

        debug!(kind = T::KIND, path = %path.display(), "record store opened");

        Ok(Self {
            path,
            sync_writes: true,
            _kind: PhantomData,
        })
    }

    /// Enables or disables fsync after each write.
    pub fn with_sync(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Returns the path to the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current size of the record file in bytes.
    pub fn file_len(&self) -> StoreResult<u64> {
        Ok(fs::metadata(&self.path)
            .map_err(io_context("Failed to read metadata of", &self.path))?
            .len())
    }

    fn open_read_write(&self) -> StoreResult<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(io_context("Failed to open record file", &self.path))
    }

    fn sync(&self, file: &File) -> StoreResult<()> {
        if self.sync_writes {
            file.sync_all()
                .map_err(io_context("fsync failed for", &self.path))?;
        }
        Ok(())
    }

    /// Scans a read-write handle for `key`, returning the match and the
    /// handle for follow-up writes.
    fn locate(&self, key: &str) -> StoreResult<(RecordEntry<T>, File, u64)> {
        let mut reader = RecordReader::<T>::from_file(self.open_read_write()?)?;
        let entry = reader
            .find(key)?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let file_size = reader.file_size();
        Ok((entry, reader.into_inner(), file_size))
    }

    /// Appends `record` to the end of the file.
    ///
    /// The file grows by exactly `record.encoded_len()` bytes.
    ///
    /// # Errors
    ///
    /// Returns `LEDGER_STORE_DUPLICATE_KEY` if a record with the same key is
    /// already stored; the file is left untouched.
    pub fn add(&self, record: &T) -> StoreResult<()> {
        let mut reader = RecordReader::<T>::from_file(self.open_read_write()?)?;
        if reader.find(record.key())?.is_some() {
            return Err(StoreError::DuplicateKey(record.key().to_string()));
        }
        let offset = reader.file_size();
        let mut file = reader.into_inner();

        let bytes = record.encode();
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.write_all(&bytes))
            .map_err(io_context("Failed to append to", &self.path))?;
        self.sync(&file)?;

        info!(
            kind = T::KIND,
            key = record.key(),
            offset,
            len = bytes.len(),
            "record added"
        );
        Ok(())
    }

    /// Returns the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `LEDGER_STORE_NOT_FOUND` after a full scan without a match.
    pub fn get(&self, key: &str) -> StoreResult<T> {
        let mut reader = RecordReader::<T>::open(&self.path)?;
        let entry = reader
            .find(key)?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        debug!(kind = T::KIND, key, offset = entry.offset, "record read");
        Ok(entry.record)
    }

    /// Returns whether a record is stored under `key`.
    pub fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(RecordReader::<T>::open(&self.path)?.find(key)?.is_some())
    }

    /// Removes the record stored under `key` and compacts the file.
    ///
    /// All bytes after the record are moved to where the record started and
    /// the file is truncated, so it shrinks by exactly the record's width.
    /// Returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns `LEDGER_STORE_NOT_FOUND` if the key is absent.
    pub fn remove(&self, key: &str) -> StoreResult<T> {
        let (entry, mut file, file_size) = self.locate(key)?;

        let mut tail = Vec::with_capacity((file_size - entry.end()) as usize);
        file.seek(SeekFrom::Start(entry.end()))
            .and_then(|_| file.read_to_end(&mut tail))
            .map_err(io_context("Failed to read trailing records of", &self.path))?;

        let new_len = entry.offset + tail.len() as u64;
        file.seek(SeekFrom::Start(entry.offset))
            .and_then(|_| file.write_all(&tail))
            .and_then(|_| file.set_len(new_len))
            .map_err(io_context("Failed to compact", &self.path))?;
        self.sync(&file)?;

        info!(
            kind = T::KIND,
            key,
            offset = entry.offset,
            len = entry.len,
            shifted = tail.len(),
            "record removed"
        );
        Ok(entry.record)
    }

    /// Overwrites the mutable block of the stored record with the one from
    /// `record`. The file length never changes.
    ///
    /// # Errors
    ///
    /// - `LEDGER_STORE_NOT_FOUND` if the key is absent
    /// - `LEDGER_STORE_LAYOUT_MISMATCH` if `record` differs from the stored
    ///   record outside the mutable block; nothing is written
    pub fn save(&self, record: &T) -> StoreResult<()> {
        let (entry, mut file, _) = self.locate(record.key())?;

        if !entry.record.same_layout(record) {
            return Err(StoreError::LayoutMismatch(record.key().to_string()));
        }

        let mut block = Vec::with_capacity(T::MUTABLE_LEN);
        record.encode_mutable(&mut block);
        if block.len() != T::MUTABLE_LEN {
            return Err(StoreError::LayoutMismatch(record.key().to_string()));
        }

        let at = entry.offset + record.mutable_offset() as u64;
        file.seek(SeekFrom::Start(at))
            .and_then(|_| file.write_all(&block))
            .map_err(io_context("Failed to rewrite record in", &self.path))?;
        self.sync(&file)?;

        debug!(
            kind = T::KIND,
            key = record.key(),
            offset = at,
            len = block.len(),
            "record saved in place"
        );
        Ok(())
    }

    /// Returns every record in file order.
    pub fn load_all(&self) -> StoreResult<Vec<T>> {
        Ok(self.entries()?.into_iter().map(|e| e.record).collect())
    }

    /// Returns every record in file order with its offset and width.
    pub fn entries(&self) -> StoreResult<Vec<RecordEntry<T>>> {
        RecordReader::<T>::open(&self.path)?.read_all()
    }

    /// Replaces the whole file with `records`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `LEDGER_STORE_DUPLICATE_KEY` if two records share a key; the
    /// file is left untouched.
    pub fn save_all(&self, records: &[T]) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.key()) {
                return Err(StoreError::DuplicateKey(record.key().to_string()));
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)
            .map_err(io_context("Failed to open record file", &self.path))?;

        let mut writer = BufWriter::new(file);
        let mut buf = Vec::new();
        for record in records {
            buf.clear();
            record.encode_into(&mut buf);
            writer
                .write_all(&buf)
                .map_err(io_context("Failed to write", &self.path))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| StoreError::io(format!("Failed to flush {}", self.path.display()), e.into_error()))?;
        self.sync(&file)?;

        info!(kind = T::KIND, count = records.len(), "record file rewritten");
        Ok(())
    }
}
