//! Append-friendly CSV record store.

use crate::error::{Result, StoreError};
use crate::record::Record;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// On-disk column order. The header row is written once, when the file is
/// created fresh; appends never repeat it.
pub const COLUMNS: [&str; 7] = [
    "title",
    "authors",
    "author_count",
    "abstract",
    "pdf_link",
    "supp_link",
    "paper_url",
];

/// Durable, append-friendly tabular store with a fixed schema.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store handle for the given path. Nothing is created on disk
    /// until the first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads from and appends to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the keys of all previously persisted records.
    ///
    /// A store that does not exist yet yields an empty set; that is the
    /// normal first-run case, not an error. An existing file that cannot be
    /// read or parsed is an error, since resuming safely is impossible
    /// without knowing what was already written.
    pub fn load_existing_keys(&self) -> Result<HashSet<String>> {
        let mut keys = HashSet::new();

        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no existing store");
            return Ok(keys);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| StoreError::Read(e.to_string()))?;

        for row in reader.records() {
            let row = row.map_err(|e| StoreError::Read(e.to_string()))?;
            if let Some(key) = row.get(0) {
                keys.insert(key.to_string());
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            count = keys.len(),
            "loaded existing keys"
        );
        Ok(keys)
    }

    /// Count the rows currently persisted, excluding the header.
    ///
    /// Used for post-run reporting; the store itself is the source of truth
    /// for what was durably written.
    pub fn count_rows(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| StoreError::Read(e.to_string()))?;

        let mut count = 0;
        for row in reader.records() {
            row.map_err(|e| StoreError::Read(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    /// Append records to the store.
    ///
    /// The header row is written only when the file is being created fresh
    /// (absent or zero-length). Safe to call repeatedly with small batches,
    /// including batches of size one; each call opens in append mode so
    /// previously written rows are never touched.
    ///
    /// The store does not deduplicate: appending a key that is already
    /// present is a caller-side bug, not detected here.
    pub fn append(&self, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let fresh = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::Write(format!("{}: {e}", self.path.display())))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if fresh {
            writer
                .write_record(COLUMNS)
                .map_err(|e| StoreError::Write(e.to_string()))?;
        }

        for record in records {
            writer
                .serialize(record)
                .map_err(|e| StoreError::Write(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }
}
