//! JSON-lines file store.
//!
//! One JSON document per line. Inserts append; reads parse the whole file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tally_types::Record;

use super::{RecordStore, StoreError};

/// Append-only record file.
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    // Serializes appends and truncation from concurrent callers.
    write_lock: Mutex<()>,
}

impl JsonlStore {
    /// Opens (without creating) the record file at `path`.
    ///
    /// Missing parent directories are created so the first insert succeeds.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("record file lock poisoned".to_string()))
    }
}

impl RecordStore for JsonlStore {
    fn fetch_all(&self) -> Result<Vec<Record>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                line: index + 1,
                source,
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn insert(&self, record: Record) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let _guard = self.lock()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        File::create(&self.path)
            .map(drop)
            .map_err(|e| self.io_error(e))
    }
}
