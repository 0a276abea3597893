//! Embedded key-value scratch store.
//!
//! The build correlates rows across CSV files through ids assigned by the
//! source database. Those mappings are too large to hold in memory for the
//! bigger sources, so the producing phase streams them into an on-disk store
//! and the consuming phase streams lookups back.
//!
//! # Write protocol
//!
//! Writers accumulate `set` calls in a [`WriteTxn`]. When the transaction
//! grows past its byte budget, `set` returns [`Error::TxnTooLarge`] without
//! accepting the pair; the caller commits, opens a fresh transaction and
//! retries the same `set`. Reads are plain point lookups; a missing key is
//! `Ok(None)`, and the caller decides whether that is fatal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rocksdb::{Options, WriteBatch, DB};
use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the key-value store.
#[derive(Error, Debug)]
pub enum Error {
    /// The write transaction reached its byte budget; commit and retry.
    #[error("write transaction is too large, commit and retry")]
    TxnTooLarge,

    /// Underlying storage failure.
    #[error("KV storage error: {0}")]
    Storage(#[from] rocksdb::Error),

    /// Directory preparation failure.
    #[error("KV I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte budget for a single write transaction.
const DEFAULT_TXN_BUDGET: usize = 16 * 1024 * 1024;

/// An on-disk ordered byte map. Cloning is cheap; all clones share the same
/// database and the files are released when the last clone is dropped.
#[derive(Clone)]
pub struct Store {
    db: Arc<DB>,
    dir: PathBuf,
    txn_budget: usize,
}

impl Store {
    /// Opens the store at `dir`, recreating the directory from empty. Every
    /// build starts with a fresh scratch index.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_budget(dir, DEFAULT_TXN_BUDGET)
    }

    /// As [`Store::open`] with an explicit transaction byte budget.
    pub fn open_with_budget(dir: impl AsRef<Path>, txn_budget: usize) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        std::fs::create_dir_all(&dir)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, &dir)?;
        tracing::debug!(dir = %dir.display(), "key-value store opened");

        Ok(Self {
            db: Arc::new(db),
            dir,
            txn_budget,
        })
    }

    /// Directory holding the store files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Point lookup. A missing key is `Ok(None)`, not an error.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?)
    }

    /// Starts a write transaction. Each writer owns its own transaction;
    /// concurrent writers only coordinate through the commit-retry protocol.
    pub fn writer(&self) -> WriteTxn {
        WriteTxn {
            db: Arc::clone(&self.db),
            batch: WriteBatch::default(),
            budget: self.txn_budget,
        }
    }
}

/// A batched write transaction. Nothing is visible to readers until
/// [`WriteTxn::commit`].
pub struct WriteTxn {
    db: Arc<DB>,
    batch: WriteBatch,
    budget: usize,
}

impl WriteTxn {
    /// Buffers a key-value pair. Returns [`Error::TxnTooLarge`] without
    /// accepting the pair once the batch reaches its budget.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if !self.batch.is_empty() && self.batch.size_in_bytes() >= self.budget {
            return Err(Error::TxnTooLarge);
        }
        self.batch.put(key, value);
        Ok(())
    }

    /// Number of buffered pairs.
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Atomically writes the buffered pairs.
    pub fn commit(self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }
        self.db.write(self.batch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path().join("kv")).unwrap();

        let mut txn = store.writer();
        txn.set(b"42", b"value-42").unwrap();
        txn.set(b"43", b"value-43").unwrap();
        txn.commit().unwrap();

        assert_eq!(store.get(b"42").unwrap(), Some(b"value-42".to_vec()));
        assert_eq!(store.get(b"43").unwrap(), Some(b"value-43".to_vec()));
    }

    #[test]
    fn test_missing_key_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path().join("kv")).unwrap();
        assert_eq!(store.get(b"nope").unwrap(), None);
    }

    #[test]
    fn test_uncommitted_writes_invisible() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path().join("kv")).unwrap();

        let mut txn = store.writer();
        txn.set(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), None);
        txn.commit().unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_txn_too_large_commit_retry() {
        let tmp = TempDir::new().unwrap();
        // Tiny budget so the second set overflows.
        let store = Store::open_with_budget(tmp.path().join("kv"), 8).unwrap();

        let mut txn = store.writer();
        txn.set(b"a", b"0123456789").unwrap();
        let err = txn.set(b"b", b"0123456789").unwrap_err();
        assert!(matches!(err, Error::TxnTooLarge));

        // The protocol: commit, reopen, retry the same set.
        txn.commit().unwrap();
        let mut txn = store.writer();
        txn.set(b"b", b"0123456789").unwrap();
        txn.commit().unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"0123456789".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), Some(b"0123456789".to_vec()));
    }

    #[test]
    fn test_open_recreates_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("kv");
        {
            let store = Store::open(&dir).unwrap();
            let mut txn = store.writer();
            txn.set(b"stale", b"1").unwrap();
            txn.commit().unwrap();
        }
        let store = Store::open(&dir).unwrap();
        assert_eq!(store.get(b"stale").unwrap(), None);
    }
}
