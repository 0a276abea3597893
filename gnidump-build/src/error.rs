//! Error types for gnidump-build

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Build error type. `Canceled` is the cooperative-cancellation sentinel:
/// a task that observes a closed channel or the cancel flag returns it, and
/// the phase driver suppresses it in favor of the first real error.
#[derive(Error, Debug)]
pub enum Error {
    /// A peer task failed; this task stopped cooperatively.
    #[error("canceled")]
    Canceled,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Database error
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// Key-value store error
    #[error("key-value error: {0}")]
    Kv(#[from] gnidump_kv::Error),

    /// KV payload encoding/decoding error
    #[error("payload codec error: {0}")]
    Codec(#[from] postcard::Error),

    /// A CSV row that cannot be interpreted
    #[error("bad row: {0}")]
    BadRow(String),

    /// A worker or stage panicked
    #[error("task panicked: {0}")]
    Panic(String),
}

impl Error {
    /// Create a bad-row error
    pub fn bad_row(msg: impl Into<String>) -> Self {
        Error::BadRow(msg.into())
    }
}
