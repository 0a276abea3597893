//! Shared plumbing for the import pipelines.
//!
//! Every phase is a small task graph: a reader feeding a bounded channel,
//! one or more workers, a database writer. The pieces here give all of them
//! the same cancellation and error-collection behavior: the first real
//! error flips the [`Cancel`] flag, peers notice at their next channel
//! operation and return [`Error::Canceled`], and [`drive`] reports only the
//! first real error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Capacity of the reader → worker row channels. Bounded so a slow database
/// back-pressures the CSV readers instead of buffering the file in memory.
pub(crate) const ROW_CHANNEL_CAP: usize = 10_000;

/// Capacity of the worker → writer batch channels. A batch is up to
/// `BatchSize` rows, so a small bound is enough.
pub(crate) const BATCH_CHANNEL_CAP: usize = 4;

/// Shared cooperative-cancellation flag, checked between rows.
#[derive(Clone, Default)]
pub(crate) struct Cancel {
    flag: Arc<AtomicBool>,
}

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Awaits every task of a phase and returns the first real error, if any.
/// `Canceled` sentinels from peers are suppressed; panics are surfaced.
pub(crate) async fn drive(handles: Vec<JoinHandle<Result<()>>>) -> Result<()> {
    let mut first_err: Option<Error> = None;
    for handle in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(Error::Canceled)) => {}
            Ok(Err(e)) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
            Err(join_err) => {
                if first_err.is_none() {
                    first_err = Some(Error::Panic(join_err.to_string()));
                }
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Throughput tracker for writer progress lines.
pub(crate) struct Progress {
    start: Instant,
    total: u64,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            total: 0,
        }
    }

    /// Records `n` more rows; returns (total, rows/sec).
    pub fn add(&mut self, n: u64) -> (u64, u64) {
        self.total += n;
        let secs = self.start.elapsed().as_secs_f64();
        let speed = if secs > 0.0 {
            (self.total as f64 / secs) as u64
        } else {
            0
        };
        (self.total, speed)
    }
}

/// Accumulates rows and yields full batches at the configured size.
pub(crate) struct Batcher<T> {
    batch: Vec<T>,
    size: usize,
}

impl<T> Batcher<T> {
    pub fn new(size: usize) -> Self {
        Self {
            batch: Vec::with_capacity(size),
            size,
        }
    }

    /// Adds a row; returns a full batch when the threshold is reached.
    pub fn push(&mut self, row: T) -> Option<Vec<T>> {
        self.batch.push(row);
        if self.batch.len() >= self.size {
            Some(std::mem::replace(
                &mut self.batch,
                Vec::with_capacity(self.size),
            ))
        } else {
            None
        }
    }

    /// Remaining rows at end of input.
    pub fn finish(self) -> Vec<T> {
        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batcher_emits_at_size() {
        let mut b = Batcher::new(3);
        assert!(b.push(1).is_none());
        assert!(b.push(2).is_none());
        let full = b.push(3).unwrap();
        assert_eq!(full, vec![1, 2, 3]);
        assert!(b.push(4).is_none());
        assert_eq!(b.finish(), vec![4]);
    }

    #[test]
    fn test_cancel_flag() {
        let c = Cancel::new();
        let c2 = c.clone();
        assert!(!c.is_canceled());
        c2.cancel();
        assert!(c.is_canceled());
    }

    #[tokio::test]
    async fn test_drive_reports_first_real_error() {
        let h1 = tokio::spawn(async { Err::<(), _>(Error::Canceled) });
        let h2 = tokio::spawn(async { Err::<(), _>(Error::bad_row("boom")) });
        let h3 = tokio::spawn(async { Ok(()) });
        let err = drive(vec![h1, h2, h3]).await.unwrap_err();
        assert!(matches!(err, Error::BadRow(_)));
    }

    #[tokio::test]
    async fn test_drive_all_ok() {
        let h = tokio::spawn(async { Ok(()) });
        assert!(drive(vec![h]).await.is_ok());
    }
}
