//! Vernacular strings import.
//!
//! Same shape as the scientific pipeline but a single worker suffices. The
//! reader deduplicates by name before emitting: sources repeat vernacular
//! strings freely and only the first occurrence matters. The worker maps
//! the source's id to the string's uuid in the vern KV store so the index
//! phase can resolve references.

use std::collections::HashSet;
use std::path::Path;

use csv::StringRecord;
use sqlx::PgPool;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info};

use gnidump_core::model::VernacularString;
use gnidump_core::{gn_uuid, scrub_nul, Config};
use gnidump_kv::Store;

use crate::copy::{copy_rows, CopyValue};
use crate::csv_input::{field, open_csv};
use crate::error::{Error, Result};
use crate::payload::encode_uuid;
use crate::pipeline::{drive, Batcher, Cancel, Progress, BATCH_CHANNEL_CAP, ROW_CHANNEL_CAP};

const FILE: &str = "vernacular_strings.csv";
const ID_FIELD: usize = 0;
const NAME_FIELD: usize = 1;

pub(crate) async fn import_vern_strings(cfg: &Config, pool: &PgPool, kv: &Store) -> Result<()> {
    info!("uploading data for vernacular_strings table");
    crate::db::truncate_table(pool, "vernacular_strings").await?;

    let cancel = Cancel::new();
    let (row_tx, row_rx) = mpsc::channel::<StringRecord>(ROW_CHANNEL_CAP);
    let (batch_tx, batch_rx) = mpsc::channel::<Vec<VernacularString>>(BATCH_CHANNEL_CAP);

    let mut handles = Vec::with_capacity(3);

    {
        let dump_dir = cfg.dump_dir.clone();
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            let res = tokio::task::spawn_blocking(move || {
                read_deduplicated(&dump_dir, row_tx, cancel.clone())
                    .inspect_err(|_| cancel.cancel())
            })
            .await;
            match res {
                Ok(r) => r,
                Err(e) => Err(Error::Panic(e.to_string())),
            }
        }));
    }

    {
        let kv = kv.clone();
        let cancel = cancel.clone();
        let batch_size = cfg.batch_size;
        handles.push(tokio::spawn(async move {
            worker(row_rx, batch_tx, kv, cancel.clone(), batch_size)
                .await
                .inspect_err(|e| {
                    if !matches!(e, Error::Canceled) {
                        cancel.cancel();
                    }
                })
        }));
    }

    {
        let pool = pool.clone();
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            writer(pool, batch_rx).await.inspect_err(|_| cancel.cancel())
        }));
    }

    drive(handles).await?;
    info!("uploaded vernacular_strings table");
    Ok(())
}

/// Streams unique-by-name rows; duplicates are dropped silently except for
/// a debug line.
fn read_deduplicated(dump_dir: &Path, tx: Sender<StringRecord>, cancel: Cancel) -> Result<()> {
    let mut reader = open_csv(dump_dir, FILE)?;
    let mut record = StringRecord::new();
    let mut seen: HashSet<String> = HashSet::new();

    while reader.read_record(&mut record)? {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }
        let name = field(&record, NAME_FIELD, FILE)?;
        if !seen.insert(name.to_string()) {
            debug!(name, "duplicate vernacular string dropped");
            continue;
        }
        if tx.blocking_send(record.clone()).is_err() {
            return Err(Error::Canceled);
        }
    }
    Ok(())
}

async fn worker(
    mut rows: Receiver<StringRecord>,
    batch_tx: Sender<Vec<VernacularString>>,
    kv: Store,
    cancel: Cancel,
    batch_size: usize,
) -> Result<()> {
    let mut kv_txn = kv.writer();
    let mut batcher = Batcher::new(batch_size);

    while let Some(record) = rows.recv().await {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }
        let source_id = field(&record, ID_FIELD, FILE)?.to_string();
        let name = scrub_nul(field(&record, NAME_FIELD, FILE)?);
        let uuid = gn_uuid(&name).to_string();

        let bytes = encode_uuid(&uuid)?;
        kv_txn = match kv_txn.set(source_id.as_bytes(), &bytes) {
            Ok(()) => kv_txn,
            Err(gnidump_kv::Error::TxnTooLarge) => {
                kv_txn.commit()?;
                let mut txn = kv.writer();
                txn.set(source_id.as_bytes(), &bytes)?;
                txn
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(full) = batcher.push(VernacularString { id: uuid, name }) {
            if batch_tx.send(full).await.is_err() {
                return Err(Error::Canceled);
            }
        }
    }

    kv_txn.commit()?;
    let rest = batcher.finish();
    if batch_tx.send(rest).await.is_err() {
        return Err(Error::Canceled);
    }
    Ok(())
}

async fn writer(pool: PgPool, mut batches: Receiver<Vec<VernacularString>>) -> Result<()> {
    let mut progress = Progress::new();
    while let Some(batch) = batches.recv().await {
        if batch.is_empty() {
            continue;
        }
        let saved = save_vern_strings(&pool, &batch).await?;
        let (total, per_sec) = progress.add(saved);
        info!(total, per_sec, "uploaded vernacular strings");
    }
    Ok(())
}

async fn save_vern_strings(pool: &PgPool, batch: &[VernacularString]) -> Result<u64> {
    let rows: Vec<Vec<CopyValue>> = batch
        .iter()
        .map(|v| {
            vec![
                CopyValue::Text(v.id.clone()),
                CopyValue::Text(v.name.clone()),
            ]
        })
        .collect();
    copy_rows(pool, "vernacular_strings", &["id", "name"], &rows).await
}
