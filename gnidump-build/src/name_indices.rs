//! Name-string indices import.
//!
//! Reconstructs `name_string_indices` from the dump, resolving each row's
//! source name-string id to the content-addressed uuid through the sci KV
//! store. A single worker is enough: the database is the bottleneck here.
//! Rows whose id never went through the parsing phase are skipped with a
//! warning; that happens when a source revision removed a name between the
//! two dump files.

use csv::StringRecord;
use sqlx::PgPool;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{info, warn};

use gnidump_core::model::NameStringIndex;
use gnidump_core::Config;
use gnidump_kv::Store;

use crate::copy::{copy_rows, CopyValue};
use crate::csv_input::{field, stream_csv};
use crate::error::{Error, Result};
use crate::payload::ParsedPayload;
use crate::pipeline::{drive, Batcher, Cancel, Progress, BATCH_CHANNEL_CAP, ROW_CHANNEL_CAP};
use crate::registry::{self, NameInf};

const FILE: &str = "name_string_indices.csv";

const DATA_SOURCE_ID_FIELD: usize = 0;
const NAME_STRING_ID_FIELD: usize = 1;
const RECORD_ID_FIELD: usize = 3;
const GLOBAL_ID_FIELD: usize = 4;
const LOCAL_ID_FIELD: usize = 5;
const CODE_ID_FIELD: usize = 6;
const RANK_FIELD: usize = 7;
const ACCEPTED_RECORD_ID_FIELD: usize = 8;
const CLASSIFICATION_FIELD: usize = 9;
const CLASSIFICATION_IDS_FIELD: usize = 10;
const CLASSIFICATION_RANKS_FIELD: usize = 11;

pub(crate) async fn import_name_indices(cfg: &Config, pool: &PgPool, kv: &Store) -> Result<()> {
    info!("uploading data for name_string_indices table");
    crate::db::truncate_table(pool, "name_string_indices").await?;

    let cancel = Cancel::new();
    let (row_tx, row_rx) = mpsc::channel::<StringRecord>(ROW_CHANNEL_CAP);
    let (batch_tx, batch_rx) = mpsc::channel::<Vec<NameStringIndex>>(BATCH_CHANNEL_CAP);

    let mut handles = Vec::with_capacity(3);

    {
        let dump_dir = cfg.dump_dir.clone();
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            let res = tokio::task::spawn_blocking(move || {
                stream_csv(&dump_dir, FILE, row_tx, cancel.clone())
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
    info!("uploaded name_string_indices table");
    Ok(())
}

async fn worker(
    mut rows: Receiver<StringRecord>,
    batch_tx: Sender<Vec<NameStringIndex>>,
    kv: Store,
    cancel: Cancel,
    batch_size: usize,
) -> Result<()> {
    let mut batcher = Batcher::new(batch_size);

    while let Some(record) = rows.recv().await {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }
        let Some(index) = index_row(&record, &kv)? else {
            continue;
        };
        if let Some(full) = batcher.push(index) {
            if batch_tx.send(full).await.is_err() {
                return Err(Error::Canceled);
            }
        }
    }

    let rest = batcher.finish();
    if batch_tx.send(rest).await.is_err() {
        return Err(Error::Canceled);
    }
    Ok(())
}

/// Builds one index row. `Ok(None)` means the row was skipped because its
/// name-string id has no KV entry.
fn index_row(record: &StringRecord, kv: &Store) -> Result<Option<NameStringIndex>> {
    let data_source_id: i32 = field(record, DATA_SOURCE_ID_FIELD, FILE)?
        .parse()
        .map_err(|_| Error::bad_row(format!("{FILE}: bad data_source_id")))?;
    // Missing or malformed code means "no code".
    let code_id: i32 = field(record, CODE_ID_FIELD, FILE)?.parse().unwrap_or(0);

    let source_name_id = field(record, NAME_STRING_ID_FIELD, FILE)?;
    let Some(bytes) = kv.get(source_name_id.as_bytes())? else {
        warn!(
            data_source_id,
            name_string_id = source_name_id,
            "no parsed entry for name-string id, skipping row"
        );
        return Ok(None);
    };
    let parsed = ParsedPayload::decode(&bytes)?;

    let mut index = NameStringIndex {
        data_source_id,
        name_string_id: parsed.id.clone(),
        record_id: field(record, RECORD_ID_FIELD, FILE)?.to_string(),
        local_id: field(record, LOCAL_ID_FIELD, FILE)?.to_string(),
        global_id: field(record, GLOBAL_ID_FIELD, FILE)?.to_string(),
        code_id,
        rank: field(record, RANK_FIELD, FILE)?.to_string(),
        accepted_record_id: field(record, ACCEPTED_RECORD_ID_FIELD, FILE)?.to_string(),
        classification: field(record, CLASSIFICATION_FIELD, FILE)?.to_string(),
        classification_ids: field(record, CLASSIFICATION_IDS_FIELD, FILE)?.to_string(),
        classification_ranks: field(record, CLASSIFICATION_RANKS_FIELD, FILE)?.to_string(),
        ..Default::default()
    };

    if let Some(info) = registry::source_info(data_source_id) {
        if let Some(outlink_id) = info.outlink_id {
            let name_inf = NameInf {
                record_id: index.record_id.clone(),
                accepted_record_id: index.accepted_record_id.clone(),
                local_id: index.local_id.clone(),
                global_id: index.global_id.clone(),
                canonical: parsed.canonical_simple,
                canonical_full: parsed.canonical_full,
            };
            index.outlink_id = outlink_id.apply(&name_inf);
        }
    }
    Ok(Some(index))
}

async fn writer(pool: PgPool, mut batches: Receiver<Vec<NameStringIndex>>) -> Result<()> {
    let mut progress = Progress::new();
    while let Some(batch) = batches.recv().await {
        if batch.is_empty() {
            continue;
        }
        let saved = save_name_indices(&pool, &batch).await?;
        let (total, per_sec) = progress.add(saved);
        info!(total, per_sec, "uploaded name-string indices");
    }
    Ok(())
}

async fn save_name_indices(pool: &PgPool, batch: &[NameStringIndex]) -> Result<u64> {
    let columns = [
        "data_source_id",
        "name_string_id",
        "record_id",
        "local_id",
        "global_id",
        "outlink_id",
        "code_id",
        "rank",
        "accepted_record_id",
        "classification",
        "classification_ids",
        "classification_ranks",
    ];
    let rows: Vec<Vec<CopyValue>> = batch
        .iter()
        .map(|v| {
            vec![
                CopyValue::Int(v.data_source_id.into()),
                CopyValue::Text(v.name_string_id.clone()),
                CopyValue::Text(v.record_id.clone()),
                CopyValue::Text(v.local_id.clone()),
                CopyValue::Text(v.global_id.clone()),
                CopyValue::Text(v.outlink_id.clone()),
                CopyValue::Int(v.code_id.into()),
                CopyValue::Text(v.rank.clone()),
                CopyValue::Text(v.accepted_record_id.clone()),
                CopyValue::Text(v.classification.clone()),
                CopyValue::Text(v.classification_ids.clone()),
                CopyValue::Text(v.classification_ranks.clone()),
            ]
        })
        .collect();
    copy_rows(pool, "name_string_indices", &columns, &rows).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnidump_core::gn_uuid;
    use tempfile::TempDir;

    fn kv_with_entry(source_id: &str, payload: &ParsedPayload) -> (TempDir, Store) {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path().join("sci")).unwrap();
        let mut txn = store.writer();
        txn.set(source_id.as_bytes(), &payload.encode().unwrap())
            .unwrap();
        txn.commit().unwrap();
        (tmp, store)
    }

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_row_resolves_uuid_and_outlink() {
        let payload = ParsedPayload {
            id: gn_uuid("Mus musculus L.").to_string(),
            canonical_simple: "Mus musculus".to_string(),
            canonical_full: "Mus musculus".to_string(),
        };
        let (_tmp, kv) = kv_with_entry("777", &payload);

        // Source 1 (Catalogue of Life) derives outlinks from local_id.
        let rec = record(&[
            "1", "777", "url", "tax-9", "glob-1", "loc-5", "1", "species", "tax-1",
            "Animalia|Mus", "1|2", "kingdom|genus",
        ]);
        let index = index_row(&rec, &kv).unwrap().unwrap();
        assert_eq!(index.data_source_id, 1);
        assert_eq!(index.name_string_id, payload.id);
        assert_eq!(index.record_id, "tax-9");
        assert_eq!(index.outlink_id, "loc-5");
        assert_eq!(index.code_id, 1);
        assert_eq!(index.classification, "Animalia|Mus");
    }

    #[test]
    fn test_missing_kv_entry_skips_row() {
        let (_tmp, kv) = kv_with_entry("1", &ParsedPayload::default());
        let rec = record(&[
            "1", "unknown", "url", "t", "g", "l", "0", "", "", "", "", "",
        ]);
        assert!(index_row(&rec, &kv).unwrap().is_none());
    }

    #[test]
    fn test_bad_code_id_defaults_to_zero() {
        let payload = ParsedPayload {
            id: gn_uuid("Aus bus").to_string(),
            canonical_simple: "Aus bus".to_string(),
            canonical_full: "Aus bus".to_string(),
        };
        let (_tmp, kv) = kv_with_entry("5", &payload);
        let rec = record(&[
            "42", "5", "url", "t", "g", "l", "not-a-number", "", "", "", "", "",
        ]);
        let index = index_row(&rec, &kv).unwrap().unwrap();
        assert_eq!(index.code_id, 0);
        // Source 42 is not in the registry: no outlink id.
        assert_eq!(index.outlink_id, "");
    }

    #[test]
    fn test_bad_data_source_id_is_an_error() {
        let (_tmp, kv) = kv_with_entry("1", &ParsedPayload::default());
        let rec = record(&["x", "1", "url", "t", "g", "l", "0", "", "", "", "", ""]);
        assert!(index_row(&rec, &kv).is_err());
    }
}
