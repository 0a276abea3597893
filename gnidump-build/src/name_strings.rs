//! Scientific name-strings import.
//!
//! Topology: one CSV reader → `JobsNum` parser workers → one database
//! writer. Workers parse every name, persist a projection of the result
//! into the sci KV store keyed by the source's name-string id, and emit
//! `name_strings` rows and canonical rows in `BatchSize` chunks on two
//! separate channels. The writer drains both concurrently: name-strings go
//! through COPY, canonicals through `INSERT … ON CONFLICT DO NOTHING` so
//! the massive duplication across workers resolves without coordination.

use std::sync::Arc;

use csv::StringRecord;
use sqlx::{PgPool, QueryBuilder};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::Mutex;
use tracing::info;

use gnidump_core::model::NameString;
use gnidump_core::{gn_uuid, scrub_nul, Config};
use gnidump_kv::Store;
use gnidump_parser::{Parsed, ScientificNameParser, Tristate};

use crate::copy::{copy_rows, CopyValue};
use crate::csv_input::{field, stream_csv};
use crate::error::{Error, Result};
use crate::payload::ParsedPayload;
use crate::pipeline::{drive, Batcher, Cancel, Progress, BATCH_CHANNEL_CAP, ROW_CHANNEL_CAP};

const FILE: &str = "name_strings.csv";
const ID_FIELD: usize = 0;
const NAME_FIELD: usize = 1;

/// Canonical forms of one parsed name, ready for the three canonical
/// tables. `full` and `stem` stay empty when the corresponding row is not
/// wanted for this name.
#[derive(Debug, Clone, Default)]
pub(crate) struct CanonicalData {
    pub id: String,
    pub value: String,
    pub full_id: String,
    pub full_value: String,
    pub stem_id: String,
    pub stem_value: String,
}

pub(crate) async fn import_name_strings(cfg: &Config, pool: &PgPool, kv: &Store) -> Result<()> {
    info!("importing name-strings");
    crate::db::truncate_table(pool, "name_strings").await?;

    let cancel = Cancel::new();
    let (row_tx, row_rx) = mpsc::channel::<StringRecord>(ROW_CHANNEL_CAP);
    let (name_tx, name_rx) = mpsc::channel::<Vec<NameString>>(BATCH_CHANNEL_CAP);
    let (can_tx, can_rx) = mpsc::channel::<Vec<CanonicalData>>(BATCH_CHANNEL_CAP);

    let mut handles = Vec::with_capacity(cfg.jobs_num + 2);

    // Reader.
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

    // Parser workers share one receiver.
    let row_rx = Arc::new(Mutex::new(row_rx));
    for _ in 0..cfg.jobs_num {
        let rx = Arc::clone(&row_rx);
        let name_tx = name_tx.clone();
        let can_tx = can_tx.clone();
        let kv = kv.clone();
        let cancel = cancel.clone();
        let batch_size = cfg.batch_size;
        handles.push(tokio::spawn(async move {
            worker(rx, name_tx, can_tx, kv, cancel.clone(), batch_size)
                .await
                .inspect_err(|e| {
                    if !matches!(e, Error::Canceled) {
                        cancel.cancel();
                    }
                })
        }));
    }
    // Workers hold the only sender clones; the writer stops when all exit.
    drop(name_tx);
    drop(can_tx);

    // Writer.
    {
        let pool = pool.clone();
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            writer(pool, name_rx, can_rx)
                .await
                .inspect_err(|_| cancel.cancel())
        }));
    }

    drive(handles).await?;
    info!("uploaded name_strings table");
    Ok(())
}

async fn worker(
    rows: Arc<Mutex<Receiver<StringRecord>>>,
    name_tx: Sender<Vec<NameString>>,
    can_tx: Sender<Vec<CanonicalData>>,
    kv: Store,
    cancel: Cancel,
    batch_size: usize,
) -> Result<()> {
    let parser = ScientificNameParser::new();
    let mut kv_txn = kv.writer();
    let mut names = Batcher::new(batch_size);
    let mut canonicals: Vec<CanonicalData> = Vec::new();

    loop {
        if cancel.is_canceled() {
            return Err(Error::Canceled);
        }
        let record = {
            let mut guard = rows.lock().await;
            guard.recv().await
        };
        let Some(record) = record else { break };

        let source_id = field(&record, ID_FIELD, FILE)?.to_string();
        let name = scrub_nul(field(&record, NAME_FIELD, FILE)?);

        let parsed = parser.parse(&name);
        kv_txn = persist_parsed(&kv, kv_txn, &source_id, &parsed)?;

        let (name_string, canonical) = name_string_row(&parsed);
        if let Some(canonical) = canonical {
            canonicals.push(canonical);
        }
        if let Some(full) = names.push(name_string) {
            if name_tx.send(full).await.is_err() {
                return Err(Error::Canceled);
            }
            let cans = std::mem::take(&mut canonicals);
            if can_tx.send(cans).await.is_err() {
                return Err(Error::Canceled);
            }
        }
    }

    kv_txn.commit()?;
    let rest = names.finish();
    if name_tx.send(rest).await.is_err() {
        return Err(Error::Canceled);
    }
    if can_tx.send(canonicals).await.is_err() {
        return Err(Error::Canceled);
    }
    Ok(())
}

/// Stores the parser projection under the source id, honoring the
/// commit-and-retry protocol when the transaction fills up.
fn persist_parsed(
    kv: &Store,
    mut txn: gnidump_kv::WriteTxn,
    source_id: &str,
    parsed: &Parsed,
) -> Result<gnidump_kv::WriteTxn> {
    let payload = match &parsed.canonical {
        Some(c) if parsed.parsed => ParsedPayload {
            id: parsed.verbatim_id.clone(),
            canonical_simple: c.simple.clone(),
            canonical_full: c.full.clone(),
        },
        _ => ParsedPayload {
            id: parsed.verbatim_id.clone(),
            ..Default::default()
        },
    };
    let bytes = payload.encode()?;

    match txn.set(source_id.as_bytes(), &bytes) {
        Ok(()) => Ok(txn),
        Err(gnidump_kv::Error::TxnTooLarge) => {
            txn.commit()?;
            let mut txn = kv.writer();
            txn.set(source_id.as_bytes(), &bytes)?;
            Ok(txn)
        }
        Err(e) => Err(e.into()),
    }
}

/// Derives the `name_strings` row and the canonical rows from one parse.
pub(crate) fn name_string_row(p: &Parsed) -> (NameString, Option<CanonicalData>) {
    let mut n = NameString {
        id: p.verbatim_id.clone(),
        name: p.verbatim.clone(),
        virus: p.virus,
        bacteria: p.bacteria == Some(Tristate::Yes),
        surrogate: p.surrogate.is_some(),
        parse_quality: p.quality,
        ..Default::default()
    };
    if !p.parsed {
        return (n, None);
    }
    let Some(canonical) = &p.canonical else {
        return (n, None);
    };

    n.cardinality = Some(p.cardinality);
    n.year = parse_year(p);

    let mut can = CanonicalData {
        id: gn_uuid(&canonical.simple).to_string(),
        value: canonical.simple.clone(),
        ..Default::default()
    };
    n.canonical_id = Some(can.id.clone());

    if canonical.simple != canonical.full {
        can.full_id = gn_uuid(&canonical.full).to_string();
        can.full_value = canonical.full.clone();
        n.canonical_full_id = Some(can.full_id.clone());
    }

    // Stems of uninomials are kept as well; they support exact matching
    // that weeds out false positives from bloom filters downstream.
    if p.cardinality > 0 && !can.value.contains('.') {
        can.stem_id = gn_uuid(&canonical.stemmed).to_string();
        can.stem_value = canonical.stemmed.clone();
        n.canonical_stem_id = Some(can.stem_id.clone());
    }

    (n, Some(can))
}

/// Year of publication: the authorship year token with parentheses
/// trimmed, first four characters read as an integer.
pub(crate) fn parse_year(p: &Parsed) -> Option<i16> {
    let authorship = p.authorship.as_ref()?;
    if authorship.year.is_empty() {
        return None;
    }
    let year = authorship.year.trim_matches(['(', ')']);
    year.get(..4)?.parse::<i16>().ok()
}

async fn writer(
    pool: PgPool,
    mut name_rx: Receiver<Vec<NameString>>,
    mut can_rx: Receiver<Vec<CanonicalData>>,
) -> Result<()> {
    let mut progress = Progress::new();
    let mut names_open = true;
    let mut cans_open = true;

    while names_open || cans_open {
        tokio::select! {
            batch = name_rx.recv(), if names_open => match batch {
                Some(batch) => {
                    if !batch.is_empty() {
                        let saved = save_name_strings(&pool, &batch).await?;
                        let (total, per_sec) = progress.add(saved);
                        info!(total, per_sec, "uploaded name-strings");
                    }
                }
                None => names_open = false,
            },
            batch = can_rx.recv(), if cans_open => match batch {
                Some(batch) => {
                    if !batch.is_empty() {
                        save_canonicals(&pool, &batch).await?;
                    }
                }
                None => cans_open = false,
            },
        }
    }
    Ok(())
}

async fn save_name_strings(pool: &PgPool, batch: &[NameString]) -> Result<u64> {
    let columns = [
        "id",
        "name",
        "year",
        "cardinality",
        "canonical_id",
        "canonical_full_id",
        "canonical_stem_id",
        "virus",
        "bacteria",
        "surrogate",
        "parse_quality",
    ];
    let rows: Vec<Vec<CopyValue>> = batch
        .iter()
        .map(|n| {
            vec![
                CopyValue::Text(n.id.clone()),
                CopyValue::Text(n.name.clone()),
                CopyValue::OptInt(n.year.map(i64::from)),
                CopyValue::OptInt(n.cardinality.map(i64::from)),
                CopyValue::OptText(n.canonical_id.clone()),
                CopyValue::OptText(n.canonical_full_id.clone()),
                CopyValue::OptText(n.canonical_stem_id.clone()),
                CopyValue::Bool(n.virus),
                CopyValue::Bool(n.bacteria),
                CopyValue::Bool(n.surrogate),
                CopyValue::Int(n.parse_quality.into()),
            ]
        })
        .collect();
    copy_rows(pool, "name_strings", &columns, &rows).await
}

/// Inserts canonical rows grouped per form. Duplication across batches and
/// workers is expected; ON CONFLICT absorbs it.
async fn save_canonicals(pool: &PgPool, batch: &[CanonicalData]) -> Result<()> {
    let simple: Vec<(&str, &str)> = batch
        .iter()
        .map(|c| (c.id.as_str(), c.value.as_str()))
        .collect();
    insert_canonical_rows(pool, "canonicals", &simple).await?;

    let fulls: Vec<(&str, &str)> = batch
        .iter()
        .filter(|c| !c.full_id.is_empty())
        .map(|c| (c.full_id.as_str(), c.full_value.as_str()))
        .collect();
    if !fulls.is_empty() {
        insert_canonical_rows(pool, "canonical_fulls", &fulls).await?;
    }

    let stems: Vec<(&str, &str)> = batch
        .iter()
        .filter(|c| !c.stem_id.is_empty())
        .map(|c| (c.stem_id.as_str(), c.stem_value.as_str()))
        .collect();
    if !stems.is_empty() {
        insert_canonical_rows(pool, "canonical_stems", &stems).await?;
    }
    Ok(())
}

async fn insert_canonical_rows(pool: &PgPool, table: &str, rows: &[(&str, &str)]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut qb: QueryBuilder<sqlx::Postgres> =
        QueryBuilder::new(format!("INSERT INTO {table} (id, name) "));
    qb.push_values(rows.iter(), |mut b, (id, name)| {
        b.push_bind(*id).push_bind(*name);
    });
    qb.push(" ON CONFLICT DO NOTHING");
    qb.build().execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnidump_parser::ScientificNameParser;

    fn parse(name: &str) -> Parsed {
        ScientificNameParser::new().parse(name)
    }

    #[test]
    fn test_row_happy_path() {
        let (n, can) = name_string_row(&parse("Homo sapiens Linnaeus 1758"));
        assert_eq!(n.id, gn_uuid("Homo sapiens Linnaeus 1758").to_string());
        assert_eq!(n.year, Some(1758));
        assert_eq!(n.cardinality, Some(2));
        assert_eq!(n.parse_quality, 1);
        assert_eq!(
            n.canonical_id.as_deref(),
            Some(gn_uuid("Homo sapiens").to_string().as_str())
        );
        // Simple equals full: no separate full canonical.
        assert!(n.canonical_full_id.is_none());
        assert!(n.canonical_stem_id.is_some());

        let can = can.unwrap();
        assert_eq!(can.value, "Homo sapiens");
        assert!(can.full_id.is_empty());
        assert_eq!(can.stem_value, "Homo sapiens");
    }

    #[test]
    fn test_row_unparsed() {
        let (n, can) = name_string_row(&parse("xx ??"));
        assert_eq!(n.parse_quality, 0);
        assert!(n.canonical_id.is_none());
        assert!(n.canonical_full_id.is_none());
        assert!(n.canonical_stem_id.is_none());
        assert!(n.cardinality.is_none());
        assert!(can.is_none());
    }

    #[test]
    fn test_row_hybrid_formula_sets_both_canonicals() {
        let (n, can) = name_string_row(&parse("Aus bus × cus"));
        let can = can.unwrap();
        assert!(n.canonical_id.is_some());
        assert!(n.canonical_full_id.is_some());
        assert_ne!(n.canonical_id, n.canonical_full_id);
        assert_eq!(can.value, "Aus bus");
        assert_eq!(can.full_value, "Aus bus × cus");
        // Cardinality 0: no stem row.
        assert!(n.canonical_stem_id.is_none());
        assert!(can.stem_id.is_empty());
    }

    #[test]
    fn test_row_abbreviated_genus_has_no_stem() {
        let (n, can) = name_string_row(&parse("M. alba"));
        assert!(n.canonical_stem_id.is_none());
        assert!(can.unwrap().stem_id.is_empty());
    }

    #[test]
    fn test_parse_year_variants() {
        assert_eq!(parse_year(&parse("Aus bus Smith 1887")), Some(1887));
        assert_eq!(parse_year(&parse("Aus bus (Smith, 1900)")), Some(1900));
        assert_eq!(parse_year(&parse("Aus bus Smith 1887b")), Some(1887));
        assert_eq!(parse_year(&parse("Aus bus Smith")), None);
        assert_eq!(parse_year(&parse("Aus bus")), None);
    }

    #[test]
    fn test_virus_row() {
        let (n, can) = name_string_row(&parse("Tobacco mosaic virus"));
        assert!(n.virus);
        assert_eq!(n.parse_quality, 0);
        assert!(can.is_none());
    }

    #[test]
    fn test_bacteria_flag_only_for_yes() {
        let (yes, _) = name_string_row(&parse("Escherichia coli"));
        assert!(yes.bacteria);
        let (maybe, _) = name_string_row(&parse("Bacillus subtilis"));
        assert!(!maybe.bacteria);
    }
}
