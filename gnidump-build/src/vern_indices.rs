//! Vernacular string indices import.
//!
//! Resolves each row's vernacular-string id through the vern KV store and
//! normalizes the supplied language towards a lowercase three-letter ISO
//! 639-3 code: first as a BCP-47 tag (case-insensitive, primary subtag),
//! then through a fixed English-name fallback table. Rows whose language is
//! recognized by neither keep an empty code.

use csv::StringRecord;
use sqlx::PgPool;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{info, warn};

use gnidump_core::model::VernacularStringIndex;
use gnidump_core::Config;
use gnidump_kv::Store;

use crate::copy::{copy_rows, CopyValue};
use crate::csv_input::{field, stream_csv};
use crate::error::{Error, Result};
use crate::payload::decode_uuid;
use crate::pipeline::{drive, Batcher, Cancel, Progress, BATCH_CHANNEL_CAP, ROW_CHANNEL_CAP};

const FILE: &str = "vernacular_string_indices.csv";

const DATA_SOURCE_ID_FIELD: usize = 0;
const RECORD_ID_FIELD: usize = 1;
const VERN_STRING_ID_FIELD: usize = 2;
const LANGUAGE_FIELD: usize = 3;
const LOCALITY_FIELD: usize = 4;
const COUNTRY_CODE_FIELD: usize = 5;

/// English-name fallback for languages that are not valid BCP-47 tags.
const LANG_FALLBACK: &[(&str, &str)] = &[
    ("Afrikaans", "afr"),
    ("Arabic", "ara"),
    ("Chinese", "zho"),
    ("Danish", "dan"),
    ("English", "eng"),
    ("French", "fra"),
    ("German", "deu"),
    ("Greek", "ell"),
    ("Hausa", "hau"),
    ("Hawaiian", "haw"),
    ("Indonesian", "ind"),
    ("Italian", "ita"),
    ("Japanese", "jpn"),
    ("Korean", "kor"),
    ("Malagasy", "mlg"),
    ("Portuguese", "por"),
    ("Romanian", "ron"),
    ("Slovenian", "slv"),
    ("Spanish", "spa"),
    ("Swedish", "swe"),
    ("Thai", "tha"),
    ("Zulu", "zul"),
];

pub(crate) async fn import_vern_indices(cfg: &Config, pool: &PgPool, kv: &Store) -> Result<()> {
    info!("uploading data for vernacular_string_indices table");
    crate::db::truncate_table(pool, "vernacular_string_indices").await?;

    let cancel = Cancel::new();
    let (row_tx, row_rx) = mpsc::channel::<StringRecord>(ROW_CHANNEL_CAP);
    let (batch_tx, batch_rx) = mpsc::channel::<Vec<VernacularStringIndex>>(BATCH_CHANNEL_CAP);

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
    info!("uploaded vernacular_string_indices table");
    Ok(())
}

async fn worker(
    mut rows: Receiver<StringRecord>,
    batch_tx: Sender<Vec<VernacularStringIndex>>,
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

fn index_row(record: &StringRecord, kv: &Store) -> Result<Option<VernacularStringIndex>> {
    let data_source_id: i32 = field(record, DATA_SOURCE_ID_FIELD, FILE)?
        .parse()
        .map_err(|_| Error::bad_row(format!("{FILE}: bad data_source_id")))?;

    let source_vern_id = field(record, VERN_STRING_ID_FIELD, FILE)?;
    let Some(bytes) = kv.get(source_vern_id.as_bytes())? else {
        warn!(
            data_source_id,
            vernacular_string_id = source_vern_id,
            "no entry for vernacular-string id, skipping row"
        );
        return Ok(None);
    };
    let uuid = decode_uuid(&bytes)?;

    let language = field(record, LANGUAGE_FIELD, FILE)?.to_string();
    let lang_code = normalize_lang_code(&language).unwrap_or_else(|| {
        if !language.is_empty() {
            warn!(language, "language not recognized, lang_code left empty");
        }
        String::new()
    });

    Ok(Some(VernacularStringIndex {
        data_source_id,
        vernacular_string_id: uuid,
        record_id: field(record, RECORD_ID_FIELD, FILE)?.to_string(),
        language,
        lang_code,
        locality: field(record, LOCALITY_FIELD, FILE)?.to_string(),
        country_code: field(record, COUNTRY_CODE_FIELD, FILE)?.to_string(),
    }))
}

/// ISO 639-3 code for a supplied language value, if recognizable.
pub(crate) fn normalize_lang_code(language: &str) -> Option<String> {
    if language.is_empty() {
        return None;
    }
    // BCP-47 primary subtag, case-insensitive: "en", "EN-us", "zho-Hant".
    let primary: String = language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let from_tag = match primary.len() {
        2 => isolang::Language::from_639_1(&primary),
        3 => isolang::Language::from_639_3(&primary),
        _ => None,
    };
    if let Some(lang) = from_tag {
        return Some(lang.to_639_3().to_string());
    }
    LANG_FALLBACK
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, code)| code.to_string())
}

async fn writer(pool: PgPool, mut batches: Receiver<Vec<VernacularStringIndex>>) -> Result<()> {
    let mut progress = Progress::new();
    while let Some(batch) = batches.recv().await {
        if batch.is_empty() {
            continue;
        }
        let saved = save_vern_indices(&pool, &batch).await?;
        let (total, per_sec) = progress.add(saved);
        info!(total, per_sec, "uploaded vernacular indices");
    }
    Ok(())
}

async fn save_vern_indices(pool: &PgPool, batch: &[VernacularStringIndex]) -> Result<u64> {
    let columns = [
        "data_source_id",
        "vernacular_string_id",
        "record_id",
        "language",
        "lang_code",
        "locality",
        "country_code",
    ];
    let rows: Vec<Vec<CopyValue>> = batch
        .iter()
        .map(|v| {
            vec![
                CopyValue::Int(v.data_source_id.into()),
                CopyValue::Text(v.vernacular_string_id.clone()),
                CopyValue::Text(v.record_id.clone()),
                CopyValue::Text(v.language.clone()),
                CopyValue::Text(v.lang_code.clone()),
                CopyValue::Text(v.locality.clone()),
                CopyValue::Text(v.country_code.clone()),
            ]
        })
        .collect();
    copy_rows(pool, "vernacular_string_indices", &columns, &rows).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::encode_uuid;
    use tempfile::TempDir;

    #[test]
    fn test_lang_code_from_two_letter_tag() {
        assert_eq!(normalize_lang_code("en").as_deref(), Some("eng"));
        assert_eq!(normalize_lang_code("EN").as_deref(), Some("eng"));
        assert_eq!(normalize_lang_code("de").as_deref(), Some("deu"));
    }

    #[test]
    fn test_lang_code_from_three_letter_tag() {
        assert_eq!(normalize_lang_code("eng").as_deref(), Some("eng"));
        assert_eq!(normalize_lang_code("zho").as_deref(), Some("zho"));
    }

    #[test]
    fn test_lang_code_from_regioned_tag() {
        assert_eq!(normalize_lang_code("en-US").as_deref(), Some("eng"));
        assert_eq!(normalize_lang_code("pt_BR").as_deref(), Some("por"));
    }

    #[test]
    fn test_lang_code_from_fallback_name() {
        assert_eq!(normalize_lang_code("English").as_deref(), Some("eng"));
        assert_eq!(normalize_lang_code("German").as_deref(), Some("deu"));
        assert_eq!(normalize_lang_code("Chinese").as_deref(), Some("zho"));
    }

    #[test]
    fn test_unknown_language_is_none() {
        assert_eq!(normalize_lang_code("Martian"), None);
        assert_eq!(normalize_lang_code(""), None);
    }

    #[test]
    fn test_index_row_resolves_and_normalizes() {
        let tmp = TempDir::new().unwrap();
        let kv = Store::open(tmp.path().join("vern")).unwrap();
        let mut txn = kv.writer();
        txn.set(b"12", &encode_uuid("11111111-2222-5333-8444-555555555555").unwrap())
            .unwrap();
        txn.commit().unwrap();

        let rec = StringRecord::from(vec!["3", "tax-7", "12", "English", "Maine", "US"]);
        let index = index_row(&rec, &kv).unwrap().unwrap();
        assert_eq!(
            index.vernacular_string_id,
            "11111111-2222-5333-8444-555555555555"
        );
        assert_eq!(index.language, "English");
        assert_eq!(index.lang_code, "eng");
        assert_eq!(index.locality, "Maine");
        assert_eq!(index.country_code, "US");
    }

    #[test]
    fn test_index_row_skips_missing_kv() {
        let tmp = TempDir::new().unwrap();
        let kv = Store::open(tmp.path().join("vern")).unwrap();
        let rec = StringRecord::from(vec!["3", "tax-7", "404", "English", "", ""]);
        assert!(index_row(&rec, &kv).unwrap().is_none());
    }
}
