//! Data-sources import.
//!
//! Joins the dumped `data_sources.csv` rows with the static registry: the
//! registry wins for title, description and URLs where it has values, the
//! CSV supplies the rest. The table is small; rows are inserted with plain
//! bound statements in one transaction.

use chrono::{DateTime, Utc};
use csv::StringRecord;
use sqlx::PgPool;
use tracing::info;

use gnidump_core::model::DataSource;
use gnidump_core::{scrub_one_line, short_title, Config};

use crate::csv_input::{field, open_csv};
use crate::error::{Error, Result};
use crate::registry;

const FILE: &str = "data_sources.csv";

const ID_FIELD: usize = 0;
const TITLE_FIELD: usize = 1;
const DESCRIPTION_FIELD: usize = 2;
const WEBSITE_URL_FIELD: usize = 4;
const DATA_URL_FIELD: usize = 5;
const UPDATED_AT_FIELD: usize = 11;
const IS_CURATED_FIELD: usize = 12;
const IS_AUTO_CURATED_FIELD: usize = 13;
const RECORD_COUNT_FIELD: usize = 14;

const NIL_UUID: &str = "00000000-0000-0000-0000-000000000000";

pub(crate) async fn import_data_sources(cfg: &Config, pool: &PgPool) -> Result<()> {
    info!("populating data_sources table");
    crate::db::truncate_table(pool, "data_sources").await?;

    let sources = load_data_sources(cfg)?;
    let count = sources.len();
    save_data_sources(pool, &sources).await?;

    info!(count, "uploaded data_sources table");
    Ok(())
}

fn load_data_sources(cfg: &Config) -> Result<Vec<DataSource>> {
    let mut reader = open_csv(&cfg.dump_dir, FILE)?;
    let mut record = StringRecord::new();
    let mut sources = Vec::new();

    while reader.read_record(&mut record)? {
        sources.push(row_to_data_source(&record)?);
    }
    Ok(sources)
}

fn row_to_data_source(record: &StringRecord) -> Result<DataSource> {
    let id: i32 = field(record, ID_FIELD, FILE)?
        .parse()
        .map_err(|_| Error::bad_row(format!("{FILE}: bad id")))?;
    let record_count: i32 = field(record, RECORD_COUNT_FIELD, FILE)?
        .parse()
        .unwrap_or(0);
    let updated_at_raw = field(record, UPDATED_AT_FIELD, FILE)?;
    let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(updated_at_raw)
        .map_err(|e| Error::bad_row(format!("{FILE}: bad updated_at {updated_at_raw:?}: {e}")))?
        .with_timezone(&Utc);

    let csv_title = field(record, TITLE_FIELD, FILE)?.to_string();
    let csv_description = field(record, DESCRIPTION_FIELD, FILE)?.to_string();

    let info = registry::source_info(id);

    let title = match info.map(|i| i.title) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => csv_title.clone(),
    };
    let title_short = match info.map(|i| i.title_short) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => short_title(&csv_title),
    };
    let description = match info.map(|i| i.description) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => csv_description,
    };

    let website_url = info
        .map(|i| i.home_url.to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| scrub_one_line(field(record, WEBSITE_URL_FIELD, FILE).unwrap_or("")));
    let data_url = info
        .map(|i| i.data_url.to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| scrub_one_line(field(record, DATA_URL_FIELD, FILE).unwrap_or("")));

    Ok(DataSource {
        id,
        uuid: info
            .map(|i| i.uuid)
            .filter(|u| !u.is_empty())
            .unwrap_or(NIL_UUID)
            .to_string(),
        title,
        title_short,
        description,
        website_url,
        data_url,
        outlink_url: info.map(|i| i.outlink_url).unwrap_or_default().to_string(),
        is_outlink_ready: info.map(|i| i.is_outlink_ready).unwrap_or(false),
        is_curated: field(record, IS_CURATED_FIELD, FILE)? == "t",
        is_auto_curated: field(record, IS_AUTO_CURATED_FIELD, FILE)? == "t",
        record_count,
        updated_at,
        ..Default::default()
    })
}

async fn save_data_sources(pool: &PgPool, sources: &[DataSource]) -> Result<()> {
    let mut tx = pool.begin().await?;
    for ds in sources {
        sqlx::query(
            r#"INSERT INTO data_sources
  (id, uuid, title, title_short, version, revision_date, doi, citation,
   authors, description, website_url, data_url, outlink_url,
   is_outlink_ready, is_curated, is_auto_curated, has_taxon_data,
   record_count, updated_at)
VALUES ($1, $2::uuid, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
        $15, $16, $17, $18, $19)"#,
        )
        .bind(ds.id)
        .bind(&ds.uuid)
        .bind(&ds.title)
        .bind(&ds.title_short)
        .bind(&ds.version)
        .bind(&ds.revision_date)
        .bind(&ds.doi)
        .bind(&ds.citation)
        .bind(&ds.authors)
        .bind(&ds.description)
        .bind(&ds.website_url)
        .bind(&ds.data_url)
        .bind(&ds.outlink_url)
        .bind(ds.is_outlink_ready)
        .bind(ds.is_curated)
        .bind(ds.is_auto_curated)
        .bind(ds.has_taxon_data)
        .bind(ds.record_count)
        .bind(ds.updated_at.naive_utc())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str) -> StringRecord {
        StringRecord::from(vec![
            id,
            title,
            "a description",
            "logo.png",
            "https://example.org/",
            "https://example.org/data",
            "30",
            "1000",
            "hash",
            "900",
            "2020-01-01T00:00:00Z",
            "2020-06-15T12:30:00Z",
            "t",
            "f",
            "1234",
        ])
    }

    #[test]
    fn test_registry_overrides_title() {
        let ds = row_to_data_source(&record("1", "CoL from csv")).unwrap();
        assert_eq!(ds.title, "Catalogue of Life");
        assert_eq!(ds.uuid, "d4df2968-4257-4ad9-ab81-bedbbfb25e2a");
        assert!(ds.is_outlink_ready);
        assert!(ds.is_curated);
        assert!(!ds.is_auto_curated);
        assert_eq!(ds.record_count, 1234);
    }

    #[test]
    fn test_unregistered_source_uses_csv_values() {
        let ds = row_to_data_source(&record("9999", "Some Obscure Checklist")).unwrap();
        assert_eq!(ds.title, "Some Obscure Checklist");
        assert_eq!(ds.title_short, "Some Obscure Checklist");
        assert_eq!(ds.uuid, NIL_UUID);
        assert_eq!(ds.website_url, "https://example.org/");
        assert!(!ds.is_outlink_ready);
    }

    #[test]
    fn test_long_title_truncated_for_short_title() {
        let long = "A Very Long Dataset Title That Keeps Going And Going Forever";
        let ds = row_to_data_source(&record("9999", long)).unwrap();
        assert!(ds.title_short.ends_with("..."));
        assert!(ds.title_short.chars().count() <= 44);
    }

    #[test]
    fn test_bad_updated_at_is_error() {
        let mut fields: Vec<String> = record("5", "Index Fungorum")
            .iter()
            .map(|s| s.to_string())
            .collect();
        fields[UPDATED_AT_FIELD] = "not-a-date".to_string();
        let rec = StringRecord::from(fields);
        assert!(row_to_data_source(&rec).is_err());
    }
}
