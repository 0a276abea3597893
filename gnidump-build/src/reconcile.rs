//! Post-load reconciliation: orphan pruning and the verification view.

use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Deletes rows that nothing references anymore: name-strings without an
/// index row, then each canonical form without a name-string.
pub(crate) async fn remove_orphans(pool: &PgPool) -> Result<()> {
    info!("removing orphan name-strings");
    sqlx::query(
        r#"DELETE FROM name_strings
  WHERE id IN (
    SELECT ns.id
      FROM name_strings ns
        LEFT OUTER JOIN name_string_indices nsi
          ON ns.id = nsi.name_string_id
      WHERE nsi.name_string_id IS NULL
    )"#,
    )
    .execute(pool)
    .await?;

    info!("removing orphan canonicals");
    sqlx::query(
        r#"DELETE FROM canonicals
  WHERE id IN (
    SELECT c.id
      FROM canonicals c
        LEFT OUTER JOIN name_strings ns
          ON c.id = ns.canonical_id
      WHERE ns.id IS NULL
    )"#,
    )
    .execute(pool)
    .await?;

    info!("removing orphan canonical_fulls");
    sqlx::query(
        r#"DELETE FROM canonical_fulls
  WHERE id IN (
    SELECT cf.id
      FROM canonical_fulls cf
        LEFT OUTER JOIN name_strings ns
          ON cf.id = ns.canonical_full_id
      WHERE ns.id IS NULL
    )"#,
    )
    .execute(pool)
    .await?;

    info!("removing orphan canonical_stems");
    sqlx::query(
        r#"DELETE FROM canonical_stems
  WHERE id IN (
    SELECT cs.id
      FROM canonical_stems cs
        LEFT OUTER JOIN name_strings ns
          ON cs.id = ns.canonical_stem_id
      WHERE ns.id IS NULL
    )"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// The denormalized projection used by name resolution. Accepted names are
/// resolved with a self-join on `(data_source_id, accepted_record_id)`.
const VERIFICATION_VIEW: &str = r#"CREATE MATERIALIZED VIEW verification AS
WITH taxon_names AS (
SELECT nsi.data_source_id, nsi.record_id, nsi.name_string_id, ns.name
  FROM name_string_indices nsi
    JOIN name_strings ns
      ON nsi.name_string_id = ns.id
)
SELECT nsi.data_source_id, nsi.record_id, nsi.name_string_id,
  ns.name, ns.year, ns.cardinality, ns.canonical_id, ns.virus, ns.bacteria,
  ns.parse_quality, nsi.local_id, nsi.outlink_id, nsi.accepted_record_id,
  tn.name_string_id as accepted_name_id,
  tn.name as accepted_name, nsi.classification, nsi.classification_ranks,
  nsi.classification_ids
  FROM name_string_indices nsi
    JOIN name_strings ns ON ns.id = nsi.name_string_id
    LEFT JOIN taxon_names tn
      ON nsi.data_source_id = tn.data_source_id AND
         nsi.accepted_record_id = tn.record_id
  WHERE
    (
      ns.canonical_id is not NULL AND
      surrogate != TRUE AND
      (bacteria != TRUE OR parse_quality < 3)
    ) OR ns.virus = TRUE"#;

/// Drops and rebuilds the materialized verification view with its b-tree
/// indexes.
pub(crate) async fn create_verification(pool: &PgPool) -> Result<()> {
    sqlx::query("DROP MATERIALIZED VIEW IF EXISTS verification")
        .execute(pool)
        .await?;

    info!("building verification view, it will take some time...");
    sqlx::query(VERIFICATION_VIEW).execute(pool).await?;

    info!("building indices for verification view, it will take some time...");
    sqlx::query("CREATE INDEX ON verification (canonical_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX ON verification (name_string_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX ON verification (year)")
        .execute(pool)
        .await?;

    info!("view verification is created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_predicate_shape() {
        // The predicate keeps viruses unconditionally and otherwise requires
        // a canonical, no surrogate, and non-bacteria unless quality < 3.
        assert!(VERIFICATION_VIEW.contains("ns.canonical_id is not NULL"));
        assert!(VERIFICATION_VIEW.contains("surrogate != TRUE"));
        assert!(VERIFICATION_VIEW.contains("bacteria != TRUE OR parse_quality < 3"));
        assert!(VERIFICATION_VIEW.contains("OR ns.virus = TRUE"));
    }

    #[test]
    fn test_verification_self_join_on_accepted_record() {
        assert!(VERIFICATION_VIEW.contains("nsi.data_source_id = tn.data_source_id"));
        assert!(VERIFICATION_VIEW.contains("nsi.accepted_record_id = tn.record_id"));
    }
}
