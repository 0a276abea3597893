//! Vernacular language post-normalization.
//!
//! Runs after the vernacular imports: preserves the supplied value in
//! `language_orig`, then re-derives `language` (canonical English name) and
//! `lang_code` (ISO 639-3) for rows whose language arrived as a bare two-
//! or three-letter code, fills codes that the import pass could not, and
//! finally lowercases every code.

use futures::TryStreamExt;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::error::Result;
use crate::vern_indices::normalize_lang_code;

/// One row under normalization; `ctid` addresses the physical row for the
/// follow-up update.
#[derive(Debug)]
struct VernRow {
    ctid: String,
    language: Option<String>,
    lang_code: Option<String>,
}

pub(crate) async fn fix_vern_lang(pool: &PgPool) -> Result<()> {
    info!("moving language data to language_orig");
    sqlx::query(
        "UPDATE vernacular_string_indices SET language_orig = language WHERE language_orig IS NULL",
    )
    .execute(pool)
    .await?;

    info!("normalizing vernacular language");
    let mut updated: u64 = 0;
    {
        let mut rows = sqlx::query(
            "SELECT ctid::text, language, lang_code FROM vernacular_string_indices",
        )
        .fetch(pool);

        while let Some(row) = rows.try_next().await? {
            let vern = VernRow {
                ctid: row.try_get(0)?,
                language: row.try_get(1)?,
                lang_code: row.try_get(2)?,
            };
            if let Some((language, lang_code)) = normalize_row(&vern) {
                sqlx::query(
                    "UPDATE vernacular_string_indices SET language = $1, lang_code = $2 WHERE ctid = $3::tid",
                )
                .bind(&language)
                .bind(&lang_code)
                .bind(&vern.ctid)
                .execute(pool)
                .await?;
                updated += 1;
            }
        }
    }
    info!(updated, "finished normalization of vernacular languages");

    info!("making sure all language codes are lower case");
    sqlx::query("UPDATE vernacular_string_indices SET lang_code = LOWER(lang_code)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Decides the new `(language, lang_code)` for one row, or `None` when the
/// row is fine as it is.
fn normalize_row(vern: &VernRow) -> Option<(String, String)> {
    let language = vern.language.clone().unwrap_or_default();
    let lang_code = vern.lang_code.clone().unwrap_or_default();

    match language.len() {
        // A bare ISO 639-1 code in the language column: resolve both the
        // English name and the three-letter code.
        2 => {
            let lang = isolang::Language::from_639_1(&language.to_lowercase())?;
            let code = if lang_code.len() == 3 {
                lang_code
            } else {
                lang.to_639_3().to_string()
            };
            Some((lang.to_name().to_string(), code))
        }
        // A bare ISO 639-3 code.
        3 => {
            let lang = isolang::Language::from_639_3(&language.to_lowercase())?;
            let code = if lang_code.len() == 3 {
                lang_code
            } else {
                language.to_lowercase()
            };
            Some((lang.to_name().to_string(), code))
        }
        // A longer value: only fill a missing code from the language name.
        _ => {
            if lang_code.len() == 3 {
                return None;
            }
            let code = normalize_lang_code(&language)?;
            Some((language, code))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(language: &str, lang_code: &str) -> VernRow {
        VernRow {
            ctid: "(0,1)".to_string(),
            language: Some(language.to_string()),
            lang_code: Some(lang_code.to_string()),
        }
    }

    #[test]
    fn test_two_letter_language_expanded() {
        let (language, code) = normalize_row(&row("en", "")).unwrap();
        assert_eq!(language, "English");
        assert_eq!(code, "eng");
    }

    #[test]
    fn test_three_letter_language_expanded() {
        let (language, code) = normalize_row(&row("deu", "")).unwrap();
        assert_eq!(language, "German");
        assert_eq!(code, "deu");
    }

    #[test]
    fn test_existing_code_kept() {
        let (language, code) = normalize_row(&row("en", "eng")).unwrap();
        assert_eq!(language, "English");
        assert_eq!(code, "eng");
    }

    #[test]
    fn test_full_name_fills_missing_code() {
        let (language, code) = normalize_row(&row("English", "")).unwrap();
        assert_eq!(language, "English");
        assert_eq!(code, "eng");
    }

    #[test]
    fn test_full_name_with_code_untouched() {
        assert!(normalize_row(&row("English", "eng")).is_none());
    }

    #[test]
    fn test_unknown_short_code_untouched() {
        assert!(normalize_row(&row("qq", "")).is_none());
        assert!(normalize_row(&row("Martian", "")).is_none());
    }
}
