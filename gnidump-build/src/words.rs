//! Word extraction.
//!
//! Re-parses every stored name-string in details mode and decomposes the
//! parseable ones into words. Only species epithets, infraspecific epithets
//! and author words are kept; surrogates and hybrids are skipped entirely.
//! A word's identity is `UUIDv5("<modified>|<type_id>")`, where `modified`
//! is the type-specific heavy normalization.

use std::collections::HashMap;

use futures::TryStreamExt;
use sqlx::{PgPool, Row};
use tracing::info;

use gnidump_core::gn_uuid;
use gnidump_core::model::{Word, WordNameString};
use gnidump_parser::{normalize_by_type, ScientificNameParser, WordType};

use crate::copy::{copy_rows, CopyValue};
use crate::error::Result;

/// Names per parse batch while scanning `name_strings`.
const NAMES_BATCH: usize = 50_000;

pub(crate) async fn create_words(pool: &PgPool) -> Result<()> {
    info!("processing names for words tables");
    crate::db::truncate_table(pool, "words").await?;
    crate::db::truncate_table(pool, "word_name_strings").await?;

    let parser = ScientificNameParser::with_details();

    // Words dedup across the whole scan; word-name links dedup per batch
    // (a name appears once in name_strings, so links cannot recur across
    // batches).
    let mut words_map: HashMap<String, Word> = HashMap::new();
    let mut names: Vec<String> = Vec::with_capacity(NAMES_BATCH);
    let mut processed: u64 = 0;

    {
        let mut rows = sqlx::query("SELECT name FROM name_strings").fetch(pool);
        while let Some(row) = rows.try_next().await? {
            let name: String = row.try_get(0)?;
            names.push(name);
            if names.len() >= NAMES_BATCH {
                processed += names.len() as u64;
                flush_batch(pool, &parser, &mut names, &mut words_map).await?;
                info!(processed, "processed names for word_name_strings");
            }
        }
    }
    processed += names.len() as u64;
    flush_batch(pool, &parser, &mut names, &mut words_map).await?;
    info!(processed, "processed names for word_name_strings");

    save_words(pool, words_map).await?;
    Ok(())
}

async fn flush_batch(
    pool: &PgPool,
    parser: &ScientificNameParser,
    names: &mut Vec<String>,
    words_map: &mut HashMap<String, Word>,
) -> Result<()> {
    let (words, word_names) = process_parsed_words(parser, names);
    for w in words {
        words_map.insert(format!("{}|{}", w.id, w.normalized), w);
    }
    save_word_name_strings(pool, word_names).await?;
    names.clear();
    Ok(())
}

/// Word rows and word-name links for one batch of names.
pub(crate) fn process_parsed_words(
    parser: &ScientificNameParser,
    names: &[String],
) -> (Vec<Word>, Vec<WordNameString>) {
    let mut words = Vec::with_capacity(names.len() * 5);
    let mut word_names = Vec::with_capacity(names.len() * 5);

    for name in names {
        let p = parser.parse(name);
        if !p.parsed || p.surrogate.is_some() || p.hybrid.is_some() {
            continue;
        }
        let Some(canonical) = &p.canonical else {
            continue;
        };
        let name_string_id = p.verbatim_id.clone();
        let canonical_id = gn_uuid(&canonical.simple).to_string();

        for word in &p.words {
            match word.word_type {
                WordType::SpEpithet | WordType::InfraspEpithet | WordType::AuthorWord => {}
                _ => continue,
            }
            let modified = normalize_by_type(&word.normalized, word.word_type);
            let word_id =
                gn_uuid(&format!("{}|{}", modified, word.word_type.id())).to_string();
            words.push(Word {
                id: word_id.clone(),
                normalized: word.normalized.clone(),
                modified,
                type_id: word.word_type.id(),
            });
            word_names.push(WordNameString {
                word_id,
                name_string_id: name_string_id.clone(),
                canonical_id: canonical_id.clone(),
            });
        }
    }
    (words, word_names)
}

async fn save_word_name_strings(pool: &PgPool, word_names: Vec<WordNameString>) -> Result<()> {
    let word_names = uniq_word_name_strings(word_names);
    if word_names.is_empty() {
        return Ok(());
    }
    let rows: Vec<Vec<CopyValue>> = word_names
        .iter()
        .map(|v| {
            vec![
                CopyValue::Text(v.word_id.clone()),
                CopyValue::Text(v.name_string_id.clone()),
                CopyValue::Text(v.canonical_id.clone()),
            ]
        })
        .collect();
    copy_rows(
        pool,
        "word_name_strings",
        &["word_id", "name_string_id", "canonical_id"],
        &rows,
    )
    .await?;
    Ok(())
}

async fn save_words(pool: &PgPool, words_map: HashMap<String, Word>) -> Result<()> {
    info!(words_num = words_map.len(), "saving words");
    let words: Vec<Word> = words_map.into_values().collect();
    for chunk in words.chunks(NAMES_BATCH) {
        let rows: Vec<Vec<CopyValue>> = chunk
            .iter()
            .map(|w| {
                vec![
                    CopyValue::Text(w.id.clone()),
                    CopyValue::Text(w.normalized.clone()),
                    CopyValue::Text(w.modified.clone()),
                    CopyValue::Int(w.type_id.into()),
                ]
            })
            .collect();
        copy_rows(
            pool,
            "words",
            &["id", "normalized", "modified", "type_id"],
            &rows,
        )
        .await?;
    }
    Ok(())
}

fn uniq_word_name_strings(word_names: Vec<WordNameString>) -> Vec<WordNameString> {
    let mut map: HashMap<String, WordNameString> = HashMap::with_capacity(word_names.len());
    for wn in word_names {
        map.insert(format!("{}|{}", wn.word_id, wn.name_string_id), wn);
    }
    map.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epithets_and_authors_extracted() {
        let parser = ScientificNameParser::with_details();
        let names = vec!["Morus alba var. tatarica Linnaeus".to_string()];
        let (words, word_names) = process_parsed_words(&parser, &names);

        let types: Vec<i32> = words.iter().map(|w| w.type_id).collect();
        assert_eq!(
            types,
            vec![
                WordType::SpEpithet.id(),
                WordType::InfraspEpithet.id(),
                WordType::AuthorWord.id(),
            ]
        );
        // Epithets get stemmed in the modified column.
        assert_eq!(words[0].normalized, "alba");
        assert_eq!(words[0].modified, "alb");
        assert_eq!(words[2].modified, "linnaeus");

        assert_eq!(word_names.len(), 3);
        let expected_canonical = gn_uuid("Morus alba tatarica").to_string();
        assert!(word_names.iter().all(|wn| wn.canonical_id == expected_canonical));
    }

    #[test]
    fn test_word_id_formula() {
        let parser = ScientificNameParser::with_details();
        let names = vec!["Morus alba".to_string()];
        let (words, _) = process_parsed_words(&parser, &names);
        let expected = gn_uuid(&format!("alb|{}", WordType::SpEpithet.id())).to_string();
        assert_eq!(words[0].id, expected);
    }

    #[test]
    fn test_surrogates_and_hybrids_skipped() {
        let parser = ScientificNameParser::with_details();
        let names = vec![
            "Aus cf. bus".to_string(),
            "Aus bus × cus".to_string(),
            "xx ??".to_string(),
        ];
        let (words, word_names) = process_parsed_words(&parser, &names);
        assert!(words.is_empty());
        assert!(word_names.is_empty());
    }

    #[test]
    fn test_uniq_word_name_strings() {
        let wn = WordNameString {
            word_id: "w1".to_string(),
            name_string_id: "n1".to_string(),
            canonical_id: "c1".to_string(),
        };
        let out = uniq_word_name_strings(vec![wn.clone(), wn.clone()]);
        assert_eq!(out.len(), 1);
    }
}
