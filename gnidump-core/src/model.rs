//! Row models for the target schema.
//!
//! Ids are UUID v5 strings computed in the GlobalNames namespace (see
//! [`crate::gn_uuid`]); text columns that carry names or ids are declared
//! with C collation in the schema so comparisons stay byte-exact. The three
//! canonical tables are plain `(id, name)` pairs and are written from the
//! import pipelines directly.

use chrono::{DateTime, Utc};

/// A scientific name-string exactly as a data source supplied it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameString {
    /// UUID v5 of `name`.
    pub id: String,
    /// The verbatim name-string, NUL bytes stripped.
    pub name: String,
    /// Publication year recovered from the authorship, if any.
    pub year: Option<i16>,
    /// Number of name parts: 1 uninomial, 2 binomial, 3 trinomial;
    /// unparsed names have no cardinality.
    pub cardinality: Option<i32>,
    /// UUID v5 of the simple canonical form.
    pub canonical_id: Option<String>,
    /// UUID v5 of the full canonical form; set only when the full form
    /// differs from the simple one.
    pub canonical_full_id: Option<String>,
    /// UUID v5 of the stemmed canonical; absent for cardinality 0 and for
    /// abbreviated canonicals.
    pub canonical_stem_id: Option<String>,
    /// The string looks like a virus name.
    pub virus: bool,
    /// The parser attributes the name to the bacterial code.
    pub bacteria: bool,
    /// The string is a surrogate (specimen code, approximate name, etc.),
    /// not a real taxonomic name.
    pub surrogate: bool,
    /// 0 no parse, 1 clean, 2 minor problems, 3 heavy problems.
    pub parse_quality: i32,
}

/// Association between a name-string and a record of a data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameStringIndex {
    pub data_source_id: i32,
    /// UUID v5 of the verbatim name-string.
    pub name_string_id: String,
    /// Record id within the data source.
    pub record_id: String,
    /// Id used to build an outlink URL for the record, when the source
    /// supports outlinks.
    pub outlink_id: String,
    pub global_id: String,
    pub local_id: String,
    /// Nomenclatural code: 0 none, 1 ICZN, 2 ICN, 3 ICNP, 4 ICTV.
    pub code_id: i32,
    pub rank: String,
    /// Record id of the currently accepted name within the same source.
    pub accepted_record_id: String,
    /// Pipe-delimited classification path.
    pub classification: String,
    /// Record ids of the classification elements.
    pub classification_ids: String,
    /// Ranks of the classification elements.
    pub classification_ranks: String,
}

/// A vernacular (common) name-string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VernacularString {
    /// UUID v5 of `name`.
    pub id: String,
    pub name: String,
}

/// Association between a vernacular string and a record of a data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VernacularStringIndex {
    pub data_source_id: i32,
    pub vernacular_string_id: String,
    pub record_id: String,
    /// Language as supplied by the source.
    pub language: String,
    /// Lowercase three-letter ISO 639-3 code, or empty when the language
    /// could not be recognized.
    pub lang_code: String,
    pub locality: String,
    pub country_code: String,
}

/// Curated metadata describing a data source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSource {
    /// Historic numeric id carried over from earlier resolver versions.
    pub id: i32,
    pub uuid: String,
    pub title: String,
    pub title_short: String,
    pub version: String,
    pub revision_date: String,
    pub doi: String,
    pub citation: String,
    pub authors: String,
    pub description: String,
    pub website_url: String,
    pub data_url: String,
    /// Template with a `{}` placeholder for an outlink id.
    pub outlink_url: String,
    pub is_outlink_ready: bool,
    pub is_curated: bool,
    pub is_auto_curated: bool,
    pub has_taxon_data: bool,
    pub record_count: i32,
    pub updated_at: DateTime<Utc>,
}

/// A word extracted from a parsed name-string.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// UUID v5 of `"<modified>|<type_id>"`.
    pub id: String,
    /// Normalized spelling, used for sorting.
    pub normalized: String,
    /// Heavily normalized spelling, used for matching.
    pub modified: String,
    pub type_id: i32,
}

/// The occurrence of a word in a name-string.
#[derive(Debug, Clone, PartialEq)]
pub struct WordNameString {
    pub word_id: String,
    pub name_string_id: String,
    pub canonical_id: String,
}
