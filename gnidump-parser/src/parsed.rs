//! Parse results.
//!
//! [`Parsed`] is the stable contract between the parser and the build
//! pipelines. Everything downstream — canonical tables, the scratch KV
//! store, word extraction — works from this struct alone.

use gnidump_core::gn_uuid;

/// Outcome of parsing one name-string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    /// False when no taxonomic structure could be recovered.
    pub parsed: bool,
    /// The input, whitespace-normalized.
    pub verbatim: String,
    /// UUID v5 of `verbatim`, as a string.
    pub verbatim_id: String,
    /// Canonical forms; meaningful only when `parsed` is true.
    pub canonical: Option<Canonical>,
    /// Number of name parts; 0 when not classifiable.
    pub cardinality: i32,
    /// The string looks like a virus (or phage, viroid, …) name.
    pub virus: bool,
    /// Attribution to the bacterial code.
    pub bacteria: Option<Tristate>,
    /// Present when the string is a surrogate rather than a real name.
    pub surrogate: Option<Surrogate>,
    /// Present when the string is a hybrid sign construct.
    pub hybrid: Option<Hybrid>,
    /// Authorship of the terminal epithet, if detected.
    pub authorship: Option<Authorship>,
    /// 0 no parse, 1 clean, 2 minor problems, 3 heavy problems.
    pub quality: i32,
    /// Word decomposition; populated only in details mode.
    pub words: Vec<ParsedWord>,
}

impl Parsed {
    /// An unparsed result for the given verbatim string.
    pub(crate) fn unparsed(verbatim: String) -> Self {
        Parsed {
            verbatim_id: gn_uuid(&verbatim).to_string(),
            verbatim,
            ..Default::default()
        }
    }
}

/// The three canonical renditions of a parsed name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canonical {
    /// Genus-species-etc. portion, no ranks, no hybrid signs.
    pub simple: String,
    /// As `simple` but with infraspecific rank markers and hybrid signs.
    pub full: String,
    /// As `simple` with each epithet reduced to its Latin stem.
    pub stemmed: String,
}

/// Authorship of the terminal epithet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Authorship {
    /// Authorship substring as encountered.
    pub verbatim: String,
    /// Year token, possibly parenthesized, possibly with a non-digit
    /// suffix ("(1758)", "1887b"). Empty when no year was found.
    pub year: String,
}

/// Three-valued flag for bacterial-code attribution: some genus names are
/// homonyms across codes and can only be "maybe".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tristate {
    Yes,
    Maybe,
}

impl Tristate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tristate::Yes => "yes",
            Tristate::Maybe => "maybe",
        }
    }
}

/// Kinds of surrogate strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surrogate {
    /// "Aus sp." and friends.
    Approximation,
    /// "Aus cf. bus", "Aus aff. bus".
    Comparison,
    /// Barcode-of-Life bin codes.
    Bold,
}

/// Kinds of hybrid constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hybrid {
    /// "× Aus bus": an established hybrid taxon.
    Named,
    /// "Aus bus × Aus cus": a cross formula, not a name.
    Formula,
}

/// Classified word within a name-string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWord {
    pub word_type: WordType,
    /// The word as written.
    pub verbatim: String,
    /// Normalized spelling (diacritics folded).
    pub normalized: String,
}

/// Word classes. The discriminants are persisted in `words.type_id`; they
/// must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum WordType {
    Unknown = 0,
    Uninomial = 1,
    Genus = 2,
    SpEpithet = 4,
    InfraspEpithet = 5,
    Rank = 6,
    AuthorWord = 7,
    Year = 8,
}

impl WordType {
    pub fn id(&self) -> i32 {
        *self as i32
    }
}

/// Type-specific heavy normalization, used for the `words.modified` column:
/// epithets are stemmed so lookups tolerate Latin inflection, author words
/// are lowercased.
pub fn normalize_by_type(normalized: &str, word_type: WordType) -> String {
    match word_type {
        WordType::SpEpithet | WordType::InfraspEpithet => {
            crate::stem::stem_word(&normalized.to_lowercase())
        }
        WordType::AuthorWord => normalized.to_lowercase(),
        _ => normalized.to_lowercase(),
    }
}
