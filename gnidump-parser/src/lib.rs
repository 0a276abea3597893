//! Scientific-name parsing for gnidump.
//!
//! Takes a raw name-string ("Homo sapiens Linnaeus 1758") and recovers its
//! canonical forms, cardinality, authorship year, quality and a set of
//! flags (virus, bacteria, surrogate, hybrid). In details mode it also
//! returns the classified words, which feed the `words` /
//! `word_name_strings` tables.
//!
//! # Example
//!
//! ```
//! use gnidump_parser::ScientificNameParser;
//!
//! let parser = ScientificNameParser::new();
//! let p = parser.parse("Homo sapiens Linnaeus 1758");
//! assert!(p.parsed);
//! assert_eq!(p.canonical.unwrap().simple, "Homo sapiens");
//! ```
//!
//! Parser instances are independent: each pipeline worker creates its own
//! and they run concurrently without sharing.

mod grammar;
mod lexer;
pub mod parsed;
mod stem;
mod vocab;

pub use parsed::{
    normalize_by_type, Authorship, Canonical, Hybrid, Parsed, ParsedWord, Surrogate, Tristate,
    WordType,
};
pub use stem::{stem_canonical, stem_word};

/// A configured parser. Cheap to construct; one per worker.
#[derive(Debug, Clone, Default)]
pub struct ScientificNameParser {
    details: bool,
}

impl ScientificNameParser {
    /// A parser that skips word decomposition.
    pub fn new() -> Self {
        Self { details: false }
    }

    /// A parser that also classifies every word of the name; needed for
    /// word extraction, slower per call.
    pub fn with_details() -> Self {
        Self { details: true }
    }

    /// Parses one name-string. Never fails: strings without recoverable
    /// structure come back with `parsed == false` and quality 0.
    pub fn parse(&self, name: &str) -> Parsed {
        grammar::parse_name(name, self.details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnidump_core::gn_uuid;

    #[test]
    fn test_happy_path_binomial() {
        let p = ScientificNameParser::new().parse("Homo sapiens Linnaeus 1758");
        assert!(p.parsed);
        assert_eq!(p.quality, 1);
        assert_eq!(p.cardinality, 2);
        assert!(!p.virus);
        assert!(p.bacteria.is_none());
        assert!(p.surrogate.is_none());

        let canonical = p.canonical.unwrap();
        assert_eq!(canonical.simple, "Homo sapiens");
        assert_eq!(canonical.full, "Homo sapiens");
        assert_eq!(canonical.stemmed, "Homo sapiens");

        let authorship = p.authorship.unwrap();
        assert_eq!(authorship.year, "1758");
        assert_eq!(authorship.verbatim, "Linnaeus 1758");
    }

    #[test]
    fn test_verbatim_id_is_uuid5_of_input() {
        let name = "Homo sapiens Linnaeus 1758";
        let p = ScientificNameParser::new().parse(name);
        assert_eq!(p.verbatim, name);
        assert_eq!(p.verbatim_id, gn_uuid(name).to_string());
    }

    #[test]
    fn test_unparseable() {
        let p = ScientificNameParser::new().parse("xx ??");
        assert!(!p.parsed);
        assert_eq!(p.quality, 0);
        assert_eq!(p.cardinality, 0);
        assert!(p.canonical.is_none());
    }

    #[test]
    fn test_hybrid_formula() {
        let p = ScientificNameParser::new().parse("Aus bus × cus");
        assert!(p.parsed);
        assert_eq!(p.hybrid, Some(Hybrid::Formula));
        assert_eq!(p.cardinality, 0);

        let canonical = p.canonical.unwrap();
        assert_eq!(canonical.simple, "Aus bus");
        assert_eq!(canonical.full, "Aus bus × cus");
    }

    #[test]
    fn test_named_hybrid() {
        let p = ScientificNameParser::new().parse("× Aus bus");
        assert!(p.parsed);
        assert_eq!(p.hybrid, Some(Hybrid::Named));
        assert_eq!(p.cardinality, 2);

        let canonical = p.canonical.unwrap();
        assert_eq!(canonical.simple, "Aus bus");
        assert_eq!(canonical.full, "× Aus bus");
    }

    #[test]
    fn test_uninomial() {
        let p = ScientificNameParser::new().parse("Poa");
        assert!(p.parsed);
        assert_eq!(p.cardinality, 1);
        assert_eq!(p.canonical.unwrap().simple, "Poa");
    }

    #[test]
    fn test_uninomial_with_author() {
        let p = ScientificNameParser::new().parse("Poa Linnaeus");
        assert!(p.parsed);
        assert_eq!(p.cardinality, 1);
        assert_eq!(p.canonical.unwrap().simple, "Poa");
        assert_eq!(p.authorship.unwrap().verbatim, "Linnaeus");
    }

    #[test]
    fn test_infraspecific_with_rank() {
        let p = ScientificNameParser::new().parse("Morus alba var. tatarica L.");
        assert!(p.parsed);
        assert_eq!(p.cardinality, 3);

        let canonical = p.canonical.unwrap();
        assert_eq!(canonical.simple, "Morus alba tatarica");
        assert_eq!(canonical.full, "Morus alba var. tatarica");
        assert_eq!(canonical.stemmed, "Morus alb tataric");
    }

    #[test]
    fn test_trinomial_without_rank() {
        let p = ScientificNameParser::new().parse("Aus bus cus");
        assert!(p.parsed);
        assert_eq!(p.cardinality, 3);

        let canonical = p.canonical.unwrap();
        assert_eq!(canonical.simple, "Aus bus cus");
        assert_eq!(canonical.full, "Aus bus cus");
    }

    #[test]
    fn test_parenthesized_basionym_year() {
        let p = ScientificNameParser::new().parse("Aus bus (Smith, 1900)");
        assert!(p.parsed);
        assert_eq!(p.authorship.unwrap().year, "(1900)");
    }

    #[test]
    fn test_year_with_suffix_lowers_quality() {
        let p = ScientificNameParser::new().parse("Aus bus Smith 1887b");
        assert!(p.parsed);
        assert_eq!(p.quality, 2);
        assert_eq!(p.authorship.unwrap().year, "1887b");
    }

    #[test]
    fn test_abbreviated_genus() {
        let p = ScientificNameParser::new().parse("M. alba");
        assert!(p.parsed);
        assert_eq!(p.cardinality, 2);
        assert_eq!(p.canonical.unwrap().simple, "M. alba");
    }

    #[test]
    fn test_virus() {
        let p = ScientificNameParser::new().parse("Tobacco mosaic virus");
        assert!(!p.parsed);
        assert!(p.virus);
        assert_eq!(p.quality, 0);
        assert!(p.canonical.is_none());
    }

    #[test]
    fn test_bacteria_yes() {
        let p = ScientificNameParser::new().parse("Escherichia coli");
        assert!(p.parsed);
        assert_eq!(p.bacteria, Some(Tristate::Yes));
    }

    #[test]
    fn test_bacteria_maybe_for_homonym_genus() {
        let p = ScientificNameParser::new().parse("Bacillus subtilis");
        assert_eq!(p.bacteria, Some(Tristate::Maybe));
    }

    #[test]
    fn test_approximation_surrogate() {
        let p = ScientificNameParser::new().parse("Aus sp.");
        assert!(p.parsed);
        assert_eq!(p.surrogate, Some(Surrogate::Approximation));
        assert_eq!(p.cardinality, 0);
        assert_eq!(p.quality, 3);
        assert_eq!(p.canonical.unwrap().simple, "Aus");
    }

    #[test]
    fn test_comparison_surrogate() {
        let p = ScientificNameParser::new().parse("Aus cf. bus");
        assert!(p.parsed);
        assert_eq!(p.surrogate, Some(Surrogate::Comparison));
        assert_eq!(p.quality, 3);
        assert_eq!(p.canonical.unwrap().simple, "Aus bus");
    }

    #[test]
    fn test_bold_surrogate() {
        let p = ScientificNameParser::new().parse("BOLD:ACE1234");
        assert!(!p.parsed);
        assert_eq!(p.surrogate, Some(Surrogate::Bold));
    }

    #[test]
    fn test_annotation_tail_cut() {
        let p = ScientificNameParser::new().parse("Homo sapiens sensu lato");
        assert!(p.parsed);
        assert_eq!(p.quality, 2);
        assert_eq!(p.canonical.unwrap().simple, "Homo sapiens");
    }

    #[test]
    fn test_dirty_whitespace_lowers_quality() {
        let p = ScientificNameParser::new().parse("Homo  sapiens");
        assert!(p.parsed);
        assert_eq!(p.quality, 2);
        assert_eq!(p.canonical.unwrap().simple, "Homo sapiens");
    }

    #[test]
    fn test_subgenus_skipped_in_canonical() {
        let p = ScientificNameParser::new().parse("Aus (Bus) cus");
        assert!(p.parsed);
        assert_eq!(p.cardinality, 2);
        assert_eq!(p.canonical.unwrap().simple, "Aus cus");
    }

    #[test]
    fn test_details_words() {
        let p = ScientificNameParser::with_details().parse("Morus alba var. tatarica L.");
        let types: Vec<WordType> = p.words.iter().map(|w| w.word_type).collect();
        assert_eq!(
            types,
            vec![
                WordType::Genus,
                WordType::SpEpithet,
                WordType::Rank,
                WordType::InfraspEpithet,
                WordType::AuthorWord,
            ]
        );
        assert_eq!(p.words[1].normalized, "alba");
        assert_eq!(p.words[3].normalized, "tatarica");
    }

    #[test]
    fn test_no_details_no_words() {
        let p = ScientificNameParser::new().parse("Morus alba L.");
        assert!(p.words.is_empty());
    }

    #[test]
    fn test_diacritics_folded_in_canonical() {
        let p = ScientificNameParser::new().parse("Isoëtes lacustris");
        assert_eq!(p.canonical.unwrap().simple, "Isoetes lacustris");
    }

    #[test]
    fn test_normalize_by_type() {
        assert_eq!(normalize_by_type("alba", WordType::SpEpithet), "alb");
        assert_eq!(normalize_by_type("Linnaeus", WordType::AuthorWord), "linnaeus");
    }
}
