//! Tokenizer for name-strings.
//!
//! Splits a whitespace-normalized string into classified tokens. The
//! classification is positional-agnostic; the grammar decides what a
//! capitalized word means from where it stands.

use std::sync::LazyLock;

use regex::Regex;

use crate::vocab;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(1[5-9]\d{2}|20[0-4]\d)([a-z]?)$").unwrap());

static CAP_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lu}[\p{Ll}\-]+$").unwrap());

static LOWER_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Ll}[\p{Ll}\-]*$").unwrap());

static ABBREV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Lu}[\p{Lu}\p{Ll}]*\.$").unwrap());

/// Token classes produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Capitalized Latin word: genus, uninomial or author surname.
    CapWord,
    /// Lowercase Latin word: epithet or author particle.
    LowerWord,
    /// Capitalized word ending in a period: abbreviated genus or author.
    Abbrev,
    /// Infraspecific rank marker.
    Rank,
    /// Approximation marker: sp., spp.
    Approx,
    /// Comparison marker: cf., aff.
    Comparison,
    /// Four-digit year, optional letter suffix.
    Year,
    /// Hybrid multiplication sign.
    HybridSign,
    /// "&", "et" — author conjunctions.
    And,
    /// "ex", "in" — authorship connectors.
    Link,
    ParenOpen,
    ParenClose,
    /// Anything unclassifiable.
    Garbage,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// The token was wrapped in parentheses somewhere around it.
    pub in_parens: bool,
}

/// Tokenizes a name-string. Parentheses and trailing commas are peeled off
/// into their own tokens; a `×` glued to the following word is split.
pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut depth: u32 = 0;

    for raw in input.split_whitespace() {
        let mut word = raw;

        while let Some(rest) = word.strip_prefix('(') {
            depth += 1;
            tokens.push(Token {
                kind: TokenKind::ParenOpen,
                text: "(".to_string(),
                in_parens: true,
            });
            word = rest;
        }
        if let Some(rest) = word.strip_prefix('×') {
            tokens.push(Token {
                kind: TokenKind::HybridSign,
                text: "×".to_string(),
                in_parens: depth > 0,
            });
            word = rest;
        }

        let mut closers = 0;
        let mut trimmed = word;
        loop {
            if let Some(rest) = trimmed.strip_suffix(',') {
                trimmed = rest;
            } else if let Some(rest) = trimmed.strip_suffix(')') {
                closers += 1;
                trimmed = rest;
            } else {
                break;
            }
        }

        if !trimmed.is_empty() {
            tokens.push(classify(trimmed, depth > 0));
        }
        for _ in 0..closers {
            depth = depth.saturating_sub(1);
            tokens.push(Token {
                kind: TokenKind::ParenClose,
                text: ")".to_string(),
                in_parens: depth > 0,
            });
        }
    }
    tokens
}

fn classify(word: &str, in_parens: bool) -> Token {
    let kind = match word {
        "×" | "x" | "X" => TokenKind::HybridSign,
        "&" | "et" => TokenKind::And,
        "ex" | "in" => TokenKind::Link,
        "sp." | "spp." | "sp" | "spp" => TokenKind::Approx,
        "cf." | "cf" | "aff." | "aff" => TokenKind::Comparison,
        _ if vocab::is_rank_marker(word) => TokenKind::Rank,
        _ if YEAR_RE.is_match(word) => TokenKind::Year,
        _ if ABBREV_RE.is_match(word) => TokenKind::Abbrev,
        _ if CAP_WORD_RE.is_match(word) => TokenKind::CapWord,
        _ if LOWER_WORD_RE.is_match(word) => TokenKind::LowerWord,
        _ => TokenKind::Garbage,
    };
    Token {
        kind,
        text: word.to_string(),
        in_parens,
    }
}

/// True when the year token carries a letter suffix ("1887b").
pub(crate) fn year_has_suffix(text: &str) -> bool {
    YEAR_RE
        .captures(text)
        .and_then(|c| c.get(2))
        .map(|m| !m.as_str().is_empty())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_binomial_with_author_year() {
        assert_eq!(
            kinds("Homo sapiens Linnaeus 1758"),
            vec![
                TokenKind::CapWord,
                TokenKind::LowerWord,
                TokenKind::CapWord,
                TokenKind::Year,
            ]
        );
    }

    #[test]
    fn test_parenthesized_authorship() {
        assert_eq!(
            kinds("Aus bus (Smith, 1900)"),
            vec![
                TokenKind::CapWord,
                TokenKind::LowerWord,
                TokenKind::ParenOpen,
                TokenKind::CapWord,
                TokenKind::Year,
                TokenKind::ParenClose,
            ]
        );
    }

    #[test]
    fn test_glued_hybrid_sign() {
        assert_eq!(
            kinds("×Aus bus"),
            vec![TokenKind::HybridSign, TokenKind::CapWord, TokenKind::LowerWord]
        );
    }

    #[test]
    fn test_rank_and_abbrev() {
        assert_eq!(
            kinds("M. alba var. tatarica L."),
            vec![
                TokenKind::Abbrev,
                TokenKind::LowerWord,
                TokenKind::Rank,
                TokenKind::LowerWord,
                TokenKind::Abbrev,
            ]
        );
    }

    #[test]
    fn test_year_suffix() {
        assert!(year_has_suffix("1887b"));
        assert!(!year_has_suffix("1887"));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(kinds("?? !!"), vec![TokenKind::Garbage, TokenKind::Garbage]);
    }
}
