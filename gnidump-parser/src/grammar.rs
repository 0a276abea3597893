//! Assembles classified tokens into a parsed name.
//!
//! The grammar is word-class driven: the first capitalized word is the
//! genus (or uninomial), lowercase Latin words after it are epithets, and
//! the first capitalized word after an epithet flips the machine into
//! authorship. Rank markers pull it back into epithet position.

use crate::lexer::{self, Token, TokenKind};
use crate::parsed::{Authorship, Canonical, Hybrid, Parsed, ParsedWord, Surrogate, WordType};
use crate::stem::{fold_to_ascii, stem_canonical};
use crate::vocab;

use gnidump_core::gn_uuid;

pub(crate) fn parse_name(input: &str, details: bool) -> Parsed {
    let verbatim = input.to_string();
    let normalized = normalize_whitespace(input);
    let dirty_ws = normalized != input;

    if normalized.is_empty() {
        return Parsed::unparsed(verbatim);
    }

    // Viruses and barcode surrogates are recognized before any grammar runs;
    // neither has taxonomic structure to recover.
    if is_virus(&normalized) {
        let mut p = Parsed::unparsed(verbatim);
        p.virus = true;
        return p;
    }
    if normalized.contains("BOLD:") {
        let mut p = Parsed::unparsed(verbatim);
        p.surrogate = Some(Surrogate::Bold);
        return p;
    }

    let mut tokens = lexer::tokenize(&normalized);
    let mut quality = 1;
    if dirty_ws {
        quality = quality.max(2);
    }
    if cut_annotation(&mut tokens) {
        quality = quality.max(2);
    }
    if tokens.is_empty() {
        return Parsed::unparsed(verbatim);
    }

    // Leading sign: a named hybrid taxon. A sign later on: a cross formula.
    let mut hybrid = None;
    if tokens[0].kind == TokenKind::HybridSign {
        hybrid = Some(Hybrid::Named);
        tokens.remove(0);
    }
    if let Some(split) = tokens.iter().position(|t| t.kind == TokenKind::HybridSign) {
        return parse_formula(verbatim, tokens, split, quality);
    }

    let core = match parse_core(&tokens) {
        Some(core) => core,
        None => return Parsed::unparsed(verbatim),
    };
    let quality = quality.max(core.quality);

    let simple = core.simple();
    let full = match hybrid {
        Some(Hybrid::Named) => format!("× {}", core.full()),
        _ => core.full(),
    };
    let stemmed = stem_canonical(&simple);
    let cardinality = if core.approx {
        0
    } else {
        1 + core.epithets.len() as i32
    };

    let mut p = Parsed {
        parsed: true,
        verbatim_id: gn_uuid(&verbatim).to_string(),
        verbatim,
        canonical: Some(Canonical {
            simple,
            full,
            stemmed,
        }),
        cardinality,
        virus: false,
        bacteria: vocab::bacterial_genus(&core.genus),
        surrogate: core.surrogate,
        hybrid,
        authorship: core.authorship(),
        quality,
        words: Vec::new(),
    };
    if details {
        p.words = core.words(cardinality);
    }
    p
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_virus(s: &str) -> bool {
    s.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(vocab::is_virus_word)
}

/// Truncates the token stream at the first top-level annotation marker
/// ("sensu", "non", "auct.", …). Returns true when something was cut.
fn cut_annotation(tokens: &mut Vec<Token>) -> bool {
    let cut = tokens.iter().position(|t| {
        !t.in_parens
            && matches!(t.kind, TokenKind::LowerWord | TokenKind::Garbage | TokenKind::Abbrev)
            && vocab::is_annotation_marker(&t.text)
    });
    match cut {
        Some(0) | None => false,
        Some(i) => {
            tokens.truncate(i);
            true
        }
    }
}

/// A hybrid formula: parse the left operand for the simple canonical and
/// keep the whole formula as the full canonical.
fn parse_formula(verbatim: String, tokens: Vec<Token>, split: usize, quality: i32) -> Parsed {
    let left = match parse_core(&tokens[..split]) {
        Some(core) => core,
        None => return Parsed::unparsed(verbatim),
    };

    let right: Vec<String> = tokens[split + 1..]
        .iter()
        .filter(|t| {
            matches!(
                t.kind,
                TokenKind::CapWord | TokenKind::LowerWord | TokenKind::Abbrev | TokenKind::Rank
            )
        })
        .map(|t| fold_to_ascii(&t.text))
        .collect();

    let simple = left.simple();
    let mut full = format!("{} ×", left.full());
    if !right.is_empty() {
        full.push(' ');
        full.push_str(&right.join(" "));
    }
    let stemmed = stem_canonical(&simple);

    Parsed {
        parsed: true,
        verbatim_id: gn_uuid(&verbatim).to_string(),
        verbatim,
        canonical: Some(Canonical {
            simple,
            full,
            stemmed,
        }),
        // A formula describes a cross, not a name; it has no cardinality.
        cardinality: 0,
        virus: false,
        bacteria: vocab::bacterial_genus(&left.genus),
        surrogate: left.surrogate,
        hybrid: Some(Hybrid::Formula),
        authorship: left.authorship(),
        quality: quality.max(left.quality).max(2),
        words: Vec::new(),
    }
}

/// An epithet with the rank marker that introduced it, if any.
struct Epithet {
    text: String,
    rank: Option<String>,
}

/// The pieces of a successfully parsed (non-formula) name.
struct CoreName {
    genus: String,
    epithets: Vec<Epithet>,
    author_words: Vec<String>,
    author_verbatim: Vec<String>,
    year: Option<String>,
    year_token: Option<String>,
    surrogate: Option<Surrogate>,
    approx: bool,
    quality: i32,
}

impl CoreName {
    fn simple(&self) -> String {
        let mut out = self.genus.clone();
        for e in &self.epithets {
            out.push(' ');
            out.push_str(&e.text);
        }
        out
    }

    fn full(&self) -> String {
        let mut out = self.genus.clone();
        for e in &self.epithets {
            out.push(' ');
            if let Some(rank) = &e.rank {
                out.push_str(rank);
                out.push(' ');
            }
            out.push_str(&e.text);
        }
        out
    }

    fn authorship(&self) -> Option<Authorship> {
        if self.author_verbatim.is_empty() && self.year.is_none() {
            return None;
        }
        Some(Authorship {
            verbatim: self.author_verbatim.join(" "),
            year: self.year.clone().unwrap_or_default(),
        })
    }

    fn words(&self, cardinality: i32) -> Vec<ParsedWord> {
        let mut words = Vec::new();
        let genus_type = if cardinality == 1 {
            WordType::Uninomial
        } else {
            WordType::Genus
        };
        words.push(ParsedWord {
            word_type: genus_type,
            verbatim: self.genus.clone(),
            normalized: self.genus.clone(),
        });
        for (i, e) in self.epithets.iter().enumerate() {
            if let Some(rank) = &e.rank {
                words.push(ParsedWord {
                    word_type: WordType::Rank,
                    verbatim: rank.clone(),
                    normalized: rank.clone(),
                });
            }
            let word_type = if i == 0 {
                WordType::SpEpithet
            } else {
                WordType::InfraspEpithet
            };
            words.push(ParsedWord {
                word_type,
                verbatim: e.text.clone(),
                normalized: e.text.clone(),
            });
        }
        for a in &self.author_words {
            words.push(ParsedWord {
                word_type: WordType::AuthorWord,
                verbatim: a.clone(),
                normalized: a.clone(),
            });
        }
        if let Some(year) = &self.year_token {
            words.push(ParsedWord {
                word_type: WordType::Year,
                verbatim: year.clone(),
                normalized: year.clone(),
            });
        }
        words
    }
}

enum State {
    Begin,
    AfterGenus,
    Authorship,
}

fn parse_core(tokens: &[Token]) -> Option<CoreName> {
    let mut state = State::Begin;
    let mut core = CoreName {
        genus: String::new(),
        epithets: Vec::new(),
        author_words: Vec::new(),
        author_verbatim: Vec::new(),
        year: None,
        year_token: None,
        surrogate: None,
        approx: false,
        quality: 1,
    };
    let mut pending_rank: Option<String> = None;

    let mut i = 0;
    while i < tokens.len() {
        let t = &tokens[i];
        match state {
            State::Begin => match t.kind {
                TokenKind::CapWord | TokenKind::Abbrev => {
                    core.genus = fold_to_ascii(&t.text);
                    state = State::AfterGenus;
                }
                _ => return None,
            },
            State::AfterGenus => match t.kind {
                TokenKind::LowerWord => {
                    if vocab::is_author_particle(&t.text) {
                        state = State::Authorship;
                        continue;
                    }
                    core.epithets.push(Epithet {
                        text: fold_to_ascii(&t.text).to_lowercase(),
                        rank: pending_rank.take(),
                    });
                }
                TokenKind::Rank => {
                    pending_rank = Some(normalize_rank(&t.text));
                }
                TokenKind::Approx => {
                    core.approx = true;
                    core.surrogate = Some(Surrogate::Approximation);
                    core.quality = 3;
                    break;
                }
                TokenKind::Comparison => {
                    core.surrogate = Some(Surrogate::Comparison);
                    core.quality = 3;
                }
                TokenKind::ParenOpen => {
                    // "(Subgen)" between genus and epithet is an
                    // infrageneric name; it never reaches the canonicals.
                    // Anything else parenthesized here is authorship.
                    if let Some(close) = subgenus_span(tokens, i) {
                        i = close;
                    } else {
                        state = State::Authorship;
                        continue;
                    }
                }
                TokenKind::CapWord | TokenKind::Abbrev | TokenKind::Year | TokenKind::And
                | TokenKind::Link => {
                    state = State::Authorship;
                    continue;
                }
                TokenKind::Garbage | TokenKind::ParenClose => {
                    core.quality = 3;
                }
                TokenKind::HybridSign => return None,
            },
            State::Authorship => match t.kind {
                TokenKind::CapWord | TokenKind::Abbrev => {
                    let word = fold_to_ascii(&t.text);
                    core.author_words.push(word);
                    core.author_verbatim.push(t.text.clone());
                }
                TokenKind::LowerWord => {
                    if vocab::is_author_particle(&t.text) {
                        core.author_words.push(t.text.clone());
                        core.author_verbatim.push(t.text.clone());
                    } else {
                        core.quality = 3;
                    }
                }
                TokenKind::Year => {
                    if core.year.is_none() {
                        core.year_token = Some(t.text.clone());
                        core.year = Some(if t.in_parens {
                            format!("({})", t.text)
                        } else {
                            t.text.clone()
                        });
                        core.author_verbatim.push(t.text.clone());
                        if lexer::year_has_suffix(&t.text) {
                            core.quality = core.quality.max(2);
                        }
                    }
                }
                TokenKind::Rank => {
                    pending_rank = Some(normalize_rank(&t.text));
                    state = State::AfterGenus;
                }
                TokenKind::Approx => {
                    core.approx = true;
                    core.surrogate = Some(Surrogate::Approximation);
                    core.quality = 3;
                    break;
                }
                TokenKind::And | TokenKind::Link => {
                    core.author_verbatim.push(t.text.clone());
                }
                TokenKind::ParenOpen | TokenKind::ParenClose | TokenKind::Comparison => {}
                TokenKind::Garbage => {
                    core.quality = 3;
                }
                TokenKind::HybridSign => return None,
            },
        }
        i += 1;
    }

    if core.genus.is_empty() {
        return None;
    }
    // An abbreviation alone ("L.") is an author, not a name.
    if core.epithets.is_empty() && core.genus.ends_with('.') {
        return None;
    }
    Some(core)
}

/// Recognizes `( CapWord )` directly after the genus, followed by an
/// epithet. Returns the index of the closing paren.
fn subgenus_span(tokens: &[Token], open: usize) -> Option<usize> {
    if tokens.len() < open + 4 {
        return None;
    }
    if tokens[open + 1].kind == TokenKind::CapWord
        && tokens[open + 2].kind == TokenKind::ParenClose
        && tokens[open + 3].kind == TokenKind::LowerWord
    {
        return Some(open + 2);
    }
    None
}

fn normalize_rank(marker: &str) -> String {
    let with_dot = if marker.ends_with('.') {
        marker.to_string()
    } else {
        format!("{marker}.")
    };
    match with_dot.as_str() {
        "ssp." => "subsp.".to_string(),
        "fo." | "forma." => "f.".to_string(),
        _ => with_dot,
    }
}
