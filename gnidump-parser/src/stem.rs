//! Latin stemming for canonical forms.
//!
//! A Schinke-style noun stemmer: strip the enclitic `-que`, then the longest
//! matching noun/adjective suffix, keeping at least two characters of stem.
//! Genus words are never stemmed; only epithets go through here.

/// Noun suffixes, longest first so the longest match wins.
const NOUN_SUFFIXES: &[&str] = &[
    "ibus", "ius", "ae", "am", "as", "em", "es", "ia", "is", "nt", "os", "ud", "um", "us", "a",
    "e", "i", "o", "u",
];

/// Words ending in `-que` that are complete words rather than enclitics.
const QUE_WORDS: &[&str] = &[
    "atque", "quoque", "neque", "itaque", "absque", "apsque", "abusque", "adaeque", "adusque",
    "denique", "deque", "susque", "oblique", "peraeque", "plenisque", "quandoque", "quisque",
    "quaeque", "cuiusque", "cuique", "quemque", "quamque", "quaque", "quique", "quorumque",
    "quarumque", "quibusque", "quosque", "quasque", "quotusquisque", "usque", "ubique",
    "undique", "utique", "utroque", "utribique", "torque", "coque", "concoque", "contorque",
    "detorque", "decoque", "excoque", "extorque", "obtorque", "optorque", "retorque", "recoque",
    "attorque", "incoque", "intorque", "praetorque",
];

/// Stems one lowercase Latin word.
pub fn stem_word(word: &str) -> String {
    let mut w = word;
    if w.ends_with("que") {
        if QUE_WORDS.contains(&w) {
            return w.to_string();
        }
        w = &w[..w.len() - 3];
    }
    for suffix in NOUN_SUFFIXES {
        if let Some(stripped) = w.strip_suffix(suffix) {
            if stripped.chars().count() >= 2 {
                return stripped.to_string();
            }
            break;
        }
    }
    w.to_string()
}

/// Stems the epithets of a simple canonical form, keeping the first word
/// (uninomial or genus) intact.
pub fn stem_canonical(simple: &str) -> String {
    let mut out = String::with_capacity(simple.len());
    for (i, word) in simple.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&stem_word(word));
        }
    }
    out
}

/// Folds Latin-1 and combining diacritics into plain ASCII; scientific
/// names are matched byte-exactly downstream.
pub fn fold_to_ascii(word: &str) -> String {
    word.chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'í' | 'ì' | 'î' | 'ï' => Some('i'),
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => Some('o'),
            'ú' | 'ù' | 'û' | 'ü' => Some('u'),
            'ý' | 'ÿ' => Some('y'),
            'ñ' => Some('n'),
            'ç' => Some('c'),
            'æ' => Some('e'),
            'œ' => Some('e'),
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => Some('A'),
            'É' | 'È' | 'Ê' | 'Ë' => Some('E'),
            'Í' | 'Ì' | 'Î' | 'Ï' => Some('I'),
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' => Some('O'),
            'Ú' | 'Ù' | 'Û' | 'Ü' => Some('U'),
            'Ñ' => Some('N'),
            'Ç' => Some('C'),
            '\u{0300}'..='\u{036f}' => None,
            _ => Some(c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_common_endings() {
        assert_eq!(stem_word("alba"), "alb");
        assert_eq!(stem_word("albus"), "alb");
        assert_eq!(stem_word("album"), "alb");
        assert_eq!(stem_word("officinalis"), "officinal");
        assert_eq!(stem_word("vulgaris"), "vulgar");
    }

    #[test]
    fn test_stem_keeps_short_stems() {
        // Stripping would leave fewer than two characters.
        assert_eq!(stem_word("sus"), "sus");
        assert_eq!(stem_word("bos"), "bos");
    }

    #[test]
    fn test_stem_no_matching_suffix() {
        assert_eq!(stem_word("sapiens"), "sapiens");
    }

    #[test]
    fn test_que_enclitic() {
        assert_eq!(stem_word("filiisque"), "fili");
        // Complete -que words stay whole.
        assert_eq!(stem_word("atque"), "atque");
    }

    #[test]
    fn test_stem_canonical_keeps_genus() {
        assert_eq!(stem_canonical("Morus alba"), "Morus alb");
        assert_eq!(stem_canonical("Homo sapiens"), "Homo sapiens");
        assert_eq!(stem_canonical("Poa"), "Poa");
    }

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(fold_to_ascii("Isoëtes"), "Isoetes");
        assert_eq!(fold_to_ascii("muñozii"), "munozii");
        assert_eq!(fold_to_ascii("sapiens"), "sapiens");
    }
}
