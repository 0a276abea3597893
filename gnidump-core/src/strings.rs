//! Small string helpers shared by the CSV import pipelines.

/// Truncates a title to 45 characters if necessary.
pub fn short_title(title: &str) -> String {
    if title.chars().count() < 45 {
        return title.to_string();
    }
    let head: String = title.chars().take(41).collect();
    format!("{head}...")
}

/// Removes NUL bytes; they show up in a handful of dumped name-strings and
/// PostgreSQL rejects them in text columns.
pub fn scrub_nul(s: &str) -> String {
    if s.contains('\u{0}') {
        s.replace('\u{0}', "")
    } else {
        s.to_string()
    }
}

/// Collapses a value to a single line; URL fields in the dump occasionally
/// carry embedded newlines.
pub fn scrub_one_line(s: &str) -> String {
    if s.contains(['\n', '\r']) {
        s.replace(['\n', '\r'], "")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_passthrough() {
        assert_eq!(short_title("Catalogue of Life"), "Catalogue of Life");
    }

    #[test]
    fn test_short_title_truncates() {
        let long = "The Interim Register of Marine and Nonmarine Genera";
        let short = short_title(long);
        assert_eq!(short.chars().count(), 44);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_scrub_nul() {
        assert_eq!(scrub_nul("Homo\u{0} sapiens"), "Homo sapiens");
        assert_eq!(scrub_nul("Homo sapiens"), "Homo sapiens");
    }

    #[test]
    fn test_scrub_one_line() {
        assert_eq!(scrub_one_line("https://a.b/\nc"), "https://a.b/c");
    }
}
