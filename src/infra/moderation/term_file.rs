// Loads explicit terms from a plain-text file, one term per line.
//
// Format:
// - surrounding whitespace is trimmed
// - blank lines and lines starting with `#` are skipped
// - terms are kept exactly as written (no lowercasing)

use anyhow::{Context, Result};
use std::path::Path;

/// Parse terms out of file contents.
pub fn parse_terms(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated list such as the `EXPLICIT_TERMS` env var.
pub fn parse_term_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read terms from `path`. A missing file is an error.
pub fn load_terms(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read term file {}", path.display()))?;
    Ok(parse_terms(&contents))
}

/// Read terms from `path` if it exists, otherwise return an empty list.
pub fn load_terms_if_present(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_terms(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let terms = parse_terms("# banned words\nbadword\n\n   spaced   \n#ignored\nBadWord\n");

        assert_eq!(terms, vec!["badword", "spaced", "BadWord"]);
    }

    #[test]
    fn test_parse_term_list() {
        assert_eq!(parse_term_list(" scam , , phish,"), vec!["scam", "phish"]);
        assert!(parse_term_list("").is_empty());
    }

    #[test]
    fn test_load_terms_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "second").unwrap();

        let terms = load_terms(file.path()).unwrap();

        assert_eq!(terms, vec!["first", "second"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        assert!(load_terms(&missing).is_err());
        assert!(load_terms_if_present(&missing).unwrap().is_empty());
    }
}
