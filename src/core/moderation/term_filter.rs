// Explicit-term filter - substring screen against a caller-owned term list.
//
// The term set is shared behind an Arc and guarded by an RwLock so the chat
// layer can add terms while messages are being screened.
//
// Matching rule: the INPUT is lowercased, the stored terms are NOT. A term
// stored as "BadWord" therefore never matches anything, since lowercased text
// cannot contain upper-case letters. Keep this asymmetry unless the intended
// semantics change; there is a regression test for it below.

use std::sync::{PoisonError, RwLock};

/// Append-only list of explicit terms.
#[derive(Debug, Default)]
pub struct ExplicitTermSet {
    terms: RwLock<Vec<String>>,
}

impl ExplicitTermSet {
    /// Create an empty term set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a term set seeded with the given terms, in order.
    #[cfg(test)]
    pub fn with_terms<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let set = Self::new();
        set.add_terms(terms);
        set
    }

    /// Append one term as given. Duplicates are kept.
    pub fn add_term(&self, term: impl Into<String>) {
        self.terms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(term.into());
    }

    /// Append several terms in order. Same as calling `add_term` for each.
    pub fn add_terms<I, T>(&self, terms: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut guard = self.terms.write().unwrap_or_else(PoisonError::into_inner);
        guard.extend(terms.into_iter().map(Into::into));
    }

    /// Returns true if any stored term is a substring of the lowercased text.
    ///
    /// Stops at the first match. An empty set never matches.
    pub fn contains_explicit_content(&self, text: &str) -> bool {
        let text_lower = lowercase_per_char(text);
        let terms = self.terms.read().unwrap_or_else(PoisonError::into_inner);
        terms.iter().any(|term| text_lower.contains(term.as_str()))
    }

    /// Number of stored terms, duplicates included.
    pub fn len(&self) -> usize {
        self.terms.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current terms in insertion order.
    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<String> {
        self.terms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Lowercase one character at a time, keeping a single character per input
/// character. Unlike `str::to_lowercase` there is no final-sigma context rule
/// and `İ` maps to plain `i`.
fn lowercase_per_char(text: &str) -> String {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_set_never_matches() {
        let terms = ExplicitTermSet::new();

        assert!(terms.is_empty());
        assert!(!terms.contains_explicit_content(""));
        assert!(!terms.contains_explicit_content("anything at all"));
    }

    #[test]
    fn test_input_is_lowercased() {
        let terms = ExplicitTermSet::new();
        terms.add_term("badword");

        assert!(terms.contains_explicit_content("This is BADWORD here"));
        assert!(terms.contains_explicit_content("prefixbadwordsuffix"));
        assert!(!terms.contains_explicit_content("bad word"));
    }

    #[test]
    fn test_input_lowercased_char_by_char() {
        let terms = ExplicitTermSet::with_terms(["οδοσ", "istanbul"]);

        // Trailing capital sigma lowers to σ, not the final form ς
        assert!(terms.contains_explicit_content("ΟΔΟΣ"));
        // Dotted capital I lowers to a plain i with no combining dot
        assert!(terms.contains_explicit_content("İSTANBUL"));
        assert_eq!(lowercase_per_char("İSTANBUL ΟΔΟΣ"), "istanbul οδοσ");
    }

    #[test]
    fn test_stored_terms_are_not_lowercased() {
        // Regression: mixed-case terms are stored verbatim and cannot match
        // lowercased input.
        let terms = ExplicitTermSet::new();
        terms.add_term("BadWord");

        assert!(!terms.contains_explicit_content("this is badword"));
        assert!(!terms.contains_explicit_content("this is BadWord"));
    }

    #[test]
    fn test_duplicate_terms_match_the_same() {
        let once = ExplicitTermSet::new();
        once.add_term("spam");

        let twice = ExplicitTermSet::new();
        twice.add_term("spam");
        twice.add_term("spam");

        assert_eq!(twice.len(), 2);
        for text in ["spam", "SPAMMER", "ham", ""] {
            assert_eq!(
                once.contains_explicit_content(text),
                twice.contains_explicit_content(text),
                "mismatch for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_add_terms_preserves_order() {
        let terms = ExplicitTermSet::new();
        terms.add_term("first");
        terms.add_terms(vec!["second", "third"]);

        assert_eq!(terms.snapshot(), vec!["first", "second", "third"]);
        assert!(terms.contains_explicit_content("THIRD place"));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let terms = ExplicitTermSet::with_terms([""]);

        assert!(terms.contains_explicit_content(""));
        assert!(terms.contains_explicit_content("hello"));
    }

    #[test]
    fn test_shared_across_threads() {
        let terms = Arc::new(ExplicitTermSet::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let terms = Arc::clone(&terms);
                std::thread::spawn(move || terms.add_term(format!("term{}", i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(terms.len(), 4);
        assert!(terms.contains_explicit_content("contains TERM3 somewhere"));
    }
}
