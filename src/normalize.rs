//! Alternate textual forms of noisy artist/title strings.
//!
//! A [`Term`] wraps the raw text supplied by an ingestion source and knows
//! a handful of cheap rewrites (drop parentheticals, drop featured artists,
//! de-punctuate). Comparing a catalog value against a term succeeds when the
//! value fuzzy-equals any of those forms.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::similarity::fuzzy_equal;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Parenthesized text, non-greedy, no nesting: "Song (Remix)" → "Song "
pub static PAREN_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Featured-artist suffix from a marker to end of line:
/// "Artist feat. Other" → "Artist", "A & B" → "A"
pub static FEATURE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" (?:&|Feat\.|feat\.) .*").unwrap());

/// Characters replaced by a space in the de-punctuated form ("Wakey Wakey!")
const STRIPPED_PUNCTUATION: char = '!';

// ============================================================================
// TERM
// ============================================================================

/// Raw artist or title text that can produce alternate forms of itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term {
    raw: String,
}

impl Term {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Alternate forms, original first. Never empty; duplicates are kept.
    pub fn forms(&self) -> Vec<String> {
        vec![
            self.raw.clone(),
            PAREN_TEXT.replace_all(&self.raw, "").into_owned(),
            FEATURE_SUFFIX.replace_all(&self.raw, "").into_owned(),
            self.raw.replace(STRIPPED_PUNCTUATION, " "),
        ]
    }

    /// True if `other` fuzzy-equals any form of this term.
    pub fn matches(&self, other: &str) -> bool {
        self.forms().iter().any(|form| fuzzy_equal(other, form))
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::new(s)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Free-function form of [`Term::matches`].
pub fn term_equals(term: &Term, other: &str) -> bool {
    term.matches(other)
}

/// Pair artist and title forms index-for-index (not a cross product) and
/// drop repeated pairs, keeping first-seen order.
pub fn form_pairs(artist: &Term, title: &Term) -> Vec<(String, String)> {
    let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
    artist
        .forms()
        .into_iter()
        .zip(title.forms())
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_is_first_form() {
        for raw in ["", "Song", "Song (Remix)", "A feat. B", "Hey!"] {
            assert_eq!(Term::new(raw).forms()[0], raw);
        }
    }

    #[test]
    fn test_forms_always_four() {
        assert_eq!(Term::new("").forms().len(), 4);
        assert_eq!(Term::new("Plain").forms(), vec!["Plain"; 4]);
    }

    #[test]
    fn test_paren_stripped_with_trailing_space() {
        let forms = Term::new("Song (Remix)").forms();
        assert_eq!(forms[0], "Song (Remix)");
        assert_eq!(forms[1], "Song ");
    }

    #[test]
    fn test_all_parentheticals_removed() {
        let forms = Term::new("Song (Live) (2011 Remaster)").forms();
        assert_eq!(forms[1], "Song  ");
    }

    #[test]
    fn test_nested_parens_not_supported() {
        // non-greedy up to the first ')' leaves the outer tail behind
        let forms = Term::new("A (b (c) d)").forms();
        assert_eq!(forms[1], "A  d)");
    }

    #[test]
    fn test_feature_suffix_stripped() {
        assert_eq!(Term::new("Artist feat. Other").forms()[2], "Artist");
        assert_eq!(Term::new("Artist Feat. Other").forms()[2], "Artist");
        assert_eq!(Term::new("Simon & Garfunkel").forms()[2], "Simon");
        // first marker wins
        assert_eq!(Term::new("A & B feat. C").forms()[2], "A");
        // marker must be space-delimited
        assert_eq!(Term::new("AC&DC").forms()[2], "AC&DC");
        assert_eq!(Term::new("ft. Someone").forms()[2], "ft. Someone");
    }

    #[test]
    fn test_feature_suffix_stripped_on_every_line() {
        assert_eq!(Term::new("A feat. B\nC & D").forms()[2], "A\nC");
    }

    #[test]
    fn test_exclamation_replaced_by_space() {
        assert_eq!(Term::new("Wakey Wakey!").forms()[3], "Wakey Wakey ");
        assert_eq!(Term::new("Go!Go!").forms()[3], "Go Go ");
    }

    #[test]
    fn test_matches_any_form() {
        let title = Term::new("Get Lucky (feat. Pharrell Williams) (Radio Edit)");
        assert!(title.matches("Get Lucky"));
        let artist = Term::new("Daft Punk feat. Pharrell Williams");
        assert!(artist.matches("Daft Punk"));
        assert!(term_equals(&artist, "daft punk"));
        assert!(!artist.matches("Pharrell Williams"));
    }

    #[test]
    fn test_empty_term_matches_only_empty() {
        let empty = Term::new("");
        assert!(empty.matches(""));
        assert!(!empty.matches("Untitled"));
    }

    #[test]
    fn test_form_pairs_positional_and_deduplicated() {
        let artist = Term::new("Daft Punk");
        let title = Term::new("Get Lucky (Radio Edit)");
        assert_eq!(
            form_pairs(&artist, &title),
            vec![
                ("Daft Punk".to_string(), "Get Lucky (Radio Edit)".to_string()),
                ("Daft Punk".to_string(), "Get Lucky ".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_pairs_not_cross_product() {
        let artist = Term::new("A feat. B");
        let title = Term::new("T (x)");
        let pairs = form_pairs(&artist, &title);
        assert_eq!(
            pairs,
            vec![
                ("A feat. B".to_string(), "T (x)".to_string()),
                ("A feat. B".to_string(), "T ".to_string()),
                ("A".to_string(), "T (x)".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_pairs_plain_input_single_pair() {
        let pairs = form_pairs(&Term::new("Daft Punk"), &Term::new("Get Lucky"));
        assert_eq!(pairs.len(), 1);
    }
}
