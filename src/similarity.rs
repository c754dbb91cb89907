//! Edit-distance based fuzzy string equality.

use strsim::levenshtein;

/// Maximum edit distance, as a percentage of the combined length of both
/// inputs, for two strings to be considered equal.
pub const MAX_EDIT_PERCENTAGE: usize = 25;

/// Levenshtein distance between the lower-cased inputs as an integer
/// percentage of their combined character count (truncated, not rounded).
///
/// Returns `None` when both strings are empty.
pub fn edit_percentage(a: &str, b: &str) -> Option<usize> {
    let combined = a.chars().count() + b.chars().count();
    if combined == 0 {
        return None;
    }
    let distance = levenshtein(&a.to_lowercase(), &b.to_lowercase());
    Some(100 * distance / combined)
}

/// Fuzzy equality: edit distance is at most 25% of the combined length.
/// Two empty strings are equal.
pub fn fuzzy_equal(a: &str, b: &str) -> bool {
    match edit_percentage(a, b) {
        Some(pct) => pct <= MAX_EDIT_PERCENTAGE,
        None => true,
    }
}
