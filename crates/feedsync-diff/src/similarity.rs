//! Character-level similarity of two texts.
//!
//! Uses the `similar` crate's character diff: the ratio is `2 * M / T`
//! where `M` is the number of matched characters and `T` the total number
//! of characters in both texts.

use similar::TextDiff;

/// Similarity of `a` and `b` in `[0, 1]`.
///
/// Two empty strings are identical (`1.0`); an empty string against a
/// non-empty one scores `0.0`.
pub fn similarity_ratio(a: &str, b: &str) -> f32 {
    if a == b {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio()
}

/// Returns `true` if the texts differ by more than `threshold` tolerates.
pub fn differs(a: &str, b: &str, threshold: f32) -> bool {
    similarity_ratio(a, b) < threshold
}
