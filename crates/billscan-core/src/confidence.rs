//! Confidence score semantics
//!
//! Scores are floats in [0.0, 1.0]. AI-derived values carry the confidence
//! the provider reported; the instant a human overrides a tracked value its
//! confidence becomes exactly [`FULL_CONFIDENCE`]. There is no partial-trust
//! blending between AI and human input.
//!
//! Review-worthiness is per-field: each field's score is judged against the
//! threshold independently.

/// Confidence assigned to human-entered values
pub const FULL_CONFIDENCE: f64 = 1.0;

/// System-wide "needs review" threshold (exclusive)
pub const REVIEW_THRESHOLD: f64 = 0.75;

/// Whether a field's confidence is low enough to flag for visual review.
///
/// Strictly below the threshold: a score of exactly 0.75 is not flagged.
pub fn needs_review(score: f64) -> bool {
    score < REVIEW_THRESHOLD
}

/// Whether a score is a valid confidence value
pub fn in_range(score: f64) -> bool {
    (0.0..=1.0).contains(&score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(!needs_review(0.75));
        assert!(needs_review(0.749));
        assert!(needs_review(0.0));
        assert!(!needs_review(1.0));
    }

    #[test]
    fn test_range() {
        assert!(in_range(0.0));
        assert!(in_range(1.0));
        assert!(!in_range(1.01));
        assert!(!in_range(-0.1));
    }
}
