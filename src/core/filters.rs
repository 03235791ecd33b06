use crate::models::{ScoredCandidate, UserId};
use std::cmp::Ordering;

/// Default inclusive cut-off for the combined score
pub const DEFAULT_MATCH_THRESHOLD: f64 = 60.0;

/// Whether a combined score clears the (inclusive) threshold
#[inline]
pub fn passes_threshold(combined_score: f64, threshold: f64) -> bool {
    combined_score >= threshold
}

/// Whether a user may appear in the subject's ranking at all
#[inline]
pub fn is_eligible_candidate(candidate_id: UserId, subject_id: UserId) -> bool {
    candidate_id != subject_id
}

/// Ranking order: higher score first, then ascending user id
#[inline]
pub fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.compatibility_score
        .partial_cmp(&a.compatibility_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Drop candidates below the threshold and sort the rest into ranking order
pub fn select_and_order(mut candidates: Vec<ScoredCandidate>, threshold: f64) -> Vec<ScoredCandidate> {
    candidates.retain(|c| passes_threshold(c.compatibility_score, threshold));
    candidates.sort_by(rank_order);
    candidates
}
