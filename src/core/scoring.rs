use crate::core::error::MatchingError;
use crate::models::{LifestylePreferences, LifestyleTrait, ScoringWeights, MAX_SCALE_VALUE, MIN_SCALE_VALUE};

/// Largest possible gap between two values on the 1..=5 scale
pub const MAX_TRAIT_DIFF: u8 = MAX_SCALE_VALUE - MIN_SCALE_VALUE;

/// Scores are rounded to this many steps per point before they are compared
pub const SCORE_PRECISION: f64 = 1e9;

/// Calculate a directional compatibility score (0-100)
///
/// For every trait the subject's own value is compared against the other
/// user's stated preference for that trait:
///
/// ```text
/// diff        = |subject.trait - other.trait_preference|
/// trait_score = 1 - diff / 4
/// score       = 100 * Σ trait_score * weight
/// ```
///
/// The result is asymmetric: `calculate_compatibility(a, b)` and
/// `calculate_compatibility(b, a)` generally differ.
///
/// # Errors
/// * `MatchingError::InvalidRange` if either record holds a value outside 1..=5
/// * `MatchingError::InvalidWeights` if the weights fail [`ScoringWeights::validate`]
pub fn calculate_compatibility(
    subject: &LifestylePreferences,
    other: &LifestylePreferences,
    weights: &ScoringWeights,
) -> Result<f64, MatchingError> {
    weights.validate()?;
    subject.check_range()?;
    other.check_range()?;

    Ok(weighted_score(subject, other, weights))
}

/// Score two records already known to be in range
///
/// The weighted sum is divided by the weight total, so a weight set that
/// passes validation within tolerance still tops out at exactly 100.
#[inline]
pub(crate) fn weighted_score(
    subject: &LifestylePreferences,
    other: &LifestylePreferences,
    weights: &ScoringWeights,
) -> f64 {
    let total: f64 = LifestyleTrait::ALL
        .iter()
        .map(|t| trait_score(t.value(subject), t.preference(other)) * t.weight(weights))
        .sum();

    round_score(total / weights.total() * 100.0)
}

/// Mean of two directional scores
#[inline]
pub(crate) fn mean_score(forward: f64, backward: f64) -> f64 {
    round_score((forward + backward) / 2.0)
}

/// Snap a score to [`SCORE_PRECISION`] and clamp it to 0-100
///
/// Summing fractional weights leaves residue in the last bits
/// (92.5 comes out as 92.49999999999999), which would otherwise decide
/// threshold comparisons at exactly the boundary.
#[inline]
pub fn round_score(score: f64) -> f64 {
    ((score * SCORE_PRECISION).round() / SCORE_PRECISION).clamp(0.0, 100.0)
}

/// Normalised agreement (0-1) between a trait value and a preferred value
///
/// Equal values score 1.0, opposite ends of the scale score 0.0.
#[inline]
pub fn trait_score(trait_value: u8, preferred_value: u8) -> f64 {
    let diff = trait_value.abs_diff(preferred_value) as f64;
    1.0 - diff / MAX_TRAIT_DIFF as f64
}

/// Per-trait breakdown of a directional score, for diagnostics
pub fn trait_breakdown(
    subject: &LifestylePreferences,
    other: &LifestylePreferences,
) -> Vec<(&'static str, f64)> {
    LifestyleTrait::ALL
        .iter()
        .map(|t| (t.name(), trait_score(t.value(subject), t.preference(other))))
        .collect()
}
