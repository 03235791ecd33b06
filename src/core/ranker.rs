use crate::core::{
    error::MatchingError,
    filters::{is_eligible_candidate, select_and_order, DEFAULT_MATCH_THRESHOLD},
    scoring::{calculate_compatibility, mean_score, weighted_score},
};
use crate::models::{LifestylePreferences, ScoredCandidate, ScoringWeights, UserId};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// A candidate as read from storage; `None` means no preferences record yet
pub type CandidateRecord = (UserId, Option<LifestylePreferences>);

/// Read access to lifestyle preferences, injected into the ranker
pub trait PreferenceStore: Send + Sync {
    /// Preferences of a single user, `None` if the user has not set any
    fn get(&self, user_id: UserId) -> Option<LifestylePreferences>;

    /// Snapshot of every other user, with or without preferences
    fn list_all_except(&self, user_id: UserId) -> Vec<CandidateRecord>;
}

/// Result of a ranking run with bookkeeping for logs and responses
#[derive(Debug, Clone, Default)]
pub struct RankingOutcome {
    pub candidates: Vec<ScoredCandidate>,
    pub total_candidates: usize,
    pub skipped_without_preferences: usize,
    pub skipped_invalid: usize,
}

enum CandidateOutcome {
    Scored(ScoredCandidate),
    Ineligible,
    NoPreferences,
    Invalid,
}

/// Ranks every candidate against a subject by mutual compatibility
///
/// # Pipeline
/// 1. Subject precondition (preferences present and in range)
/// 2. Candidate eligibility (never the subject, must have preferences)
/// 3. Directional scoring in both directions, averaged
/// 4. Threshold filter and ordering
#[derive(Debug, Clone)]
pub struct MatchRanker {
    weights: ScoringWeights,
    threshold: f64,
    parallel: bool,
}

impl MatchRanker {
    pub fn new(weights: ScoringWeights, threshold: f64) -> Result<Self, MatchingError> {
        weights.validate()?;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(MatchingError::InvalidThreshold(threshold));
        }

        Ok(Self {
            weights,
            threshold,
            parallel: false,
        })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            threshold: DEFAULT_MATCH_THRESHOLD,
            parallel: false,
        }
    }

    /// Score candidates on the rayon pool instead of the calling thread
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Directional score of `other` against `subject`
    pub fn score(&self, subject: &LifestylePreferences, other: &LifestylePreferences) -> Result<f64, MatchingError> {
        calculate_compatibility(subject, other, &self.weights)
    }

    /// Symmetric mutual score: the mean of both directional scores
    pub fn combined_score(&self, a: &LifestylePreferences, b: &LifestylePreferences) -> Result<f64, MatchingError> {
        let forward = self.score(a, b)?;
        let backward = self.score(b, a)?;
        Ok(mean_score(forward, backward))
    }

    /// Rank candidates for a subject, most compatible first
    ///
    /// # Errors
    /// * `MissingPreferences` if the subject has no preferences record
    /// * `InvalidRange` if the subject's record is out of range
    ///
    /// Candidates without preferences, or with out-of-range records, are
    /// skipped rather than failing the query.
    pub fn rank<I>(
        &self,
        subject_id: UserId,
        subject: Option<&LifestylePreferences>,
        candidates: I,
    ) -> Result<Vec<ScoredCandidate>, MatchingError>
    where
        I: IntoIterator<Item = CandidateRecord>,
    {
        self.rank_with_stats(subject_id, subject, candidates)
            .map(|outcome| outcome.candidates)
    }

    /// Same as [`MatchRanker::rank`], also reporting how many candidates were skipped
    pub fn rank_with_stats<I>(
        &self,
        subject_id: UserId,
        subject: Option<&LifestylePreferences>,
        candidates: I,
    ) -> Result<RankingOutcome, MatchingError>
    where
        I: IntoIterator<Item = CandidateRecord>,
    {
        let subject = subject.ok_or_else(|| MatchingError::missing_preferences(subject_id))?;
        subject.check_range()?;

        let outcomes: Vec<CandidateOutcome> = if self.parallel {
            candidates
                .into_iter()
                .collect::<Vec<_>>()
                .into_par_iter()
                .map(|record| self.evaluate(subject_id, subject, record))
                .collect()
        } else {
            candidates
                .into_iter()
                .map(|record| self.evaluate(subject_id, subject, record))
                .collect()
        };

        let mut outcome = RankingOutcome {
            total_candidates: outcomes.len(),
            ..RankingOutcome::default()
        };

        let mut scored = Vec::with_capacity(outcomes.len());
        for result in outcomes {
            match result {
                CandidateOutcome::Scored(candidate) => scored.push(candidate),
                CandidateOutcome::NoPreferences => outcome.skipped_without_preferences += 1,
                CandidateOutcome::Invalid => outcome.skipped_invalid += 1,
                CandidateOutcome::Ineligible => {}
            }
        }

        outcome.candidates = select_and_order(scored, self.threshold);

        tracing::debug!(
            subject_id,
            total = outcome.total_candidates,
            ranked = outcome.candidates.len(),
            without_preferences = outcome.skipped_without_preferences,
            invalid = outcome.skipped_invalid,
            "ranked candidates"
        );

        Ok(outcome)
    }

    /// Rank every other user in the store against `subject_id`
    pub fn rank_for_user(
        &self,
        store: &dyn PreferenceStore,
        subject_id: UserId,
    ) -> Result<RankingOutcome, MatchingError> {
        let subject = store.get(subject_id);
        let candidates = store.list_all_except(subject_id);
        self.rank_with_stats(subject_id, subject.as_ref(), candidates)
    }

    fn evaluate(
        &self,
        subject_id: UserId,
        subject: &LifestylePreferences,
        (user_id, preferences): CandidateRecord,
    ) -> CandidateOutcome {
        if !is_eligible_candidate(user_id, subject_id) {
            return CandidateOutcome::Ineligible;
        }

        let Some(preferences) = preferences else {
            return CandidateOutcome::NoPreferences;
        };

        if let Err(e) = preferences.check_range() {
            tracing::warn!(candidate_id = user_id, "skipping candidate with invalid preferences: {}", e);
            return CandidateOutcome::Invalid;
        }

        let forward = weighted_score(subject, &preferences, &self.weights);
        let backward = weighted_score(&preferences, subject, &self.weights);

        CandidateOutcome::Scored(ScoredCandidate {
            user_id,
            compatibility_score: mean_score(forward, backward),
        })
    }
}

impl Default for MatchRanker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(traits: [u8; 4], wanted: [u8; 4]) -> LifestylePreferences {
        LifestylePreferences {
            smoking: traits[0],
            smoking_preference: wanted[0],
            drinking: traits[1],
            drinking_preference: wanted[1],
            exercise: traits[2],
            exercise_preference: wanted[2],
            work_life_balance: traits[3],
            work_life_balance_preference: wanted[3],
        }
    }

    fn subject() -> LifestylePreferences {
        LifestylePreferences::default()
    }

    #[test]
    fn test_missing_subject_preferences() {
        let ranker = MatchRanker::default();

        let err = ranker.rank(1, None, Vec::<CandidateRecord>::new()).unwrap_err();
        assert_eq!(err, MatchingError::missing_preferences(1));

        let err = ranker
            .rank(1, None, vec![(2, Some(subject()))])
            .unwrap_err();
        assert_eq!(err, MatchingError::missing_preferences(1));
    }

    #[test]
    fn test_invalid_subject_fails_up_front() {
        let ranker = MatchRanker::default();
        let mut bad = subject();
        bad.drinking = 7;

        let err = ranker.rank(1, Some(&bad), vec![(2, Some(subject()))]).unwrap_err();
        assert!(matches!(err, MatchingError::InvalidRange { field: "drinking", value: 7, .. }));
    }

    #[test]
    fn test_subject_excluded_from_ranking() {
        let ranker = MatchRanker::default();
        let me = subject();

        let ranked = ranker
            .rank(1, Some(&me), vec![(1, Some(me)), (2, Some(me))])
            .unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].user_id, 2);
        assert_eq!(ranked[0].compatibility_score, 100.0);
    }

    #[test]
    fn test_candidates_without_preferences_are_skipped() {
        let ranker = MatchRanker::default();
        let me = subject();

        let outcome = ranker
            .rank_with_stats(1, Some(&me), vec![(2, None), (3, Some(me)), (4, None)])
            .unwrap();

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].user_id, 3);
        assert_eq!(outcome.skipped_without_preferences, 2);
        assert_eq!(outcome.total_candidates, 3);
    }

    #[test]
    fn test_invalid_candidate_is_skipped() {
        let ranker = MatchRanker::default();
        let me = subject();
        let mut corrupt = subject();
        corrupt.exercise_preference = 0;

        let outcome = ranker
            .rank_with_stats(1, Some(&me), vec![(2, Some(corrupt)), (3, Some(me))])
            .unwrap();

        assert_eq!(outcome.skipped_invalid, 1);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].user_id, 3);
    }

    #[test]
    fn test_threshold_boundary_included() {
        let ranker = MatchRanker::default();
        let me = subject();
        // forward 20.0, backward 100.0
        let boundary = prefs([1, 1, 3, 3], [5, 5, 5, 5]);

        assert_eq!(ranker.combined_score(&me, &boundary).unwrap(), 60.0);

        let ranked = ranker.rank(1, Some(&me), vec![(2, Some(boundary))]).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].compatibility_score, 60.0);
    }

    #[test]
    fn test_boundary_reached_through_fractional_scores() {
        let ranker = MatchRanker::default();
        // forward 92.5 (smoking off by one), backward 27.5
        let me = prefs([1, 1, 3, 3], [1, 1, 1, 3]);
        let candidate = prefs([5, 4, 5, 3], [2, 1, 3, 3]);

        assert_eq!(ranker.score(&me, &candidate).unwrap(), 92.5);
        assert_eq!(ranker.score(&candidate, &me).unwrap(), 27.5);
        assert_eq!(ranker.combined_score(&me, &candidate).unwrap(), 60.0);

        let ranked = ranker.rank(1, Some(&me), vec![(2, Some(candidate))]).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].compatibility_score, 60.0);
    }

    #[test]
    fn test_threshold_inclusion_matches_exact_arithmetic() {
        // In twentieths of weight times quarters of agreement each direction is
        // worth at most 80 units and the combined score is units * 0.625, so
        // the 60.0 threshold sits at exactly 96 units.
        let ranker = MatchRanker::default();
        let units = [6u32, 6, 4, 4];
        let diffs = |code: u32| [code % 5, code / 5 % 5, code / 25 % 5, code / 125];
        let exact = |d: [u32; 4]| -> u32 { d.iter().zip(units).map(|(d, u)| u * (4 - d)).sum() };
        let offset = |d: [u32; 4]| d.map(|v| 1 + v as u8);

        // Subject sits at 1 everywhere, so candidate values are 1 + diff
        let me = prefs([1, 1, 1, 1], [1, 1, 1, 1]);

        let mut mismatches = Vec::new();
        for forward in 0..625u32 {
            for backward in 0..625u32 {
                let (f, b) = (diffs(forward), diffs(backward));
                let candidate = prefs(offset(b), offset(f));
                let total = exact(f) + exact(b);

                let score = ranker.combined_score(&me, &candidate).unwrap();
                assert_eq!(score, total as f64 * 0.625, "forward {:?} backward {:?}", f, b);

                let included = crate::core::passes_threshold(score, ranker.threshold());
                if included != (total >= 96) {
                    mismatches.push((f, b));
                }
                if total == 96 {
                    let ranked = ranker.rank(1, Some(&me), vec![(2, Some(candidate))]).unwrap();
                    assert_eq!(ranked.len(), 1, "forward {:?} backward {:?}", f, b);
                }
            }
        }
        assert!(mismatches.is_empty(), "{} mismatches, first {:?}", mismatches.len(), mismatches.first());
    }

    #[test]
    fn test_below_threshold_gives_empty_result() {
        let ranker = MatchRanker::default();
        let me = subject();
        // forward 20.0, backward 70.0 -> 45.0
        let poor = prefs([1, 3, 1, 2], [5, 5, 5, 5]);

        let ranked = ranker.rank(1, Some(&me), vec![(2, Some(poor))]).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_sorted_descending() {
        let ranker = MatchRanker::default();
        let me = subject();

        let candidates = vec![
            (2, Some(prefs([1, 3, 1, 1], [1, 1, 1, 1]))), // 72.5
            (3, Some(prefs([1, 3, 1, 2], [5, 5, 5, 5]))), // 45.0
            (4, Some(me)),                                // 100.0
            (5, Some(prefs([1, 1, 3, 3], [5, 5, 5, 5]))), // 60.0
        ];

        let ranked = ranker.rank(1, Some(&me), candidates).unwrap();
        let ids: Vec<UserId> = ranked.iter().map(|c| c.user_id).collect();

        assert_eq!(ids, vec![4, 2, 5]);
        assert!(ranked.windows(2).all(|w| w[0].compatibility_score >= w[1].compatibility_score));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let me = prefs([2, 3, 4, 2], [1, 2, 4, 3]);
        let candidates: Vec<CandidateRecord> = (2..200u64)
            .map(|i| {
                let v = |k: u64| ((i + k) % 5 + 1) as u8;
                let record = prefs([v(0), v(1), v(2), v(3)], [v(3), v(2), v(1), v(0)]);
                (i, if i % 7 == 0 { None } else { Some(record) })
            })
            .collect();

        let sequential = MatchRanker::default()
            .rank(1, Some(&me), candidates.clone())
            .unwrap();
        let parallel = MatchRanker::default()
            .with_parallel(true)
            .rank(1, Some(&me), candidates)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_custom_threshold_and_weights() {
        assert!(MatchRanker::new(ScoringWeights::default(), 101.0).is_err());
        assert!(MatchRanker::new(
            ScoringWeights {
                smoking: 1.0,
                ..ScoringWeights::default()
            },
            60.0
        )
        .is_err());

        let lenient = MatchRanker::new(ScoringWeights::default(), 40.0).unwrap();
        let me = subject();
        let poor = prefs([1, 3, 1, 2], [5, 5, 5, 5]);

        let ranked = lenient.rank(1, Some(&me), vec![(2, Some(poor))]).unwrap();
        assert_eq!(ranked.len(), 1);
    }
}
