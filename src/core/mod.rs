// Core algorithm exports
pub mod error;
pub mod filters;
pub mod ranker;
pub mod scoring;

pub use error::MatchingError;
pub use filters::{is_eligible_candidate, passes_threshold, rank_order, select_and_order, DEFAULT_MATCH_THRESHOLD};
pub use ranker::{CandidateRecord, MatchRanker, PreferenceStore, RankingOutcome};
pub use scoring::{calculate_compatibility, round_score, trait_breakdown, trait_score, MAX_TRAIT_DIFF, SCORE_PRECISION};
