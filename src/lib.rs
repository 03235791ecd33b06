//! Lifestyle Match - compatibility scoring and ranking for a dating service
//!
//! Users describe their own lifestyle (smoking, drinking, exercise,
//! work/life balance) and what they want from a partner on a 1-5 scale.
//! The engine scores every pair in both directions, averages the two
//! scores and lists the candidates that clear a threshold, best first.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{calculate_compatibility, MatchRanker, MatchingError, PreferenceStore, RankingOutcome};
pub use models::{LifestylePreferences, PreferenceDefaults, ScoredCandidate, ScoringWeights, UserId};
pub use services::InMemoryStore;
