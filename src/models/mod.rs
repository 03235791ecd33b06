// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Gender, LifestylePreferences, LifestyleTrait, Match, MatchPair, NewUser, PreferenceDefaults, ScoredCandidate,
    ScoringWeights, UserId, UserProfile, MAX_SCALE_VALUE, MIN_SCALE_VALUE,
};
pub use requests::{CreateMatchRequest, RegisterUserRequest, UpdatePreferencesRequest};
pub use responses::{
    ErrorResponse, HealthResponse, MatchResponse, PotentialMatch, UserResponse,
};
