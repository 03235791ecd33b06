use crate::models::UserId;
use thiserror::Error;

/// Errors raised by the compatibility engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchingError {
    #[error("Invalid value for {field}: {value} (expected {min}..={max})")]
    InvalidRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("User {user_id} has no lifestyle preferences")]
    MissingPreferences { user_id: UserId },

    #[error("Invalid scoring weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid match threshold: {0} (expected 0..=100)")]
    InvalidThreshold(f64),
}

impl MatchingError {
    pub fn invalid_range(field: &'static str, value: u8) -> Self {
        Self::InvalidRange {
            field,
            value,
            min: crate::models::MIN_SCALE_VALUE,
            max: crate::models::MAX_SCALE_VALUE,
        }
    }

    pub fn missing_preferences(user_id: UserId) -> Self {
        Self::MissingPreferences { user_id }
    }
}
