use crate::models::domain::{Gender, LifestylePreferences, Match, UserId, UserProfile};
use serde::{Deserialize, Serialize};

/// Public view of a user, with their preferences nested when set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub bio: String,
    pub lifestyle_preferences: Option<LifestylePreferences>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserResponse {
    pub fn new(profile: UserProfile, lifestyle_preferences: Option<LifestylePreferences>) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            gender: profile.gender,
            birth_date: profile.birth_date,
            bio: profile.bio,
            lifestyle_preferences,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// One ranked entry of the potential matches listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotentialMatch {
    pub user: UserResponse,
    pub compatibility_score: f64,
}

/// A stored match with both members expanded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub id: uuid::Uuid,
    pub user1_details: UserResponse,
    pub user2_details: UserResponse,
    pub compatibility_score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MatchResponse {
    pub fn new(m: &Match, user1_details: UserResponse, user2_details: UserResponse) -> Self {
        Self {
            id: m.id,
            user1_details,
            user2_details,
            compatibility_score: m.compatibility_score,
            created_at: m.created_at,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
