use crate::models::domain::{Gender, LifestylePreferences, NewUser, PreferenceDefaults, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birth_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub bio: String,
}

impl From<RegisterUserRequest> for NewUser {
    fn from(req: RegisterUserRequest) -> Self {
        NewUser {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            gender: req.gender,
            birth_date: req.birth_date,
            bio: req.bio,
        }
    }
}

/// Create or update a user's lifestyle preferences.
///
/// Omitted fields keep their current value, or the default for a new record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[validate(range(min = 1, max = 5))]
    pub smoking: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub smoking_preference: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub drinking: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub drinking_preference: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub exercise: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub exercise_preference: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub work_life_balance: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub work_life_balance_preference: Option<u8>,
}

impl UpdatePreferencesRequest {
    pub fn apply_to(&self, current: Option<LifestylePreferences>, defaults: &PreferenceDefaults) -> LifestylePreferences {
        let base = current.unwrap_or_else(|| LifestylePreferences::from_defaults(defaults));

        LifestylePreferences {
            smoking: self.smoking.unwrap_or(base.smoking),
            smoking_preference: self.smoking_preference.unwrap_or(base.smoking_preference),
            drinking: self.drinking.unwrap_or(base.drinking),
            drinking_preference: self.drinking_preference.unwrap_or(base.drinking_preference),
            exercise: self.exercise.unwrap_or(base.exercise),
            exercise_preference: self.exercise_preference.unwrap_or(base.exercise_preference),
            work_life_balance: self.work_life_balance.unwrap_or(base.work_life_balance),
            work_life_balance_preference: self
                .work_life_balance_preference
                .unwrap_or(base.work_life_balance_preference),
        }
    }
}

/// Request to record a match between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    pub user1: UserId,
    pub user2: UserId,
}
