use crate::core::error::MatchingError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identity of a user, assigned by the store
pub type UserId = u64;

/// Lower bound of every ordinal lifestyle scale
pub const MIN_SCALE_VALUE: u8 = 1;
/// Upper bound of every ordinal lifestyle scale
pub const MAX_SCALE_VALUE: u8 = 5;

pub const DEFAULT_SMOKING: u8 = 1;
pub const DEFAULT_DRINKING: u8 = 1;
pub const DEFAULT_EXERCISE: u8 = 3;
pub const DEFAULT_WORK_LIFE_BALANCE: u8 = 3;

pub const DEFAULT_SMOKING_WEIGHT: f64 = 0.30;
pub const DEFAULT_DRINKING_WEIGHT: f64 = 0.30;
pub const DEFAULT_EXERCISE_WEIGHT: f64 = 0.20;
pub const DEFAULT_WORK_LIFE_BALANCE_WEIGHT: f64 = 0.20;

/// A user's self-reported lifestyle traits and what they want in a partner.
///
/// Every field sits on a 1..=5 ordinal scale. Frequencies run from
/// Never (1) to Very Often (5); work/life balance runs from all work (1)
/// to all life (5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LifestylePreferences {
    #[validate(range(min = 1, max = 5))]
    pub smoking: u8,
    #[validate(range(min = 1, max = 5))]
    pub smoking_preference: u8,
    #[validate(range(min = 1, max = 5))]
    pub drinking: u8,
    #[validate(range(min = 1, max = 5))]
    pub drinking_preference: u8,
    #[validate(range(min = 1, max = 5))]
    pub exercise: u8,
    #[validate(range(min = 1, max = 5))]
    pub exercise_preference: u8,
    #[validate(range(min = 1, max = 5))]
    pub work_life_balance: u8,
    #[validate(range(min = 1, max = 5))]
    pub work_life_balance_preference: u8,
}

impl LifestylePreferences {
    pub fn from_defaults(defaults: &PreferenceDefaults) -> Self {
        Self {
            smoking: defaults.smoking,
            smoking_preference: defaults.smoking_preference,
            drinking: defaults.drinking,
            drinking_preference: defaults.drinking_preference,
            exercise: defaults.exercise,
            exercise_preference: defaults.exercise_preference,
            work_life_balance: defaults.work_life_balance,
            work_life_balance_preference: defaults.work_life_balance_preference,
        }
    }

    /// All eight fields with their names, in declaration order
    pub fn fields(&self) -> [(&'static str, u8); 8] {
        [
            ("smoking", self.smoking),
            ("smoking_preference", self.smoking_preference),
            ("drinking", self.drinking),
            ("drinking_preference", self.drinking_preference),
            ("exercise", self.exercise),
            ("exercise_preference", self.exercise_preference),
            ("work_life_balance", self.work_life_balance),
            ("work_life_balance_preference", self.work_life_balance_preference),
        ]
    }

    /// Reject the record if any field is outside the 1..=5 scale.
    ///
    /// Values are never clamped; the first offending field is reported.
    pub fn check_range(&self) -> Result<(), MatchingError> {
        for (field, value) in self.fields() {
            if !(MIN_SCALE_VALUE..=MAX_SCALE_VALUE).contains(&value) {
                return Err(MatchingError::invalid_range(field, value));
            }
        }
        Ok(())
    }
}

impl Default for LifestylePreferences {
    fn default() -> Self {
        Self::from_defaults(&PreferenceDefaults::default())
    }
}

/// Values a fresh preferences record starts with.
///
/// Preference twins mirror their trait defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceDefaults {
    pub smoking: u8,
    pub smoking_preference: u8,
    pub drinking: u8,
    pub drinking_preference: u8,
    pub exercise: u8,
    pub exercise_preference: u8,
    pub work_life_balance: u8,
    pub work_life_balance_preference: u8,
}

impl Default for PreferenceDefaults {
    fn default() -> Self {
        Self {
            smoking: DEFAULT_SMOKING,
            smoking_preference: DEFAULT_SMOKING,
            drinking: DEFAULT_DRINKING,
            drinking_preference: DEFAULT_DRINKING,
            exercise: DEFAULT_EXERCISE,
            exercise_preference: DEFAULT_EXERCISE,
            work_life_balance: DEFAULT_WORK_LIFE_BALANCE,
            work_life_balance_preference: DEFAULT_WORK_LIFE_BALANCE,
        }
    }
}

/// The four scored lifestyle dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifestyleTrait {
    Smoking,
    Drinking,
    Exercise,
    WorkLifeBalance,
}

impl LifestyleTrait {
    pub const ALL: [LifestyleTrait; 4] = [
        LifestyleTrait::Smoking,
        LifestyleTrait::Drinking,
        LifestyleTrait::Exercise,
        LifestyleTrait::WorkLifeBalance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LifestyleTrait::Smoking => "smoking",
            LifestyleTrait::Drinking => "drinking",
            LifestyleTrait::Exercise => "exercise",
            LifestyleTrait::WorkLifeBalance => "work_life_balance",
        }
    }

    /// The user's own behaviour for this trait
    #[inline]
    pub fn value(self, prefs: &LifestylePreferences) -> u8 {
        match self {
            LifestyleTrait::Smoking => prefs.smoking,
            LifestyleTrait::Drinking => prefs.drinking,
            LifestyleTrait::Exercise => prefs.exercise,
            LifestyleTrait::WorkLifeBalance => prefs.work_life_balance,
        }
    }

    /// What the user wants from a partner for this trait
    #[inline]
    pub fn preference(self, prefs: &LifestylePreferences) -> u8 {
        match self {
            LifestyleTrait::Smoking => prefs.smoking_preference,
            LifestyleTrait::Drinking => prefs.drinking_preference,
            LifestyleTrait::Exercise => prefs.exercise_preference,
            LifestyleTrait::WorkLifeBalance => prefs.work_life_balance_preference,
        }
    }

    #[inline]
    pub fn weight(self, weights: &ScoringWeights) -> f64 {
        match self {
            LifestyleTrait::Smoking => weights.smoking,
            LifestyleTrait::Drinking => weights.drinking,
            LifestyleTrait::Exercise => weights.exercise,
            LifestyleTrait::WorkLifeBalance => weights.work_life_balance,
        }
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub smoking: f64,
    pub drinking: f64,
    pub exercise: f64,
    pub work_life_balance: f64,
}

impl ScoringWeights {
    /// Tolerance applied when checking that the weights sum to 1.0
    pub const SUM_TOLERANCE: f64 = 1e-9;

    pub fn total(&self) -> f64 {
        self.smoking + self.drinking + self.exercise + self.work_life_balance
    }

    /// Weights must be finite, non-negative and sum to 1.0 within
    /// [`Self::SUM_TOLERANCE`]. Scoring divides by [`Self::total`], so drift
    /// inside the tolerance never lifts a score past 100.
    pub fn validate(&self) -> Result<(), MatchingError> {
        for t in LifestyleTrait::ALL {
            let w = t.weight(self);
            if !w.is_finite() || w < 0.0 {
                return Err(MatchingError::InvalidWeights(format!(
                    "{} weight must be a non-negative number, got {}",
                    t.name(),
                    w
                )));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(MatchingError::InvalidWeights(format!(
                "weights must sum to 1.0, got {}",
                total
            )));
        }

        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            smoking: DEFAULT_SMOKING_WEIGHT,
            drinking: DEFAULT_DRINKING_WEIGHT,
            exercise: DEFAULT_EXERCISE_WEIGHT,
            work_life_balance: DEFAULT_WORK_LIFE_BALANCE_WEIGHT,
        }
    }
}

/// Ranked candidate produced per query, never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub user_id: UserId,
    pub compatibility_score: f64,
}

/// Unordered pair of two distinct users.
///
/// `(a, b)` and `(b, a)` normalise to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchPair {
    low: UserId,
    high: UserId,
}

impl MatchPair {
    /// Returns `None` for a self-pair
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.low == user_id || self.high == user_id
    }

    pub fn members(&self) -> (UserId, UserId) {
        (self.low, self.high)
    }
}

/// Persisted pairing between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: uuid::Uuid,
    pub user1: UserId,
    pub user2: UserId,
    pub compatibility_score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Match {
    /// The other member of the match, if `user_id` takes part in it
    pub fn partner_of(&self, user_id: UserId) -> Option<UserId> {
        if self.user1 == user_id {
            Some(self.user2)
        } else if self.user2 == user_id {
            Some(self.user1)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

/// Identity data of a registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birth_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub bio: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Data needed to register a user; the store assigns id and timestamps
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub bio: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences_mirror_traits() {
        let prefs = LifestylePreferences::default();
        assert_eq!(prefs.smoking, 1);
        assert_eq!(prefs.smoking_preference, 1);
        assert_eq!(prefs.drinking, 1);
        assert_eq!(prefs.drinking_preference, 1);
        assert_eq!(prefs.exercise, 3);
        assert_eq!(prefs.exercise_preference, 3);
        assert_eq!(prefs.work_life_balance, 3);
        assert_eq!(prefs.work_life_balance_preference, 3);
    }

    #[test]
    fn test_check_range_reports_field() {
        let mut prefs = LifestylePreferences::default();
        assert!(prefs.check_range().is_ok());

        prefs.exercise_preference = 6;
        let err = prefs.check_range().unwrap_err();
        assert_eq!(err, MatchingError::invalid_range("exercise_preference", 6));

        prefs.exercise_preference = 0;
        assert!(prefs.check_range().is_err());
    }

    #[test]
    fn test_validator_agrees_with_check_range() {
        let mut prefs = LifestylePreferences::default();
        assert!(prefs.validate().is_ok());

        prefs.drinking = 9;
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.smoking, 0.30);
        assert_eq!(weights.drinking, 0.30);
        assert_eq!(weights.exercise, 0.20);
        assert_eq!(weights.work_life_balance, 0.20);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = ScoringWeights {
            smoking: 0.5,
            ..ScoringWeights::default()
        };
        assert!(matches!(weights.validate(), Err(MatchingError::InvalidWeights(_))));

        let negative = ScoringWeights {
            smoking: -0.1,
            drinking: 0.7,
            exercise: 0.2,
            work_life_balance: 0.2,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_match_pair_is_unordered() {
        assert_eq!(MatchPair::new(1, 2), MatchPair::new(2, 1));
        assert_eq!(MatchPair::new(3, 3), None);

        let pair = MatchPair::new(7, 4).unwrap();
        assert_eq!(pair.members(), (4, 7));
        assert!(pair.contains(7));
        assert!(!pair.contains(5));
    }
}
