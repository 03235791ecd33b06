use crate::core::{CandidateRecord, MatchingError, PreferenceStore};
use crate::models::{LifestylePreferences, Match, MatchPair, NewUser, UserId, UserProfile};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Errors that can occur when reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("A user cannot be matched with themselves: {0}")]
    SelfMatch(UserId),

    #[error("Match between {0} and {1} already exists")]
    DuplicateMatch(UserId, UserId),

    #[error("Invalid preferences: {0}")]
    Invalid(#[from] MatchingError),
}

#[derive(Debug, Default)]
struct Inner {
    next_id: UserId,
    users: BTreeMap<UserId, UserProfile>,
    preferences: HashMap<UserId, LifestylePreferences>,
    matches: Vec<Match>,
    match_pairs: HashSet<MatchPair>,
}

/// In-memory store for users, their preferences and recorded matches
///
/// A user exclusively owns its preferences and takes part in matches;
/// deleting the user removes both.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user, assigning the next free id
    pub fn create_user(&self, new_user: NewUser) -> Result<UserProfile, StoreError> {
        let mut inner = self.write();

        if inner.users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::UsernameTaken(new_user.username));
        }

        inner.next_id += 1;
        let now = chrono::Utc::now();
        let profile = UserProfile {
            id: inner.next_id,
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            gender: new_user.gender,
            birth_date: new_user.birth_date,
            bio: new_user.bio,
            created_at: now,
            updated_at: now,
        };

        inner.users.insert(profile.id, profile.clone());
        tracing::debug!(user_id = profile.id, "created user {}", profile.username);

        Ok(profile)
    }

    pub fn get_user(&self, user_id: UserId) -> Option<UserProfile> {
        self.read().users.get(&user_id).cloned()
    }

    /// All users, ascending by id
    pub fn list_users(&self) -> Vec<UserProfile> {
        self.read().users.values().cloned().collect()
    }

    /// Delete a user together with their preferences and matches
    pub fn delete_user(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut inner = self.write();

        if inner.users.remove(&user_id).is_none() {
            return Err(StoreError::UserNotFound(user_id));
        }

        inner.preferences.remove(&user_id);
        inner.match_pairs.retain(|pair| !pair.contains(user_id));
        inner.matches.retain(|m| m.partner_of(user_id).is_none());

        tracing::debug!(user_id, "deleted user and owned records");
        Ok(())
    }

    /// Create or replace a user's preferences after range validation
    pub fn upsert_preferences(
        &self,
        user_id: UserId,
        preferences: LifestylePreferences,
    ) -> Result<LifestylePreferences, StoreError> {
        preferences.check_range()?;

        let mut inner = self.write();
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Err(StoreError::UserNotFound(user_id));
        };
        user.updated_at = chrono::Utc::now();

        inner.preferences.insert(user_id, preferences);
        Ok(preferences)
    }

    /// Remove a user's preferences; returns whether a record existed
    pub fn delete_preferences(&self, user_id: UserId) -> Result<bool, StoreError> {
        let mut inner = self.write();

        if !inner.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }

        Ok(inner.preferences.remove(&user_id).is_some())
    }

    /// Record a match between two distinct, existing users
    ///
    /// The pair is unordered: `(a, b)` conflicts with an existing `(b, a)`.
    pub fn create_match(&self, user1: UserId, user2: UserId, compatibility_score: f64) -> Result<Match, StoreError> {
        let pair = MatchPair::new(user1, user2).ok_or(StoreError::SelfMatch(user1))?;

        let mut inner = self.write();

        for id in [user1, user2] {
            if !inner.users.contains_key(&id) {
                return Err(StoreError::UserNotFound(id));
            }
        }

        if !inner.match_pairs.insert(pair) {
            return Err(StoreError::DuplicateMatch(user1, user2));
        }

        let created = Match {
            id: uuid::Uuid::new_v4(),
            user1,
            user2,
            compatibility_score,
            created_at: chrono::Utc::now(),
        };
        inner.matches.push(created.clone());

        Ok(created)
    }

    /// Matches the user takes part in, on either side, oldest first
    pub fn matches_for(&self, user_id: UserId) -> Vec<Match> {
        self.read()
            .matches
            .iter()
            .filter(|m| m.partner_of(user_id).is_some())
            .cloned()
            .collect()
    }
}

impl PreferenceStore for InMemoryStore {
    fn get(&self, user_id: UserId) -> Option<LifestylePreferences> {
        self.read().preferences.get(&user_id).copied()
    }

    fn list_all_except(&self, user_id: UserId) -> Vec<CandidateRecord> {
        let inner = self.read();
        inner
            .users
            .keys()
            .filter(|id| **id != user_id)
            .map(|id| (*id, inner.preferences.get(id).copied()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            ..NewUser::default()
        }
    }

    #[test]
    fn test_create_and_get_user() {
        let store = InMemoryStore::new();
        let alice = store.create_user(new_user("alice")).unwrap();
        let bob = store.create_user(new_user("bob")).unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(store.get_user(2).unwrap().username, "bob");
        assert!(store.get_user(3).is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = InMemoryStore::new();
        store.create_user(new_user("alice")).unwrap();

        let err = store.create_user(new_user("alice")).unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(_)));
    }

    #[test]
    fn test_preferences_absent_until_set() {
        let store = InMemoryStore::new();
        let alice = store.create_user(new_user("alice")).unwrap();

        assert!(store.get(alice.id).is_none());

        store
            .upsert_preferences(alice.id, LifestylePreferences::default())
            .unwrap();
        assert_eq!(store.get(alice.id), Some(LifestylePreferences::default()));
    }

    #[test]
    fn test_upsert_rejects_out_of_range() {
        let store = InMemoryStore::new();
        let alice = store.create_user(new_user("alice")).unwrap();
        let bad = LifestylePreferences {
            smoking: 0,
            ..LifestylePreferences::default()
        };

        let err = store.upsert_preferences(alice.id, bad).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(MatchingError::InvalidRange { .. })));
        assert!(store.get(alice.id).is_none());
    }

    #[test]
    fn test_upsert_requires_user() {
        let store = InMemoryStore::new();
        let err = store
            .upsert_preferences(42, LifestylePreferences::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(42)));
    }

    #[test]
    fn test_list_all_except_marks_missing_preferences() {
        let store = InMemoryStore::new();
        let alice = store.create_user(new_user("alice")).unwrap();
        let bob = store.create_user(new_user("bob")).unwrap();
        let carol = store.create_user(new_user("carol")).unwrap();
        store
            .upsert_preferences(carol.id, LifestylePreferences::default())
            .unwrap();

        let others = store.list_all_except(alice.id);
        assert_eq!(
            others,
            vec![(bob.id, None), (carol.id, Some(LifestylePreferences::default()))]
        );
    }

    #[test]
    fn test_match_pair_uniqueness() {
        let store = InMemoryStore::new();
        let alice = store.create_user(new_user("alice")).unwrap();
        let bob = store.create_user(new_user("bob")).unwrap();

        store.create_match(alice.id, bob.id, 75.0).unwrap();

        let err = store.create_match(bob.id, alice.id, 75.0).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateMatch(_, _)));

        let err = store.create_match(alice.id, alice.id, 100.0).unwrap_err();
        assert!(matches!(err, StoreError::SelfMatch(_)));

        let err = store.create_match(alice.id, 99, 50.0).unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(99)));

        assert_eq!(store.matches_for(bob.id).len(), 1);
    }

    #[test]
    fn test_delete_user_cascades() {
        let store = InMemoryStore::new();
        let alice = store.create_user(new_user("alice")).unwrap();
        let bob = store.create_user(new_user("bob")).unwrap();
        store
            .upsert_preferences(alice.id, LifestylePreferences::default())
            .unwrap();
        store.create_match(alice.id, bob.id, 80.0).unwrap();

        store.delete_user(alice.id).unwrap();

        assert!(store.get_user(alice.id).is_none());
        assert!(store.get(alice.id).is_none());
        assert!(store.matches_for(bob.id).is_empty());
        assert!(store.list_all_except(bob.id).is_empty());

        // the pair is free again once a member is gone
        let carol = store.create_user(new_user("carol")).unwrap();
        assert!(store.create_match(bob.id, carol.id, 70.0).is_ok());

        assert!(matches!(store.delete_user(alice.id), Err(StoreError::UserNotFound(_))));
    }
}
