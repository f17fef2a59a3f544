use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use devenglish_core::model::{DeclaredCategory, ProfileError, ProfileStatus, UserProfile};
use devenglish_core::progress::{LevelProgress, ResumePositions};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Namespace prefix under which every profile record is stored.
pub const PROFILE_NAMESPACE: &str = "devEnglish";

/// Structured storage key for a profile: `(namespace, username)`.
///
/// Kept as a composite rather than a concatenated string so a username
/// containing the delimiter cannot collide with another key. `Display`
/// renders the legacy concatenated form for logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    namespace: String,
    username: String,
}

impl ProfileKey {
    #[must_use]
    pub fn new(namespace: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            username: username.into(),
        }
    }

    /// Key for a user under the default namespace.
    #[must_use]
    pub fn for_user(username: impl Into<String>) -> Self {
        Self::new(PROFILE_NAMESPACE, username)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.namespace, self.username)
    }
}

/// Persisted shape for a profile, one JSON blob per user.
///
/// This mirrors the domain `UserProfile` so repositories can
/// serialize/deserialize without leaking storage concerns into the domain
/// layer. Every field is defaulted: records written by older versions load
/// without error, absent fields taking the documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default)]
    pub level_progress: LevelProgress,
    #[serde(default)]
    pub total_progress: f64,
    #[serde(default)]
    pub resume_position: ResumePositions,
    #[serde(default)]
    pub declared_category: DeclaredCategory,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            level_progress: profile.level_progress().clone(),
            total_progress: profile.total_progress(),
            resume_position: profile.resume_positions().clone(),
            declared_category: profile.declared_category(),
            status: profile.status(),
            updated_at: Some(profile.updated_at()),
        }
    }

    /// Convert the record back into a domain `UserProfile`.
    ///
    /// The aggregate percentage is recomputed from the per-level values;
    /// the stored `total_progress` is only a display cache. `now` stamps
    /// records that predate the `updatedAt` field.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if the username is empty.
    pub fn into_profile(
        self,
        username: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, ProfileError> {
        UserProfile::from_persisted(
            username,
            self.declared_category,
            self.status,
            self.level_progress,
            self.resume_position,
            self.updated_at.unwrap_or(now),
        )
    }
}

/// Repository contract for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on I/O or decode failure. A missing record is
    /// `Ok(None)`, not an error.
    async fn load_profile(&self, key: &ProfileKey) -> Result<Option<ProfileRecord>, StorageError>;

    /// Persist or update the record stored under `key`, committing durably
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_profile(&self, key: &ProfileKey, record: &ProfileRecord)
    -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<ProfileKey, ProfileRecord>>>,
}

impl InMemoryProfileRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored records; used by tests to assert write counts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn record_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn load_profile(&self, key: &ProfileKey) -> Result<Option<ProfileRecord>, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save_profile(
        &self,
        key: &ProfileKey,
        record: &ProfileRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.clone(), record.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let profiles: Arc<dyn ProfileRepository> = Arc::new(InMemoryProfileRepository::new());
        Self { profiles }
    }
}
