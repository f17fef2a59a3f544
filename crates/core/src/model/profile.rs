use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::{LevelProgress, ResumePositions, total_percent};

use super::LevelId;

/// Category declared at signup. Affects only a decorative indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredCategory {
    Masculine,
    Feminine,
    Undisclosed,
    #[default]
    Unset,
}

impl DeclaredCategory {
    /// Decorative header indicator; empty for undisclosed/unset.
    #[must_use]
    pub fn indicator(self) -> &'static str {
        match self {
            DeclaredCategory::Masculine => "👨‍💻",
            DeclaredCategory::Feminine => "👩‍💻",
            DeclaredCategory::Undisclosed | DeclaredCategory::Unset => "",
        }
    }
}

/// Lifecycle status of a stored profile.
///
/// A profile is created `Provisional` when login finds no record, before
/// signup has collected the declared category. Records written without a
/// status (legacy shape) read back as `Complete`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Provisional,
    #[default]
    Complete,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("username cannot be empty")]
    EmptyUsername,
}

/// The durable record of one user's progress and declared category.
///
/// Identity is the username string, case-sensitive, immutable once a profile
/// exists under that key. The aggregate percentage is derived state: it is
/// recomputed on every mutation and on hydration, never trusted from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    username: String,
    declared_category: DeclaredCategory,
    status: ProfileStatus,
    level_progress: LevelProgress,
    resume_positions: ResumePositions,
    total_progress: f64,
    updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a provisional profile seeded from whatever progress is
    /// currently in memory (all zero on a fresh install).
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::EmptyUsername` if the username is empty.
    pub fn provisional(
        username: impl Into<String>,
        declared_category: DeclaredCategory,
        level_progress: LevelProgress,
        resume_positions: ResumePositions,
        now: DateTime<Utc>,
    ) -> Result<Self, ProfileError> {
        let username = username.into();
        if username.is_empty() {
            return Err(ProfileError::EmptyUsername);
        }
        let total_progress = total_percent(&level_progress);
        Ok(Self {
            username,
            declared_category,
            status: ProfileStatus::Provisional,
            level_progress,
            resume_positions,
            total_progress,
            updated_at: now,
        })
    }

    /// Rehydrates a profile from persisted storage, recomputing the
    /// aggregate from the per-level values.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::EmptyUsername` if the username is empty.
    pub fn from_persisted(
        username: impl Into<String>,
        declared_category: DeclaredCategory,
        status: ProfileStatus,
        level_progress: LevelProgress,
        resume_positions: ResumePositions,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ProfileError> {
        let username = username.into();
        if username.is_empty() {
            return Err(ProfileError::EmptyUsername);
        }
        let total_progress = total_percent(&level_progress);
        Ok(Self {
            username,
            declared_category,
            status,
            level_progress,
            resume_positions,
            total_progress,
            updated_at,
        })
    }

    /// Records a per-level percentage and recomputes the aggregate.
    pub fn set_level_progress(&mut self, level: LevelId, percent: f64, now: DateTime<Utc>) {
        self.level_progress.set(level, percent);
        self.total_progress = total_percent(&self.level_progress);
        self.updated_at = now;
    }

    /// Marks a level fully read. Forces exactly 100.0, a defensive clamp
    /// over the percentage formula.
    pub fn complete_level(&mut self, level: LevelId, now: DateTime<Utc>) {
        self.set_level_progress(level, 100.0, now);
    }

    pub fn set_resume_position(&mut self, level: LevelId, index: usize, now: DateTime<Utc>) {
        self.resume_positions.set(level, index);
        self.updated_at = now;
    }

    /// Resolves a provisional profile once signup validation succeeds.
    pub fn finalize_signup(&mut self, declared_category: DeclaredCategory, now: DateTime<Utc>) {
        self.declared_category = declared_category;
        self.status = ProfileStatus::Complete;
        self.updated_at = now;
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn declared_category(&self) -> DeclaredCategory {
        self.declared_category
    }

    #[must_use]
    pub fn status(&self) -> ProfileStatus {
        self.status
    }

    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.status == ProfileStatus::Provisional
    }

    #[must_use]
    pub fn level_progress(&self) -> &LevelProgress {
        &self.level_progress
    }

    #[must_use]
    pub fn resume_positions(&self) -> &ResumePositions {
        &self.resume_positions
    }

    #[must_use]
    pub fn total_progress(&self) -> f64 {
        self.total_progress
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
