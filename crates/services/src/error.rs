//! Shared error types for the services crate.

use thiserror::Error;

use devenglish_core::model::{LevelId, ProfileError, ValidationError};

/// Errors loading a level's phrase sequence.
///
/// Surfaced to the user as an alert; navigation does not proceed to the
/// reading screen.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("could not load phrases for level {level}: {source}")]
    Parse {
        level: LevelId,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors emitted by `SessionController`.
///
/// Storage failures never appear here: persistence is best-effort and only
/// logged. Every variant is recoverable by re-prompting the user.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
