//! Error types for challenge loading and configuration
//!
//! Scoring itself never fails: missing data degrades to a low score.
//! These errors only surface at the content/config boundary.

use thiserror::Error;

/// Mix coach error type
#[derive(Error, Debug)]
pub enum MixCoachError {
    /// Challenge or config JSON could not be parsed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Challenge definition is structurally unusable
    #[error("Invalid challenge '{id}': {reason}")]
    InvalidChallenge {
        /// Challenge id (may be empty)
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// Scoring configuration is out of contract
    #[error("Invalid scoring config: {0}")]
    InvalidConfig(String),

    /// Challenge id not present in the loaded set
    #[error("Unknown challenge: {0}")]
    UnknownChallenge(String),
}

impl MixCoachError {
    pub(crate) fn invalid_challenge(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidChallenge {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for loading and validation
pub type MixCoachResult<T> = Result<T, MixCoachError>;
