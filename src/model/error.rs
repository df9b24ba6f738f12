//! Errors carried as data inside failed [`Loadable`](super::Loadable) variants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recoverable errors surfaced to the UI.
///
/// The `Display` text is the single user-facing message for each variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadError {
    /// Search query was empty or whitespace.
    #[error("Query cannot be blank.")]
    BlankQuery,

    /// Search query has too few letters or digits.
    #[error("Query is too short to perform search.")]
    QueryTooShort,

    /// A collaborator call failed (HTTP, DNS, database).
    #[error("Failed to load places: {message}")]
    Network { message: String },

    /// A collaborator call did not complete in time.
    #[error("Loading places timed out after {after_ms} ms.")]
    Timeout { after_ms: u64 },

    /// Collaborator returned nothing.
    #[error("No places found.")]
    EmptyResponse,

    #[error("Location is disabled.")]
    LocationDisabled,

    #[error("Location permission was denied.")]
    LocationPermissionDenied,

    #[error("Failed to update location.")]
    LocationUpdateFailure,
}

impl LoadError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Validation errors stem from user input and are never retried automatically.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::BlankQuery | Self::QueryTooShort)
    }

    /// Errors worth retrying once the triggering condition clears.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::LocationUpdateFailure
        )
    }
}

impl From<RepoError> for LoadError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Unavailable(message) | RepoError::Malformed(message) => {
                LoadError::Network { message }
            }
            RepoError::NotFound { id } => LoadError::Network {
                message: format!("search {} not found", id),
            },
        }
    }
}

/// Failures reported by repository collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Search {id} not found")]
    NotFound { id: i64 },
}
