//! Store-level error taxonomy.
//!
//! Not-found is signaled through `Option` return values at the call site, not
//! through this enum — [`StoreError`] covers the failure modes a store
//! operation can still have once "missing" has been ruled out.

use crate::error::ScimError;
use crate::resource::ScimVersion;

/// Failure modes a [`crate::store::Store`] operation can report.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A create collided with an existing item sharing the same natural key.
    #[error("item already exists: {container}/{id}")]
    AlreadyExists {
        /// The container the collision occurred in
        container: String,
        /// The colliding item id
        id: String,
    },

    /// A conditional write's expected version did not match the stored version.
    #[error("version conflict: expected {expected}, current {current}")]
    VersionConflict {
        /// The version the caller expected
        expected: String,
        /// The version actually stored
        current: String,
    },

    /// The item the caller tried to conditionally update does not exist.
    #[error("item not found: {container}/{id}")]
    NotFound {
        /// The container searched
        container: String,
        /// The missing item id
        id: String,
    },

    /// The backend itself failed (connection, I/O, serialization).
    #[error("store backend error: {message}")]
    Backend {
        /// Description of the backend failure
        message: String,
    },

    /// The caller's cancellation token was signaled before the store call began.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<StoreError> for ScimError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::AlreadyExists { id, .. } => ScimError::uniqueness("id", id),
            StoreError::VersionConflict { expected, current } => {
                ScimError::version_mismatch(expected, current)
            }
            StoreError::NotFound { container, id } => ScimError::resource_not_found(container, id),
            StoreError::Backend { message } => ScimError::ServerUnavailable { message },
            StoreError::Cancelled => ScimError::Cancelled,
        }
    }
}

impl StoreError {
    /// Build a version-conflict error from a caller-expected and a stored version.
    pub fn version_conflict(expected: &ScimVersion, current: &ScimVersion) -> Self {
        Self::VersionConflict {
            expected: expected.to_http_header(),
            current: current.to_http_header(),
        }
    }
}
