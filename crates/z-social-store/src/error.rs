//! Error types for z-social storage.

use z_social_core::SocialError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Username already claimed by another account.
    #[error("username already taken: {username}")]
    DuplicateUsername {
        /// The normalized username.
        username: String,
    },
}

impl From<StoreError> for SocialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity: "profile", id } => {
                Self::ProfileNotFound { account_id: id }
            }
            StoreError::NotFound { id, .. } => Self::AccountNotFound { account_id: id },
            StoreError::DuplicateUsername { username } => Self::DuplicateUsername { username },
            StoreError::Database(msg) => Self::Storage(msg),
            StoreError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}
