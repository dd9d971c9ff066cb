//! Error types for z-social.

use crate::ids::IdError;

/// Result type for z-social operations.
pub type Result<T> = std::result::Result<T, SocialError>;

/// Errors that can occur in z-social operations.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// Username is empty, too long, or contains characters outside `[a-z0-9_-]`.
    #[error("invalid username: {reason}")]
    InvalidUsername {
        /// Why the username was rejected.
        reason: String,
    },

    /// Password cannot be used for a new account.
    #[error("invalid password: {reason}")]
    InvalidPassword {
        /// Why the password was rejected.
        reason: String,
    },

    /// Username is already taken.
    #[error("username already taken: {username}")]
    DuplicateUsername {
        /// The normalized username.
        username: String,
    },

    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The acting account may not modify the target account.
    #[error("forbidden")]
    Forbidden,

    /// Account not found.
    #[error("account not found: {account_id}")]
    AccountNotFound {
        /// The account ID that was not found.
        account_id: String,
    },

    /// Profile not found.
    #[error("profile not found for account {account_id}")]
    ProfileNotFound {
        /// The account whose profile is missing.
        account_id: String,
    },

    /// An account tried to follow itself.
    #[error("accounts cannot follow themselves")]
    SelfFollow,

    /// Uploaded picture is over the size limit.
    #[error("upload exceeds {limit_bytes} bytes")]
    PayloadTooLarge {
        /// The configured limit in bytes.
        limit_bytes: usize,
    },

    /// Uploaded picture is missing or of an unsupported kind.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// Profile field failed validation.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Password hashing failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
