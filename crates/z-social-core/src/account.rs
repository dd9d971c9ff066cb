//! Account types for z-social.
//!
//! An account is the credential half of a user: a unique username and a
//! password hash. Everything public-facing lives on the `Profile`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SocialError;
use crate::AccountId;

/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 150;

/// A normalized username.
///
/// Construction trims surrounding whitespace and lowercases, then checks the
/// result against `[a-z0-9_-]+`. Two raw inputs that differ only in case
/// produce equal `Username`s.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Normalize and validate a raw username.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::InvalidUsername` if the normalized value is empty,
    /// longer than [`MAX_USERNAME_LEN`], or contains a disallowed character.
    pub fn parse(raw: &str) -> Result<Self, SocialError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(invalid("username is required"));
        }
        if normalized.chars().count() > MAX_USERNAME_LEN {
            return Err(invalid(&format!(
                "username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if !normalized.chars().all(is_username_char) {
            return Err(invalid(
                "only lowercase letters, digits, underscores and hyphens are allowed",
            ));
        }

        Ok(Self(normalized))
    }

    /// The normalized username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

fn invalid(reason: &str) -> SocialError {
    SocialError::InvalidUsername {
        reason: reason.to_string(),
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({})", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = SocialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Store-allocated identifier.
    pub id: AccountId,

    /// Normalized, unique username.
    pub username: Username,

    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account record.
    #[must_use]
    pub fn new(id: AccountId, username: Username, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
