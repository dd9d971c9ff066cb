//! Identifier types for z-social.
//!
//! Accounts are identified by a numeric id allocated by the store. Ids are
//! handed out in increasing order, so sorting by id is sorting by signup time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account identifier.
///
/// Serialized as a plain JSON number. Encoded big-endian in storage keys so
/// that byte order matches numeric order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u64);

impl AccountId {
    /// The id assigned to the very first account.
    pub const FIRST: Self = Self(1);

    /// Create an identifier from a raw number.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Return the raw number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Big-endian bytes, used for storage keys.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Decode an id from big-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns `IdError::InvalidLength` if the slice is not exactly 8 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| IdError::InvalidLength)?;
        Ok(Self(u64::from_be_bytes(raw)))
    }
}

impl FromStr for AccountId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| IdError::InvalidNumber)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a non-negative integer.
    #[error("invalid numeric id")]
    InvalidNumber,

    /// The stored key has the wrong length.
    #[error("invalid id length")]
    InvalidLength,
}
