//! Key encoding utilities for `RocksDB`.
//!
//! Account ids are encoded big-endian so that iteration order is id order.

use z_social_core::{AccountId, Username};

use crate::error::{Result, StoreError};

/// Create an account (or profile) key from an account ID.
#[must_use]
pub fn account_key(account_id: AccountId) -> Vec<u8> {
    account_id.to_bytes().to_vec()
}

/// Create a username index key.
#[must_use]
pub fn username_key(username: &Username) -> Vec<u8> {
    username.as_str().as_bytes().to_vec()
}

/// Create an edge key.
///
/// Format: `first (8 bytes) || second (8 bytes)`. Used for both `follows`
/// (`follower || followed`) and `followers` (`followed || follower`).
#[must_use]
pub fn edge_key(first: AccountId, second: AccountId) -> Vec<u8> {
    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&first.to_bytes());
    key.extend_from_slice(&second.to_bytes());
    key
}

/// Create a prefix for iterating all edges whose first half is `account_id`.
#[must_use]
pub fn edge_prefix(account_id: AccountId) -> Vec<u8> {
    account_id.to_bytes().to_vec()
}

/// Extract the second account id from an edge key.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the key is not 16 bytes.
pub fn edge_second(key: &[u8]) -> Result<AccountId> {
    key.get(8..16)
        .filter(|_| key.len() == 16)
        .ok_or_else(|| StoreError::Serialization(format!("bad edge key length {}", key.len())))
        .and_then(decode_account_id)
}

/// Decode an account id stored as a key or value.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the bytes are not a valid id.
pub fn decode_account_id(bytes: &[u8]) -> Result<AccountId> {
    AccountId::from_bytes(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}
