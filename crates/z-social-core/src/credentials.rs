//! Password hashing.
//!
//! Passwords are hashed with Argon2id using a random per-password salt and
//! stored as PHC strings, so the parameters travel with the hash.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Result, SocialError};

/// Plaintext behind [`dummy_hash`]. Never accepted.
const DUMMY_PASSWORD: &[u8] = b"z-social-no-such-account";

/// Hash a raw password for storage.
///
/// # Errors
///
/// Returns `SocialError::InvalidPassword` for an empty password and
/// `SocialError::PasswordHash` if hashing fails.
pub fn hash_password(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(SocialError::InvalidPassword {
            reason: "password is required".into(),
        });
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SocialError::PasswordHash(e.to_string()))
}

/// Check a raw password against a stored PHC string.
///
/// A malformed stored hash is treated as a mismatch.
#[must_use]
pub fn verify_password(raw: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };

    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok()
}

/// Run a full verification against a fixed hash and discard the result.
///
/// Called when there is no stored hash to check, so a login for an unknown
/// username costs the same as one with a wrong password.
pub fn verify_against_dummy(raw: &str) {
    let matched = verify_password(raw, dummy_hash());
    std::hint::black_box(matched);
}

fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    DUMMY_HASH.get_or_init(|| {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(DUMMY_PASSWORD, &salt)
            .map(|hash| hash.to_string())
            .unwrap_or_default()
    })
}
