//! Registration and login.

use z_social_core::{
    hash_password, verify_against_dummy, verify_password, Account, Result, SocialError, Username,
};
use z_social_store::Store;

/// Register a new account.
///
/// The username is trimmed, lowercased and validated; the password is hashed.
/// A default profile is created alongside the account. With
/// `auto_follow_first` set, every account except the first starts out
/// following the first account. The account, profile, and seed edge commit
/// together, so a failed registration leaves nothing behind.
///
/// Hashing is CPU-bound; async callers should run this on a blocking thread.
///
/// # Errors
///
/// - `SocialError::InvalidUsername` if the username is malformed.
/// - `SocialError::InvalidPassword` if the password is empty.
/// - `SocialError::DuplicateUsername` if the username is taken.
pub fn register<S: Store + ?Sized>(
    store: &S,
    raw_username: &str,
    raw_password: &str,
    auto_follow_first: bool,
) -> Result<Account> {
    let username = Username::parse(raw_username)?;
    let password_hash = hash_password(raw_password)?;

    let account = store.register_account(&username, &password_hash, auto_follow_first)?;

    tracing::info!(account_id = %account.id, username = %account.username, "Account registered");

    Ok(account)
}

/// Check a username/password pair.
///
/// An unknown or malformed username still pays for one password check, so
/// both failures take about as long.
///
/// # Errors
///
/// Returns `SocialError::InvalidCredentials` for an unknown username and for a
/// wrong password alike.
pub fn authenticate<S: Store + ?Sized>(
    store: &S,
    raw_username: &str,
    raw_password: &str,
) -> Result<Account> {
    let account = match Username::parse(raw_username) {
        Ok(username) => store.get_account_by_username(&username)?,
        Err(_) => None,
    };

    let Some(account) = account else {
        verify_against_dummy(raw_password);
        return Err(SocialError::InvalidCredentials);
    };

    if !verify_password(raw_password, &account.password_hash) {
        tracing::debug!(account_id = %account.id, "Password mismatch");
        return Err(SocialError::InvalidCredentials);
    }

    Ok(account)
}
