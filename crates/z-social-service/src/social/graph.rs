//! Follow graph operations.
//!
//! Edge existence is the only source of truth; counts are computed from the
//! edge lists at read time.

use z_social_core::{Account, AccountId, FollowEdge, Result, SocialError};
use z_social_store::Store;

/// Make `follower` follow `followed`. Following twice is a no-op.
///
/// Returns `true` if a new edge was created.
///
/// # Errors
///
/// - `SocialError::SelfFollow` if both ids are the same.
/// - `SocialError::AccountNotFound` if either account doesn't exist.
pub fn follow<S: Store + ?Sized>(store: &S, follower: AccountId, followed: AccountId) -> Result<bool> {
    let edge = FollowEdge::new(follower, followed)?;
    let created = store.put_follow(&edge)?;

    if created {
        tracing::info!(follower = %follower, followed = %followed, "Followed");
    }

    Ok(created)
}

/// Remove the edge `follower → followed`. Unfollowing twice is a no-op.
///
/// Returns `true` if an edge was removed.
///
/// # Errors
///
/// Returns `SocialError::AccountNotFound` if `followed` doesn't exist.
pub fn unfollow<S: Store + ?Sized>(store: &S, follower: AccountId, followed: AccountId) -> Result<bool> {
    require_account(store, followed)?;
    let removed = store.delete_follow(follower, followed)?;

    if removed {
        tracing::info!(follower = %follower, followed = %followed, "Unfollowed");
    }

    Ok(removed)
}

/// Whether `follower` follows `followed`.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn is_following<S: Store + ?Sized>(store: &S, follower: AccountId, followed: AccountId) -> Result<bool> {
    Ok(store.has_follow(follower, followed)?)
}

/// Whether `account_id` is followed by `other`.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn is_followed_by<S: Store + ?Sized>(store: &S, account_id: AccountId, other: AccountId) -> Result<bool> {
    is_following(store, other, account_id)
}

/// Accounts following `account_id`, in id order.
///
/// # Errors
///
/// Returns `SocialError::AccountNotFound` if the account doesn't exist.
pub fn followers<S: Store + ?Sized>(store: &S, account_id: AccountId) -> Result<Vec<Account>> {
    require_account(store, account_id)?;
    load_accounts(store, store.list_followers(account_id)?)
}

/// Accounts that `account_id` follows, in id order.
///
/// # Errors
///
/// Returns `SocialError::AccountNotFound` if the account doesn't exist.
pub fn following<S: Store + ?Sized>(store: &S, account_id: AccountId) -> Result<Vec<Account>> {
    require_account(store, account_id)?;
    load_accounts(store, store.list_following(account_id)?)
}

pub(crate) fn require_account<S: Store + ?Sized>(store: &S, account_id: AccountId) -> Result<Account> {
    store
        .get_account(account_id)?
        .ok_or_else(|| SocialError::AccountNotFound {
            account_id: account_id.to_string(),
        })
}

fn load_accounts<S: Store + ?Sized>(store: &S, ids: Vec<AccountId>) -> Result<Vec<Account>> {
    let mut accounts = Vec::with_capacity(ids.len());
    for id in ids {
        match store.get_account(id)? {
            Some(account) => accounts.push(account),
            None => tracing::warn!(account_id = %id, "Follow edge references missing account"),
        }
    }
    Ok(accounts)
}
