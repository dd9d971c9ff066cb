//! `RocksDB` storage layer for z-social.
//!
//! This crate provides persistent storage for accounts, profiles, and the
//! follow graph using `RocksDB` with column families for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Primary account records, keyed by `account_id`
//! - `accounts_by_username`: Unique index from normalized username to `account_id`
//! - `profiles`: Profile records, keyed by `account_id`
//! - `follows`: Follow edges, keyed by `follower_id || followed_id`
//! - `followers`: Reverse index, keyed by `followed_id || follower_id`
//! - `meta`: The account id counter
//!
//! # Example
//!
//! ```no_run
//! use z_social_store::{RocksStore, Store};
//! use z_social_core::{hash_password, Profile, Username};
//!
//! let store = RocksStore::open("/tmp/z-social-db").unwrap();
//!
//! let username = Username::parse("alice").unwrap();
//! let account = store
//!     .insert_account(&username, &hash_password("secret").unwrap())
//!     .unwrap();
//! store.put_profile(&Profile::new_default(account.id)).unwrap();
//!
//! let found = store.get_account_by_username(&username).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use z_social_core::{Account, AccountId, FollowEdge, Profile, Username};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer so the social service can be
/// written against it rather than against `RocksDB` directly.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Allocate the next account id and insert a new account.
    ///
    /// Username uniqueness is checked and the account committed atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateUsername` if the username is taken.
    fn insert_account(&self, username: &Username, password_hash: &str) -> Result<Account>;

    /// Insert a new account with its default profile in one commit.
    ///
    /// With `follow_first` set and another account already present, a follow
    /// edge from the new account to the first account is part of the same
    /// commit. Either everything is written or nothing is.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateUsername` if the username is taken.
    fn register_account(
        &self,
        username: &Username,
        password_hash: &str,
        follow_first: bool,
    ) -> Result<Account>;

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, account_id: AccountId) -> Result<Option<Account>>;

    /// Get an account by normalized username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account_by_username(&self, username: &Username) -> Result<Option<Account>>;

    /// List all accounts in id (signup) order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// The lowest account id present, if any account exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn first_account_id(&self) -> Result<Option<AccountId>>;

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Insert or replace a profile record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_profile(&self, profile: &Profile) -> Result<()>;

    /// Get the profile belonging to an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>>;

    // =========================================================================
    // Follow Graph Operations
    // =========================================================================

    /// Insert a follow edge if absent.
    ///
    /// Returns `true` if the edge was created, `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if either account doesn't exist.
    fn put_follow(&self, edge: &FollowEdge) -> Result<bool>;

    /// Delete a follow edge if present.
    ///
    /// Returns `true` if an edge was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn delete_follow(&self, follower: AccountId, followed: AccountId) -> Result<bool>;

    /// Check whether `follower` follows `followed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_follow(&self, follower: AccountId, followed: AccountId) -> Result<bool>;

    /// Ids of accounts following `account_id`, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_followers(&self, account_id: AccountId) -> Result<Vec<AccountId>>;

    /// Ids of accounts that `account_id` follows, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_following(&self, account_id: AccountId) -> Result<Vec<AccountId>>;
}
