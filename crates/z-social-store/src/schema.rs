//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `account_id` (big-endian).
    pub const ACCOUNTS: &str = "accounts";

    /// Index: account id by normalized username.
    pub const ACCOUNTS_BY_USERNAME: &str = "accounts_by_username";

    /// Profile records, keyed by `account_id`.
    pub const PROFILES: &str = "profiles";

    /// Follow edges, keyed by `follower_id || followed_id`.
    pub const FOLLOWS: &str = "follows";

    /// Index: reverse follow edges, keyed by `followed_id || follower_id`.
    /// Value is empty (index only).
    pub const FOLLOWERS: &str = "followers";

    /// Counters and other bookkeeping.
    pub const META: &str = "meta";
}

/// Key in `meta` holding the next account id to allocate.
pub const NEXT_ACCOUNT_ID_KEY: &[u8] = b"next_account_id";

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::ACCOUNTS_BY_USERNAME,
        cf::PROFILES,
        cf::FOLLOWS,
        cf::FOLLOWERS,
        cf::META,
    ]
}
