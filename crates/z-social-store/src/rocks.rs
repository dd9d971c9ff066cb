//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use z_social_core::{Account, AccountId, FollowEdge, Profile, Username};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf, NEXT_ACCOUNT_ID_KEY};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes read-check-write sequences (id allocation, username
    /// uniqueness, edge insert/delete) so each commits as one batch.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_value<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn key_exists(&self, cf_name: &str, key: &[u8]) -> Result<bool> {
        let cf = self.cf(cf_name)?;

        let exists = self
            .db
            .get_pinned_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();

        Ok(exists)
    }

    /// Read the id counter. An empty database starts at `AccountId::FIRST`.
    fn next_account_id(&self) -> Result<AccountId> {
        let cf = self.cf(cf::META)?;

        match self
            .db
            .get_cf(&cf, NEXT_ACCOUNT_ID_KEY)
            .map_err(|e| StoreError::Database(e.to_string()))?
        {
            Some(bytes) => keys::decode_account_id(&bytes),
            None => Ok(AccountId::FIRST),
        }
    }

    /// Allocate an id and commit the account, its username index entry, and
    /// optionally its default profile and seed follow edge as one batch.
    fn create_account(
        &self,
        username: &Username,
        password_hash: &str,
        with_profile: bool,
        follow_first: bool,
    ) -> Result<Account> {
        let _guard = self.lock()?;

        let username_key = keys::username_key(username);
        if self.key_exists(cf::ACCOUNTS_BY_USERNAME, &username_key)? {
            return Err(StoreError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        let id = self.next_account_id()?;
        let account = Account::new(id, username.clone(), password_hash.to_string());

        let seed_edge = if follow_first {
            self.first_account_id()?
                .and_then(|first| FollowEdge::new(id, first).ok())
        } else {
            None
        };

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_by_username = self.cf(cf::ACCOUNTS_BY_USERNAME)?;
        let cf_meta = self.cf(cf::META)?;

        let account_value = Self::serialize(&account)?;

        // Write atomically
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, keys::account_key(id), &account_value);
        batch.put_cf(&cf_by_username, &username_key, id.to_bytes());
        batch.put_cf(&cf_meta, NEXT_ACCOUNT_ID_KEY, id.next().to_bytes());

        if with_profile {
            let cf_profiles = self.cf(cf::PROFILES)?;
            let profile = Self::serialize(&Profile::new_default(id))?;
            batch.put_cf(&cf_profiles, keys::account_key(id), &profile);
        }

        if let Some(edge) = &seed_edge {
            let cf_follows = self.cf(cf::FOLLOWS)?;
            let cf_followers = self.cf(cf::FOLLOWERS)?;
            batch.put_cf(
                &cf_follows,
                keys::edge_key(edge.follower, edge.followed),
                Self::serialize(edge)?,
            );
            batch.put_cf(&cf_followers, keys::edge_key(edge.followed, edge.follower), []);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(
            account_id = %id,
            username = %username,
            seeded_follow = seed_edge.is_some(),
            "Account inserted"
        );

        Ok(account)
    }

    /// Collect the second half of every edge key starting with `account_id`.
    fn edge_targets(&self, cf_name: &str, account_id: AccountId) -> Result<Vec<AccountId>> {
        let cf = self.cf(cf_name)?;
        let prefix = keys::edge_prefix(account_id);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut ids = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            ids.push(keys::edge_second(&key)?);
        }

        Ok(ids)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn insert_account(&self, username: &Username, password_hash: &str) -> Result<Account> {
        self.create_account(username, password_hash, false, false)
    }

    fn register_account(
        &self,
        username: &Username,
        password_hash: &str,
        follow_first: bool,
    ) -> Result<Account> {
        self.create_account(username, password_hash, true, follow_first)
    }

    fn get_account(&self, account_id: AccountId) -> Result<Option<Account>> {
        self.get_value(cf::ACCOUNTS, &keys::account_key(account_id))
    }

    fn get_account_by_username(&self, username: &Username) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS_BY_USERNAME)?;

        let Some(id_bytes) = self
            .db
            .get_cf(&cf, keys::username_key(username))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        self.get_account(keys::decode_account_id(&id_bytes)?)
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;

        let mut accounts = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            accounts.push(Self::deserialize(&value)?);
        }

        Ok(accounts)
    }

    fn first_account_id(&self) -> Result<Option<AccountId>> {
        let cf = self.cf(cf::ACCOUNTS)?;

        self.db
            .iterator_cf(&cf, IteratorMode::Start)
            .next()
            .transpose()
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|(key, _)| keys::decode_account_id(&key))
            .transpose()
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    fn put_profile(&self, profile: &Profile) -> Result<()> {
        let cf = self.cf(cf::PROFILES)?;
        let key = keys::account_key(profile.account_id);
        let value = Self::serialize(profile)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_profile(&self, account_id: AccountId) -> Result<Option<Profile>> {
        self.get_value(cf::PROFILES, &keys::account_key(account_id))
    }

    // =========================================================================
    // Follow Graph Operations
    // =========================================================================

    fn put_follow(&self, edge: &FollowEdge) -> Result<bool> {
        let _guard = self.lock()?;

        for id in [edge.follower, edge.followed] {
            if !self.key_exists(cf::ACCOUNTS, &keys::account_key(id))? {
                return Err(StoreError::NotFound {
                    entity: "account",
                    id: id.to_string(),
                });
            }
        }

        let follow_key = keys::edge_key(edge.follower, edge.followed);
        if self.key_exists(cf::FOLLOWS, &follow_key)? {
            return Ok(false);
        }

        let cf_follows = self.cf(cf::FOLLOWS)?;
        let cf_followers = self.cf(cf::FOLLOWERS)?;
        let value = Self::serialize(edge)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_follows, &follow_key, &value);
        batch.put_cf(&cf_followers, keys::edge_key(edge.followed, edge.follower), []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(follower = %edge.follower, followed = %edge.followed, "Follow edge inserted");

        Ok(true)
    }

    fn delete_follow(&self, follower: AccountId, followed: AccountId) -> Result<bool> {
        let _guard = self.lock()?;

        let follow_key = keys::edge_key(follower, followed);
        if !self.key_exists(cf::FOLLOWS, &follow_key)? {
            return Ok(false);
        }

        let cf_follows = self.cf(cf::FOLLOWS)?;
        let cf_followers = self.cf(cf::FOLLOWERS)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_follows, &follow_key);
        batch.delete_cf(&cf_followers, keys::edge_key(followed, follower));

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(follower = %follower, followed = %followed, "Follow edge deleted");

        Ok(true)
    }

    fn has_follow(&self, follower: AccountId, followed: AccountId) -> Result<bool> {
        self.key_exists(cf::FOLLOWS, &keys::edge_key(follower, followed))
    }

    fn list_followers(&self, account_id: AccountId) -> Result<Vec<AccountId>> {
        self.edge_targets(cf::FOLLOWERS, account_id)
    }

    fn list_following(&self, account_id: AccountId) -> Result<Vec<AccountId>> {
        self.edge_targets(cf::FOLLOWS, account_id)
    }
}
