//! Core types and utilities for z-social.
//!
//! This crate provides the foundational types used throughout the z-social platform:
//!
//! - **Identifiers**: `AccountId`
//! - **Accounts**: `Account`, `Username`
//! - **Credentials**: `hash_password`, `verify_password`
//! - **Profiles**: `Profile`, `ProfileUpdate`
//! - **Social graph**: `FollowEdge`
//!
//! # Usernames
//!
//! Usernames are case-insensitive. They are trimmed and lowercased on the way in
//! and must match `[a-z0-9_-]+`, so `Alice` and ` alice ` name the same account.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod credentials;
pub mod error;
pub mod follow;
pub mod ids;
pub mod profile;

pub use account::{Account, Username, MAX_USERNAME_LEN};
pub use credentials::{hash_password, verify_against_dummy, verify_password};
pub use error::{Result, SocialError};
pub use follow::FollowEdge;
pub use ids::{AccountId, IdError};
pub use profile::{Profile, ProfileUpdate, DEFAULT_DISPLAY_NAME, MAX_NAME_LEN};
