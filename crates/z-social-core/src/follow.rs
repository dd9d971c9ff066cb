//! Follow relationships.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SocialError};
use crate::AccountId;

/// A directed edge: `follower` follows `followed`.
///
/// The `(follower, followed)` pair identifies the edge; there is at most one
/// per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    /// The account doing the following.
    pub follower: AccountId,

    /// The account being followed.
    pub followed: AccountId,

    /// When the edge was created.
    pub created_at: DateTime<Utc>,
}

impl FollowEdge {
    /// Create a new edge.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::SelfFollow` if both ends are the same account.
    pub fn new(follower: AccountId, followed: AccountId) -> Result<Self> {
        if follower == followed {
            return Err(SocialError::SelfFollow);
        }
        Ok(Self {
            follower,
            followed,
            created_at: Utc::now(),
        })
    }
}
