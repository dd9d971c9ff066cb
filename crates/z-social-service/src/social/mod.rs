//! The social service: registration, profiles, the follow graph, and search.
//!
//! Everything here is a free function over a [`Store`](z_social_store::Store).
//! The acting account is always an explicit argument; nothing reads session
//! state. Each submodule maps to one concern:
//!
//! - [`credentials`]: `register`, `authenticate`
//! - [`profiles`]: `create_default`, `get`, `upsert`, `replace_picture`
//! - [`graph`]: `follow`, `unfollow`, `is_following`, `followers`, `following`
//! - [`query`]: `view_profile`, `search`

pub mod credentials;
pub mod graph;
pub mod profiles;
pub mod query;

pub use query::{AccountSummary, ProfileView, SearchOutcome};
