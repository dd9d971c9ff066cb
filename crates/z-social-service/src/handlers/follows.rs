//! Follow and unfollow handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use z_social_core::AccountId;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::AccountPath;
use crate::social::graph;
use crate::state::AppState;

/// Relationship state after a follow or unfollow.
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    /// The account that was (un)followed.
    pub account_id: AccountId,
    /// Whether the caller now follows it.
    pub following: bool,
    /// Whether this request changed anything.
    pub changed: bool,
    /// Its follower count afterwards.
    pub followers_count: usize,
}

fn respond(
    state: &AppState,
    auth: &AuthUser,
    account_id: AccountId,
    changed: bool,
) -> Result<FollowResponse, ApiError> {
    let store = state.store.as_ref();
    Ok(FollowResponse {
        account_id,
        following: graph::is_following(store, auth.account_id, account_id)?,
        changed,
        followers_count: graph::followers(store, account_id)?.len(),
    })
}

/// Follow an account. Repeating the call is a no-op.
pub async fn follow(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    AccountPath(account_id): AccountPath,
) -> Result<Json<FollowResponse>, ApiError> {
    let created = graph::follow(state.store.as_ref(), auth.account_id, account_id)?;
    Ok(Json(respond(&state, &auth, account_id, created)?))
}

/// Unfollow an account. Repeating the call is a no-op.
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    AccountPath(account_id): AccountPath,
) -> Result<Json<FollowResponse>, ApiError> {
    let removed = graph::unfollow(state.store.as_ref(), auth.account_id, account_id)?;
    Ok(Json(respond(&state, &auth, account_id, removed)?))
}
