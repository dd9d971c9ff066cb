//! Search handler.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::social::{query, SearchOutcome};
use crate::state::AppState;

/// Where a blank search sends the caller.
pub const BLANK_SEARCH_REDIRECT: &str = "/v1/profiles/me";

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Substring to look for in usernames and display names.
    #[serde(default)]
    pub q: Option<String>,
}

/// Search accounts by username or display name, excluding the caller.
///
/// A missing or blank `q` redirects to the caller's own profile.
pub async fn search(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let q = params.q.unwrap_or_default();

    match query::search(state.store.as_ref(), &q, Some(auth.account_id))? {
        SearchOutcome::NotPerformed => Ok(Redirect::to(BLANK_SEARCH_REDIRECT).into_response()),
        SearchOutcome::Results(results) => Ok(Json(results).into_response()),
    }
}
