//! Registration, login, and current-account handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use z_social_core::{Account, AccountId};

use crate::auth::{issue_token, AuthUser};
use crate::error::ApiError;
use crate::social::{credentials, graph};
use crate::state::AppState;

/// Account response. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Normalized username.
    pub username: String,
    /// Created timestamp.
    pub created_at: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.to_string(),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Response to a successful register or login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The account.
    pub account: AccountResponse,
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Always "Bearer".
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Register / login request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Username; normalized server-side.
    pub username: String,
    /// Raw password.
    pub password: String,
}

fn session(state: &AppState, account: &Account) -> Result<SessionResponse, ApiError> {
    Ok(SessionResponse {
        account: AccountResponse::from(account),
        token: issue_token(account, &state.config)?,
        token_type: "Bearer",
        expires_in: state.config.token_ttl_seconds,
    })
}

/// Run password hashing on the blocking pool instead of an async worker.
async fn off_runtime<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> z_social_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("password task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Create a new account and log it in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let store = Arc::clone(&state.store);
    let auto_follow = state.config.auto_follow_first_account;

    let account = off_runtime(move || {
        credentials::register(store.as_ref(), &body.username, &body.password, auto_follow)
    })
    .await?;

    Ok(Json(session(&state, &account)?))
}

/// Exchange username and password for a session token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let store = Arc::clone(&state.store);

    let account = off_runtime(move || {
        credentials::authenticate(store.as_ref(), &body.username, &body.password)
    })
    .await?;

    tracing::info!(account_id = %account.id, "Logged in");

    Ok(Json(session(&state, &account)?))
}

/// Get the current account.
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = graph::require_account(state.store.as_ref(), auth.account_id)?;

    Ok(Json(AccountResponse::from(&account)))
}
