//! Session tokens and authentication extractors.
//!
//! This module provides:
//! - `issue_token` / `validate_token` - HS256 session tokens signed with the
//!   configured secret
//! - `AuthUser` - extractor that requires a valid token
//! - `MaybeAuthUser` - extractor for endpoints that also serve anonymous viewers

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use z_social_core::{Account, AccountId};

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated account extracted from a session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account ID.
    pub account_id: AccountId,
    /// The username at the time the token was issued.
    pub username: String,
}

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(ApiError::Unauthorized)?;
        authenticate_token(token, state)
    }
}

/// An optional viewer: `None` without an `Authorization` header.
///
/// A header that is present but invalid is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait::async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => authenticate_token(token, state).map(|user| Self(Some(user))),
            None => Ok(Self(None)),
        }
    }
}

impl MaybeAuthUser {
    /// The viewer's account id, if any.
    #[must_use]
    pub fn account_id(&self) -> Option<AccountId> {
        self.0.as_ref().map(|user| user.account_id)
    }
}

/// Extract the bearer token, if an `Authorization` header is present.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(Some)
        .ok_or(ApiError::Unauthorized)
}

fn authenticate_token(token: &str, state: &AppState) -> Result<AuthUser, ApiError> {
    let claims = validate_token(token, &state.config)?;

    let account_id = claims
        .sub
        .parse::<AccountId>()
        .map_err(|_| ApiError::Unauthorized)?;

    Ok(AuthUser {
        account_id,
        username: claims.username,
    })
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account ID).
    pub sub: String,
    /// Username.
    pub username: String,
    /// Issued at.
    pub iat: i64,
    /// Expiration time.
    pub exp: i64,
}

/// Sign a session token for `account`.
pub fn issue_token(account: &Account, config: &ServiceConfig) -> Result<String, ApiError> {
    let now = chrono::Utc::now().timestamp();
    let ttl = i64::try_from(config.token_ttl_seconds).unwrap_or(i64::MAX);

    let claims = TokenClaims {
        sub: account.id.to_string(),
        username: account.username.to_string(),
        iat: now,
        exp: now.saturating_add(ttl),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

/// Verify signature and expiry of a session token.
pub fn validate_token(token: &str, config: &ServiceConfig) -> Result<TokenClaims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Session token validation failed");
        ApiError::Unauthorized
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use z_social_core::Username;

    fn config(secret: &str) -> ServiceConfig {
        ServiceConfig {
            secret_key: secret.into(),
            ..ServiceConfig::default()
        }
    }

    fn account() -> Account {
        Account::new(
            AccountId::new(7),
            Username::parse("alice").unwrap(),
            "hash".into(),
        )
    }

    #[test]
    fn token_roundtrip() {
        let config = config("test-secret");
        let token = issue_token(&account(), &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let token = issue_token(&account(), &config("one")).unwrap();
        assert!(matches!(
            validate_token(&token, &config("two")),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let config = config("test-secret");
        let claims = TokenClaims {
            sub: "7".into(),
            username: "alice".into(),
            iat: 0,
            exp: 1,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret_key.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }
}
