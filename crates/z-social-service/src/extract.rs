//! Request extractors with JSON error responses.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use z_social_core::AccountId;

use crate::error::ApiError;

/// The `:id` path segment as an [`AccountId`].
///
/// A segment that isn't a number is rejected with `ApiError::BadRequest`
/// instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct AccountPath(pub AccountId);

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AccountPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(account_id) = Path::<AccountId>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        Ok(Self(account_id))
    }
}
