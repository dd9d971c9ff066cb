//! Profile handlers.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use z_social_core::{ProfileUpdate, SocialError};

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::extract::AccountPath;
use crate::pictures::PictureUpload;
use crate::social::{graph, profiles, query, AccountSummary, ProfileView};
use crate::state::AppState;

/// Multipart field carrying the picture.
pub const PICTURE_FIELD: &str = "picture";

/// Gender value that selects `custom_gender`.
pub const CUSTOM_GENDER: &str = "custom";

/// Edit-profile request body.
///
/// `bio` and `gender` default to empty and always overwrite; a missing or
/// blank `name` keeps the current one.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New bio.
    #[serde(default)]
    pub bio: String,
    /// New gender, or `"custom"` to use `custom_gender`.
    #[serde(default)]
    pub gender: String,
    /// Free-text gender used when `gender` is `"custom"`.
    #[serde(default)]
    pub custom_gender: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(body: UpdateProfileRequest) -> Self {
        let gender = if body.gender.trim().eq_ignore_ascii_case(CUSTOM_GENDER) {
            body.custom_gender.unwrap_or_default().trim().to_string()
        } else {
            body.gender
        };

        Self {
            name: body.name,
            bio: Some(body.bio),
            gender: Some(gender),
            picture_ref: None,
        }
    }
}

/// View the current account's own profile.
pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ProfileView>, ApiError> {
    let view = query::view_profile(state.store.as_ref(), auth.account_id, Some(auth.account_id))?;
    Ok(Json(view))
}

/// View any profile; relationship flags are relative to the caller, if any.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    viewer: MaybeAuthUser,
    AccountPath(account_id): AccountPath,
) -> Result<Json<ProfileView>, ApiError> {
    let view = query::view_profile(state.store.as_ref(), account_id, viewer.account_id())?;
    Ok(Json(view))
}

/// Edit name, bio, and gender.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    AccountPath(account_id): AccountPath,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileView>, ApiError> {
    let store = state.store.as_ref();
    profiles::upsert(store, auth.account_id, account_id, body.into())?;

    let view = query::view_profile(store, account_id, Some(auth.account_id))?;
    Ok(Json(view))
}

/// Replace the profile picture with the `picture` field of a multipart form.
pub async fn upload_picture(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    AccountPath(account_id): AccountPath,
    mut multipart: Multipart,
) -> Result<Json<ProfileView>, ApiError> {
    if auth.account_id != account_id {
        return Err(ApiError::Forbidden);
    }

    let limit = state.pictures.max_bytes();
    let upload = read_picture(&mut multipart, limit).await?;

    let store = state.store.as_ref();
    profiles::replace_picture(store, &state.pictures, auth.account_id, account_id, &upload).await?;

    let view = query::view_profile(store, account_id, Some(auth.account_id))?;
    Ok(Json(view))
}

/// Accounts following `account_id`.
pub async fn list_followers(
    State(state): State<Arc<AppState>>,
    AccountPath(account_id): AccountPath,
) -> Result<Json<Vec<AccountSummary>>, ApiError> {
    let store = state.store.as_ref();
    let accounts = graph::followers(store, account_id)?;
    Ok(Json(query::summaries(store, &accounts)?))
}

/// Accounts that `account_id` follows.
pub async fn list_following(
    State(state): State<Arc<AppState>>,
    AccountPath(account_id): AccountPath,
) -> Result<Json<Vec<AccountSummary>>, ApiError> {
    let store = state.store.as_ref();
    let accounts = graph::following(store, account_id)?;
    Ok(Json(query::summaries(store, &accounts)?))
}

/// Read the picture field, failing as soon as it grows past `limit`.
async fn read_picture(multipart: &mut Multipart, limit: usize) -> Result<PictureUpload, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e, limit))?
    {
        if field.name() != Some(PICTURE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(&e, limit))? {
            if bytes.len() + chunk.len() > limit {
                return Err(SocialError::PayloadTooLarge { limit_bytes: limit }.into());
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(PictureUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(ApiError::BadRequest(format!(
        "missing multipart field `{PICTURE_FIELD}`"
    )))
}

fn multipart_error(err: &MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit_bytes: limit }
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(gender: &str, custom: Option<&str>) -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: None,
            bio: String::new(),
            gender: gender.into(),
            custom_gender: custom.map(str::to_string),
        }
    }

    #[test]
    fn custom_gender_replaces_selector() {
        let update = ProfileUpdate::from(request("custom", Some(" agender ")));
        assert_eq!(update.gender.as_deref(), Some("agender"));
    }

    #[test]
    fn preset_gender_kept() {
        let update = ProfileUpdate::from(request("female", Some("ignored")));
        assert_eq!(update.gender.as_deref(), Some("female"));
    }

    #[test]
    fn missing_fields_overwrite_with_blank() {
        let body: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        let update = ProfileUpdate::from(body);
        assert_eq!(update.name, None);
        assert_eq!(update.bio.as_deref(), Some(""));
        assert_eq!(update.gender.as_deref(), Some(""));
    }
}
