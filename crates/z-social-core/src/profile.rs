//! Profile types for z-social.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SocialError};
use crate::AccountId;

/// Display name given to a profile at signup.
pub const DEFAULT_DISPLAY_NAME: &str = "New User";

/// Maximum display name length in characters.
pub const MAX_NAME_LEN: usize = 150;

/// The editable, public-facing part of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Owning account.
    pub account_id: AccountId,

    /// Display name.
    pub name: String,

    /// Free-text bio.
    pub bio: String,

    /// Free-text gender, including user-supplied custom values.
    pub gender: String,

    /// Filename of the stored profile picture, if any.
    pub picture_ref: Option<String>,

    /// When the profile was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh profile with the placeholder name and empty bio/gender.
    #[must_use]
    pub fn new_default(account_id: AccountId) -> Self {
        Self {
            account_id,
            name: DEFAULT_DISPLAY_NAME.to_string(),
            bio: String::new(),
            gender: String::new(),
            picture_ref: None,
            updated_at: Utc::now(),
        }
    }

    /// Apply a partial update in place.
    ///
    /// Returns the picture reference that was replaced, if the update swapped
    /// in a different one. The caller owns releasing that file.
    pub fn apply(&mut self, update: ProfileUpdate) -> Option<String> {
        if let Some(name) = update.name {
            let name = name.trim();
            if !name.is_empty() {
                self.name = name.to_string();
            }
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }

        let mut replaced = None;
        if let Some(picture_ref) = update.picture_ref {
            replaced = self
                .picture_ref
                .replace(picture_ref)
                .filter(|old| Some(old) != self.picture_ref.as_ref());
        }

        self.updated_at = Utc::now();
        replaced
    }
}

/// A partial profile update.
///
/// `None` leaves a field untouched. A blank `name` is ignored so the previous
/// name is kept; `bio` and `gender` are written as given, blank included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New bio.
    pub bio: Option<String>,
    /// New gender.
    pub gender: Option<String>,
    /// New picture filename.
    pub picture_ref: Option<String>,
}

impl ProfileUpdate {
    /// An update that only swaps the picture.
    #[must_use]
    pub fn picture(picture_ref: String) -> Self {
        Self {
            picture_ref: Some(picture_ref),
            ..Self::default()
        }
    }

    /// Check field limits before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `SocialError::InvalidProfile` if the name is too long.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().chars().count() > MAX_NAME_LEN {
                return Err(SocialError::InvalidProfile(format!(
                    "name must be at most {MAX_NAME_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}
