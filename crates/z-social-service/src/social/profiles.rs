//! Profile operations.

use z_social_core::{AccountId, Profile, ProfileUpdate, Result, SocialError};
use z_social_store::Store;

use super::graph::require_account;
use crate::pictures::{PictureStorage, PictureUpload};

/// Result of an upsert.
#[derive(Debug, Clone)]
pub struct ProfileChange {
    /// The profile as stored.
    pub profile: Profile,
    /// Picture filename that the update replaced; no longer referenced.
    pub released_picture: Option<String>,
}

/// Insert the placeholder profile for a fresh account.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn create_default<S: Store + ?Sized>(store: &S, account_id: AccountId) -> Result<Profile> {
    let profile = Profile::new_default(account_id);
    store.put_profile(&profile)?;
    Ok(profile)
}

/// Fetch a profile.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn get<S: Store + ?Sized>(store: &S, account_id: AccountId) -> Result<Option<Profile>> {
    Ok(store.get_profile(account_id)?)
}

/// Create or partially update the profile of `account_id` on behalf of `actor`.
///
/// A missing profile is created from the defaults first. See
/// [`ProfileUpdate`] for which fields are written.
///
/// # Errors
///
/// - `SocialError::Forbidden` if `actor` is not `account_id`.
/// - `SocialError::InvalidProfile` if a field is out of bounds.
/// - `SocialError::AccountNotFound` if the account doesn't exist.
pub fn upsert<S: Store + ?Sized>(
    store: &S,
    actor: AccountId,
    account_id: AccountId,
    update: ProfileUpdate,
) -> Result<ProfileChange> {
    if actor != account_id {
        return Err(SocialError::Forbidden);
    }
    update.validate()?;
    require_account(store, account_id)?;

    let mut profile = store
        .get_profile(account_id)?
        .unwrap_or_else(|| Profile::new_default(account_id));
    let released_picture = profile.apply(update);
    store.put_profile(&profile)?;

    tracing::info!(account_id = %account_id, "Profile updated");

    Ok(ProfileChange {
        profile,
        released_picture,
    })
}

/// Store a new picture file and point the profile at it.
///
/// The old file is deleted only after the new reference is committed. If the
/// commit fails, the new file is deleted instead. Both deletions are
/// best-effort.
///
/// # Errors
///
/// - `SocialError::Forbidden` if `actor` is not `account_id`.
/// - `SocialError::PayloadTooLarge` if the file is over the limit.
/// - `SocialError::InvalidUpload` for empty or non-image uploads.
pub async fn replace_picture<S: Store + ?Sized>(
    store: &S,
    pictures: &PictureStorage,
    actor: AccountId,
    account_id: AccountId,
    upload: &PictureUpload,
) -> Result<Profile> {
    if actor != account_id {
        return Err(SocialError::Forbidden);
    }
    require_account(store, account_id)?;

    let filename = pictures.save(account_id, upload).await?;

    match upsert(store, actor, account_id, ProfileUpdate::picture(filename.clone())) {
        Ok(change) => {
            if let Some(old) = change.released_picture {
                pictures.remove(&old).await;
            }
            tracing::info!(account_id = %account_id, filename = %filename, "Profile picture replaced");
            Ok(change.profile)
        }
        Err(e) => {
            pictures.remove(&filename).await;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::testing;
    use tempfile::TempDir;
    use z_social_core::DEFAULT_DISPLAY_NAME;

    fn edit(name: &str, bio: &str, gender: &str) -> ProfileUpdate {
        ProfileUpdate {
            name: Some(name.into()),
            bio: Some(bio.into()),
            gender: Some(gender.into()),
            picture_ref: None,
        }
    }

    fn png(bytes: Vec<u8>) -> PictureUpload {
        PictureUpload {
            file_name: Some("me.png".into()),
            content_type: Some("image/png".into()),
            bytes,
        }
    }

    #[test]
    fn create_default_writes_placeholder() {
        let (store, _dir) = testing::store();
        let username = z_social_core::Username::parse("raw").unwrap();
        let account = store.insert_account(&username, "hash").unwrap();

        let profile = create_default(&store, account.id).unwrap();
        assert_eq!(profile.name, DEFAULT_DISPLAY_NAME);
        assert_eq!(get(&store, account.id).unwrap(), Some(profile));
    }

    #[test]
    fn owner_can_edit() {
        let (store, _dir) = testing::store();
        let a = testing::register(&store, "alice");

        let change = upsert(&store, a.id, a.id, edit("Alice A", "hi", "female")).unwrap();
        assert_eq!(change.profile.name, "Alice A");
        assert_eq!(get(&store, a.id).unwrap().unwrap().bio, "hi");
    }

    #[test]
    fn other_accounts_forbidden() {
        let (store, _dir) = testing::store();
        let a = testing::register(&store, "alice");
        let b = testing::register(&store, "bob");

        let result = upsert(&store, b.id, a.id, edit("Hacked", "", ""));
        assert!(matches!(result, Err(SocialError::Forbidden)));
        assert_eq!(get(&store, a.id).unwrap().unwrap().name, DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn blank_name_retained_but_bio_cleared() {
        let (store, _dir) = testing::store();
        let a = testing::register(&store, "alice");

        upsert(&store, a.id, a.id, edit("Alice", "bio", "f")).unwrap();
        let change = upsert(&store, a.id, a.id, edit("", "", "")).unwrap();

        assert_eq!(change.profile.name, "Alice");
        assert!(change.profile.bio.is_empty());
        assert!(change.profile.gender.is_empty());
    }

    #[test]
    fn missing_profile_created_on_first_edit() {
        let (store, _dir) = testing::store();
        let username = z_social_core::Username::parse("raw").unwrap();
        let account = store.insert_account(&username, "hash").unwrap();
        assert!(get(&store, account.id).unwrap().is_none());

        let change = upsert(&store, account.id, account.id, edit("", "bio", "")).unwrap();
        assert_eq!(change.profile.name, DEFAULT_DISPLAY_NAME);
        assert_eq!(change.profile.bio, "bio");
    }

    #[tokio::test]
    async fn picture_replacement_releases_old_file() {
        let (store, _dir) = testing::store();
        let uploads = TempDir::new().unwrap();
        let pictures = PictureStorage::new(uploads.path(), 1024);
        let a = testing::register(&store, "alice");

        let first = replace_picture(&store, &pictures, a.id, a.id, &png(vec![1; 10]))
            .await
            .unwrap();
        let first_ref = first.picture_ref.unwrap();
        assert!(uploads.path().join(&first_ref).exists());

        let second = replace_picture(&store, &pictures, a.id, a.id, &png(vec![2; 10]))
            .await
            .unwrap();
        let second_ref = second.picture_ref.unwrap();

        assert_ne!(first_ref, second_ref);
        assert!(!uploads.path().join(&first_ref).exists());
        assert!(uploads.path().join(&second_ref).exists());
    }

    #[tokio::test]
    async fn oversized_picture_keeps_previous() {
        let (store, _dir) = testing::store();
        let uploads = TempDir::new().unwrap();
        let pictures = PictureStorage::new(uploads.path(), 16);
        let a = testing::register(&store, "alice");

        let original = replace_picture(&store, &pictures, a.id, a.id, &png(vec![1; 8]))
            .await
            .unwrap()
            .picture_ref;

        let result = replace_picture(&store, &pictures, a.id, a.id, &png(vec![0; 17])).await;
        assert!(matches!(result, Err(SocialError::PayloadTooLarge { .. })));

        let current = get(&store, a.id).unwrap().unwrap().picture_ref;
        assert_eq!(current, original);
        assert!(uploads.path().join(current.unwrap()).exists());
    }

    #[tokio::test]
    async fn picture_upload_forbidden_for_others() {
        let (store, _dir) = testing::store();
        let uploads = TempDir::new().unwrap();
        let pictures = PictureStorage::new(uploads.path(), 1024);
        let a = testing::register(&store, "alice");
        let b = testing::register(&store, "bob");

        let result = replace_picture(&store, &pictures, b.id, a.id, &png(vec![1; 4])).await;
        assert!(matches!(result, Err(SocialError::Forbidden)));
        assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    }
}
