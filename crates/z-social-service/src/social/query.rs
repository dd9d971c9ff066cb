//! Read-side composition: profile pages and search.

use serde::Serialize;

use z_social_core::{Account, AccountId, Profile, Result, SocialError};
use z_social_store::Store;

use super::graph::{self, require_account};
use crate::pictures::public_url;

/// An account as shown in lists and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    /// Account id.
    pub id: AccountId,
    /// Username.
    pub username: String,
    /// Display name, if the account has a profile.
    pub name: Option<String>,
    /// URL of the profile picture, if any.
    pub picture_url: Option<String>,
}

impl AccountSummary {
    fn new(account: &Account, profile: Option<&Profile>) -> Self {
        Self {
            id: account.id,
            username: account.username.to_string(),
            name: profile.map(|p| p.name.clone()),
            picture_url: profile
                .and_then(|p| p.picture_ref.as_deref())
                .map(public_url),
        }
    }
}

/// Everything needed to render a profile page.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    /// Account id.
    pub account_id: AccountId,
    /// Username.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Bio.
    pub bio: String,
    /// Gender.
    pub gender: String,
    /// Stored picture filename.
    pub picture_ref: Option<String>,
    /// URL of the profile picture.
    pub picture_url: Option<String>,
    /// Accounts following this one.
    pub followers: Vec<AccountSummary>,
    /// Accounts this one follows.
    pub following: Vec<AccountSummary>,
    /// `followers.len()`.
    pub followers_count: usize,
    /// `following.len()`.
    pub following_count: usize,
    /// Whether the viewer follows this account.
    pub is_following: bool,
    /// Whether this account follows the viewer.
    pub is_followed_by: bool,
    /// Whether the viewer is looking at their own profile.
    pub is_self: bool,
}

/// Outcome of [`search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank; no search ran.
    NotPerformed,
    /// Matching accounts in id order.
    Results(Vec<AccountSummary>),
}

/// Assemble the profile page of `target` as seen by `viewer`.
///
/// Without a viewer both relationship flags are false.
///
/// # Errors
///
/// Returns `SocialError::AccountNotFound` or `SocialError::ProfileNotFound` if
/// the target account or its profile is missing.
pub fn view_profile<S: Store + ?Sized>(
    store: &S,
    target: AccountId,
    viewer: Option<AccountId>,
) -> Result<ProfileView> {
    let account = require_account(store, target)?;
    let profile = store
        .get_profile(target)?
        .ok_or_else(|| SocialError::ProfileNotFound {
            account_id: target.to_string(),
        })?;

    let followers = summaries(store, &graph::followers(store, target)?)?;
    let following = summaries(store, &graph::following(store, target)?)?;

    let (is_following, is_followed_by) = match viewer {
        Some(viewer) if viewer != target => (
            graph::is_following(store, viewer, target)?,
            graph::is_followed_by(store, viewer, target)?,
        ),
        _ => (false, false),
    };

    Ok(ProfileView {
        account_id: account.id,
        username: account.username.to_string(),
        picture_url: profile.picture_ref.as_deref().map(public_url),
        name: profile.name,
        bio: profile.bio,
        gender: profile.gender,
        picture_ref: profile.picture_ref,
        followers_count: followers.len(),
        following_count: following.len(),
        followers,
        following,
        is_following,
        is_followed_by,
        is_self: viewer == Some(target),
    })
}

/// Find accounts whose username or display name contains `query`,
/// case-insensitively.
///
/// The query is trimmed first; a blank query returns
/// [`SearchOutcome::NotPerformed`]. Results keep id (signup) order and omit
/// `exclude`.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn search<S: Store + ?Sized>(
    store: &S,
    query: &str,
    exclude: Option<AccountId>,
) -> Result<SearchOutcome> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(SearchOutcome::NotPerformed);
    }

    let mut results = Vec::new();
    for account in store.list_accounts()? {
        if Some(account.id) == exclude {
            continue;
        }

        let profile = store.get_profile(account.id)?;
        let matches = account.username.as_str().contains(&needle)
            || profile
                .as_ref()
                .is_some_and(|p| p.name.to_lowercase().contains(&needle));

        if matches {
            results.push(AccountSummary::new(&account, profile.as_ref()));
        }
    }

    tracing::debug!(query = %needle, matches = results.len(), "Search completed");

    Ok(SearchOutcome::Results(results))
}

/// Summaries for a list of accounts, with their profile names.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn summaries<S: Store + ?Sized>(store: &S, accounts: &[Account]) -> Result<Vec<AccountSummary>> {
    accounts
        .iter()
        .map(|account| -> Result<AccountSummary> {
            let profile = store.get_profile(account.id)?;
            Ok(AccountSummary::new(account, profile.as_ref()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::social::{profiles, testing};
    use z_social_core::ProfileUpdate;

    fn rename(store: &impl Store, id: AccountId, name: &str) {
        let update = ProfileUpdate {
            name: Some(name.into()),
            ..ProfileUpdate::default()
        };
        profiles::upsert(store, id, id, update).unwrap();
    }

    fn usernames(outcome: SearchOutcome) -> Vec<String> {
        match outcome {
            SearchOutcome::Results(results) => results.into_iter().map(|s| s.username).collect(),
            SearchOutcome::NotPerformed => panic!("search was not performed"),
        }
    }

    #[test]
    fn search_matches_username_or_name_case_insensitively() {
        let (store, _dir) = testing::store();
        testing::register(&store, "alice");
        let b = testing::register(&store, "bob");
        testing::register(&store, "carol");
        rename(&store, b.id, "Bob, friend of MALICE");

        let found = usernames(search(&store, "ALICE", None).unwrap());
        assert_eq!(found, ["alice", "bob"]);
    }

    #[test]
    fn search_excludes_viewer() {
        let (store, _dir) = testing::store();
        let a = testing::register(&store, "alice");
        testing::register(&store, "alicia");

        let found = usernames(search(&store, "ali", Some(a.id)).unwrap());
        assert_eq!(found, ["alicia"]);
    }

    #[test]
    fn blank_search_not_performed() {
        let (store, _dir) = testing::store();
        testing::register(&store, "alice");

        assert_eq!(search(&store, "", None).unwrap(), SearchOutcome::NotPerformed);
        assert_eq!(
            search(&store, "  \t ", None).unwrap(),
            SearchOutcome::NotPerformed
        );
    }

    #[test]
    fn search_without_matches_is_empty() {
        let (store, _dir) = testing::store();
        testing::register(&store, "alice");

        assert_eq!(
            search(&store, "zzz", None).unwrap(),
            SearchOutcome::Results(Vec::new())
        );
    }

    #[test]
    fn profile_view_flags() {
        let (store, _dir) = testing::store();
        let bob = testing::register(&store, "bob");
        let carol = testing::register(&store, "carol");

        let anonymous = view_profile(&store, bob.id, None).unwrap();
        assert_eq!(anonymous.followers_count, 1);
        assert_eq!(anonymous.following_count, 0);
        assert!(!anonymous.is_following);
        assert!(!anonymous.is_self);

        let by_carol = view_profile(&store, bob.id, Some(carol.id)).unwrap();
        assert!(by_carol.is_following);
        assert!(!by_carol.is_followed_by);
        assert_eq!(by_carol.followers[0].username, "carol");

        let carol_by_bob = view_profile(&store, carol.id, Some(bob.id)).unwrap();
        assert!(!carol_by_bob.is_following);
        assert!(carol_by_bob.is_followed_by);

        let own = view_profile(&store, bob.id, Some(bob.id)).unwrap();
        assert!(own.is_self);
        assert!(!own.is_following);
    }

    #[test]
    fn profile_view_not_found() {
        let (store, _dir) = testing::store();
        assert!(matches!(
            view_profile(&store, AccountId::new(5), None),
            Err(SocialError::AccountNotFound { .. })
        ));

        let username = z_social_core::Username::parse("noprofile").unwrap();
        let bare = store.insert_account(&username, "hash").unwrap();
        assert!(matches!(
            view_profile(&store, bare.id, None),
            Err(SocialError::ProfileNotFound { .. })
        ));
    }
}
