use serde::{Deserialize, Deserializer};

use crate::RepositoryIndex;

/// Public profile of a GitHub account, as returned by `GET /users/{username}`.
///
/// Every key must be present in the response, but any of them may be `null`
/// (most commonly `name`, for accounts without a display name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "present")]
    pub login: Option<String>,
    #[serde(deserialize_with = "present")]
    pub name: Option<String>,
    #[serde(deserialize_with = "present")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "present")]
    pub public_repos: Option<u64>,
    #[serde(deserialize_with = "present")]
    pub followers: Option<u64>,
    #[serde(deserialize_with = "present")]
    pub following: Option<u64>,
}

// A `deserialize_with` field is not defaulted when missing, so this turns
// "key absent" into an error while still mapping `null` to `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        *self == UserProfile::default()
    }
}

/// A profile and the repositories listed for the same username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub profile: UserProfile,
    pub repositories: RepositoryIndex,
}

impl Report {
    pub fn new(profile: UserProfile, repositories: RepositoryIndex) -> Self {
        Self {
            profile,
            repositories,
        }
    }

    /// Repositories whose URL owner segment does not match the profile login.
    pub fn foreign_repositories(&self) -> Vec<(&str, &str)> {
        let Some(login) = self.profile.login.as_deref() else {
            return Vec::new();
        };
        self.repositories
            .iter()
            .filter(|(_, url)| {
                crate::repository_owner(url)
                    .map_or(true, |owner| !owner.eq_ignore_ascii_case(login))
            })
            .collect()
    }
}
