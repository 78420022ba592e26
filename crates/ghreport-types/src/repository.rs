use std::collections::BTreeMap;

use serde::Deserialize;

/// One element of the `GET /users/{username}/repos` array. Only the fields
/// the report needs are read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryEntry {
    pub name: String,
    pub html_url: String,
}

/// Repository name to web URL. Names are unique; iteration is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryIndex(BTreeMap<String, String>);

impl RepositoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous URL if `name` was already indexed.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), url.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, url)| (name.as_str(), url.as_str()))
    }
}

impl FromIterator<RepositoryEntry> for RepositoryIndex {
    fn from_iter<I: IntoIterator<Item = RepositoryEntry>>(iter: I) -> Self {
        Self(iter.into_iter().map(|r| (r.name, r.html_url)).collect())
    }
}

impl<N: Into<String>, U: Into<String>> FromIterator<(N, U)> for RepositoryIndex {
    fn from_iter<I: IntoIterator<Item = (N, U)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, url)| (name.into(), url.into()))
                .collect(),
        )
    }
}

/// First path segment after the host, e.g. `octocat` for
/// `https://github.com/octocat/Hello-World`.
pub fn repository_owner(url: &str) -> Option<&str> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let mut segments = without_scheme.split('/');
    segments.next()?;
    segments.next().filter(|owner| !owner.is_empty())
}
