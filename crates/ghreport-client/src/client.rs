use std::time::Duration;

use ghreport_config::ApiConfig;
use ghreport_types::{validate_login, RepositoryEntry, RepositoryIndex, Report, UserProfile};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Read-only client for the `/users` endpoints of the GitHub REST API.
///
/// Each fetch issues a single unauthenticated GET; there is no pagination,
/// retry or caching.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str());
        if config.request_timeout > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout));
        }

        Ok(Self {
            http: builder.build().map_err(FetchError::Client)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<UserProfile, FetchError> {
        let username = validate_login(username)?;
        let url = format!("{}/users/{}", self.base_url, username);
        self.get_json(&url, username).await
    }

    /// Like [`fetch_profile`](Self::fetch_profile), but any failure yields an
    /// all-empty profile. The error is logged, not returned.
    pub async fn fetch_profile_or_empty(&self, username: &str) -> UserProfile {
        match self.fetch_profile(username).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Using empty profile for {:?}: {}", username, e);
                UserProfile::default()
            }
        }
    }

    pub async fn fetch_repositories(&self, username: &str) -> Result<RepositoryIndex, FetchError> {
        let username = validate_login(username)?;
        let url = format!("{}/users/{}/repos", self.base_url, username);
        let entries: Vec<RepositoryEntry> = self.get_json(&url, username).await?;
        Ok(entries.into_iter().collect())
    }

    /// Fetches the profile and then the repositories of one user.
    pub async fn fetch_report(&self, username: &str) -> Result<Report, FetchError> {
        let profile = self.fetch_profile(username).await?;
        let repositories = self.fetch_repositories(username).await?;
        let report = Report::new(profile, repositories);

        for (name, url) in report.foreign_repositories() {
            warn!(
                "Repository {} ({}) does not belong to {:?}",
                name, url, report.profile.login
            );
        }

        Ok(report)
    }

    async fn get_json<T>(&self, url: &str, username: &str) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!("GET {}", url);

        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                username: username.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        let body = response.text().await.map_err(transport)?;
        let value: Value = serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_value(value).map_err(|source| FetchError::Schema {
            url: url.to_string(),
            source,
        })
    }
}
