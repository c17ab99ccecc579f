// src/integrations/github.rs — GitHub profile stats (REST API v3)

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::infra::config::GithubConfig;
use crate::infra::errors::FolioError;

const TOP_LANGUAGES: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubUser {
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubRepo {
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GithubStats {
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub total_stars: u64,
    pub top_languages: Vec<String>,
}

/// Fold a user and their repositories into the stats summary. Languages are
/// ranked by repository count; ties keep first-seen order.
pub fn summarize(user: &GithubUser, repos: &[GithubRepo]) -> GithubStats {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for lang in repos.iter().filter_map(|r| r.language.as_deref()) {
        match index.get(lang) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(lang, counts.len());
                counts.push((lang, 1));
            }
        }
    }
    // Stable sort keeps first appearance among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    GithubStats {
        public_repos: user.public_repos,
        followers: user.followers,
        following: user.following,
        total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
        top_languages: counts
            .into_iter()
            .take(TOP_LANGUAGES)
            .map(|(lang, _)| lang.to_string())
            .collect(),
    }
}

pub struct GithubClient {
    client: Client,
    api_base: String,
    username: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig, token: Option<String>) -> Result<Self, FolioError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FolioError::Config(format!("Failed to build GitHub client: {e}")))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Read the optional token from the environment variable named in `config`.
    pub fn from_config(config: &GithubConfig) -> Result<Self, FolioError> {
        Self::new(config, std::env::var(&config.token_env).ok())
    }

    pub async fn stats(&self) -> Result<GithubStats, FolioError> {
        let user: GithubUser = self.get(&format!("/users/{}", self.username)).await?;
        let repos: Vec<GithubRepo> = self
            .get(&format!("/users/{}/repos?per_page=100", self.username))
            .await?;
        Ok(summarize(&user, &repos))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FolioError> {
        let url = format!("{}{path}", self.api_base);
        let mut req = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("token {token}"));
        }

        let resp = req.send().await.map_err(|e| {
            tracing::error!("GitHub request error: {e}");
            FolioError::GitHub {
                status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                message: "GitHub API unavailable".into(),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("GitHub API error: {status}");
            return Err(FolioError::GitHub {
                status: status.as_u16(),
                message: body,
            });
        }

        resp.json().await.map_err(|e| FolioError::GitHub {
            status: StatusCode::BAD_GATEWAY.as_u16(),
            message: format!("Unexpected GitHub response: {e}"),
        })
    }
}
