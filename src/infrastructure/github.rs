//! # GitHub Client
//!
//! Thin wrapper over the GitHub organization REST API. Attaches the token
//! header, serializes JSON bodies, maps non-2xx statuses onto
//! [`GithubError`], and parses JSON responses. No retries: every failure
//! propagates immediately to the caller.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::domain::config::GithubConfig;
use crate::domain::error::GithubError;
use crate::domain::traits::RepoHost;
use crate::domain::types::{CreateRepoRequest, RepoSummary, SearchResults};

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// HTTP client reused across requests
fn http_client() -> &'static Client {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client")
    })
}

pub struct GithubClient {
    token: String,
    org: String,
    team_slug: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            token: config.token.clone(),
            org: config.org.clone(),
            team_slug: config.team_slug.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// One round trip to the API. Returns the parsed JSON body, or `None`
    /// for 204/empty responses.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, GithubError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GitHub request: {} {}", method, endpoint);

        let mut builder = http_client()
            .request(method, &url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "orgbot");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GithubError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(classify_status(status.as_u16(), &text));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .map_err(|e| GithubError::Transport(e.to_string()))?;
        if text.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| GithubError::Parse(e.to_string()))
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Option<Value>) -> Result<T, GithubError> {
        let value = value.ok_or_else(|| GithubError::Parse("empty response body".to_string()))?;
        serde_json::from_value(value).map_err(|e| GithubError::Parse(e.to_string()))
    }
}

/// Map a non-2xx status onto the error taxonomy. The provider's own
/// `message` field is surfaced when the body carries one.
fn classify_status(status: u16, body: &str) -> GithubError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string());

    match status {
        401 | 403 => GithubError::Auth(message),
        404 => GithubError::NotFound(message),
        422 => GithubError::Validation(message),
        _ => GithubError::Remote {
            status,
            body: message,
        },
    }
}

/// Search qualifier: free text scoped to the fixed organization.
fn search_query(term: &str, org: &str) -> String {
    format!("{term} org:{org}")
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn list_repos(&self) -> Result<Vec<RepoSummary>, GithubError> {
        let body = self
            .request(Method::GET, &format!("/orgs/{}/repos", self.org), &[], None)
            .await?;
        Self::decode(body)
    }

    async fn get_repo(&self, name: &str) -> Result<RepoSummary, GithubError> {
        let body = self
            .request(
                Method::GET,
                &format!("/repos/{}/{}", self.org, name),
                &[],
                None,
            )
            .await?;
        Self::decode(body)
    }

    async fn search_repos(&self, term: &str) -> Result<Vec<RepoSummary>, GithubError> {
        let body = self
            .request(
                Method::GET,
                "/search/repositories",
                &[("q", search_query(term, &self.org))],
                None,
            )
            .await?;
        let results: SearchResults = Self::decode(body)?;
        Ok(results.items)
    }

    async fn create_repo(
        &self,
        request: &CreateRepoRequest,
    ) -> Result<RepoSummary, GithubError> {
        let payload =
            serde_json::to_value(request).map_err(|e| GithubError::Parse(e.to_string()))?;
        let body = self
            .request(
                Method::POST,
                &format!("/orgs/{}/repos", self.org),
                &[],
                Some(&payload),
            )
            .await?;
        Self::decode(body)
    }

    async fn grant_team_access(&self, repo_name: &str) -> Result<(), GithubError> {
        let payload = serde_json::json!({ "permission": "maintain" });
        self.request(
            Method::PUT,
            &format!(
                "/orgs/{org}/teams/{team}/repos/{org}/{repo}",
                org = self.org,
                team = self.team_slug,
                repo = repo_name
            ),
            &[],
            Some(&payload),
        )
        .await?;
        Ok(())
    }
}
