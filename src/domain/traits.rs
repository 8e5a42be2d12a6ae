//! # Domain Traits
//!
//! Abstract interfaces for core system components (Chat, Repo host).
//! Allows for pluggable implementations in the Infrastructure layer and
//! mock substitution in tests.

use async_trait::async_trait;

use crate::domain::error::GithubError;
use crate::domain::types::{CreateRepoRequest, RepoSummary};

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a notification (not tracked/editable)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Send a typing indicator
    async fn typing(&self, active: bool) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Abstract interface for the source-control host the bot proxies to.
/// The organization and team are fixed by configuration, so they never
/// appear in the call signatures.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// All repositories of the organization.
    async fn list_repos(&self) -> Result<Vec<RepoSummary>, GithubError>;

    /// A single repository by exact name.
    async fn get_repo(&self, name: &str) -> Result<RepoSummary, GithubError>;

    /// Free-text search scoped to the organization.
    async fn search_repos(&self, term: &str) -> Result<Vec<RepoSummary>, GithubError>;

    /// Create a repository in the organization.
    async fn create_repo(&self, request: &CreateRepoRequest)
    -> Result<RepoSummary, GithubError>;

    /// Grant the configured team maintain access on a repository.
    async fn grant_team_access(&self, repo_name: &str) -> Result<(), GithubError>;
}
