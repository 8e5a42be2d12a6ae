//! # Domain Types
//!
//! Wire-level data structures for the GitHub organization API. Nothing here
//! outlives a single request/response cycle.

use serde::{Deserialize, Serialize};

/// A repository as returned by the list/get/search/create endpoints.
/// Only the fields the bot surfaces are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
}

/// Body of `POST /orgs/{org}/repos`. Built from user input, sent once.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub private: bool,
    pub has_projects: bool,
    pub auto_init: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,
}

impl CreateRepoRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            private: false,
            has_projects: true,
            auto_init: false,
            gitignore_template: None,
            license_template: None,
        }
    }
}

/// Envelope of `GET /search/repositories`.
#[derive(Debug, Deserialize)]
pub struct SearchResults {
    pub items: Vec<RepoSummary>,
}

/// Repository visibility as the user types it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn is_private(self) -> bool {
        self == Visibility::Private
    }
}
