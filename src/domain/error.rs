//! # GitHub Error Taxonomy
//!
//! Classifies failures from the GitHub REST API so handlers can pick the
//! right user-facing reply. Remote-call errors never cross the handler
//! boundary; they are converted into a single chat message.

/// Error raised by the GitHub client.
#[derive(Debug)]
pub enum GithubError {
    /// 401/403 - bad or missing credentials.
    Auth(String),
    /// 404 - no such repository (or team).
    NotFound(String),
    /// 422 or malformed local input (e.g. empty repo name, name collision).
    Validation(String),
    /// Any other non-2xx from the provider.
    Remote { status: u16, body: String },
    /// Response declared as JSON failed to parse.
    Parse(String),
    /// Connection-level failure before a status was received.
    Transport(String),
}

impl std::fmt::Display for GithubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GithubError::Auth(msg) => write!(f, "authentication rejected: {msg}"),
            GithubError::NotFound(what) => write!(f, "not found: {what}"),
            GithubError::Validation(msg) => write!(f, "validation failed: {msg}"),
            GithubError::Remote { status, body } => write!(f, "GitHub returned {status}: {body}"),
            GithubError::Parse(msg) => write!(f, "invalid JSON response: {msg}"),
            GithubError::Transport(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

impl std::error::Error for GithubError {}
