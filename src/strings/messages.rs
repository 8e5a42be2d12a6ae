//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes error messages, usage lines, and notification templates.

use crate::domain::types::RepoSummary;

pub const SEARCH_NOT_FOUND: &str = "🔍 No repositories matched your search.";
pub const REPO_NOT_FOUND: &str = "❓ No repository by that name, and no close matches either.";
pub const NO_REPOS: &str = "The organization has no repositories yet.";
pub const FORM_CANCELLED: &str = "❌ Cancelled.";
pub const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";

pub fn unknown_command(prefix: char) -> String {
    format!("❓ Unknown command. Try `{prefix}help`.")
}

pub fn repo_usage(prefix: char) -> String {
    format!("Usage: `{prefix}repo <name or keyword>`")
}

pub fn search_usage(prefix: char) -> String {
    format!("Usage: `{prefix}search <term>`")
}

pub fn github_error(err: &str) -> String {
    format!("❌ GitHub request failed: {err}")
}

pub fn repo_line(name: &str, url: &str) -> String {
    format!("{name}: {url}")
}

/// Embed-equivalent structured summary of a single repository.
pub fn repo_overview(repo: &RepoSummary) -> String {
    let description = repo.description.as_deref().unwrap_or("(no description)");
    let language = repo.language.as_deref().unwrap_or("n/a");
    format!(
        "**{name}**\n{url}\n{description}\n**Language**: {language} · ⭐ {stars} · 🍴 {forks}",
        name = repo.name,
        url = repo.html_url,
        stars = repo.stargazers_count,
        forks = repo.forks_count,
    )
}

pub fn selection_intro(term: &str, rendered: &str, prefix: char) -> String {
    format!(
        "No exact match for `{term}`. Did you mean one of these? Reply with a number, or `{prefix}cancel`.\n{rendered}"
    )
}

pub fn pick_invalid(max: usize, prefix: char) -> String {
    format!("Reply with a number between 1 and {max}, or `{prefix}cancel`.")
}

pub fn create_intro(prefix: char, first_prompt: &str) -> String {
    format!(
        "Let's create a repository. Answer each prompt, or `{prefix}cancel` to abort.\n{first_prompt}"
    )
}

pub fn form_retry(err: &str, prompt: &str) -> String {
    format!("⚠️ {err}.\n{prompt}")
}

pub fn validation_failed(msg: &str) -> String {
    format!("🚫 Invalid input: {msg}.")
}

pub fn create_rejected(msg: &str) -> String {
    format!("🚫 GitHub rejected the repository: {msg}")
}

pub fn create_failed(err: &str) -> String {
    format!("❌ Failed to create repository: {err}")
}

pub fn repo_created(url: &str, team: &str) -> String {
    format!("✅ Repo created: {url} with maintain access for the `{team}` team.")
}

/// Partial failure: the repository exists but the team link does not.
/// Deliberately distinct from both success and outright failure so the user
/// knows manual follow-up is needed.
pub fn repo_created_grant_failed(url: &str, team: &str, err: &str) -> String {
    format!(
        "⚠️ Repo created: {url} - but granting the `{team}` team access failed ({err}). \
         Please grant it manually."
    )
}
