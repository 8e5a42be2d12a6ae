//! # List Command
//!
//! Handles `repos`: lists the organization's repositories, truncated to the
//! first ten.

use anyhow::Result;

use crate::domain::traits::{ChatProvider, RepoHost};
use crate::domain::types::RepoSummary;
use crate::strings::messages;

const MAX_LINES: usize = 10;

pub async fn handle_list(github: &dyn RepoHost, chat: &impl ChatProvider) -> Result<()> {
    let _ = chat.typing(true).await;
    let reply = match github.list_repos().await {
        Ok(repos) if repos.is_empty() => messages::NO_REPOS.to_string(),
        Ok(repos) => format_repo_list(&repos),
        Err(e) => messages::github_error(&e.to_string()),
    };
    let _ = chat.typing(false).await;
    chat.send_message(&reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}

fn format_repo_list(repos: &[RepoSummary]) -> String {
    repos
        .iter()
        .take(MAX_LINES)
        .map(|repo| messages::repo_line(&repo.name, &repo.html_url))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str) -> RepoSummary {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "html_url": format!("https://github.com/tagglabs/{name}"),
        }))
        .unwrap()
    }

    #[test]
    fn list_is_truncated_to_ten_lines() {
        let repos: Vec<RepoSummary> = (0..12).map(|i| repo(&format!("repo-{i}"))).collect();
        let formatted = format_repo_list(&repos);
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines.len(), 10);
        for line in lines {
            let (name, url) = line.split_once(": ").expect("line has `name: url` shape");
            assert!(!name.is_empty());
            assert!(url.starts_with("https://"));
        }
    }

    #[test]
    fn short_list_is_kept_whole() {
        let repos = vec![repo("one"), repo("two")];
        assert_eq!(format_repo_list(&repos).lines().count(), 2);
    }
}
