//! # Search Command
//!
//! Handles `search <term>`: org-scoped repository search, top five results.

use anyhow::Result;

use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, RepoHost};
use crate::domain::types::RepoSummary;
use crate::strings::messages;

const MAX_RESULTS: usize = 5;

pub async fn handle_search(
    config: &AppConfig,
    github: &dyn RepoHost,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let term = args.trim();
    if term.is_empty() {
        chat.send_notification(&messages::search_usage(config.commands.prefix))
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let _ = chat.typing(true).await;
    let reply = match github.search_repos(term).await {
        Ok(repos) if repos.is_empty() => messages::SEARCH_NOT_FOUND.to_string(),
        Ok(repos) => format_results(&repos),
        Err(e) => messages::github_error(&e.to_string()),
    };
    let _ = chat.typing(false).await;
    chat.send_message(&reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}

fn format_results(repos: &[RepoSummary]) -> String {
    repos
        .iter()
        .take(MAX_RESULTS)
        .map(|repo| messages::repo_line(&repo.name, &repo.html_url))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_are_capped_at_five() {
        let repos: Vec<RepoSummary> = (0..8)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "name": format!("repo-{i}"),
                    "html_url": format!("https://github.com/tagglabs/repo-{i}"),
                }))
                .unwrap()
            })
            .collect();
        assert_eq!(format_results(&repos).lines().count(), 5);
    }
}
