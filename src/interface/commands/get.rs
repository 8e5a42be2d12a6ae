//! # Get Command
//!
//! Handles `repo <name>`: exact lookup first; on a miss, one org-scoped
//! search offers a numbered selection so the user can pick the repository
//! they meant.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::error::GithubError;
use crate::domain::forms::Selection;
use crate::domain::traits::{ChatProvider, RepoHost};
use crate::strings::messages;

const MAX_SUGGESTIONS: usize = 5;

pub async fn handle_get(
    config: &AppConfig,
    state: &Arc<Mutex<BotState>>,
    github: &dyn RepoHost,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let name = args.trim();
    if name.is_empty() {
        chat.send_notification(&messages::repo_usage(config.commands.prefix))
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let _ = chat.typing(true).await;
    match github.get_repo(name).await {
        Ok(repo) => {
            let _ = chat.typing(false).await;
            chat.send_message(&messages::repo_overview(&repo))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        Err(GithubError::NotFound(_)) => {
            suggest_matches(config, state, github, chat, name).await?;
        }
        Err(e) => {
            let _ = chat.typing(false).await;
            chat.send_message(&messages::github_error(&e.to_string()))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }
    Ok(())
}

/// Fall back to a keyword search and park a selection in room state.
async fn suggest_matches(
    config: &AppConfig,
    state: &Arc<Mutex<BotState>>,
    github: &dyn RepoHost,
    chat: &impl ChatProvider,
    term: &str,
) -> Result<()> {
    let reply = match github.search_repos(term).await {
        Ok(repos) if repos.is_empty() => messages::REPO_NOT_FOUND.to_string(),
        Ok(repos) => {
            let names: Vec<String> = repos
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .map(|repo| repo.name)
                .collect();
            let selection = Selection::new(names);
            let intro =
                messages::selection_intro(term, &selection.render(), config.commands.prefix);
            let mut guard = state.lock().await;
            guard.get_room_state(&chat.room_id()).selection = Some(selection);
            intro
        }
        Err(e) => messages::github_error(&e.to_string()),
    };
    let _ = chat.typing(false).await;
    chat.send_message(&reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}
