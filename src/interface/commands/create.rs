//! # Create Command
//!
//! Handles `create [name]`. With a name, creates immediately with defaults;
//! without one, starts a form collecting name, description, visibility and
//! readme flag. After a successful creation the configured team is granted
//! maintain access; a failed grant is reported as a partial failure, never
//! rolled back.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::error::GithubError;
use crate::domain::forms::{Form, FormField};
use crate::domain::traits::{ChatProvider, RepoHost};
use crate::domain::types::{CreateRepoRequest, Visibility};
use crate::strings::messages;

const FIELDS: [FormField; 4] = [
    FormField {
        key: "name",
        label: "Repository name",
        required: true,
        max_len: 100,
        one_of: &[],
    },
    FormField {
        key: "description",
        label: "Description",
        required: false,
        max_len: 350,
        one_of: &[],
    },
    FormField {
        key: "visibility",
        label: "Visibility (public/private)",
        required: true,
        max_len: 10,
        one_of: &["public", "private"],
    },
    FormField {
        key: "readme",
        label: "Initialize with a README (yes/no)",
        required: false,
        max_len: 5,
        one_of: &["yes", "no"],
    },
];

pub fn create_form() -> Form {
    Form::new(FIELDS.to_vec())
}

pub async fn handle_create(
    config: &AppConfig,
    state: &Arc<Mutex<BotState>>,
    github: &dyn RepoHost,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let name = args.trim();
    if !name.is_empty() {
        // Short form: public repo with defaults.
        let request = CreateRepoRequest::new(name);
        return submit(config, github, chat, &request).await;
    }

    let form = create_form();
    let intro = messages::create_intro(config.commands.prefix, &form.prompt());
    {
        let mut guard = state.lock().await;
        guard.get_room_state(&chat.room_id()).form = Some(form);
    }
    chat.send_message(&intro)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}

/// Translate completed form values into a request body.
pub fn build_request(values: &HashMap<String, String>) -> Result<CreateRepoRequest, String> {
    let name = values
        .get("name")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "repository name must not be empty".to_string())?;

    let visibility = match values.get("visibility") {
        Some(raw) => Visibility::parse(raw)
            .ok_or_else(|| format!("visibility must be `public` or `private`, got `{raw}`"))?,
        None => Visibility::Public,
    };

    let auto_init = values
        .get("readme")
        .map(|raw| matches!(raw.trim().to_lowercase().as_str(), "yes" | "y" | "true"))
        .unwrap_or(false);

    let mut request = CreateRepoRequest::new(name);
    request.description = values.get("description").cloned();
    request.private = visibility.is_private();
    request.auto_init = auto_init;
    Ok(request)
}

/// Create the repository, then grant the team. The grant runs only after a
/// successful creation and uses the name GitHub echoed back.
pub async fn submit(
    config: &AppConfig,
    github: &dyn RepoHost,
    chat: &impl ChatProvider,
    request: &CreateRepoRequest,
) -> Result<()> {
    let team = &config.github.team_slug;
    let _ = chat.typing(true).await;

    let reply = match github.create_repo(request).await {
        Ok(repo) => match github.grant_team_access(&repo.name).await {
            Ok(()) => messages::repo_created(&repo.html_url, team),
            Err(e) => messages::repo_created_grant_failed(&repo.html_url, team, &e.to_string()),
        },
        Err(GithubError::Validation(msg)) => messages::create_rejected(&msg),
        Err(e) => messages::create_failed(&e.to_string()),
    };

    let _ = chat.typing(false).await;
    chat.send_message(&reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}
