//! # Form Step Handler
//!
//! Drives whichever interactive flow is active in a room: answers feed the
//! create-repo form, numeric replies resolve a pending selection, and
//! `cancel` clears both.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::forms::FormStep;
use crate::domain::traits::{ChatProvider, RepoHost};
use crate::interface::commands::create;
use crate::strings::messages;

enum StepAction {
    /// Selection resolved to a repository name.
    FetchRepo(String),
    /// Reply was not a valid pick for a selection of this size.
    BadPick(usize),
    /// Form rejected the answer; re-ask the same field.
    Retry { error: String, prompt: String },
    /// Form advanced; ask the next field.
    Prompt(String),
    /// Form completed with these values.
    Submit(HashMap<String, String>),
}

/// Returns `true` when the message was consumed by an active flow.
pub async fn handle_step(
    config: &AppConfig,
    state: &Arc<Mutex<BotState>>,
    github: &dyn RepoHost,
    chat: &impl ChatProvider,
    message: &str,
) -> Result<bool> {
    // Decide under the lock, act after releasing it.
    let action = {
        let mut guard = state.lock().await;
        let room = guard.get_room_state(&chat.room_id());

        if let Some(selection) = &room.selection {
            match selection.pick(message) {
                Some(name) => {
                    let name = name.to_string();
                    room.selection = None;
                    Some(StepAction::FetchRepo(name))
                }
                None => Some(StepAction::BadPick(selection.len())),
            }
        } else if let Some(form) = room.form.as_mut() {
            match form.answer(message) {
                Err(e) => Some(StepAction::Retry {
                    error: e.to_string(),
                    prompt: form.prompt(),
                }),
                Ok(FormStep::Prompt(prompt)) => Some(StepAction::Prompt(prompt)),
                Ok(FormStep::Complete(values)) => {
                    room.form = None;
                    Some(StepAction::Submit(values))
                }
            }
        } else {
            None
        }
    };

    let Some(action) = action else {
        return Ok(false);
    };

    match action {
        StepAction::FetchRepo(name) => {
            let _ = chat.typing(true).await;
            let reply = match github.get_repo(&name).await {
                Ok(repo) => messages::repo_overview(&repo),
                Err(e) => messages::github_error(&e.to_string()),
            };
            let _ = chat.typing(false).await;
            chat.send_message(&reply)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        StepAction::BadPick(max) => {
            chat.send_notification(&messages::pick_invalid(max, config.commands.prefix))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        StepAction::Retry { error, prompt } => {
            chat.send_message(&messages::form_retry(&error, &prompt))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        StepAction::Prompt(prompt) => {
            chat.send_message(&prompt)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        StepAction::Submit(values) => match create::build_request(&values) {
            Ok(request) => create::submit(config, github, chat, &request).await?,
            Err(msg) => {
                chat.send_message(&messages::validation_failed(&msg))
                    .await
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
        },
    }

    Ok(true)
}

pub async fn handle_cancel(
    state: &Arc<Mutex<BotState>>,
    chat: &impl ChatProvider,
) -> Result<()> {
    let had_flow = {
        let mut guard = state.lock().await;
        let room = guard.get_room_state(&chat.room_id());
        let had_flow = room.form.is_some() || room.selection.is_some();
        room.form = None;
        room.selection = None;
        had_flow
    };

    let reply = if had_flow {
        messages::FORM_CANCELLED
    } else {
        messages::NOTHING_TO_CANCEL
    };
    chat.send_message(reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}
