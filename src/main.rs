#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration, Types, Forms
//! - Infrastructure: Matrix, GitHub
//! - Application: Router, State
//! - Interface: Command Handlers

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::router::CommandRouter;
use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::traits::RepoHost;
use crate::infrastructure::github::GithubClient;
use crate::infrastructure::matrix::MatrixService;

#[derive(Parser)]
#[command(
    name = "orgbot",
    about = "Matrix bot proxying a GitHub organization's repository API"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Configuration
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    if !std::path::Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = std::path::Path::new("data/session.log");
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn,reqwest=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!(
        "Starting orgbot for organization '{}' (team '{}')",
        config.github.org,
        config.github.team_slug
    );

    // 3. Initialize Infrastructure
    let github: Arc<dyn RepoHost> = Arc::new(GithubClient::new(&config.github));
    let state = Arc::new(Mutex::new(BotState::default()));

    // 4. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("Logged in as {}", config.services.matrix.username);

    // 5. Event Loop
    let start_time = std::time::SystemTime::now();

    let loop_config = config.clone();
    let loop_github = github.clone();
    let loop_state = state.clone();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let config = loop_config.clone();
        let github = loop_github.clone();
        let state = loop_state.clone();

        async move {
            if let Some(original_msg) = ev.as_original() {
                // Ignore events older than start_time
                let ts = ev.origin_server_ts();
                let event_time =
                    std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
                if event_time < start_time {
                    return;
                }

                // Honor the fixed-room restriction when one is configured
                if let Some(allowed) = &config.services.matrix.room {
                    if room.room_id().as_str() != allowed {
                        return;
                    }
                }

                if let MessageType::Text(text_content) = &original_msg.content.msgtype {
                    if original_msg.sender == room.own_user_id() {
                        return;
                    }
                    let body = text_content.body.clone();
                    tracing::debug!("Received message from {}: {}", original_msg.sender, body);

                    let chat = MatrixService::new(room);
                    let router = CommandRouter::new(config, github, state);

                    // Dispatch
                    if let Err(e) = router
                        .route(&chat, &body, original_msg.sender.as_str())
                        .await
                    {
                        tracing::error!("Failed to route message: {}", e);
                    }
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            let _ = room.join().await;
        }
    });

    // 6. Sync
    tracing::info!("Syncing with homeserver...");
    client.sync(SyncSettings::default()).await?;

    Ok(())
}
