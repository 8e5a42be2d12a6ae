//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in
//! `interface/commands`). Active form/selection flows intercept plain
//! replies first; everything else must carry the configured prefix.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::state::BotState;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, RepoHost};
use crate::interface::commands;
use crate::strings::messages;

pub struct CommandRouter {
    config: AppConfig,
    github: Arc<dyn RepoHost>,
    state: Arc<Mutex<BotState>>,
}

impl CommandRouter {
    pub fn new(config: AppConfig, github: Arc<dyn RepoHost>, state: Arc<Mutex<BotState>>) -> Self {
        Self {
            config,
            github,
            state,
        }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider,
    {
        let msg = message.trim();
        if msg.is_empty() {
            return Ok(());
        }

        let prefix = self.config.commands.prefix;
        let stripped = msg.strip_prefix(prefix);
        let (cmd, args) = match stripped {
            Some(rest) => match rest.split_once(char::is_whitespace) {
                Some((cmd, args)) => (cmd, args.trim()),
                None => (rest, ""),
            },
            None => ("", ""),
        };

        // 1. Active form or selection consumes plain replies.
        // `cancel` and `help` always bypass the interception.
        let is_bypass = stripped.is_some() && matches!(cmd, "cancel" | "help");
        if !is_bypass
            && commands::form::handle_step(
                &self.config,
                &self.state,
                self.github.as_ref(),
                chat,
                msg,
            )
            .await?
        {
            return Ok(());
        }

        // 2. Everything else must be a prefixed command.
        if stripped.is_none() || cmd.is_empty() {
            return Ok(());
        }

        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd,
            args,
            sender
        );

        match cmd {
            "repos" | "list" => {
                commands::list::handle_list(self.github.as_ref(), chat).await?;
            }
            "repo" | "get" => {
                commands::get::handle_get(
                    &self.config,
                    &self.state,
                    self.github.as_ref(),
                    chat,
                    args,
                )
                .await?;
            }
            "search" => {
                commands::search::handle_search(&self.config, self.github.as_ref(), chat, args)
                    .await?;
            }
            "create" => {
                commands::create::handle_create(
                    &self.config,
                    &self.state,
                    self.github.as_ref(),
                    chat,
                    args,
                )
                .await?;
            }
            "help" => {
                commands::help::handle_help(chat, prefix).await?;
            }
            "cancel" => {
                commands::form::handle_cancel(&self.state, chat).await?;
            }
            _ => {
                chat.send_message(&messages::unknown_command(prefix))
                    .await
                    .map_err(|e| anyhow::anyhow!(e))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    use crate::domain::config::{CommandsConfig, GithubConfig, MatrixConfig, ServicesConfig};
    use crate::domain::error::GithubError;
    use crate::domain::types::{CreateRepoRequest, RepoSummary};

    fn test_config() -> AppConfig {
        AppConfig {
            services: ServicesConfig {
                matrix: MatrixConfig {
                    homeserver: "https://matrix.example.org".into(),
                    username: "@orgbot:example.org".into(),
                    password: "secret".into(),
                    room: None,
                },
            },
            github: GithubConfig {
                token: "ghp_test".into(),
                org: "tagglabs".into(),
                team_slug: "campaigns".into(),
            },
            commands: CommandsConfig::default(),
        }
    }

    fn repo(name: &str) -> RepoSummary {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "html_url": format!("https://github.com/tagglabs/{name}"),
            "description": "a test repo",
            "language": "Rust",
            "stargazers_count": 3,
            "forks_count": 1,
        }))
        .unwrap()
    }

    #[derive(Default)]
    struct MockChat {
        messages: StdMutex<Vec<String>>,
    }

    impl MockChat {
        fn sent(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatProvider for MockChat {
        async fn send_message(&self, content: &str) -> Result<String, String> {
            self.messages.lock().unwrap().push(content.to_string());
            Ok("$event:example.org".to_string())
        }

        async fn send_notification(&self, content: &str) -> Result<(), String> {
            self.messages.lock().unwrap().push(content.to_string());
            Ok(())
        }

        async fn typing(&self, _active: bool) -> Result<(), String> {
            Ok(())
        }

        fn room_id(&self) -> String {
            "!room:example.org".to_string()
        }
    }

    #[derive(Default)]
    struct MockHost {
        repos: Vec<RepoSummary>,
        search_results: Vec<RepoSummary>,
        create_collides: bool,
        grant_fails: bool,
        calls: StdMutex<Vec<String>>,
    }

    impl MockHost {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RepoHost for MockHost {
        async fn list_repos(&self) -> Result<Vec<RepoSummary>, GithubError> {
            self.calls.lock().unwrap().push("list".to_string());
            Ok(self.repos.clone())
        }

        async fn get_repo(&self, name: &str) -> Result<RepoSummary, GithubError> {
            self.calls.lock().unwrap().push(format!("get:{name}"));
            self.repos
                .iter()
                .find(|r| r.name == name)
                .cloned()
                .ok_or_else(|| GithubError::NotFound(name.to_string()))
        }

        async fn search_repos(&self, term: &str) -> Result<Vec<RepoSummary>, GithubError> {
            self.calls.lock().unwrap().push(format!("search:{term}"));
            Ok(self.search_results.clone())
        }

        async fn create_repo(
            &self,
            request: &CreateRepoRequest,
        ) -> Result<RepoSummary, GithubError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create:{}:{}", request.name, request.private));
            if self.create_collides {
                return Err(GithubError::Validation(
                    "name already exists on this account".to_string(),
                ));
            }
            Ok(repo(&request.name))
        }

        async fn grant_team_access(&self, repo_name: &str) -> Result<(), GithubError> {
            self.calls.lock().unwrap().push(format!("grant:{repo_name}"));
            if self.grant_fails {
                return Err(GithubError::Remote {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(())
        }
    }

    fn router_with(host: MockHost) -> (CommandRouter, Arc<MockHost>) {
        let host = Arc::new(host);
        let router = CommandRouter::new(
            test_config(),
            host.clone(),
            Arc::new(Mutex::new(BotState::default())),
        );
        (router, host)
    }

    #[tokio::test]
    async fn list_replies_once_with_at_most_ten_lines() {
        let repos = (0..12).map(|i| repo(&format!("repo-{i}"))).collect();
        let (router, _host) = router_with(MockHost {
            repos,
            ..Default::default()
        });
        let chat = MockChat::default();

        router.route(&chat, "!repos", "@user:example.org").await.unwrap();

        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        let lines: Vec<&str> = sent[0].lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.contains(": https://")));
    }

    #[tokio::test]
    async fn empty_search_replies_not_found_and_issues_no_further_calls() {
        let (router, host) = router_with(MockHost::default());
        let chat = MockChat::default();

        router
            .route(&chat, "!search nothing", "@user:example.org")
            .await
            .unwrap();

        assert_eq!(chat.sent(), vec![messages::SEARCH_NOT_FOUND.to_string()]);
        assert_eq!(host.calls(), vec!["search:nothing".to_string()]);
    }

    #[tokio::test]
    async fn create_short_form_grants_only_after_creation() {
        let (router, host) = router_with(MockHost::default());
        let chat = MockChat::default();

        router
            .route(&chat, "!create demo", "@user:example.org")
            .await
            .unwrap();

        assert_eq!(
            host.calls(),
            vec!["create:demo:false".to_string(), "grant:demo".to_string()]
        );
        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("https://github.com/tagglabs/demo"));
        assert!(sent[0].contains("campaigns"));
    }

    #[tokio::test]
    async fn create_form_collects_fields_and_sends_private_flag() {
        let (router, host) = router_with(MockHost::default());
        let chat = MockChat::default();
        let user = "@user:example.org";

        router.route(&chat, "!create", user).await.unwrap();
        router.route(&chat, "demo", user).await.unwrap(); // name
        router.route(&chat, "-", user).await.unwrap(); // description skipped
        router.route(&chat, "private", user).await.unwrap(); // visibility
        router.route(&chat, "yes", user).await.unwrap(); // readme

        assert_eq!(
            host.calls(),
            vec!["create:demo:true".to_string(), "grant:demo".to_string()]
        );
        // intro + three follow-up prompts + final confirmation
        assert_eq!(chat.sent().len(), 5);
        assert!(chat.sent().last().unwrap().contains("Repo created"));
    }

    #[tokio::test]
    async fn visibility_typo_reasks_without_losing_earlier_answers() {
        let (router, host) = router_with(MockHost::default());
        let chat = MockChat::default();
        let user = "@user:example.org";

        router.route(&chat, "!create", user).await.unwrap();
        router.route(&chat, "demo", user).await.unwrap(); // name
        router.route(&chat, "-", user).await.unwrap(); // description skipped
        router.route(&chat, "privat", user).await.unwrap(); // typo
        assert!(host.calls().is_empty());
        let retry = chat.sent().last().unwrap().clone();
        assert!(retry.contains("must be one of: public, private"));
        assert!(retry.contains("Visibility"));

        router.route(&chat, "private", user).await.unwrap(); // corrected
        router.route(&chat, "-", user).await.unwrap(); // readme skipped

        // The name answered before the typo is still the one submitted.
        assert_eq!(
            host.calls(),
            vec!["create:demo:true".to_string(), "grant:demo".to_string()]
        );
    }

    #[tokio::test]
    async fn name_collision_replies_validation_error_and_never_grants() {
        let (router, host) = router_with(MockHost {
            create_collides: true,
            ..Default::default()
        });
        let chat = MockChat::default();

        router
            .route(&chat, "!create demo", "@user:example.org")
            .await
            .unwrap();

        assert_eq!(host.calls(), vec!["create:demo:false".to_string()]);
        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("name already exists"));
        assert!(!sent[0].contains("Repo created"));
    }

    #[tokio::test]
    async fn failed_grant_is_reported_as_partial_failure() {
        let (router, host) = router_with(MockHost {
            grant_fails: true,
            ..Default::default()
        });
        let chat = MockChat::default();

        router
            .route(&chat, "!create demo", "@user:example.org")
            .await
            .unwrap();

        assert_eq!(
            host.calls(),
            vec!["create:demo:false".to_string(), "grant:demo".to_string()]
        );
        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        // Distinct from full success and from outright failure.
        assert!(sent[0].contains("manually"));
        assert_ne!(
            sent[0],
            messages::repo_created("https://github.com/tagglabs/demo", "campaigns")
        );
        assert!(!sent[0].starts_with("❌"));
    }

    #[tokio::test]
    async fn get_nonexistent_repo_replies_not_found_without_erroring() {
        let (router, host) = router_with(MockHost::default());
        let chat = MockChat::default();

        let result = router
            .route(&chat, "!repo nonexistent", "@user:example.org")
            .await;

        assert!(result.is_ok());
        assert_eq!(chat.sent(), vec![messages::REPO_NOT_FOUND.to_string()]);
        assert_eq!(
            host.calls(),
            vec!["get:nonexistent".to_string(), "search:nonexistent".to_string()]
        );
    }

    #[tokio::test]
    async fn get_fallback_offers_selection_and_resolves_pick() {
        let (router, host) = router_with(MockHost {
            repos: vec![repo("alpha"), repo("beta")],
            search_results: vec![repo("alpha"), repo("beta")],
            ..Default::default()
        });
        let chat = MockChat::default();
        let user = "@user:example.org";

        router.route(&chat, "!repo alp", user).await.unwrap();
        let sent = chat.sent();
        assert!(sent[0].contains("1. alpha"));
        assert!(sent[0].contains("2. beta"));

        router.route(&chat, "2", user).await.unwrap();
        assert!(host.calls().contains(&"get:beta".to_string()));
        assert!(chat.sent().last().unwrap().contains("**beta**"));
    }

    #[tokio::test]
    async fn cancel_clears_an_active_form() {
        let (router, host) = router_with(MockHost::default());
        let chat = MockChat::default();
        let user = "@user:example.org";

        router.route(&chat, "!create", user).await.unwrap();
        router.route(&chat, "!cancel", user).await.unwrap();
        // With the form gone, plain text is ignored again.
        router.route(&chat, "demo", user).await.unwrap();

        assert_eq!(chat.sent().last().unwrap(), messages::FORM_CANCELLED);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn unprefixed_chatter_is_ignored() {
        let (router, host) = router_with(MockHost::default());
        let chat = MockChat::default();

        router
            .route(&chat, "good morning everyone", "@user:example.org")
            .await
            .unwrap();

        assert!(chat.sent().is_empty());
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_gets_a_reply() {
        let (router, _host) = router_with(MockHost::default());
        let chat = MockChat::default();

        router
            .route(&chat, "!frobnicate", "@user:example.org")
            .await
            .unwrap();

        assert_eq!(chat.sent(), vec![messages::unknown_command('!')]);
    }

    struct DeadChat;

    #[async_trait]
    impl ChatProvider for DeadChat {
        async fn send_message(&self, _content: &str) -> Result<String, String> {
            Err("room gone".to_string())
        }

        async fn send_notification(&self, _content: &str) -> Result<(), String> {
            Err("room gone".to_string())
        }

        async fn typing(&self, _active: bool) -> Result<(), String> {
            Ok(())
        }

        fn room_id(&self) -> String {
            "!room:example.org".to_string()
        }
    }

    #[tokio::test]
    async fn unknown_command_send_failure_propagates() {
        let (router, _host) = router_with(MockHost::default());

        let result = router
            .route(&DeadChat, "!frobnicate", "@user:example.org")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn prefix_toggle_switches_the_command_marker() {
        let mut config = test_config();
        config.commands.prefix = '.';
        let host = Arc::new(MockHost {
            repos: vec![repo("one")],
            ..Default::default()
        });
        let router = CommandRouter::new(
            config,
            host.clone(),
            Arc::new(Mutex::new(BotState::default())),
        );
        let chat = MockChat::default();
        let user = "@user:example.org";

        router.route(&chat, "!repos", user).await.unwrap();
        assert!(chat.sent().is_empty());

        router.route(&chat, ".repos", user).await.unwrap();
        assert_eq!(chat.sent().len(), 1);
    }
}
