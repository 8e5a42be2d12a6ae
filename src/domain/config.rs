use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    pub github: GithubConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Configuration for connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    /// May be left empty in the file and supplied via `MATRIX_PASSWORD`.
    #[serde(default)]
    pub password: String,
    /// Restrict the bot to a single room id. `None` serves every joined room.
    #[serde(default)]
    pub room: Option<String>,
}

/// GitHub organization settings.
#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    /// Personal access token. May be left empty in the file and supplied
    /// via `GITHUB_TOKEN`.
    #[serde(default)]
    pub token: String,
    /// The fixed organization all commands operate on.
    pub org: String,
    /// Team granted maintain access on every created repository.
    #[serde(default = "default_team_slug")]
    pub team_slug: String,
}

fn default_team_slug() -> String {
    "campaigns".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommandsConfig {
    /// Command prefix character (`!repos`, `!create`, ...).
    #[serde(default = "default_prefix")]
    pub prefix: char,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> char {
    '!'
}

impl AppConfig {
    /// Load config from a YAML file, then fill secrets from the environment
    /// and reject configs that still lack them.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: AppConfig =
            serde_yaml::from_str(&content).context("Failed to parse config")?;
        config.resolve_secrets();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values so tokens
    /// never have to live on disk.
    fn resolve_secrets(&mut self) {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                self.github.token = token;
            }
        }
        if let Ok(password) = std::env::var("MATRIX_PASSWORD") {
            if !password.is_empty() {
                self.services.matrix.password = password;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.github.token.is_empty() {
            bail!("GitHub token missing: set github.token or GITHUB_TOKEN");
        }
        if self.services.matrix.password.is_empty() {
            bail!("Matrix password missing: set services.matrix.password or MATRIX_PASSWORD");
        }
        if self.github.org.is_empty() {
            bail!("github.org must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
services:
  matrix:
    homeserver: https://matrix.example.org
    username: "@orgbot:example.org"
    password: hunter2
github:
  token: ghp_abc123
  org: tagglabs
"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config: AppConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.github.org, "tagglabs");
        assert_eq!(config.github.team_slug, "campaigns");
        assert_eq!(config.commands.prefix, '!');
        assert!(config.services.matrix.room.is_none());
    }

    #[test]
    fn prefix_toggle_is_respected() {
        let yaml = format!("{SAMPLE}\ncommands:\n  prefix: '.'\n");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.commands.prefix, '.');
    }

    // Single test for all env interactions: the process environment is
    // global, so splitting these up would race under the parallel runner.
    #[test]
    fn env_vars_override_file_secrets_but_empty_ones_do_not() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
services:
  matrix:
    homeserver: https://matrix.example.org
    username: "@orgbot:example.org"
    password: hunter2
github:
  token: ""
  org: tagglabs
"#,
        )
        .unwrap();

        unsafe {
            std::env::set_var("GITHUB_TOKEN", "ghp_from_env");
            std::env::remove_var("MATRIX_PASSWORD");
        }
        let config = AppConfig::load(&path).unwrap();
        // Env fills the blank token; the unset password var leaves the
        // file value alone.
        assert_eq!(config.github.token, "ghp_from_env");
        assert_eq!(config.services.matrix.password, "hunter2");

        // An empty env var must not clobber a token set in the file.
        unsafe {
            std::env::set_var("GITHUB_TOKEN", "");
        }
        let mut config: AppConfig = serde_yaml::from_str(SAMPLE).unwrap();
        config.resolve_secrets();
        assert_eq!(config.github.token, "ghp_abc123");

        unsafe {
            std::env::remove_var("GITHUB_TOKEN");
        }
    }

    #[test]
    fn load_rejects_missing_org() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
services:
  matrix:
    homeserver: https://matrix.example.org
    username: "@orgbot:example.org"
    password: hunter2
github:
  token: ghp_abc123
  org: ""
"#,
        )
        .unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
