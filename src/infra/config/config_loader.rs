// YAML configuration and rules loading.
//
// Secrets may come from the config file or the environment; the factory in
// infra::llm resolves API keys with the environment as fallback.

use crate::core::moderation::ModerationRule;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid rules file format: missing top-level 'rules' sequence")]
    InvalidRules,
}

/// Reddit API credentials (password-grant script app).
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    concat!("reddit-llm-moderator/", env!("CARGO_PKG_VERSION")).to_string()
}

/// LLM evaluation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// Provider name: "openai" or "gemini".
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Minimum confidence before any moderation action is taken.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_confidence_threshold() -> f64 {
    0.8
}

/// Per-provider settings. `api_key` falls back to the provider's
/// environment variable when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub reddit: RedditConfig,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub openai: Option<ProviderSettings>,
    #[serde(default)]
    pub gemini: Option<ProviderSettings>,
}

/// Load the application config from a YAML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = read(path)?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    rules: Option<Vec<ModerationRule>>,
}

/// Load the subreddit rule set from a YAML file with a top-level `rules:`
/// sequence.
pub fn load_rules(path: &Path) -> Result<Vec<ModerationRule>, ConfigError> {
    let text = read(path)?;
    let parsed: RulesFile = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    parsed.rules.ok_or(ConfigError::InvalidRules)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::RuleNumber;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_with_defaults() {
        let file = write_temp(
            r#"
reddit:
  client_id: abc
  client_secret: def
  username: mod_bot
  password: hunter2
"#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.reddit.username, "mod_bot");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.confidence_threshold, 0.8);
        assert!(config.reddit.user_agent.starts_with("reddit-llm-moderator/"));
    }

    #[test]
    fn test_load_config_explicit_llm_section() {
        let file = write_temp(
            r#"
reddit:
  client_id: abc
  client_secret: def
  username: mod_bot
  password: hunter2
  user_agent: my-agent/1.0
llm:
  provider: gemini
  confidence_threshold: 0.9
gemini:
  model: gemini-1.5-pro
"#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.confidence_threshold, 0.9);
        assert_eq!(config.reddit.user_agent, "my-agent/1.0");
        assert_eq!(
            config.gemini.unwrap().model.as_deref(),
            Some("gemini-1.5-pro")
        );
    }

    #[test]
    fn test_load_rules_mixed_number_types() {
        let file = write_temp(
            r#"
rules:
  - number: 1
    title: No spam
    explanation: No spam allowed
    response: Removed for spam
  - number: "2"
    title: Be civil
    explanation: Be civil to others
    response: Removed for incivility
"#,
        );

        let rules = load_rules(file.path()).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].number, RuleNumber::Int(1));
        assert_eq!(rules[1].number, RuleNumber::Text("2".to_string()));
    }

    #[test]
    fn test_load_rules_missing_sequence() {
        let file = write_temp("not_rules: []\n");

        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRules));
    }

    #[test]
    fn test_load_rules_missing_file() {
        let err = load_rules(Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
