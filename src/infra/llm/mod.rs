pub mod gemini_client;
pub mod openai_client;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiClient;

use crate::core::evaluation::{LlmError, LlmProvider};
use crate::infra::config::{AppConfig, ProviderSettings};

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Transport(err.to_string())
    }
}

fn resolve_api_key(settings: &ProviderSettings, env_var: &str) -> Option<String> {
    settings
        .api_key
        .clone()
        .or_else(|| std::env::var(env_var).ok())
}

/// Build the configured LLM provider as a trait object.
///
/// API keys are taken from the provider's config section, falling back to
/// `OPENAI_API_KEY` / `GEMINI_API_KEY` in the environment.
pub fn create_provider(config: &AppConfig) -> anyhow::Result<Box<dyn LlmProvider>> {
    match config.llm.provider.as_str() {
        "openai" => {
            let settings = config.openai.clone().unwrap_or_default();
            let api_key = resolve_api_key(&settings, "OPENAI_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("Missing OpenAI API key (config or OPENAI_API_KEY)"))?;
            Ok(Box::new(OpenAiClient::new(api_key, settings.model)))
        }
        "gemini" => {
            let settings = config.gemini.clone().unwrap_or_default();
            let api_key = resolve_api_key(&settings, "GEMINI_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("Missing Gemini API key (config or GEMINI_API_KEY)"))?;
            Ok(Box::new(GeminiClient::new(api_key, settings.model)))
        }
        other => anyhow::bail!("Unsupported LLM provider: {}", other),
    }
}
