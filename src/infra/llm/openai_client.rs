use crate::core::evaluation::{LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo";

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = "https://api.openai.com/v1/chat/completions";

        // response_format json_object keeps the model on the JSON contract;
        // low temperature keeps verdicts stable across runs.
        let payload = json!({
            "model": self.model,
            "response_format": {"type": "json_object"},
            "messages": [
                {
                    "role": "system",
                    "content": "You are a Reddit moderator assistant.",
                },
                {"role": "user", "content": prompt},
            ],
            "max_tokens": 500,
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!(
                "OpenAI API error: {} - {}",
                status, text
            )));
        }

        let response_json: serde_json::Value = response.json().await?;

        let content = response_json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                LlmError::InvalidResponse("missing choices[0].message.content".to_string())
            })?
            .to_string();

        Ok(content)
    }
}
