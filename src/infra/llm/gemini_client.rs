// Gemini client - Google AI Studio API integration.
//
// Differences from the OpenAI client:
// - The API key goes in a query parameter, not an Authorization header.
// - Requests use `contents[]` with nested `parts`.
// - The completion text lives at `candidates[0].content.parts[0].text`.

use crate::core::evaluation::{LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let payload = json!({
            "contents": [
                {"role": "user", "parts": [{"text": prompt}]}
            ],
            "generationConfig": {
                "temperature": 0.2,
                "responseMimeType": "application/json",
            },
        });

        tracing::debug!("Gemini request to model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            if let Ok(parsed) = serde_json::from_str::<GeminiErrorResponse>(&text) {
                return Err(LlmError::Api(format!(
                    "Gemini API error ({}): {}",
                    status, parsed.error.message
                )));
            }
            return Err(LlmError::Api(format!(
                "Gemini API error: {} - {}",
                status, text
            )));
        }

        let response_json: serde_json::Value = response.json().await?;

        let content = response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                LlmError::InvalidResponse(
                    "no content in Gemini response - possibly blocked by safety filters"
                        .to_string(),
                )
            })?
            .to_string();

        Ok(content)
    }
}
