// LLM evaluation service.
//
// The provider returns raw completion text; this service extracts the JSON
// decision object and normalizes it. A provider failure or unparseable
// response degrades to a zero-confidence "no violation" decision so one bad
// evaluation never stalls the queue.

use super::prompt::build_prompt;
use crate::core::moderation::{ModerationDecision, ModerationRule, QueueItem};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API error: {0}")]
    Api(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not parse JSON from response: {0}")]
    InvalidResponse(String),
}

/// Text-completion oracle. Invoked once per item with no session state.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

// Blanket implementation so the evaluator can hold a trait object and the
// concrete provider can be chosen from configuration at startup.
#[async_trait]
impl LlmProvider for Box<dyn LlmProvider> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }
}

pub struct LlmEvaluator<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmEvaluator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Evaluate one queue item against the rule set.
    ///
    /// Total: never returns an error. Failures are folded into the decision
    /// as `{violates: false, confidence: 0.0, error: ...}`.
    pub async fn evaluate(
        &self,
        item: &QueueItem,
        rules: &[ModerationRule],
    ) -> ModerationDecision {
        let prompt = build_prompt(item, rules);

        let raw_text = match self.provider.complete(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("LLM evaluation failed: {}", err);
                return ModerationDecision::from_error(err.to_string());
            }
        };

        match extract_json(&raw_text) {
            Ok(raw) => {
                tracing::debug!("Parsed decision: {}", raw);
                ModerationDecision::from_raw(&raw)
            }
            Err(err) => {
                tracing::error!("Failed to parse decision from LLM: {}", err);
                ModerationDecision::from_error(err.to_string())
            }
        }
    }
}

/// Pull the first JSON object out of a completion, tolerating prose or code
/// fences around it.
fn extract_json(text: &str) -> Result<Value, LlmError> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    let preview: String = trimmed.chars().take(100).collect();
    Err(LlmError::InvalidResponse(format!("{}...", preview)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::RuleNumber;

    struct CannedProvider {
        response: Result<String, ()>,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(LlmError::Api("model overloaded".to_string())),
            }
        }
    }

    fn rules() -> Vec<ModerationRule> {
        vec![ModerationRule {
            number: 1.into(),
            title: "No spam".to_string(),
            explanation: "No spam allowed".to_string(),
            response: "Removed for spam".to_string(),
        }]
    }

    fn item() -> QueueItem {
        QueueItem::Comment {
            id: "c1".to_string(),
            author: Some("bob".to_string()),
            body: "buy my stuff".to_string(),
        }
    }

    #[test]
    fn test_extract_json_plain_object() {
        let value = extract_json(r#"{"violates": true, "confidence": 0.9}"#).unwrap();
        assert_eq!(value["violates"], true);
    }

    #[test]
    fn test_extract_json_with_surrounding_prose() {
        let text = "Here is my decision:\n```json\n{\"violates\": false, \"confidence\": 0.7}\n```\nDone.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["violates"], false);
        assert_eq!(value["confidence"], 0.7);
    }

    #[test]
    fn test_extract_json_no_object() {
        let err = extract_json("I cannot decide.").unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_evaluate_parses_violation() {
        let evaluator = LlmEvaluator::new(CannedProvider {
            response: Ok(
                r#"{"violates": true, "rule_number": 1, "explanation": "spam", "confidence": 0.92}"#
                    .to_string(),
            ),
        });

        let decision = evaluator.evaluate(&item(), &rules()).await;

        assert!(decision.violates);
        assert_eq!(decision.rule_number, Some(RuleNumber::Int(1)));
        assert_eq!(decision.confidence, 0.92);
        assert!(decision.error.is_none());
    }

    #[tokio::test]
    async fn test_evaluate_provider_failure_degrades() {
        let evaluator = LlmEvaluator::new(CannedProvider { response: Err(()) });

        let decision = evaluator.evaluate(&item(), &rules()).await;

        assert!(!decision.violates);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.error.unwrap().contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_evaluate_garbage_response_degrades() {
        let evaluator = LlmEvaluator::new(CannedProvider {
            response: Ok("sorry, as a language model I ...".to_string()),
        });

        let decision = evaluator.evaluate(&item(), &rules()).await;

        assert!(!decision.violates);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.error.is_some());
    }
}
