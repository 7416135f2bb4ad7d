// Prompt construction for rule evaluation.

use crate::core::moderation::{ModerationRule, QueueItem};

/// Build the evaluation prompt for one queue item against the rule set.
///
/// The contract with the model: respond with a single JSON object carrying
/// `violates`, `rule_number`, `explanation`, and a `confidence` score in
/// [0.0, 1.0]. Downstream parsing tolerates prose around the object.
pub fn build_prompt(item: &QueueItem, rules: &[ModerationRule]) -> String {
    let rules_text = rules
        .iter()
        .map(|rule| {
            format!(
                "Rule {}: {}\nExplanation: {}",
                rule.number, rule.title, rule.explanation
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let (content_type, content_info) = match item {
        QueueItem::Submission {
            title, body, url, ..
        } => {
            let body_text = if body.is_empty() {
                "[No text content]"
            } else {
                body.as_str()
            };
            (
                "submission",
                format!(
                    "SUBMISSION:\nTitle: {}\nBody: {}\nURL: {}",
                    title,
                    body_text,
                    url.as_deref().unwrap_or("[No URL]")
                ),
            )
        }
        QueueItem::Comment { body, author, .. } => (
            "comment",
            format!(
                "COMMENT:\nBody: {}\nAuthor: {}",
                body,
                author.as_deref().unwrap_or("[Deleted]")
            ),
        ),
    };

    format!(
        r#"You are a Reddit moderator. Evaluate the following {content_type} against the subreddit's rules.
Respond with a JSON object containing your moderation decision.

SUBREDDIT RULES:
{rules_text}

{content_info}

If the {content_type} violates any rule, respond with:
{{
  "violates": true,
  "rule_number": [rule number],
  "explanation": "[your explanation why it violates this rule]",
  "confidence": [confidence score from 0.0 to 1.0]
}}

If the {content_type} does not violate any rule, respond with:
{{
  "violates": false,
  "confidence": [confidence score from 0.0 to 1.0]
}}

Respond ONLY with the JSON object, nothing else."#
    )
}
