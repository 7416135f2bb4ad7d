// Moderation domain models - data structures for the decision pipeline.
//
// These are pure domain types with no Reddit dependencies.
// The infra layer converts these to Reddit API calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rule identifier as it appears in a rule set or an LLM decision.
///
/// Rule numbers arrive as integers from JSON decisions but may be quoted
/// strings in YAML rule files, so both representations are first-class and
/// the matcher coerces between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleNumber {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RuleNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleNumber::Int(n) => write!(f, "{}", n),
            RuleNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RuleNumber {
    fn from(n: i64) -> Self {
        RuleNumber::Int(n)
    }
}

impl From<&str> for RuleNumber {
    fn from(s: &str) -> Self {
        RuleNumber::Text(s.to_string())
    }
}

/// A single subreddit moderation rule with its removal response text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRule {
    /// Stable identity used to cross-reference a decision. Unique within
    /// a rule set; duplicates are a configuration error.
    pub number: RuleNumber,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    /// Text delivered to the author when content is removed under this rule.
    #[serde(default)]
    pub response: String,
}

impl std::fmt::Display for ModerationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rule {}: {}", self.number, self.title)
    }
}

/// Normalized LLM verdict for a single queue item.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationDecision {
    pub violates: bool,
    /// Meaningful only when `violates` is true.
    pub rule_number: Option<RuleNumber>,
    pub explanation: String,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    /// Set when the evaluator itself failed.
    pub error: Option<String>,
}

const DEFAULT_EXPLANATION: &str = "No explanation provided";

impl ModerationDecision {
    /// Normalize a raw evaluator response into a typed decision.
    ///
    /// This is total: missing or wrong-typed fields fall back to "no
    /// violation, zero confidence" so a malformed LLM response degrades
    /// instead of crashing the pipeline.
    pub fn from_raw(raw: &Value) -> Self {
        let violates = raw
            .get("violates")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let rule_number = raw.get("rule_number").and_then(|v| match v {
            Value::Number(n) => n.as_i64().map(RuleNumber::Int),
            Value::String(s) => Some(RuleNumber::Text(s.clone())),
            _ => None,
        });

        let explanation = raw
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_EXPLANATION)
            .to_string();

        let confidence = raw
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        let error = raw
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            violates,
            rule_number,
            explanation,
            confidence,
            error,
        }
    }

    /// Fallback decision when the evaluator could not be reached at all.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            violates: false,
            rule_number: None,
            explanation: DEFAULT_EXPLANATION.to_string(),
            confidence: 0.0,
            error: Some(message.into()),
        }
    }
}

/// Kind discriminator for a queue item, resolved once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Submission,
    Comment,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Submission => write!(f, "submission"),
            ItemKind::Comment => write!(f, "comment"),
        }
    }
}

/// A modqueue entry under moderation.
///
/// `author` is `None` for deleted accounts.
#[derive(Debug, Clone, PartialEq)]
pub enum QueueItem {
    Submission {
        id: String,
        author: Option<String>,
        title: String,
        body: String,
        url: Option<String>,
    },
    Comment {
        id: String,
        author: Option<String>,
        body: String,
    },
}

impl QueueItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            QueueItem::Submission { .. } => ItemKind::Submission,
            QueueItem::Comment { .. } => ItemKind::Comment,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            QueueItem::Submission { id, .. } | QueueItem::Comment { id, .. } => id,
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            QueueItem::Submission { author, .. } | QueueItem::Comment { author, .. } => {
                author.as_deref()
            }
        }
    }

    /// The Reddit "fullname" (type-prefixed id) used by the write API.
    pub fn fullname(&self) -> String {
        match self.kind() {
            ItemKind::Submission => format!("t3_{}", self.id()),
            ItemKind::Comment => format!("t1_{}", self.id()),
        }
    }

    /// Short human-readable identifier for log lines: the title for a
    /// submission, a truncated body for a comment.
    pub fn summary(&self) -> String {
        match self {
            QueueItem::Submission { title, .. } => title.clone(),
            QueueItem::Comment { body, .. } => truncate_chars(body, 50),
        }
    }
}

/// Truncate to at most `max` characters, appending "..." when shortened.
/// Operates on chars so multi-byte content never splits mid-codepoint.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

/// Terminal state of the decision engine for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Approved,
    Removed,
    NoAction,
}

impl std::fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationAction::Approved => write!(f, "approved"),
            ModerationAction::Removed => write!(f, "removed"),
            ModerationAction::NoAction => write!(f, "no_action"),
        }
    }
}

/// Immutable result of moderating one item. The caller decides whether to
/// log or store it; nothing is persisted here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationResult {
    pub item_id: String,
    pub item_kind: ItemKind,
    pub action: ModerationAction,
    pub rule_number: Option<RuleNumber>,
    pub explanation: Option<String>,
}

impl ModerationResult {
    /// One-line description of the action taken, for CLI output.
    pub fn describe(&self) -> String {
        match self.action {
            ModerationAction::Approved => "Approved".to_string(),
            ModerationAction::Removed => match &self.rule_number {
                Some(number) => format!("Removed (Rule {})", number),
                None => "Removed".to_string(),
            },
            ModerationAction::NoAction => format!(
                "No action taken ({})",
                self.explanation.as_deref().unwrap_or("no explanation")
            ),
        }
    }
}

/// How a removal explanation reaches the content's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationMethod {
    /// Visible removal reason on submissions, reply on comments.
    Public,
    /// Private message attributed to the subreddit.
    Modmail,
}

impl NotificationMethod {
    /// Resolve a configured method name. Unrecognized names fall back to
    /// `Public` rather than failing the pipeline.
    pub fn from_name(name: &str) -> Self {
        match name {
            "modmail" => NotificationMethod::Modmail,
            "public" => NotificationMethod::Public,
            other => {
                tracing::warn!(
                    "Unknown notification method '{}', falling back to public",
                    other
                );
                NotificationMethod::Public
            }
        }
    }
}

/// Per-run settings for the moderation service, passed in by the caller
/// instead of living in global state.
#[derive(Debug, Clone)]
pub struct ModerationSettings {
    /// Subreddit being moderated, used for modmail attribution.
    pub subreddit: String,
    pub notification_method: NotificationMethod,
    /// Minimum confidence required before any action is taken. The same
    /// threshold gates both approvals and removals.
    pub confidence_threshold: f64,
    /// When true, the full decision is computed but no external side
    /// effects are performed.
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decision_from_empty_mapping_defaults() {
        let decision = ModerationDecision::from_raw(&json!({}));

        assert!(!decision.violates);
        assert_eq!(decision.confidence, 0.0);
        assert_eq!(decision.explanation, "No explanation provided");
        assert!(decision.rule_number.is_none());
        assert!(decision.error.is_none());
    }

    #[test]
    fn test_decision_from_full_mapping() {
        let decision = ModerationDecision::from_raw(&json!({
            "violates": true,
            "rule_number": 1,
            "explanation": "This is spam",
            "confidence": 0.95
        }));

        assert!(decision.violates);
        assert_eq!(decision.rule_number, Some(RuleNumber::Int(1)));
        assert_eq!(decision.explanation, "This is spam");
        assert_eq!(decision.confidence, 0.95);
    }

    #[test]
    fn test_decision_rule_number_as_string() {
        let decision = ModerationDecision::from_raw(&json!({
            "violates": true,
            "rule_number": "2",
            "confidence": 0.9
        }));

        assert_eq!(
            decision.rule_number,
            Some(RuleNumber::Text("2".to_string()))
        );
    }

    #[test]
    fn test_decision_wrong_typed_fields_degrade() {
        // violates as a string and confidence as a list must not panic
        let decision = ModerationDecision::from_raw(&json!({
            "violates": "yes",
            "confidence": [0.9],
            "rule_number": {"n": 1}
        }));

        assert!(!decision.violates);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.rule_number.is_none());
    }

    #[test]
    fn test_rule_deserializes_from_yaml_with_quoted_number() {
        let yaml =
            "number: \"3\"\ntitle: No spam\nexplanation: No spam allowed\nresponse: Removed for spam\n";
        let rule: ModerationRule = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(rule.number, RuleNumber::Text("3".to_string()));
        assert_eq!(rule.title, "No spam");
    }

    #[test]
    fn test_queue_item_fullname_prefixes() {
        let submission = QueueItem::Submission {
            id: "abc".to_string(),
            author: Some("alice".to_string()),
            title: "Test".to_string(),
            body: String::new(),
            url: None,
        };
        let comment = QueueItem::Comment {
            id: "def".to_string(),
            author: None,
            body: "hello".to_string(),
        };

        assert_eq!(submission.fullname(), "t3_abc");
        assert_eq!(comment.fullname(), "t1_def");
        assert_eq!(submission.kind(), ItemKind::Submission);
        assert_eq!(comment.kind(), ItemKind::Comment);
    }

    #[test]
    fn test_comment_summary_truncates() {
        let comment = QueueItem::Comment {
            id: "c1".to_string(),
            author: Some("bob".to_string()),
            body: "x".repeat(80),
        };

        let summary = comment.summary();
        assert_eq!(summary.chars().count(), 53);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        let text = "héllo wörld, this has accénts and goes on for a while beyond the limit";
        let short = truncate_chars(text, 10);

        assert_eq!(short.chars().count(), 13);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_result_describe() {
        let removed = ModerationResult {
            item_id: "a".to_string(),
            item_kind: ItemKind::Submission,
            action: ModerationAction::Removed,
            rule_number: Some(RuleNumber::Int(1)),
            explanation: Some("spam".to_string()),
        };
        assert_eq!(removed.describe(), "Removed (Rule 1)");

        let skipped = ModerationResult {
            item_id: "b".to_string(),
            item_kind: ItemKind::Comment,
            action: ModerationAction::NoAction,
            rule_number: None,
            explanation: Some("Rule not found".to_string()),
        };
        assert_eq!(skipped.describe(), "No action taken (Rule not found)");
    }

    #[test]
    fn test_notification_method_fallback() {
        assert_eq!(
            NotificationMethod::from_name("modmail"),
            NotificationMethod::Modmail
        );
        assert_eq!(
            NotificationMethod::from_name("public"),
            NotificationMethod::Public
        );
        assert_eq!(
            NotificationMethod::from_name("carrier-pigeon"),
            NotificationMethod::Public
        );
    }
}
