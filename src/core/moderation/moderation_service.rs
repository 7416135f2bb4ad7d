// Moderation service - the decision engine for queue items.
//
// Per item, in order:
// 1. Confidence gate (shared threshold for approve and remove paths)
// 2. No-violation branch -> approve
// 3. Violation branch -> rule resolution -> remove + notify
//
// Side-effect failures are logged and never abort the batch; the returned
// result always reflects the decision that was computed. NO Reddit
// dependencies here - just pure domain logic behind the RedditActions port.

use super::actions::RedditActions;
use super::moderation_models::{
    ModerationAction, ModerationDecision, ModerationResult, ModerationRule, ModerationSettings,
    NotificationMethod, QueueItem,
};
use super::notification::{
    ModmailNotificationStrategy, NotificationStrategy, PublicNotificationStrategy,
};
use super::rule_matcher::RuleMatcher;
use std::collections::HashMap;

pub type StrategyMap = HashMap<NotificationMethod, Box<dyn NotificationStrategy>>;

fn default_strategies() -> StrategyMap {
    let mut strategies: StrategyMap = HashMap::new();
    strategies.insert(
        NotificationMethod::Public,
        Box::new(PublicNotificationStrategy),
    );
    strategies.insert(
        NotificationMethod::Modmail,
        Box::new(ModmailNotificationStrategy),
    );
    strategies
}

/// Service for handling content moderation.
///
/// Owns no state across calls beyond the injected transport and the
/// read-only strategy map; every `moderate_item` call is independent.
pub struct ModerationService<A: RedditActions> {
    actions: A,
    strategies: StrategyMap,
}

impl<A: RedditActions> ModerationService<A> {
    /// Create a service with the standard public and modmail strategies.
    pub fn new(actions: A) -> Self {
        Self::with_strategies(actions, default_strategies())
    }

    /// Create a service with an explicit strategy map. Tests use this to
    /// substitute recording doubles without touching shared state.
    pub fn with_strategies(actions: A, strategies: StrategyMap) -> Self {
        Self {
            actions,
            strategies,
        }
    }

    fn strategy(&self, method: NotificationMethod) -> Option<&dyn NotificationStrategy> {
        self.strategies
            .get(&method)
            .or_else(|| self.strategies.get(&NotificationMethod::Public))
            .map(|strategy| strategy.as_ref())
    }

    /// Moderate one queue item against an LLM decision.
    ///
    /// Always returns a result; every failure mode inside this call is
    /// recovered (normalization defaults, rule-not-found, side-effect
    /// errors). In dry-run mode the same result is computed but all
    /// external calls are skipped entirely.
    pub async fn moderate_item(
        &self,
        item: &QueueItem,
        decision: &ModerationDecision,
        rules: &[ModerationRule],
        settings: &ModerationSettings,
    ) -> ModerationResult {
        let kind = item.kind();
        let summary = item.summary();

        // Confidence gate, checked before anything else: an uncertain
        // verdict takes no action regardless of which way it points.
        if decision.confidence < settings.confidence_threshold {
            tracing::info!(
                "SKIPPING {}: '{}' - confidence {:.2} below threshold {:.2}",
                kind,
                summary,
                decision.confidence,
                settings.confidence_threshold
            );
            return ModerationResult {
                item_id: item.id().to_string(),
                item_kind: kind,
                action: ModerationAction::NoAction,
                rule_number: None,
                explanation: Some(format!(
                    "Confidence {:.2} below threshold {:.2}",
                    decision.confidence, settings.confidence_threshold
                )),
            };
        }

        if !decision.violates {
            tracing::info!(
                "APPROVING {}: '{}' - confidence: {:.2}",
                kind,
                summary,
                decision.confidence
            );

            if !settings.dry_run {
                if let Err(err) = self.actions.approve(item).await {
                    tracing::error!("Failed to approve {} {}: {}", kind, item.id(), err);
                }
            }

            return ModerationResult {
                item_id: item.id().to_string(),
                item_kind: kind,
                action: ModerationAction::Approved,
                rule_number: None,
                explanation: None,
            };
        }

        // Violation with enough confidence: resolve the referenced rule.
        let matched = decision
            .rule_number
            .as_ref()
            .and_then(|number| RuleMatcher::find_matching_rule(number, rules));

        let Some(rule) = matched else {
            // An unresolvable rule reference must never remove content.
            tracing::warn!(
                "Rule {} not found in rules configuration",
                decision
                    .rule_number
                    .as_ref()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "<none>".to_string())
            );
            return ModerationResult {
                item_id: item.id().to_string(),
                item_kind: kind,
                action: ModerationAction::NoAction,
                rule_number: None,
                explanation: Some("Rule not found".to_string()),
            };
        };

        tracing::info!(
            "REMOVING {}: '{}' - {} - confidence: {:.2}",
            kind,
            summary,
            rule,
            decision.confidence
        );
        tracing::info!("Explanation: {}", decision.explanation);

        if !settings.dry_run {
            if let Err(err) = self.actions.remove(item).await {
                tracing::error!("Failed to remove {} {}: {}", kind, item.id(), err);
            }

            // Removal has committed; notification failures are the
            // strategy's problem and never roll it back.
            match self.strategy(settings.notification_method) {
                Some(strategy) => {
                    strategy
                        .notify(&self.actions, item, rule, &settings.subreddit)
                        .await;
                }
                None => tracing::warn!("No notification strategy configured, skipping notify"),
            }
        }

        ModerationResult {
            item_id: item.id().to_string(),
            item_kind: kind,
            action: ModerationAction::Removed,
            rule_number: decision.rule_number.clone(),
            explanation: Some(decision.explanation.clone()),
        }
    }
}
