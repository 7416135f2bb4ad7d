// Core moderation module - the decision-and-action pipeline.
// Following the same layering as the evaluation module.

pub mod actions;
pub mod moderation_models;
pub mod moderation_service;
pub mod notification;
pub mod rule_matcher;

pub use actions::{ActionError, QueueSource, RedditActions};
pub use moderation_models::*;
pub use moderation_service::{ModerationService, StrategyMap};
pub use notification::{
    ModmailNotificationStrategy, NotificationStrategy, PublicNotificationStrategy,
};
pub use rule_matcher::RuleMatcher;
