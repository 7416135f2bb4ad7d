// Notification strategies - how a removal explanation reaches the author.
//
// Strategies never surface errors: by the time a notification is attempted
// the removal has already committed, so a failed delivery is logged and
// dropped rather than escalated.

use super::actions::RedditActions;
use super::moderation_models::{truncate_chars, ModerationRule, QueueItem};
use async_trait::async_trait;

/// Delivery channel for removal explanations.
#[async_trait]
pub trait NotificationStrategy: Send + Sync {
    /// Deliver the rule's response text to the item's author.
    async fn notify(
        &self,
        actions: &dyn RedditActions,
        item: &QueueItem,
        rule: &ModerationRule,
        subreddit: &str,
    );
}

/// Public delivery: a visible removal reason on submissions, a reply on
/// comments.
pub struct PublicNotificationStrategy;

#[async_trait]
impl NotificationStrategy for PublicNotificationStrategy {
    async fn notify(
        &self,
        actions: &dyn RedditActions,
        item: &QueueItem,
        rule: &ModerationRule,
        _subreddit: &str,
    ) {
        match item {
            QueueItem::Submission { .. } => {
                if let Err(err) = actions.send_removal_message(item, &rule.response).await {
                    tracing::warn!("Could not send removal message: {}", err);
                }
            }
            QueueItem::Comment { .. } => {
                // Thread may be locked or archived; no retry.
                if let Err(err) = actions.reply(item, &rule.response).await {
                    tracing::warn!("Could not reply to comment: {}", err);
                }
            }
        }
    }
}

/// Private delivery: a modmail message with the response text and an excerpt
/// of the removed content, attributed to the subreddit.
pub struct ModmailNotificationStrategy;

/// How much of a removed comment to quote back in the modmail body.
const COMMENT_EXCERPT_CHARS: usize = 100;

#[async_trait]
impl NotificationStrategy for ModmailNotificationStrategy {
    async fn notify(
        &self,
        actions: &dyn RedditActions,
        item: &QueueItem,
        rule: &ModerationRule,
        subreddit: &str,
    ) {
        let Some(author) = item.author() else {
            // Deleted account, nobody to notify
            tracing::debug!("Skipping modmail for {} {}: author deleted", item.kind(), item.id());
            return;
        };

        let subject = format!("Post Removal from r/{}", subreddit);
        let excerpt = match item {
            QueueItem::Submission { title, .. } => {
                format!("Your post titled: '{}' was removed.", title)
            }
            QueueItem::Comment { body, .. } => format!(
                "Your comment: '{}' was removed.",
                truncate_chars(body, COMMENT_EXCERPT_CHARS)
            ),
        };
        let body = format!("{}\n\n{}", rule.response, excerpt);

        match actions
            .send_modmail(author, &subject, &body, subreddit)
            .await
        {
            Ok(()) => tracing::info!("Sent removal reason via modmail to u/{}", author),
            Err(err) => tracing::warn!("Could not send modmail: {}", err),
        }
    }
}
