// Ports to the Reddit transport (hexagonal boundary).
//
// The decision engine only ever talks to these traits. The reqwest-backed
// implementation lives in the infra layer; tests substitute recording mocks.

use super::moderation_models::QueueItem;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a side-effecting call against the platform.
///
/// The service treats every variant the same way today (log and continue),
/// but the split keeps room for a retry policy on transport errors later.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("reddit api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Side-effecting moderation operations on queue items.
///
/// Each call is synchronous, atomic, and fallible from the core's point of
/// view; throttling against platform rate limits is the transport's job.
#[async_trait]
pub trait RedditActions: Send + Sync {
    /// Approve an item, clearing it from the modqueue.
    async fn approve(&self, item: &QueueItem) -> Result<(), ActionError>;

    /// Remove an item from the subreddit.
    async fn remove(&self, item: &QueueItem) -> Result<(), ActionError>;

    /// Reply to an item as the moderator's account.
    async fn reply(&self, item: &QueueItem, text: &str) -> Result<(), ActionError>;

    /// Attach a visible removal reason to an already-removed submission.
    async fn send_removal_message(&self, item: &QueueItem, text: &str) -> Result<(), ActionError>;

    /// Send a private message, attributed to the subreddit as sender.
    async fn send_modmail(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        from_subreddit: &str,
    ) -> Result<(), ActionError>;
}

/// Read side of the transport: fetching the moderation queue.
#[async_trait]
pub trait QueueSource: Send + Sync {
    async fn fetch_queue(&self, subreddit: &str, limit: u32)
        -> Result<Vec<QueueItem>, ActionError>;
}
