// This is the entry point of the moderation CLI.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (Reddit API, LLM APIs)
//
// This file's job is to:
// 1. Parse CLI arguments and load configuration + rules
// 2. Initialize services (dependency injection)
// 3. Fetch the modqueue and run each item through evaluate -> moderate

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a pile of mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::evaluation::LlmEvaluator;
use crate::core::moderation::{
    ItemKind, ModerationService, ModerationSettings, NotificationMethod, QueueSource,
};
use crate::infra::config::{load_config, load_rules};
use crate::infra::llm::create_provider;
use crate::infra::reddit::RedditClient;
use clap::Parser;
use std::path::PathBuf;

/// Reddit LLM Moderator - confidence-based AI moderation for Reddit.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Subreddit to moderate
    #[arg(short, long)]
    subreddit: String,

    /// Simulate actions without taking them
    #[arg(short, long)]
    dry_run: bool,

    /// Path to config file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to rules file
    #[arg(short, long, default_value = "rules.yaml")]
    rules: PathBuf,

    /// Type of modqueue items to process: all, submissions, or comments
    #[arg(short = 't', long = "type", default_value = "all")]
    item_type: String,

    /// How to deliver removal reasons: public (comments/replies) or modmail
    #[arg(long, default_value = "modmail")]
    notification: String,

    /// Maximum number of modqueue items to fetch
    #[arg(short, long, default_value_t = 10)]
    limit: u32,
}

fn kind_allowed(kind: ItemKind, filter: &str) -> bool {
    match filter {
        "submissions" => kind == ItemKind::Submission,
        "comments" => kind == ItemKind::Comment,
        _ => true,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let args = Args::parse();

    let config = load_config(&args.config)?;
    let rules = load_rules(&args.rules)?;
    if rules.is_empty() {
        anyhow::bail!("No rules found in the rules file");
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Wire the transport and the LLM provider into the core services.

    let reddit = RedditClient::login(&config.reddit).await?;

    let provider = create_provider(&config)?;
    let evaluator = LlmEvaluator::new(provider);

    let settings = ModerationSettings {
        subreddit: args.subreddit.clone(),
        notification_method: NotificationMethod::from_name(&args.notification),
        confidence_threshold: config.llm.confidence_threshold,
        dry_run: args.dry_run,
    };

    let mode = if args.dry_run {
        "DRY RUN (no actions will be taken)"
    } else {
        "ACTIVE MODE"
    };
    tracing::info!("Starting Reddit moderation in {}", mode);
    tracing::info!("Target subreddit: r/{}", args.subreddit);
    tracing::info!("Notification method: {}", args.notification);
    tracing::info!("Confidence threshold: {}", settings.confidence_threshold);

    let items = reddit.fetch_queue(&args.subreddit, args.limit).await?;
    if items.is_empty() {
        tracing::info!("Modqueue is empty. No items to process.");
        return Ok(());
    }
    tracing::info!("Found {} items in modqueue", items.len());

    if args.item_type != "all" {
        tracing::info!("Filtering for {} only", args.item_type);
    }

    // The client doubles as the action port once fetching is done.
    let service = ModerationService::new(reddit);

    for item in &items {
        if !kind_allowed(item.kind(), &args.item_type) {
            continue;
        }

        tracing::info!("Processing {}: '{}'", item.kind(), item.summary());

        // Both calls are total: a failed evaluation degrades to a
        // zero-confidence decision and a failed action is logged inside
        // the service, so one bad item never stops the batch.
        let decision = evaluator.evaluate(item, &rules).await;
        let result = service.moderate_item(item, &decision, &rules, &settings).await;

        tracing::info!("{}", result.describe());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_filter() {
        assert!(kind_allowed(ItemKind::Submission, "all"));
        assert!(kind_allowed(ItemKind::Comment, "all"));
        assert!(kind_allowed(ItemKind::Submission, "submissions"));
        assert!(!kind_allowed(ItemKind::Comment, "submissions"));
        assert!(kind_allowed(ItemKind::Comment, "comments"));
        assert!(!kind_allowed(ItemKind::Submission, "comments"));
    }
}
