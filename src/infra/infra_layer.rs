// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "config/config_loader.rs"]
pub mod config;

#[path = "llm/mod.rs"]
pub mod llm;

#[path = "reddit/reddit_client.rs"]
pub mod reddit;
