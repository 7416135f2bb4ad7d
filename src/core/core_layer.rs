// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "evaluation/mod.rs"]
pub mod evaluation;

#[path = "moderation/mod.rs"]
pub mod moderation;
