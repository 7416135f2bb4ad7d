pub mod evaluator;
pub mod prompt;

pub use evaluator::{LlmError, LlmEvaluator, LlmProvider};
pub use prompt::build_prompt;
