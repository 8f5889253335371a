pub mod claude_cli;
pub mod common;

pub use claude_cli::ClaudeCliBackend;
pub use common::{AiBackend, RunnerError};
