pub mod ai_backend;
pub mod command;
pub mod constants;
pub mod settings;

pub use ai_backend::{AiBackend, ClaudeCliBackend, RunnerError};
pub use command::{CliArgs, PromptRunner};
pub use settings::{OutputFormat, Settings};
