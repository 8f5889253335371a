use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::Config;
use serde::Deserialize;

use crate::constants::{APP_NAME, DEFAULT_CONFIG_CONTENT, ENV_PREFIX};

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The assistant's reply, printed as-is.
    #[default]
    Text,
    /// One `{"prompt": .., "response": ..}` object per line.
    Json,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub verbosity: Option<String>,
    pub output: OutputFormat,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let config_path = dirs::config_dir()
            .map(|mut path| {
                path.push(APP_NAME);
                path.push("config.toml");
                path
            })
            .unwrap_or_else(|| PathBuf::from("config.toml"));

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        // seed a commented default file on first run; failing to write it is harmless
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG_CONTENT).ok();
        }

        Self::from_file(&config_path)
    }

    /// Loads settings from `path` (if it exists) layered over the defaults,
    /// with `PROMPT_RUNNER_*` environment variables taking precedence.
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("verbosity", "warn")?
            .set_default("output", "text")?
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        settings.try_deserialize()
    }
}
