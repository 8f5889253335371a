use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::LogLevel;
use serde::Serialize;
use tracing::{debug, info};

use crate::ai_backend::AiBackend;
use crate::constants::EXAMPLE_PROMPTS;
use crate::settings::{OutputFormat, Settings};

/// Default log level, read from the settings file / environment.
#[derive(Debug)]
pub struct ConfigLogLevel {}

impl LogLevel for ConfigLogLevel {
    fn default() -> Option<clap_verbosity_flag::Level> {
        let log_level = Settings::new()
            .ok()
            .and_then(|settings| settings.verbosity)
            .unwrap_or_else(|| "warn".to_string());
        let level = match log_level.to_ascii_lowercase().as_str() {
            "off" => None,
            "error" => Some(clap_verbosity_flag::Level::Error),
            "warn" => Some(clap_verbosity_flag::Level::Warn),
            "info" => Some(clap_verbosity_flag::Level::Info),
            "debug" => Some(clap_verbosity_flag::Level::Debug),
            "trace" => Some(clap_verbosity_flag::Level::Trace),
            _ => Some(clap_verbosity_flag::Level::Warn),
        };
        level
    }
}

/// Send prompts to the `claude` CLI and print what it answers.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Prompts to send, in order. The built-in examples run when none are given.
    pub prompts: Vec<String>,

    /// Output format; overrides the `output` setting.
    #[arg(long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Enable tracing (generates a trace-timestamp.json file).
    #[arg(long)]
    pub tracing: bool,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<ConfigLogLevel>,
}

impl CliArgs {
    pub fn prompts(&self) -> Vec<String> {
        if self.prompts.is_empty() {
            EXAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect()
        } else {
            self.prompts.clone()
        }
    }

    pub fn output_format(&self, settings: &Settings) -> OutputFormat {
        self.output.unwrap_or(settings.output)
    }
}

#[derive(Serialize)]
struct Exchange<'a> {
    prompt: &'a str,
    response: &'a str,
}

/// Feeds prompts to a backend one at a time and writes each reply.
pub struct PromptRunner<B: AiBackend> {
    backend: B,
    output: OutputFormat,
    start: Instant,
}

impl<B: AiBackend> PromptRunner<B> {
    pub fn new(backend: B, output: OutputFormat, start: Option<Instant>) -> Self {
        Self {
            backend,
            output,
            start: start.unwrap_or_else(Instant::now),
        }
    }

    /// Runs every prompt in order. The first failure stops the run; later
    /// prompts are not sent.
    pub fn exec<W: Write>(&self, prompts: &[String], out: &mut W) -> Result<()> {
        let total = prompts.len();
        for (i, prompt) in prompts.iter().enumerate() {
            info!("Running prompt {}/{}", i + 1, total);
            let response = self
                .backend
                .invoke(prompt)
                .with_context(|| format!("prompt {} of {} failed", i + 1, total))?;
            debug!("Received {} bytes", response.len());
            self.write_response(out, prompt, &response)?;
        }
        info!("finished {} prompt(s) in {:?}", total, self.start.elapsed());
        Ok(())
    }

    fn write_response<W: Write>(&self, out: &mut W, prompt: &str, response: &str) -> Result<()> {
        match self.output {
            OutputFormat::Text => writeln!(out, "{response}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &Exchange { prompt, response })?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
