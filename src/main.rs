use anyhow::Result;
use clap::Parser;
use prompt_runner::{ClaudeCliBackend, CliArgs, PromptRunner, Settings};
use tracing::info;
use tracing_chrome::ChromeLayerBuilder;
use tracing_log::AsTrace;
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    let start = std::time::Instant::now();

    let args = CliArgs::parse();

    let settings = Settings::new()?;
    // -v/-q are applied on top of the level from settings
    let log_level_filter = args.verbose.log_level_filter().as_trace();

    let (chrome_layer, _guard) = if args.tracing {
        let (layer, guard) = ChromeLayerBuilder::new().build();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // stdout carries the responses, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(chrome_layer)
        .with(log_level_filter)
        .try_init()?;
    info!("Initialized args, settings, and logging in {:?}", start.elapsed());

    let prompts = args.prompts();
    let runner = PromptRunner::new(
        ClaudeCliBackend::new(),
        args.output_format(&settings),
        Some(start),
    );

    let stdout = std::io::stdout();
    runner.exec(&prompts, &mut stdout.lock())?;

    Ok(())
}
