use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let parsed = cli::Cli::parse();

    multitest_core::logging::init(parsed.log_format.as_ref().map(|f| f.as_str()))?;

    // Sink and configuration are resolved before any side effect; a bad flag
    // or missing package fails here with nothing to tear down.
    let sink = parsed.select_sink()?;
    let config = parsed.build_config()?;
    tracing::debug!(package = config.package(), "configuration resolved");

    multitest_core::lifecycle::run(&config, sink)?;
    Ok(())
}
