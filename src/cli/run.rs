//! Run command - stream JSON-lines records through the actors

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;
use vertex_actors::config::Config;
use vertex_actors::runtime::RunConfig;
use vertex_actors::wire::read_records;

pub fn run(config: &Config, input: Option<&Path>, strict: bool, output: Option<&Path>) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let sink = super::open_sink(config, output)?;
    let runtime = super::build_runtime(config, sink)?;
    let run_config = RunConfig {
        strict,
        ..RunConfig::from(&config.runtime)
    };
    debug!(
        "Running with {} store, {} workers, {} time windows",
        runtime.store().name(),
        run_config.workers,
        runtime.router().windows().len()
    );

    // Egress may be on stdout, so progress stays on stderr
    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    spinner.set_style(create_spinner_style());
    spinner.set_message("Processing records...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let records = read_records(reader).inspect(|_| spinner.inc(1));
    let result = runtime.run(records, &run_config);
    spinner.finish_and_clear();

    let stats = result.context("Run aborted")?;

    eprintln!(
        "{}Processed {} records in {:.2?}: {} messages, {} egress records",
        style("✓ ").green(),
        style(stats.records).cyan(),
        start.elapsed(),
        style(stats.messages_delivered).cyan(),
        style(stats.egress_records).cyan()
    );
    if stats.malformed > 0 {
        eprintln!(
            "{}Skipped {} malformed records",
            style("! ").yellow(),
            style(stats.malformed).yellow()
        );
    }

    Ok(())
}

fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg} {pos}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
