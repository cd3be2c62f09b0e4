//! Count files and total bytes under one or more directories.
//!
//! Every directory is walked by its own tokio task; sizes stream into a
//! single aggregator and the result is printed as `"<n> files <mb> MB"`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dir_stat::app::size_runtime;
use dir_stat::config::WalkConfig;
use dir_stat::core::sink::TracingSink;
use dir_stat::logging;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Count files and bytes under directories")]
struct Cli {
    /// Directories to walk (defaults to `.`).
    paths: Vec<PathBuf>,

    /// Buffer size of the size stream (overrides the config file).
    #[arg(long, value_parser = WalkConfig::parse_capacity)]
    capacity: Option<usize>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error, off).
    #[arg(long = "log-level", value_parser = WalkConfig::parse_log_level)]
    log_level: Option<String>,

    /// List directories that could not be read on stderr.
    #[arg(long = "show-skipped")]
    show_skipped: bool,

    /// Save the effective settings to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_errors) = WalkConfig::load();
    if let Some(capacity) = cli.capacity {
        config.channel_capacity = capacity;
    }

    if cli.write_config {
        if let Some(level) = &cli.log_level {
            config.log_level = Some(level.clone());
        }
        let path = config.save()?;
        eprintln!("wrote {}", path.display());
        return Ok(());
    }

    logging::init(&config, cli.log_level.as_deref())?;
    for e in &config_errors {
        tracing::warn!("config: {e}");
    }

    let report = size_runtime::walk_dirs(cli.paths, &config, Arc::new(TracingSink)).await;

    print!("{}", report.result);
    if cli.show_skipped {
        for skipped in &report.skipped {
            eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    Ok(())
}
