//! Tracing subscriber setup.
//!
//! stdout is reserved for the summary line, so events go to stderr or to the
//! configured log file.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::WalkConfig;

const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter directive: `RUST_LOG`, then the CLI flag, then the
/// config file, then `warn`.
fn filter_directive(env: Option<String>, cli_level: Option<&str>, config: &WalkConfig) -> String {
    env.filter(|s| !s.trim().is_empty())
        .or_else(|| cli_level.map(str::to_string))
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Install the global subscriber.  Call once, before the walk starts.
pub fn init(config: &WalkConfig, cli_level: Option<&str>) -> anyhow::Result<()> {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), cli_level, config);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter '{directive}'"))?;

    let (writer, ansi) = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_file(config.log_caller)
        .with_line_number(config.log_caller)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install tracing subscriber: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_wins_over_everything() {
        let config = WalkConfig {
            log_level: Some("info".into()),
            ..WalkConfig::default()
        };
        assert_eq!(
            filter_directive(Some("dir_stat=trace".into()), Some("debug"), &config),
            "dir_stat=trace"
        );
    }

    #[test]
    fn cli_then_config_then_default() {
        let mut config = WalkConfig::default();
        assert_eq!(filter_directive(None, None, &config), "warn");
        config.log_level = Some("info".into());
        assert_eq!(filter_directive(None, None, &config), "info");
        assert_eq!(filter_directive(Some("  ".into()), Some("error"), &config), "error");
    }
}
