//! Walk and logging settings, with persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/dir-stat/config.toml` (default `~/.config/dir-stat/config.toml`).

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default buffer size of the size stream.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
/// Upper bound accepted for `channel_capacity`.
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Walk and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfig {
    /// Buffer size of the stream between traversers and the aggregator.
    pub channel_capacity: usize,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: Option<String>,
    /// Attach source file and line to every log event.
    pub log_caller: bool,
    /// Append log output to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_level: None,
            log_caller: false,
            log_file: None,
        }
    }
}

impl WalkConfig {
    /// Clamp a requested capacity into the accepted range.
    pub fn clamp_capacity(requested: usize) -> usize {
        requested.clamp(1, MAX_CHANNEL_CAPACITY)
    }

    /// Parse a stream capacity.  Zero is rejected; oversized values are
    /// clamped to [`MAX_CHANNEL_CAPACITY`].
    pub fn parse_capacity(value: &str) -> Result<usize, ConfigError> {
        match value.trim().parse::<usize>() {
            Ok(v) if v > 0 => Ok(v.min(MAX_CHANNEL_CAPACITY)),
            _ => Err(invalid("channel_capacity", value, "a positive integer")),
        }
    }

    /// Check a log level name, returning it lower-cased.
    pub fn parse_log_level(value: &str) -> Result<String, ConfigError> {
        let lower = value.trim().to_ascii_lowercase();
        if LOG_LEVELS.contains(&lower.as_str()) {
            Ok(lower)
        } else {
            Err(invalid("log_level", value, "one of trace, debug, info, warn, error, off"))
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    ///
    /// Bad values are skipped and returned so the caller can report them
    /// once logging is up.
    pub fn load() -> (Self, Vec<ConfigError>) {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> (Self, Vec<ConfigError>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => (Self::default(), Vec::new()),
        }
    }

    /// Persist current config to the default location.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse_config(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "channel_capacity" => match Self::parse_capacity(value) {
                    Ok(v) => config.channel_capacity = v,
                    Err(e) => errors.push(e),
                },
                "log_level" => match Self::parse_log_level(value) {
                    Ok(level) => config.log_level = Some(level),
                    Err(e) => errors.push(e),
                },
                "log_caller" => match value {
                    "true" => config.log_caller = true,
                    "false" => config.log_caller = false,
                    _ => errors.push(invalid(key, value, "true or false")),
                },
                "log_file" => {
                    config.log_file = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                _ => {}
            }
        }

        (config, errors)
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# dir-stat configuration".to_string(),
            String::new(),
            "# Walk settings".to_string(),
            format!("channel_capacity = {}", self.channel_capacity),
            String::new(),
            "# Logging (RUST_LOG overrides log_level)".to_string(),
        ];
        match &self.log_level {
            Some(level) => lines.push(format!("log_level = {level}")),
            None => lines.push("# log_level = warn".to_string()),
        }
        lines.push(format!("log_caller = {}", self.log_caller));
        match &self.log_file {
            Some(path) => lines.push(format!("log_file = \"{}\"", path.display())),
            None => lines.push("# log_file = \"/tmp/dir-stat.log\"".to_string()),
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn invalid(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/dir-stat/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("dir-stat").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_ignores_the_rest() {
        let (config, errors) = WalkConfig::parse_config(
            "# comment\n[walk]\nchannel_capacity = 8\nlog_level = DEBUG\n\
             log_caller = true\nlog_file = \"/var/log/ds.log\"\ncolour = blue\n",
        );
        assert!(errors.is_empty());
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.log_caller);
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/ds.log")));
    }

    #[test]
    fn oversized_capacity_is_clamped() {
        let (config, errors) = WalkConfig::parse_config("channel_capacity = 99999999");
        assert!(errors.is_empty());
        assert_eq!(config.channel_capacity, MAX_CHANNEL_CAPACITY);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let (config, errors) = WalkConfig::parse_config("channel_capacity = 0");
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(
            errors,
            vec![ConfigError::InvalidValue {
                key: "channel_capacity".into(),
                value: "0".into(),
                expected: "a positive integer",
            }]
        );
        assert!(WalkConfig::parse_capacity("0").is_err());
        assert_eq!(WalkConfig::parse_capacity(" 12 "), Ok(12));
    }

    #[test]
    fn bad_values_fall_back_and_are_reported() {
        let (config, errors) =
            WalkConfig::parse_config("channel_capacity = lots\nlog_level = loud\nlog_caller = maybe");
        assert_eq!(config, WalkConfig::default());
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0],
            ConfigError::InvalidValue {
                key: "channel_capacity".into(),
                value: "lots".into(),
                expected: "a positive integer",
            }
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, errors) = WalkConfig::load_from(&tmp.path().join("absent.toml"));
        assert_eq!(config, WalkConfig::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/config.toml");
        let config = WalkConfig {
            channel_capacity: 3,
            log_level: Some("info".into()),
            log_caller: true,
            log_file: Some(PathBuf::from("/tmp/ds.log")),
        };
        config.save_to(&path).unwrap();

        let (loaded, errors) = WalkConfig::load_from(&path);
        assert!(errors.is_empty());
        assert_eq!(loaded, config);
    }

    #[test]
    fn default_config_serialises_without_errors() {
        let (loaded, errors) = WalkConfig::parse_config(&WalkConfig::default().serialise());
        assert!(errors.is_empty());
        assert_eq!(loaded, WalkConfig::default());
    }
}
