//! Error types.
//!
//! Nothing inside a walk is fatal: listing failures are wrapped in
//! [`WalkError`] only so the error sink gets the path alongside the cause.

use std::path::PathBuf;

use thiserror::Error;

/// A non-fatal failure observed while walking.
#[derive(Error, Debug)]
pub enum WalkError {
    /// A directory could not be listed (missing, not a directory, no permission).
    #[error("cannot read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid value in the config file or on the command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}
