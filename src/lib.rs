//! Concurrent file-count and byte-size statistics over directory trees.
//!
//! [`app::size_runtime::summarize`] is the entry point: it walks every root
//! with one tokio task per directory and returns `"<n> files <mb> MB\n"`.

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
