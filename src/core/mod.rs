//! Core walk machinery: listing, the traversal counter, traversal tasks and
//! size aggregation.
//!
//! Nothing in this module knows about the CLI or config file.
//! Every shared type is `Send + Sync` so it can cross tokio tasks.

pub mod counter;
pub mod fs;
pub mod sink;
pub mod size;
pub mod walk;
