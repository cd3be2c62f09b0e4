//! Walk orchestration: dispatching roots and collecting the report.

pub mod size_runtime;
