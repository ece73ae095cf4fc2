//! Provides input/output for solver logs and comparison reports.
//!
//! Solver output and reference logs share one plain-text format, so a single
//! parser serves both. The report writer emits per-atom force differences for
//! inspection after a run.

pub mod log;
pub mod report;
