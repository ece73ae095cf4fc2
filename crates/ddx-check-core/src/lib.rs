//! # ddx-check Core Library
//!
//! Numerical regression checking for a continuum-solvation solver. The solver
//! reports a scalar solvation energy and a per-atom force field on standard
//! output; this library turns that text into numbers and judges it against a
//! stored reference log.
//!
//! ## Layout
//!
//! - **[`io`]: Reading and writing.** The line-oriented [`io::log::SolverLog`]
//!   parser shared by captured output and reference files, plus the CSV force
//!   difference report.
//!
//! - **[`compare`]: The Comparator.** Pure numeric routines (elementwise
//!   differences, infinity norm) and the relative-error checks, driven by an
//!   explicit [`compare::config::ComparisonConfig`].
//!
//! - **[`driver`]: Solver invocation.** Runs the external solver as a
//!   subprocess, captures both output streams, and enforces an optional
//!   timeout.

pub mod compare;
pub mod driver;
pub mod io;
