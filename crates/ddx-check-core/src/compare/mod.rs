pub mod check;
pub mod config;
pub mod error;
pub mod metrics;
