//! CLI library for testing purposes

pub mod config;
pub mod run;
pub mod stats;
pub mod validation;

pub use config::{ProjectConfig, SourceConfig};
pub use run::{RunOptions, run_targets};
