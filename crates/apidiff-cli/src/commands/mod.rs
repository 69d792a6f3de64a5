//! Subcommand implementations.

pub mod artifacts;
pub mod clean;
pub mod config;
pub mod report;
