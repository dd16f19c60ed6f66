//! ciwright command-line front end.
//!
//! Resolves a pipeline variant, captures environment signals, assembles the
//! pipeline description, and hands it to the GitHub Actions emitter.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod tracing;

pub use cli::{CliError, EXIT_CONFIG, EXIT_DRIFT, EXIT_EMIT, EXIT_OK};
