//! Error types for loading and validating pipeline configuration.
//!
//! Assembly itself cannot fail; every error here comes from reading or
//! checking a configuration before assembly starts.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing a pipeline configuration.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file {}", .path.display())]
    #[diagnostic(
        code(ciwright::config::io),
        help("Check that the file exists and is readable")
    )]
    ConfigIo {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying source error
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("Invalid configuration format: {message}")]
    #[diagnostic(
        code(ciwright::config::parse),
        help("See `ciwright describe --format yaml` for the expected structure")
    )]
    ConfigParse {
        /// The error message
        message: String,
        /// The offending file, if any
        path: Option<PathBuf>,
    },

    /// The configuration parsed but breaks an invariant.
    #[error("Invalid pipeline configuration: {message}")]
    #[diagnostic(code(ciwright::config::invalid), help("{help}"))]
    Invalid {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },

    /// No built-in preset has this name.
    #[error("Unknown preset: {name}")]
    #[diagnostic(
        code(ciwright::config::unknown_preset),
        help("Available presets: {available}")
    )]
    UnknownPreset {
        /// The requested name
        name: String,
        /// Comma separated list of known presets
        available: String,
    },

    /// A preset could not be converted to a TOML table for layering.
    #[error("TOML serialization error: {0}")]
    #[diagnostic(code(ciwright::config::toml_ser))]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Create a new parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            path,
        }
    }

    /// Create a new invariant violation error.
    #[must_use]
    pub fn invalid(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            help: help.into(),
        }
    }
}
