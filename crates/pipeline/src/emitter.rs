//! Pipeline Emitter Trait
//!
//! Defines the interface for handing an assembled [`PipelineDescription`] to
//! a workflow builder. Implementations render orchestrator-native
//! configuration (e.g. GitHub Actions YAML).

use crate::description::PipelineDescription;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for emitter operations
#[derive(Debug, Error, miette::Diagnostic)]
pub enum EmitterError {
    /// YAML/JSON serialization failed
    #[error("Serialization failed: {0}")]
    #[diagnostic(code(ciwright::emit::serialization))]
    Serialization(String),

    /// IO error while writing emitted files
    #[error("IO error: {0}")]
    #[diagnostic(code(ciwright::emit::io))]
    Io(#[from] std::io::Error),
}

/// Result type for emitter operations
pub type EmitterResult<T> = std::result::Result<T, EmitterError>;

/// The finalized output of an emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedWorkflow {
    /// File name relative to the orchestrator's config directory
    pub filename: String,
    /// Rendered file contents
    pub content: String,
}

impl EmittedWorkflow {
    /// Write the workflow into `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `EmitterError::Io` if the directory or file cannot be written.
    pub fn write_to(&self, dir: &Path) -> EmitterResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.content)?;
        tracing::info!(path = %path.display(), "Wrote workflow");
        Ok(path)
    }

    /// Whether `dir` already holds exactly this workflow.
    ///
    /// # Errors
    ///
    /// Returns `EmitterError::Io` for read failures other than a missing file.
    pub fn is_current_in(&self, dir: &Path) -> EmitterResult<bool> {
        match std::fs::read_to_string(dir.join(&self.filename)) {
            Ok(existing) => Ok(existing == self.content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Trait for workflow emitters
///
/// An emitter receives one complete description and finalizes it in a single
/// call; it keeps no state between calls beyond its rendering options.
pub trait Emitter: Send + Sync {
    /// Render the description.
    ///
    /// # Errors
    /// Returns `EmitterError` if the description cannot be serialized
    fn emit(&self, description: &PipelineDescription) -> EmitterResult<EmittedWorkflow>;

    /// Get the format identifier for this emitter
    fn format_name(&self) -> &'static str;

    /// Get the file extension for output files
    fn file_extension(&self) -> &'static str;

    /// Get a human-readable description of this emitter
    fn description(&self) -> &'static str {
        "CI workflow emitter"
    }

    /// Directory, relative to the repository root, that holds emitted files
    fn default_output_dir(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;
    use crate::{EnvironmentSignals, assemble};

    struct TestEmitter;

    impl Emitter for TestEmitter {
        fn emit(&self, description: &PipelineDescription) -> EmitterResult<EmittedWorkflow> {
            Ok(EmittedWorkflow {
                filename: format!("{}.{}", description.name, self.file_extension()),
                content: format!("# Pipeline: {}", description.name),
            })
        }

        fn format_name(&self) -> &'static str {
            "test"
        }

        fn file_extension(&self) -> &'static str {
            "yml"
        }

        fn default_output_dir(&self) -> &'static str {
            "out"
        }
    }

    #[test]
    fn test_emitter_trait() {
        let description = assemble(&Preset::Checks.config(), &EnvironmentSignals::default());
        let emitted = TestEmitter.emit(&description).unwrap();
        assert_eq!(emitted.filename, "checks.yml");
        assert_eq!(emitted.content, "# Pipeline: checks");
    }

    #[test]
    fn test_missing_file_is_not_current() {
        let emitted = EmittedWorkflow {
            filename: "ci.yml".to_string(),
            content: String::new(),
        };
        assert!(!emitted.is_current_in(Path::new("/definitely/not/here")).unwrap());
    }
}
