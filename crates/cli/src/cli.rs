//! Command-line definition and error reporting.

use clap::{Parser, Subcommand, ValueEnum};
use miette::{Diagnostic, Report};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Successful run
pub const EXIT_OK: i32 = 0;
/// `check` found a workflow that differs from the regenerated one
pub const EXIT_DRIFT: i32 = 1;
/// CLI or configuration error exit code
pub const EXIT_CONFIG: i32 = 2;
/// Rendering or output error exit code
pub const EXIT_EMIT: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(ciwright::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Rendering or writing the workflow failed (exit code 3)
    #[error("Emission error: {message}")]
    #[diagnostic(code(ciwright::cli::emit))]
    Emit {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// The committed workflow is out of date (exit code 1)
    #[error("Workflow {} is out of date", .path.display())]
    #[diagnostic(
        code(ciwright::cli::drift),
        help("Run `ciwright generate` and commit the result")
    )]
    Drift {
        /// The stale workflow file
        path: PathBuf,
    },
}

impl CliError {
    /// Create a new emission error with help text
    #[must_use]
    pub fn emit_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Emit {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Every pipeline error is a configuration problem; assembly itself cannot fail.
impl From<ciwright_pipeline::Error> for CliError {
    fn from(err: ciwright_pipeline::Error) -> Self {
        let help = err.help().map(|h| h.to_string());
        let message = match &err {
            ciwright_pipeline::Error::Invalid { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self::Config { message, help }
    }
}

impl From<ciwright_pipeline::EmitterError> for CliError {
    fn from(err: ciwright_pipeline::EmitterError) -> Self {
        match err {
            ciwright_pipeline::EmitterError::Io(source) => Self::emit_with_help(
                format!("I/O failed: {source}"),
                "Check that the output directory is writable",
            ),
            other => Self::Emit {
                message: other.to_string(),
                help: None,
            },
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Drift { .. } => EXIT_DRIFT,
        CliError::Config { .. } => EXIT_CONFIG,
        CliError::Emit { .. } => EXIT_EMIT,
    }
}

/// Render an error through miette on stderr
#[allow(clippy::print_stderr)]
pub fn render_error(err: &CliError) {
    let report = Report::new(err.clone());
    eprintln!("{report:?}");
    let _ = io::stderr().flush();
}

/// Output format for `describe`
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum DescribeFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Assemble CI pipelines from environment signals and write them as workflows.
#[derive(Parser, Debug)]
#[command(name = "ciwright")]
#[command(about = "Assemble CI pipelines from environment signals and emit workflow files")]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Built-in pipeline variant to start from.
    #[arg(long, short = 'p', global = true, env = "CIWRIGHT_PRESET", default_value = "cli")]
    pub preset: String,

    /// Configuration file layered over the preset (defaults to `./ciwright.toml` when present).
    #[arg(long, short = 'c', global = true, env = "CIWRIGHT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the primary branch of the selected variant.
    #[arg(long, global = true, value_name = "BRANCH")]
    pub primary_branch: Option<String>,

    /// Branch or ref name, overriding the variables listed in the variant.
    ///
    /// The signal flags have no env fallback: which variables are read is
    /// decided by the variant's `signals` table.
    #[arg(long, global = true, value_name = "REF")]
    pub ref_name: Option<String>,

    /// Free-form context flag (e.g. `ALL_OS`).
    #[arg(long, global = true, value_name = "FLAG")]
    pub context: Option<String>,

    /// Head commit message, checked for the disable marker.
    #[arg(long, global = true, value_name = "MESSAGE")]
    pub commit_message: Option<String>,

    /// Logging verbosity level.
    #[arg(short = 'L', long, global = true, default_value = "warn", value_enum)]
    pub log_level: crate::tracing::LogLevel,

    /// Log output format.
    #[arg(long, global = true, default_value = "compact", value_enum)]
    pub log_format: crate::tracing::TracingFormat,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble the pipeline and write the workflow file.
    Generate {
        /// Directory receiving the workflow file (defaults to the emitter's directory).
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Print the workflow instead of writing it.
        #[arg(long)]
        stdout: bool,
    },
    /// Regenerate the workflow and fail if the committed file differs.
    Check {
        /// Directory holding the committed workflow file (defaults to the emitter's directory).
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Print the assembled pipeline description.
    Describe {
        /// Output format.
        #[arg(long, short = 'f', value_enum, default_value_t = DescribeFormat::Json)]
        format: DescribeFormat,
    },
    /// List the built-in pipeline variants.
    Presets,
}

/// Parse the process arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&CliError::Config {
                message: "x".into(),
                help: None
            }),
            EXIT_CONFIG
        );
        assert_eq!(
            exit_code_for(&CliError::emit_with_help("x", "y")),
            EXIT_EMIT
        );
        assert_eq!(
            exit_code_for(&CliError::Drift {
                path: PathBuf::from("ci.yml")
            }),
            EXIT_DRIFT
        );
    }

    #[test]
    fn test_pipeline_error_keeps_help() {
        let err: CliError = ciwright_pipeline::Error::invalid("bad", "fix it").into();
        match err {
            CliError::Config { message, help } => {
                assert_eq!(message, "bad");
                assert_eq!(help.as_deref(), Some("fix it"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["ciwright", "generate"]).unwrap();
        assert_eq!(cli.preset, "cli");
        match cli.command {
            Commands::Generate { output_dir, stdout } => {
                assert_eq!(output_dir, None);
                assert!(!stdout);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_signal_flags_ignore_environment() {
        temp_env::with_vars(
            [
                ("CIWRIGHT_REF_NAME", Some("main")),
                ("CIWRIGHT_CONTEXT", Some("ALL_OS")),
                ("CIWRIGHT_COMMIT_MESSAGE", Some("[ci:disable]")),
            ],
            || {
                let cli = Cli::try_parse_from(["ciwright", "presets"]).unwrap();
                assert_eq!(cli.ref_name, None);
                assert_eq!(cli.context, None);
                assert_eq!(cli.commit_message, None);
            },
        );
    }
}
