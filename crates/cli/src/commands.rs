//! Command implementations.
//!
//! Every command resolves the pipeline variant the same way: preset, then
//! the configuration file, then flag overrides. Signals are captured once,
//! after the variant is known, since the variant names the variables to read.

use crate::cli::{Cli, CliError, Commands, DescribeFormat};
use ciwright_github::GitHubActionsEmitter;
use ciwright_pipeline::{
    CONFIG_FILE_NAME, EmittedWorkflow, Emitter, EnvironmentSignals, PipelineConfig,
    PipelineDescription, Preset, assemble,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Run the parsed command, writing console output to `out`.
///
/// # Errors
///
/// Returns a [`CliError`] describing configuration, emission, or drift
/// failures.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let _span = tracing::info_span!(
        "command",
        correlation_id = %crate::tracing::correlation_id(),
    )
    .entered();

    match &cli.command {
        Commands::Presets => list_presets(out),
        Commands::Describe { format } => {
            let description = prepare(cli)?;
            describe(&description, *format, out)
        }
        Commands::Generate { output_dir, stdout } => {
            let emitter = emitter(cli);
            let workflow = render(cli, &emitter)?;
            if *stdout {
                write_out(out, &workflow.content)
            } else {
                let dir = output_dir_or_default(output_dir.as_deref(), &emitter);
                let path = workflow.write_to(&dir)?;
                write_out(out, &format!("Wrote {}\n", path.display()))
            }
        }
        Commands::Check { output_dir } => {
            let emitter = emitter(cli);
            let workflow = render(cli, &emitter)?;
            let dir = output_dir_or_default(output_dir.as_deref(), &emitter);
            let path = dir.join(&workflow.filename);
            if workflow.is_current_in(&dir)? {
                write_out(out, &format!("{} is up to date\n", path.display()))
            } else {
                Err(CliError::Drift { path })
            }
        }
    }
}

/// Resolve the pipeline variant from preset, config file and flags.
///
/// # Errors
///
/// Returns a configuration error for unknown presets or invalid files.
pub fn resolve_config(cli: &Cli) -> Result<PipelineConfig, CliError> {
    let preset: Preset = cli.preset.parse()?;
    let base = preset.config();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(&base, path)?,
        None if Path::new(CONFIG_FILE_NAME).is_file() => {
            PipelineConfig::load(&base, Path::new(CONFIG_FILE_NAME))?
        }
        None => base,
    };

    if let Some(branch) = &cli.primary_branch {
        config.primary_branch.clone_from(branch);
        config.validate()?;
    }

    tracing::debug!(preset = %preset, name = %config.name, "Resolved pipeline variant");
    Ok(config)
}

/// Capture signals for `config`, letting explicit flags win over the
/// variant's variable lists.
#[must_use]
pub fn capture_signals(cli: &Cli, config: &PipelineConfig) -> EnvironmentSignals {
    let mut signals = EnvironmentSignals::from_env(&config.signals);
    let given = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(ref_name) = given(&cli.ref_name) {
        signals.ref_name = Some(ref_name);
    }
    if let Some(context) = given(&cli.context) {
        signals.context_flag = Some(context);
    }
    if let Some(message) = given(&cli.commit_message) {
        let marker = &config.signals.disable_marker;
        signals.disable_marker = !marker.is_empty() && message.contains(marker.as_str());
    }
    signals
}

fn prepare(cli: &Cli) -> Result<PipelineDescription, CliError> {
    let config = resolve_config(cli)?;
    let signals = capture_signals(cli, &config);
    Ok(assemble(&config, &signals))
}

fn emitter(cli: &Cli) -> GitHubActionsEmitter {
    GitHubActionsEmitter::new()
        .with_regenerate_command(format!("ciwright generate --preset {}", cli.preset))
}

fn output_dir_or_default(given: Option<&Path>, emitter: &impl Emitter) -> PathBuf {
    given.map_or_else(|| PathBuf::from(emitter.default_output_dir()), Path::to_path_buf)
}

fn render(cli: &Cli, emitter: &impl Emitter) -> Result<EmittedWorkflow, CliError> {
    let description = prepare(cli)?;
    tracing::debug!(
        format = emitter.format_name(),
        emitter = emitter.description(),
        "Emitting workflow"
    );
    Ok(emitter.emit(&description)?)
}

fn describe(
    description: &PipelineDescription,
    format: DescribeFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let rendered = match format {
        DescribeFormat::Json => serde_json::to_string_pretty(description)
            .map(|json| format!("{json}\n"))
            .map_err(|e| CliError::emit_with_help(e.to_string(), "Report this as a bug"))?,
        DescribeFormat::Yaml => serde_yaml::to_string(description)
            .map_err(|e| CliError::emit_with_help(e.to_string(), "Report this as a bug"))?,
    };
    write_out(out, &rendered)
}

fn list_presets(out: &mut impl Write) -> Result<(), CliError> {
    let width = Preset::ALL
        .iter()
        .map(|p| p.name().len())
        .max()
        .unwrap_or_default();
    let listing: String = Preset::ALL
        .iter()
        .map(|p| format!("{:width$}  {}\n", p.name(), p.summary()))
        .collect();
    write_out(out, &listing)
}

fn write_out(out: &mut impl Write, text: &str) -> Result<(), CliError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| CliError::emit_with_help(format!("Failed to write output: {e}"), "Check stdout"))
}
