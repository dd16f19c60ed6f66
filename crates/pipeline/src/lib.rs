//! Environment-driven CI pipeline assembly.
//!
//! The crate turns a pipeline variant ([`PipelineConfig`]) and a snapshot of
//! environment signals ([`EnvironmentSignals`]) into a complete, immutable
//! [`PipelineDescription`], which an [`Emitter`] then renders for a CI
//! orchestrator.
//!
//! ```ignore
//! use ciwright_pipeline::{EnvironmentSignals, Preset, assemble};
//!
//! let config = Preset::Cli.config();
//! let signals = EnvironmentSignals::from_env(&config.signals);
//! let description = assemble(&config, &signals);
//! ```

#![warn(missing_docs)]

pub mod assemble;
pub mod config;
pub mod description;
pub mod emitter;
pub mod error;
pub mod matrix;
pub mod platform;
pub mod presets;
pub mod release;
pub mod signals;

pub use assemble::assemble;
pub use config::{CONFIG_FILE_NAME, MatrixConfig, PipelineConfig};
pub use description::{AuxiliaryChecks, ExtraJob, FeatureToggles, PipelineDescription};
pub use emitter::{EmittedWorkflow, Emitter, EmitterError, EmitterResult};
pub use error::{Error, Result};
pub use matrix::{ExpansionPolicy, JobMatrix, expand, wants_all_platforms};
pub use platform::TargetPlatform;
pub use presets::Preset;
pub use release::{AssetBundle, HomebrewTap, PackageFormat, ReleaseConfig, ReleaseSpec};
pub use signals::{EnvironmentSignals, SignalSources};
