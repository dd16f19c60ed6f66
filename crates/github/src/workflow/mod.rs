//! GitHub Actions Workflow Generator
//!
//! Generates a static GitHub Actions workflow file from an assembled
//! pipeline description. The file is meant to be committed to
//! `.github/workflows/`.
//!
//! # Example
//!
//! ```ignore
//! use ciwright_github::workflow::GitHubActionsEmitter;
//! use ciwright_pipeline::{Emitter, EnvironmentSignals, Preset, assemble};
//!
//! let config = Preset::Cli.config();
//! let description = assemble(&config, &EnvironmentSignals::from_env(&config.signals));
//! let workflow = GitHubActionsEmitter::new().emit(&description)?;
//! workflow.write_to(".github/workflows".as_ref())?;
//! ```

pub mod emitter;
mod release;
pub mod schema;
mod steps;
mod verification;

pub use emitter::{GitHubActionsEmitter, REVIEW_PROMPT_ENV};
pub use release::TAG_CONDITION;
pub use schema::*;
