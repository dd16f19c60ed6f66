//! GitHub provider implementations for ciwright.
//!
//! This crate provides [`workflow::GitHubActionsEmitter`], which renders an
//! assembled pipeline description as a GitHub Actions workflow file.

#![warn(missing_docs)]

pub mod workflow;

pub use workflow::GitHubActionsEmitter;
