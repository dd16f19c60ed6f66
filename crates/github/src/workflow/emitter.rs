//! GitHub Actions Workflow Emitter
//!
//! Transforms an assembled [`PipelineDescription`] into a GitHub Actions
//! workflow YAML file.

use crate::workflow::schema::{
    Concurrency, PermissionLevel, Permissions, PullRequestTrigger, PushTrigger, Workflow,
    WorkflowDispatchTrigger, WorkflowTriggers,
};
use crate::workflow::{release, verification};
use ciwright_pipeline::{EmittedWorkflow, Emitter, EmitterError, EmitterResult, PipelineDescription};
use indexmap::IndexMap;

/// Workflow env variable carrying the variant's review guidance.
pub const REVIEW_PROMPT_ENV: &str = "CIWRIGHT_REVIEW_PROMPT";

/// GitHub Actions workflow emitter
///
/// # Description to GitHub Actions Mapping
///
/// | Description field | GitHub Actions |
/// |-------------------|----------------|
/// | `name` | Workflow `name:` and file name |
/// | `primary_branch` | `on.push.branches` / `on.pull_request.branches` |
/// | `style_check` | `style-check` job with platform x toolchain matrix |
/// | `coverage` | `coverage` job with platform x toolchain matrix |
/// | `checks.dependencies` | `dependencies` job (`cargo deny`) |
/// | `toggles.*` | `docs`, `semver`, `sanitizers` jobs |
/// | `extra_jobs` | one job per script on the auxiliary matrix |
/// | `release` | `release-build`, `release`, `homebrew` jobs (tags only) |
/// | `additional_prompt` | workflow `env.CIWRIGHT_REVIEW_PROMPT` |
#[derive(Debug, Clone)]
pub struct GitHubActionsEmitter {
    /// Runner for jobs without a platform matrix
    pub runner: String,
    /// Default paths to ignore in triggers
    pub default_paths_ignore: Vec<String>,
    /// Command shown in the generation header
    pub regenerate_command: String,
}

impl Default for GitHubActionsEmitter {
    fn default() -> Self {
        Self {
            runner: "ubuntu-latest".to_string(),
            default_paths_ignore: vec![
                "docs/**".to_string(),
                "*.md".to_string(),
                "LICENSE".to_string(),
                ".vscode/**".to_string(),
            ],
            regenerate_command: "ciwright generate".to_string(),
        }
    }
}

impl GitHubActionsEmitter {
    /// Create a new GitHub Actions emitter with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command shown in the generation header
    #[must_use]
    pub fn with_regenerate_command(mut self, command: impl Into<String>) -> Self {
        self.regenerate_command = command.into();
        self
    }

    /// Build the workflow value for a description.
    #[must_use]
    pub fn build_workflow(&self, description: &PipelineDescription) -> Workflow {
        let mut jobs = verification::build_jobs(description, &self.runner);
        if let Some(spec) = &description.release {
            jobs.extend(release::build_jobs(spec, &self.runner));
        }
        tracing::debug!(
            jobs = ?jobs.keys().collect::<Vec<_>>(),
            "Built GitHub Actions jobs"
        );

        Workflow {
            name: description.name.clone(),
            on: self.build_triggers(description),
            concurrency: Some(Concurrency {
                group: "${{ github.workflow }}-${{ github.head_ref || github.ref }}".to_string(),
                cancel_in_progress: Some(true),
            }),
            permissions: Some(Self::build_permissions(description)),
            env: Self::build_env(description),
            jobs,
        }
    }

    fn build_triggers(&self, description: &PipelineDescription) -> WorkflowTriggers {
        let branches = vec![description.primary_branch.clone()];
        let tags = if description.release.is_some() {
            vec!["v*".to_string()]
        } else {
            Vec::new()
        };

        WorkflowTriggers {
            push: Some(PushTrigger {
                branches: branches.clone(),
                tags,
                paths_ignore: self.default_paths_ignore.clone(),
            }),
            pull_request: Some(PullRequestTrigger {
                branches,
                paths_ignore: self.default_paths_ignore.clone(),
            }),
            workflow_dispatch: Some(WorkflowDispatchTrigger::default()),
        }
    }

    fn build_env(description: &PipelineDescription) -> IndexMap<String, String> {
        let mut env = IndexMap::from([("CARGO_TERM_COLOR".to_string(), "always".to_string())]);
        if let Some(prompt) = &description.additional_prompt {
            env.insert(REVIEW_PROMPT_ENV.to_string(), prompt.clone());
        }
        env
    }

    fn build_permissions(description: &PipelineDescription) -> Permissions {
        let publishes = description.release.as_ref().is_some_and(|r| r.publish);
        Permissions {
            contents: Some(if publishes {
                PermissionLevel::Write
            } else {
                PermissionLevel::Read
            }),
            pull_requests: description.toggles.semver.then_some(PermissionLevel::Read),
        }
    }

    /// Serialize a workflow to YAML with a generation header
    fn serialize_workflow(&self, workflow: &Workflow) -> EmitterResult<String> {
        let yaml = serde_yaml::to_string(workflow)
            .map_err(|e| EmitterError::Serialization(e.to_string()))?;

        let header = format!(
            "# Generated by ciwright - do not edit manually\n# Regenerate with: {}\n\n",
            self.regenerate_command
        );

        Ok(format!("{header}{yaml}"))
    }
}

impl Emitter for GitHubActionsEmitter {
    fn emit(&self, description: &PipelineDescription) -> EmitterResult<EmittedWorkflow> {
        let workflow = self.build_workflow(description);
        let content = self.serialize_workflow(&workflow)?;
        Ok(EmittedWorkflow {
            filename: format!(
                "{}.{}",
                sanitize_filename(&description.name),
                self.file_extension()
            ),
            content,
        })
    }

    fn format_name(&self) -> &'static str {
        "github"
    }

    fn file_extension(&self) -> &'static str {
        "yml"
    }

    fn default_output_dir(&self) -> &'static str {
        ".github/workflows"
    }

    fn description(&self) -> &'static str {
        "GitHub Actions workflow YAML emitter"
    }
}

/// Sanitize a string for use as a workflow filename
fn sanitize_filename(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
