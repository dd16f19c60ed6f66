//! The assembled pipeline description handed to emitters.

use crate::matrix::JobMatrix;
use crate::release::ReleaseSpec;
use serde::{Deserialize, Serialize};

/// Name of the style/lint matrix.
pub const STYLE_CHECK: &str = "style-check";
/// Name of the coverage matrix.
pub const COVERAGE: &str = "coverage";
/// Name of the matrix extra script jobs run on.
pub const AUXILIARY_TEST: &str = "auxiliary-test";

/// Job ids the emitters reserve for themselves.
pub const RESERVED_JOB_NAMES: &[&str] = &[
    STYLE_CHECK,
    COVERAGE,
    AUXILIARY_TEST,
    "dependencies",
    "docs",
    "semver",
    "sanitizers",
    "release-build",
    "release",
    "homebrew",
];

/// Static feature switches. These are configuration, never computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeatureToggles {
    /// Run `cargo semver-checks`
    pub semver: bool,
    /// Build rustdoc
    pub documentation: bool,
    /// Run the test suite under the address sanitizer
    pub sanitizers: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            semver: false,
            documentation: true,
            sanitizers: false,
        }
    }
}

/// Auxiliary verification passes. The disable marker turns all of them off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AuxiliaryChecks {
    /// Dependency audit (`cargo deny`)
    pub dependencies: bool,
    /// `cargo fmt --check`
    pub format: bool,
    /// `cargo clippy`
    pub lint: bool,
}

impl Default for AuxiliaryChecks {
    fn default() -> Self {
        Self {
            dependencies: true,
            format: true,
            lint: true,
        }
    }
}

impl AuxiliaryChecks {
    /// Every pass switched off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            dependencies: false,
            format: false,
            lint: false,
        }
    }

    /// Whether any pass is on.
    #[must_use]
    pub const fn any(self) -> bool {
        self.dependencies || self.format || self.lint
    }
}

/// A named shell command run as its own job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraJob {
    /// Job name, e.g. `cli-test`
    pub name: String,
    /// Command passed through verbatim, e.g. `bash -x ./scripts/test-ci.sh`
    pub command: String,
}

impl ExtraJob {
    /// Create a new extra job.
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }

    /// Job id emitters key this job by.
    #[must_use]
    pub fn job_id(&self) -> String {
        sanitize_job_id(&self.name)
    }
}

/// Sanitize a name for use as a job id.
///
/// Dots and spaces become dashes; anything other than alphanumerics, `-` and
/// `_` is dropped.
#[must_use]
pub fn sanitize_job_id(name: &str) -> String {
    name.trim()
        .replace(['.', ' '], "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// One complete pipeline, built once per invocation and never modified after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineDescription {
    /// Pipeline (workflow) name
    pub name: String,
    /// Branch that receives expanded verification
    pub primary_branch: String,
    /// Style and lint matrix
    pub style_check: JobMatrix,
    /// Coverage matrix
    pub coverage: JobMatrix,
    /// Matrix the extra script jobs run on
    pub auxiliary_test: JobMatrix,
    /// Extra script jobs
    pub extra_jobs: Vec<ExtraJob>,
    /// Release packaging, if this variant releases
    pub release: Option<ReleaseSpec>,
    /// Static feature switches
    pub toggles: FeatureToggles,
    /// Auxiliary verification passes
    pub checks: AuxiliaryChecks,
    /// Project guidance for automated review agents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_prompt: Option<String>,
}
