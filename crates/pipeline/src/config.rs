//! Pipeline variants as configuration values.
//!
//! A `ciwright.toml` file layers over a base variant (usually a built-in
//! preset): tables merge key by key, every other value (arrays included)
//! replaces the base value wholesale.

use crate::description::{AuxiliaryChecks, ExtraJob, FeatureToggles, RESERVED_JOB_NAMES};
use crate::description::{COVERAGE, STYLE_CHECK};
use crate::error::{Error, Result};
use crate::matrix::{DEFAULT_ALL_PLATFORMS_TOKEN, ExpansionPolicy};
use crate::platform::TargetPlatform;
use crate::release::ReleaseConfig;
use crate::signals::SignalSources;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "ciwright.toml";

/// Platforms and toolchains for the verification matrices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MatrixConfig {
    /// Platform every matrix starts from
    pub default_platform: TargetPlatform,
    /// Platforms appended when the full set is requested
    pub extra_platforms: Vec<TargetPlatform>,
    /// Toolchains for the style-check matrix
    pub style_toolchains: BTreeSet<String>,
    /// Toolchains for the coverage matrix
    pub coverage_toolchains: BTreeSet<String>,
    /// Feature sets for every matrix
    pub features: BTreeSet<String>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            default_platform: TargetPlatform::LinuxAmd64,
            extra_platforms: vec![TargetPlatform::LinuxArm64, TargetPlatform::Mac],
            style_toolchains: BTreeSet::from(["stable".to_string(), "nightly".to_string()]),
            coverage_toolchains: BTreeSet::from(["stable".to_string()]),
            features: BTreeSet::from(["all".to_string()]),
        }
    }
}

/// One pipeline variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Pipeline (workflow) name
    pub name: String,
    /// Branch that receives expanded verification
    pub primary_branch: String,
    /// Context token that requests the full platform set
    pub all_platforms_token: String,
    /// Where environment signals come from
    pub signals: SignalSources,
    /// Matrix platforms and toolchains
    pub matrix: MatrixConfig,
    /// Static feature switches
    pub toggles: FeatureToggles,
    /// Auxiliary verification passes
    pub checks: AuxiliaryChecks,
    /// Extra script jobs
    pub extra: Vec<ExtraJob>,
    /// Release packaging
    pub release: ReleaseConfig,
    /// Project guidance for automated review agents, passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_prompt: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "ci".to_string(),
            primary_branch: "main".to_string(),
            all_platforms_token: DEFAULT_ALL_PLATFORMS_TOKEN.to_string(),
            signals: SignalSources::default(),
            matrix: MatrixConfig::default(),
            toggles: FeatureToggles::default(),
            checks: AuxiliaryChecks::default(),
            extra: Vec::new(),
            release: ReleaseConfig::default(),
            additional_prompt: None,
        }
    }
}

impl PipelineConfig {
    /// The expansion policy this variant uses.
    #[must_use]
    pub fn expansion_policy(&self) -> ExpansionPolicy {
        ExpansionPolicy {
            primary_branch: self.primary_branch.clone(),
            all_platforms_token: self.all_platforms_token.clone(),
        }
    }

    /// Layer a TOML document over `base` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` for malformed TOML or mistyped fields and
    /// `Error::Invalid` when the merged configuration breaks an invariant.
    pub fn layered(base: &Self, overlay: &str) -> Result<Self> {
        Self::layered_inner(base, overlay, None)
    }

    /// Read a TOML file and layer it over `base`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigIo` if the file cannot be read, otherwise the
    /// same errors as [`PipelineConfig::layered`].
    pub fn load(base: &Self, path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded pipeline configuration");
        Self::layered_inner(base, &contents, Some(path))
    }

    fn layered_inner(base: &Self, overlay: &str, path: Option<&Path>) -> Result<Self> {
        let to_parse_error = |e: toml::de::Error| Error::parse(e.to_string(), path.map(Path::to_path_buf));

        let overlay: toml::Table = toml::from_str(overlay).map_err(to_parse_error)?;
        let toml::Value::Table(mut merged) = toml::Value::try_from(base)? else {
            return Err(Error::parse(
                "base configuration did not serialize to a table",
                path.map(Path::to_path_buf),
            ));
        };
        merge_tables(&mut merged, overlay);

        let config: Self = toml::Value::Table(merged)
            .try_into()
            .map_err(to_parse_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants assembly relies on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` describing the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid(
                "pipeline name is empty",
                "Set `name` to the workflow name, e.g. \"ci\"",
            ));
        }
        if self.primary_branch.trim().is_empty() {
            return Err(Error::invalid(
                "primary branch is empty",
                "Set `primary-branch`, e.g. \"main\"",
            ));
        }

        for (matrix, toolchains) in [
            (STYLE_CHECK, &self.matrix.style_toolchains),
            (COVERAGE, &self.matrix.coverage_toolchains),
        ] {
            if toolchains.is_empty() || toolchains.iter().any(|t| t.trim().is_empty()) {
                return Err(Error::invalid(
                    format!("{matrix} matrix needs non-empty toolchain names"),
                    "List at least one toolchain, e.g. [\"stable\"]",
                ));
            }
        }

        self.validate_extra_jobs()?;

        if self.release.enabled {
            self.validate_release()?;
        }
        Ok(())
    }

    /// Extra jobs are checked by the id they render under, so names that
    /// sanitize to a reserved or sibling id are caught here.
    fn validate_extra_jobs(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for job in &self.extra {
            let id = job.job_id();
            if id.is_empty() || job.command.trim().is_empty() {
                return Err(Error::invalid(
                    "extra job with empty name or command",
                    "Every [[extra]] entry needs both `name` and `command`",
                ));
            }
            if RESERVED_JOB_NAMES.contains(&id.as_str()) {
                return Err(Error::invalid(
                    format!("extra job name '{}' is reserved (job id '{id}')", job.name),
                    format!("Reserved job names: {}", RESERVED_JOB_NAMES.join(", ")),
                ));
            }
            if !seen.insert(id.clone()) {
                return Err(Error::invalid(
                    format!("extra job name '{}' clashes with another job (job id '{id}')", job.name),
                    "Extra job names must stay unique once dots and spaces become dashes",
                ));
            }
        }
        Ok(())
    }

    fn validate_release(&self) -> Result<()> {
        let release = &self.release;
        if release.binary_name.trim().is_empty() {
            return Err(Error::invalid(
                "release binary name is empty",
                "Set `release.binary-name` to the executable produced by cargo",
            ));
        }
        if release.platforms.is_empty() {
            return Err(Error::invalid(
                "release includes no platforms",
                "List at least one platform in `release.platforms`",
            ));
        }
        if release.homebrew.is_some() && !release.publish {
            tracing::warn!("Homebrew tap configured but publishing is off; the tap is never bumped");
        }

        let mut archives = HashSet::new();
        for bundle in &release.asset_bundles {
            if !archives.insert(bundle.archive_name.as_str()) {
                return Err(Error::invalid(
                    format!("duplicate archive name '{}'", bundle.archive_name),
                    "Each asset bundle must produce a distinct archive",
                ));
            }
        }
        Ok(())
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => {
                merge_tables(existing, nested);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
