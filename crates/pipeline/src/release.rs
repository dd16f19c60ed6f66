//! Release packaging configuration.

use crate::platform::TargetPlatform;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Package formats produced alongside the raw build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
    /// The plain executable
    Binary,
    /// A `.deb` package built with `cargo deb` (Linux only)
    Debian,
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Debian => f.write_str("debian"),
        }
    }
}

/// A set of files packed into one named release archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetBundle {
    /// Shell glob selecting the files to pack
    pub source_glob: String,
    /// Archive file name; `.zip` selects zip, anything else tar+gzip
    pub archive_name: String,
}

impl AssetBundle {
    /// Create a new asset bundle.
    #[must_use]
    pub fn new(source_glob: impl Into<String>, archive_name: impl Into<String>) -> Self {
        Self {
            source_glob: source_glob.into(),
            archive_name: archive_name.into(),
        }
    }
}

/// Homebrew tap that receives formula bumps after publishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HomebrewTap {
    /// Tap repository, `owner/homebrew-name`
    pub tap: String,
    /// Formula name, defaults to the binary name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Secret holding a token allowed to push to the tap
    #[serde(default = "default_tap_token_secret")]
    pub token_secret: String,
}

fn default_tap_token_secret() -> String {
    "HOMEBREW_TAP_TOKEN".to_string()
}

/// Release section as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReleaseConfig {
    /// Whether the pipeline has a release section at all
    pub enabled: bool,
    /// Name of the executable to package
    pub binary_name: String,
    /// Cargo profile used for release builds
    pub profile: String,
    /// Platforms to build release artifacts for
    pub platforms: Vec<TargetPlatform>,
    /// Package formats to produce
    pub package_formats: BTreeSet<PackageFormat>,
    /// Archives to pack, in order
    pub asset_bundles: Vec<AssetBundle>,
    /// Whether to publish a GitHub release
    pub publish: bool,
    /// Optional Homebrew tap publishing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homebrew: Option<HomebrewTap>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            binary_name: String::new(),
            profile: "release".to_string(),
            platforms: vec![TargetPlatform::LinuxAmd64],
            package_formats: BTreeSet::from([PackageFormat::Binary]),
            asset_bundles: Vec::new(),
            publish: false,
            homebrew: None,
        }
    }
}

/// Assembled release packaging for one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseSpec {
    /// Name of the executable to package
    pub binary_name: String,
    /// Cargo profile used for release builds
    pub profile: String,
    /// Inclusion flag for every known platform
    pub per_platform_inclusion: BTreeMap<TargetPlatform, bool>,
    /// Package formats to produce
    pub package_formats: BTreeSet<PackageFormat>,
    /// Archives to pack; archive names are unique
    pub asset_bundles: Vec<AssetBundle>,
    /// Whether to publish a GitHub release
    pub publish: bool,
    /// Optional Homebrew tap publishing
    pub homebrew: Option<HomebrewTap>,
}

impl ReleaseSpec {
    /// Assemble the release spec from its configuration.
    ///
    /// Asset bundles pass through unmodified.
    #[must_use]
    pub fn from_config(config: &ReleaseConfig) -> Self {
        let per_platform_inclusion = TargetPlatform::ALL
            .into_iter()
            .map(|p| (p, config.platforms.contains(&p)))
            .collect();

        Self {
            binary_name: config.binary_name.clone(),
            profile: config.profile.clone(),
            per_platform_inclusion,
            package_formats: config.package_formats.clone(),
            asset_bundles: config.asset_bundles.clone(),
            publish: config.publish,
            homebrew: config.homebrew.clone(),
        }
    }

    /// Platforms with inclusion set, in declaration order.
    #[must_use]
    pub fn included_platforms(&self) -> Vec<TargetPlatform> {
        self.per_platform_inclusion
            .iter()
            .filter(|(_, included)| **included)
            .map(|(platform, _)| *platform)
            .collect()
    }

    /// Whether a package format is requested.
    #[must_use]
    pub fn produces(&self, format: PackageFormat) -> bool {
        self.package_formats.contains(&format)
    }

    /// Directory under `target/<triple>/` that holds the build output.
    #[must_use]
    pub fn profile_dir(&self) -> &str {
        match self.profile.as_str() {
            "dev" | "test" => "debug",
            "bench" => "release",
            other => other,
        }
    }

    /// Formula name used when bumping the Homebrew tap.
    #[must_use]
    pub fn formula_name(&self) -> Option<&str> {
        self.homebrew
            .as_ref()
            .map(|tap| tap.formula.as_deref().unwrap_or(&self.binary_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ReleaseConfig {
        ReleaseConfig {
            enabled: true,
            binary_name: "kg".to_string(),
            platforms: vec![TargetPlatform::Mac, TargetPlatform::LinuxAmd64],
            ..Default::default()
        }
    }

    #[test]
    fn test_inclusion_covers_every_platform() {
        let spec = ReleaseSpec::from_config(&config());
        assert_eq!(spec.per_platform_inclusion.len(), TargetPlatform::ALL.len());
        assert!(!spec.per_platform_inclusion[&TargetPlatform::LinuxArm64]);
        assert_eq!(
            spec.included_platforms(),
            vec![TargetPlatform::LinuxAmd64, TargetPlatform::Mac]
        );
    }

    #[test]
    fn test_profile_dir() {
        let mut cfg = config();
        assert_eq!(ReleaseSpec::from_config(&cfg).profile_dir(), "release");
        cfg.profile = "dev".to_string();
        assert_eq!(ReleaseSpec::from_config(&cfg).profile_dir(), "debug");
        cfg.profile = "dist".to_string();
        assert_eq!(ReleaseSpec::from_config(&cfg).profile_dir(), "dist");
    }

    #[test]
    fn test_formula_name_falls_back_to_binary() {
        let mut cfg = config();
        assert_eq!(ReleaseSpec::from_config(&cfg).formula_name(), None);

        cfg.homebrew = Some(HomebrewTap {
            tap: "acme/homebrew-tap".to_string(),
            formula: None,
            token_secret: default_tap_token_secret(),
        });
        assert_eq!(ReleaseSpec::from_config(&cfg).formula_name(), Some("kg"));
    }

    #[test]
    fn test_spec_serializes_kebab_case_keys() {
        let json = serde_json::to_value(ReleaseSpec::from_config(&config())).unwrap();
        assert!(json.get("binary-name").is_some());
        assert!(json.get("per-platform-inclusion").is_some());
        assert!(json.get("binary_name").is_none());
    }
}
