//! Built-in pipeline variants.

use crate::config::PipelineConfig;
use crate::description::{ExtraJob, FeatureToggles};
use crate::error::{Error, Result};
use crate::platform::TargetPlatform;
use crate::release::{AssetBundle, HomebrewTap, PackageFormat, ReleaseConfig};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const BINARY_NAME: &str = "kg";

/// A named, built-in pipeline variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// CLI project: Debian and binary packages for amd64, no publishing,
    /// plus the `cli-test` script job.
    #[default]
    Cli,
    /// Publishes per-platform tarballs to GitHub releases and bumps a
    /// Homebrew tap.
    Homebrew,
    /// Verification only, no release section.
    Checks,
}

impl Preset {
    /// Every preset.
    pub const ALL: [Self; 3] = [Self::Cli, Self::Homebrew, Self::Checks];

    /// Preset name as accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Homebrew => "homebrew",
            Self::Checks => "checks",
        }
    }

    /// One-line summary for listings.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Cli => "debian + binary release for linux-amd64, cli-test script, no publishing",
            Self::Homebrew => "tarballs for every platform, GitHub release and Homebrew tap",
            Self::Checks => "verification jobs only",
        }
    }

    /// The configuration this preset stands for.
    #[must_use]
    pub fn config(self) -> PipelineConfig {
        match self {
            Self::Cli => cli(),
            Self::Homebrew => homebrew(),
            Self::Checks => checks(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::UnknownPreset {
                name: s.to_string(),
                available: Self::ALL.map(Self::name).join(", "),
            })
    }
}

fn static_toggles() -> FeatureToggles {
    FeatureToggles {
        semver: false,
        documentation: true,
        sanitizers: false,
    }
}

/// Review guidance the `cli` variant attaches to its workflow.
const CLI_REVIEW_PROMPT: &str = "\
## kiro Documentation

There are additional markdown documents about kiro-cli configuration in directory ./docs/kiro
If you need more context around kiro agent config refer to these files.

## Facet Documentation

Face is new and evolving. You will find updated documentation in directory ./docs/facet
If unclear how the crate / library works, refer to these documents.
";

fn cli() -> PipelineConfig {
    PipelineConfig {
        toggles: static_toggles(),
        additional_prompt: Some(CLI_REVIEW_PROMPT.to_string()),
        extra: vec![ExtraJob::new("cli-test", "bash -x ./scripts/test-ci.sh")],
        release: ReleaseConfig {
            enabled: true,
            binary_name: BINARY_NAME.to_string(),
            profile: "release".to_string(),
            platforms: vec![TargetPlatform::LinuxAmd64],
            package_formats: BTreeSet::from([PackageFormat::Binary, PackageFormat::Debian]),
            asset_bundles: Vec::new(),
            publish: false,
            homebrew: None,
        },
        ..PipelineConfig::default()
    }
}

fn homebrew() -> PipelineConfig {
    let asset_bundles = TargetPlatform::ALL
        .into_iter()
        .map(|p| {
            AssetBundle::new(
                format!("target/{}/release/{BINARY_NAME}", p.rust_triple()),
                format!("{BINARY_NAME}-{}.tar.gz", p.id()),
            )
        })
        .collect();

    PipelineConfig {
        toggles: static_toggles(),
        release: ReleaseConfig {
            enabled: true,
            binary_name: BINARY_NAME.to_string(),
            profile: "release".to_string(),
            platforms: TargetPlatform::ALL.to_vec(),
            package_formats: BTreeSet::from([PackageFormat::Binary]),
            asset_bundles,
            publish: true,
            homebrew: Some(HomebrewTap {
                tap: "${{ github.repository_owner }}/homebrew-tap".to_string(),
                formula: None,
                token_secret: "HOMEBREW_TAP_TOKEN".to_string(),
            }),
        },
        ..PipelineConfig::default()
    }
}

fn checks() -> PipelineConfig {
    PipelineConfig {
        name: "checks".to_string(),
        toggles: static_toggles(),
        ..PipelineConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_is_valid() {
        for preset in Preset::ALL {
            assert!(preset.config().validate().is_ok(), "{preset} is invalid");
        }
    }

    #[test]
    fn test_parse_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        let err = "nightly".parse::<Preset>().unwrap_err();
        assert!(err.to_string().contains("nightly"));
    }

    #[test]
    fn test_cli_preset_literals() {
        let config = Preset::Cli.config();
        assert!(!config.toggles.semver);
        assert!(!config.toggles.sanitizers);
        assert!(config.toggles.documentation);
        assert_eq!(config.release.platforms, vec![TargetPlatform::LinuxAmd64]);
        assert!(config.release.package_formats.contains(&PackageFormat::Debian));
        assert!(!config.release.publish);
        assert_eq!(config.extra[0].command, "bash -x ./scripts/test-ci.sh");
        let prompt = config.additional_prompt.unwrap();
        assert!(prompt.contains("./docs/kiro"));
        assert!(prompt.contains("./docs/facet"));
    }

    #[test]
    fn test_homebrew_bundles_are_unique() {
        let config = Preset::Homebrew.config();
        assert_eq!(config.release.asset_bundles.len(), 3);
        assert_eq!(config.release.asset_bundles[2].archive_name, "kg-mac.tar.gz");
    }

    #[test]
    fn test_checks_preset_has_no_release() {
        assert!(!Preset::Checks.config().release.enabled);
    }
}
