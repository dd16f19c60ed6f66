//! Target platforms a pipeline job can run on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An operating system and architecture pair drawn from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetPlatform {
    /// x86_64 Linux
    LinuxAmd64,
    /// aarch64 Linux
    LinuxArm64,
    /// Apple silicon macOS
    Mac,
}

impl TargetPlatform {
    /// Every platform, in declaration order.
    pub const ALL: [Self; 3] = [Self::LinuxAmd64, Self::LinuxArm64, Self::Mac];

    /// Stable identifier used in configuration and matrix values.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::LinuxAmd64 => "linux-amd64",
            Self::LinuxArm64 => "linux-arm64",
            Self::Mac => "mac",
        }
    }

    /// Hosted runner label that natively executes this platform.
    #[must_use]
    pub const fn runner(self) -> &'static str {
        match self {
            Self::LinuxAmd64 => "ubuntu-latest",
            Self::LinuxArm64 => "ubuntu-24.04-arm",
            Self::Mac => "macos-14",
        }
    }

    /// Rust target triple for release builds.
    #[must_use]
    pub const fn rust_triple(self) -> &'static str {
        match self {
            Self::LinuxAmd64 => "x86_64-unknown-linux-gnu",
            Self::LinuxArm64 => "aarch64-unknown-linux-gnu",
            Self::Mac => "aarch64-apple-darwin",
        }
    }

    /// Whether the platform is a Linux flavour (Debian packaging applies).
    #[must_use]
    pub const fn is_linux(self) -> bool {
        matches!(self, Self::LinuxAmd64 | Self::LinuxArm64)
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TargetPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown target platform: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trips_through_from_str() {
        for platform in TargetPlatform::ALL {
            assert_eq!(platform.id().parse::<TargetPlatform>(), Ok(platform));
        }
        assert!("windows".parse::<TargetPlatform>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_ids() {
        let json = serde_json::to_string(&TargetPlatform::LinuxArm64).unwrap();
        assert_eq!(json, "\"linux-arm64\"");
    }

    #[test]
    fn test_only_linux_platforms_are_linux() {
        assert!(TargetPlatform::LinuxAmd64.is_linux());
        assert!(TargetPlatform::LinuxArm64.is_linux());
        assert!(!TargetPlatform::Mac.is_linux());
    }
}
