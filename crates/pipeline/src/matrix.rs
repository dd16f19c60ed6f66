//! Job matrices and platform expansion.
//!
//! Every matrix owns its platform list. Expansion never mutates a list in
//! place; it produces a new one, so two matrices built from equal base lists
//! can never observe each other's changes.

use crate::platform::TargetPlatform;
use crate::signals::EnvironmentSignals;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default context token that requests the full platform set.
pub const DEFAULT_ALL_PLATFORMS_TOKEN: &str = "ALL_OS";

/// A job replicated across platforms, toolchains and feature sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMatrix {
    /// Disabled matrices are omitted entirely.
    pub enabled: bool,
    /// Platforms in run order, without duplicates
    pub platforms: Vec<TargetPlatform>,
    /// Rust toolchains, e.g. `stable`, `nightly`
    pub toolchains: BTreeSet<String>,
    /// Cargo feature sets; `all` stands for `--all-features`
    pub features: BTreeSet<String>,
}

impl JobMatrix {
    /// Create an enabled matrix over the given platforms.
    ///
    /// Duplicate platforms are dropped, keeping the first occurrence.
    #[must_use]
    pub fn new(platforms: impl IntoIterator<Item = TargetPlatform>) -> Self {
        Self {
            enabled: true,
            platforms: expand(&[], &platforms.into_iter().collect::<Vec<_>>(), true),
            toolchains: BTreeSet::new(),
            features: BTreeSet::new(),
        }
    }

    /// Set the toolchains.
    #[must_use]
    pub fn with_toolchains<I, S>(mut self, toolchains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toolchains = toolchains.into_iter().map(Into::into).collect();
        self
    }

    /// Set the feature sets.
    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether the matrix is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Return a copy whose platforms are expanded by `extra` when `condition` holds.
    #[must_use]
    pub fn expanded(&self, extra: &[TargetPlatform], condition: bool) -> Self {
        Self {
            platforms: expand(&self.platforms, extra, condition),
            ..self.clone()
        }
    }

    /// Whether the matrix produces any job at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.platforms.is_empty()
    }
}

/// Append each platform of `extra` not yet present in `base` when `condition` holds.
///
/// The result keeps `base` order followed by the new platforms in the order
/// given. Applying the same expansion twice is a no-op the second time.
#[must_use]
pub fn expand(
    base: &[TargetPlatform],
    extra: &[TargetPlatform],
    condition: bool,
) -> Vec<TargetPlatform> {
    let mut platforms = base.to_vec();
    if !condition {
        return platforms;
    }
    for platform in extra {
        if !platforms.contains(platform) {
            platforms.push(*platform);
        }
    }
    platforms
}

/// When the full platform set is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionPolicy {
    /// Branch that always receives expanded verification
    pub primary_branch: String,
    /// Context token that requests expansion on any branch
    pub all_platforms_token: String,
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self {
            primary_branch: "main".to_string(),
            all_platforms_token: DEFAULT_ALL_PLATFORMS_TOKEN.to_string(),
        }
    }
}

/// Whether these signals request the full platform set.
///
/// True on the primary branch, or when the context flag contains the
/// override token. Either alone suffices.
#[must_use]
pub fn wants_all_platforms(signals: &EnvironmentSignals, policy: &ExpansionPolicy) -> bool {
    let on_primary = signals
        .ref_name
        .as_deref()
        .is_some_and(|r| strip_ref_prefix(r) == policy.primary_branch);

    let overridden = !policy.all_platforms_token.is_empty()
        && signals.context_flag.as_deref().is_some_and(|flag| {
            flag.split(|c: char| c == ',' || c.is_whitespace())
                .any(|token| token == policy.all_platforms_token)
        });

    on_primary || overridden
}

// GITHUB_REF_NAME is already short, but GITHUB_REF style values are accepted too.
fn strip_ref_prefix(ref_name: &str) -> &str {
    ref_name.strip_prefix("refs/heads/").unwrap_or(ref_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TargetPlatform::{LinuxAmd64, LinuxArm64, Mac};

    #[test]
    fn test_expand_false_condition_returns_base() {
        assert_eq!(expand(&[LinuxAmd64], &[LinuxArm64, Mac], false), vec![LinuxAmd64]);
    }

    #[test]
    fn test_expand_appends_in_given_order() {
        assert_eq!(
            expand(&[LinuxAmd64], &[Mac, LinuxArm64], true),
            vec![LinuxAmd64, Mac, LinuxArm64]
        );
    }

    #[test]
    fn test_expand_skips_existing_and_repeated() {
        assert_eq!(
            expand(&[Mac], &[LinuxAmd64, Mac, LinuxAmd64], true),
            vec![Mac, LinuxAmd64]
        );
    }

    #[test]
    fn test_new_drops_duplicates() {
        let matrix = JobMatrix::new([LinuxAmd64, LinuxAmd64, Mac]);
        assert_eq!(matrix.platforms, vec![LinuxAmd64, Mac]);
        assert!(matrix.is_active());
    }

    #[test]
    fn test_expanded_leaves_original_untouched() {
        let base = JobMatrix::new([LinuxAmd64]);
        let wide = base.expanded(&[LinuxArm64], true);
        assert_eq!(base.platforms, vec![LinuxAmd64]);
        assert_eq!(wide.platforms, vec![LinuxAmd64, LinuxArm64]);
    }

    #[test]
    fn test_disabled_matrix_is_inactive() {
        let matrix = JobMatrix::new(TargetPlatform::ALL).with_enabled(false);
        assert!(!matrix.is_active());
    }

    #[test]
    fn test_primary_branch_wants_all() {
        let policy = ExpansionPolicy::default();
        assert!(wants_all_platforms(&EnvironmentSignals::new(Some("main"), None, false), &policy));
        assert!(wants_all_platforms(
            &EnvironmentSignals::new(Some("refs/heads/main"), None, false),
            &policy
        ));
        assert!(!wants_all_platforms(
            &EnvironmentSignals::new(Some("maintenance"), None, false),
            &policy
        ));
    }

    #[test]
    fn test_context_override_wants_all() {
        let policy = ExpansionPolicy::default();
        assert!(wants_all_platforms(
            &EnvironmentSignals::new(Some("feature/x"), Some("ALL_OS"), false),
            &policy
        ));
        assert!(wants_all_platforms(
            &EnvironmentSignals::new(None, Some("fast, ALL_OS"), false),
            &policy
        ));
        assert!(!wants_all_platforms(
            &EnvironmentSignals::new(None, Some("ALL_OSES"), false),
            &policy
        ));
    }

    #[test]
    fn test_absent_signals_do_not_expand() {
        assert!(!wants_all_platforms(
            &EnvironmentSignals::default(),
            &ExpansionPolicy::default()
        ));
    }
}
