//! Pipeline assembly.
//!
//! Assembly is a single linear pass over one configuration and one signal
//! snapshot:
//!
//! 1. build the single-platform base matrices, each from its own vector
//! 2. expand style-check and coverage when the full platform set is wanted
//! 3. apply the disable marker (verification off, release untouched)
//! 4. assemble the release spec from the variant's literals
//! 5. copy the static feature toggles and the review prompt
//!
//! It is total: every combination of signals yields a description.

use crate::config::PipelineConfig;
use crate::description::{AuxiliaryChecks, PipelineDescription};
use crate::matrix::{JobMatrix, wants_all_platforms};
use crate::release::ReleaseSpec;
use crate::signals::EnvironmentSignals;
use tracing::debug;

/// Assemble the pipeline description for `signals` under `config`.
#[must_use]
pub fn assemble(config: &PipelineConfig, signals: &EnvironmentSignals) -> PipelineDescription {
    let matrix = &config.matrix;
    let features = matrix.features.iter().cloned();

    let style_base = JobMatrix::new([matrix.default_platform])
        .with_toolchains(matrix.style_toolchains.iter().cloned())
        .with_features(features.clone());
    let coverage_base = JobMatrix::new([matrix.default_platform])
        .with_toolchains(matrix.coverage_toolchains.iter().cloned())
        .with_features(features.clone());
    let auxiliary_base = JobMatrix::new([matrix.default_platform])
        .with_toolchains(["stable"])
        .with_features(features)
        .with_enabled(!config.extra.is_empty());

    let all_platforms = wants_all_platforms(signals, &config.expansion_policy());
    let style_check = style_base.expanded(&matrix.extra_platforms, all_platforms);
    let coverage = coverage_base.expanded(&matrix.extra_platforms, all_platforms);
    debug!(
        all_platforms,
        platforms = ?coverage.platforms,
        "Expanded verification matrices"
    );

    let disabled = signals.disable_marker;
    let (style_check, coverage, auxiliary_test, checks) = if disabled {
        debug!("Disable marker present, switching verification jobs off");
        (
            style_check.with_enabled(false),
            coverage.with_enabled(false),
            auxiliary_base.with_enabled(false),
            AuxiliaryChecks::disabled(),
        )
    } else {
        (style_check, coverage, auxiliary_base, config.checks)
    };

    let release = config
        .release
        .enabled
        .then(|| ReleaseSpec::from_config(&config.release));
    debug!(
        release = release.is_some(),
        binary = release.as_ref().map(|r| r.binary_name.as_str()),
        "Assembled release section"
    );

    PipelineDescription {
        name: config.name.clone(),
        primary_branch: config.primary_branch.clone(),
        style_check,
        coverage,
        auxiliary_test,
        extra_jobs: config.extra.clone(),
        release,
        toggles: config.toggles,
        checks,
        additional_prompt: config.additional_prompt.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::TargetPlatform::{LinuxAmd64, LinuxArm64, Mac};
    use crate::presets::Preset;

    #[test]
    fn test_feature_branch_stays_single_platform() {
        let config = Preset::Cli.config();
        let description =
            assemble(&config, &EnvironmentSignals::new(Some("feature/x"), None, false));

        assert_eq!(description.style_check.platforms, vec![LinuxAmd64]);
        assert_eq!(description.coverage.platforms, vec![LinuxAmd64]);
        assert!(description.style_check.enabled);
    }

    #[test]
    fn test_main_expands_both_matrices() {
        let config = Preset::Cli.config();
        let description = assemble(&config, &EnvironmentSignals::new(Some("main"), None, false));

        assert_eq!(
            description.coverage.platforms,
            vec![LinuxAmd64, LinuxArm64, Mac]
        );
        assert_eq!(description.style_check.platforms, description.coverage.platforms);
    }

    #[test]
    fn test_auxiliary_matrix_never_expands() {
        let config = Preset::Cli.config();
        let description = assemble(&config, &EnvironmentSignals::new(Some("main"), None, false));
        assert_eq!(description.auxiliary_test.platforms, vec![LinuxAmd64]);
        assert!(description.auxiliary_test.enabled);
    }

    #[test]
    fn test_auxiliary_matrix_disabled_without_extras() {
        let description = assemble(&Preset::Checks.config(), &EnvironmentSignals::default());
        assert!(!description.auxiliary_test.enabled);
    }

    #[test]
    fn test_disable_marker_switches_checks_off() {
        let config = Preset::Cli.config();
        let description =
            assemble(&config, &EnvironmentSignals::new(Some("main"), None, true));

        assert!(!description.style_check.enabled);
        assert!(!description.coverage.enabled);
        assert!(!description.auxiliary_test.enabled);
        assert!(!description.checks.any());
        assert!(description.release.is_some());
    }

    #[test]
    fn test_toggles_are_static() {
        let config = Preset::Cli.config();
        let description = assemble(&config, &EnvironmentSignals::new(None, None, true));
        assert_eq!(description.toggles, config.toggles);
    }

    #[test]
    fn test_additional_prompt_passes_through() {
        let description = assemble(
            &Preset::Cli.config(),
            &EnvironmentSignals::new(Some("main"), None, true),
        );
        assert!(
            description
                .additional_prompt
                .as_deref()
                .is_some_and(|p| p.contains("./docs/kiro"))
        );
        assert!(
            assemble(&Preset::Checks.config(), &EnvironmentSignals::default())
                .additional_prompt
                .is_none()
        );
    }

    #[test]
    fn test_checks_preset_has_no_release() {
        let description = assemble(&Preset::Checks.config(), &EnvironmentSignals::default());
        assert!(description.release.is_none());
    }
}
