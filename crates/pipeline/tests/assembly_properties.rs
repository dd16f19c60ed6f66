//! Property and scenario tests for pipeline assembly.
//!
//! These exercise `assemble` across every combination of branch, context
//! flag and disable marker, for every built-in preset.

use ciwright_pipeline::{
    EnvironmentSignals, JobMatrix, PipelineConfig, Preset, TargetPlatform, assemble, expand,
};
use proptest::prelude::*;

const FULL: [TargetPlatform; 3] = [
    TargetPlatform::LinuxAmd64,
    TargetPlatform::LinuxArm64,
    TargetPlatform::Mac,
];

fn platform() -> impl Strategy<Value = TargetPlatform> {
    prop::sample::select(TargetPlatform::ALL.to_vec())
}

fn preset() -> impl Strategy<Value = Preset> {
    prop::sample::select(Preset::ALL.to_vec())
}

fn ref_name() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("main".to_string()),
        Just("feature/x".to_string()),
        "[a-z/]{1,12}",
    ])
}

fn context_flag() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("ALL_OS".to_string()),
        Just("fast".to_string()),
        "[A-Z_]{0,8}",
    ])
}

fn signals() -> impl Strategy<Value = EnvironmentSignals> {
    (ref_name(), context_flag(), any::<bool>()).prop_map(|(ref_name, context_flag, disable)| {
        EnvironmentSignals {
            ref_name,
            context_flag,
            disable_marker: disable,
        }
    })
}

fn requests_all(signals: &EnvironmentSignals) -> bool {
    signals.ref_name.as_deref() == Some("main")
        || signals
            .context_flag
            .as_deref()
            .is_some_and(|flag| flag.split([',', ' ']).any(|t| t == "ALL_OS"))
}

mod scenarios {
    use super::*;

    #[test]
    fn main_branch_expands_coverage_in_declared_order() {
        let description = assemble(
            &Preset::Cli.config(),
            &EnvironmentSignals::new(Some("main"), None, false),
        );
        assert_eq!(description.coverage.platforms, FULL.to_vec());
        assert!(description.style_check.enabled);
    }

    #[test]
    fn context_override_alone_matches_main() {
        let config = Preset::Cli.config();
        let on_main = assemble(&config, &EnvironmentSignals::new(Some("main"), None, false));
        let overridden = assemble(
            &config,
            &EnvironmentSignals::new(Some("feature/x"), Some("ALL_OS"), false),
        );
        assert_eq!(overridden.coverage.platforms, on_main.coverage.platforms);
        assert_eq!(overridden.style_check.platforms, on_main.style_check.platforms);
    }

    #[test]
    fn disable_marker_keeps_release() {
        let config = Preset::Cli.config();
        let enabled = assemble(
            &config,
            &EnvironmentSignals::new(Some("feature/x"), None, false),
        );
        let disabled = assemble(
            &config,
            &EnvironmentSignals::new(Some("feature/x"), None, true),
        );

        assert!(!disabled.style_check.enabled);
        assert!(!disabled.coverage.enabled);
        assert_eq!(disabled.release, enabled.release);
    }

    #[test]
    fn custom_primary_branch_is_honoured() {
        let config = PipelineConfig::layered(&Preset::Checks.config(), "primary-branch = \"trunk\"")
            .unwrap();
        let trunk = assemble(&config, &EnvironmentSignals::new(Some("trunk"), None, false));
        let main = assemble(&config, &EnvironmentSignals::new(Some("main"), None, false));
        assert_eq!(trunk.coverage.platforms.len(), 3);
        assert_eq!(main.coverage.platforms.len(), 1);
    }
}

proptest! {
    #[test]
    fn expand_is_idempotent(
        base in prop::collection::vec(platform(), 0..4),
        extra in prop::collection::vec(platform(), 0..4),
    ) {
        let base = expand(&[], &base, true);
        let once = expand(&base, &extra, true);
        let twice = expand(&once, &extra, true);
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn expand_never_duplicates_and_keeps_base_prefix(
        base in prop::collection::vec(platform(), 0..4),
        extra in prop::collection::vec(platform(), 0..6),
        condition in any::<bool>(),
    ) {
        let base = JobMatrix::new(base).platforms;
        let out = expand(&base, &extra, condition);

        prop_assert!(out.starts_with(&base));
        let mut seen = out.clone();
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), out.len());
        if !condition {
            prop_assert_eq!(&out, &base);
        }
    }

    #[test]
    fn matrices_follow_the_expansion_rule(preset in preset(), signals in signals()) {
        let description = assemble(&preset.config(), &signals);
        let expected = if requests_all(&signals) {
            FULL.to_vec()
        } else {
            vec![TargetPlatform::LinuxAmd64]
        };

        prop_assert_eq!(&description.style_check.platforms, &expected);
        prop_assert_eq!(&description.coverage.platforms, &expected);
        prop_assert_eq!(description.style_check.enabled, !signals.disable_marker);
        prop_assert_eq!(description.coverage.enabled, !signals.disable_marker);
    }

    #[test]
    fn disable_marker_never_touches_release(preset in preset(), signals in signals()) {
        let config = preset.config();
        let on = assemble(&config, &EnvironmentSignals { disable_marker: true, ..signals.clone() });
        let off = assemble(&config, &EnvironmentSignals { disable_marker: false, ..signals });

        prop_assert!(!on.checks.any());
        prop_assert!(!on.auxiliary_test.enabled);
        prop_assert_eq!(on.release, off.release);
        prop_assert_eq!(on.toggles, off.toggles);
    }

    #[test]
    fn expanding_style_never_alters_coverage(extra in prop::collection::vec(platform(), 0..4)) {
        let style = JobMatrix::new([TargetPlatform::LinuxAmd64]);
        let coverage = JobMatrix::new([TargetPlatform::LinuxAmd64]);
        let before = coverage.platforms.clone();

        let _wide = style.expanded(&extra, true);
        prop_assert_eq!(coverage.platforms, before);
    }
}
