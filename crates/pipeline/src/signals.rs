//! Environment signals that steer pipeline assembly.
//!
//! Signals are captured once, before assembly starts, and never change
//! afterwards. Reading them cannot fail: an unset or empty variable simply
//! leaves the corresponding signal absent.

use serde::{Deserialize, Serialize};

/// Literal token in a commit message that opts out of auxiliary checks.
pub const DEFAULT_DISABLE_MARKER: &str = "[ci:disable]";

/// Where each signal is read from.
///
/// Every signal lists candidate variables; the first one holding a non-empty
/// value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SignalSources {
    /// Variables carrying the branch or ref name
    pub ref_name: Vec<String>,
    /// Variables carrying the free-form context flag
    pub context: Vec<String>,
    /// Variables carrying the head commit message
    pub commit_message: Vec<String>,
    /// Substring in the commit message that sets the disable marker
    pub disable_marker: String,
}

impl Default for SignalSources {
    fn default() -> Self {
        Self {
            ref_name: vec!["CIWRIGHT_REF_NAME".to_string(), "GITHUB_REF_NAME".to_string()],
            context: vec!["CIWRIGHT_CONTEXT".to_string()],
            commit_message: vec![
                "CIWRIGHT_COMMIT_MESSAGE".to_string(),
                "GITHUB_COMMIT_MESSAGE".to_string(),
            ],
            disable_marker: DEFAULT_DISABLE_MARKER.to_string(),
        }
    }
}

/// Read-only snapshot of the signals for one assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSignals {
    /// Branch or ref name, e.g. `main` or `feature/x`
    pub ref_name: Option<String>,
    /// Free-form context flag, e.g. `ALL_OS`
    pub context_flag: Option<String>,
    /// Whether the commit message carries the disable marker
    pub disable_marker: bool,
}

impl EnvironmentSignals {
    /// Capture signals from the process environment.
    #[must_use]
    pub fn from_env(sources: &SignalSources) -> Self {
        Self::from_lookup(sources, |name| std::env::var(name).ok())
    }

    /// Capture signals through an arbitrary variable lookup.
    pub fn from_lookup<F>(sources: &SignalSources, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[String]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty())
        };

        let commit_message = first(&sources.commit_message);
        let disable_marker = !sources.disable_marker.is_empty()
            && commit_message
                .as_deref()
                .is_some_and(|message| message.contains(&sources.disable_marker));

        let signals = Self {
            ref_name: first(&sources.ref_name).map(|r| r.trim().to_string()),
            context_flag: first(&sources.context).map(|c| c.trim().to_string()),
            disable_marker,
        };
        tracing::debug!(
            ref_name = ?signals.ref_name,
            context_flag = ?signals.context_flag,
            disable_marker = signals.disable_marker,
            "Captured environment signals"
        );
        signals
    }

    /// Convenience constructor for fixed signals.
    #[must_use]
    pub fn new(ref_name: Option<&str>, context_flag: Option<&str>, disable_marker: bool) -> Self {
        Self {
            ref_name: ref_name.map(str::to_string),
            context_flag: context_flag.map(str::to_string),
            disable_marker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_variables_default_to_absent() {
        let signals = EnvironmentSignals::from_lookup(&SignalSources::default(), |_| None);
        assert_eq!(signals, EnvironmentSignals::default());
    }

    #[test]
    fn test_first_non_empty_variable_wins() {
        let signals = EnvironmentSignals::from_lookup(
            &SignalSources::default(),
            lookup_from(&[("CIWRIGHT_REF_NAME", "  "), ("GITHUB_REF_NAME", "main")]),
        );
        assert_eq!(signals.ref_name.as_deref(), Some("main"));
    }

    #[test]
    fn test_disable_marker_is_substring_match() {
        let signals = EnvironmentSignals::from_lookup(
            &SignalSources::default(),
            lookup_from(&[("GITHUB_COMMIT_MESSAGE", "wip: try things [ci:disable] please")]),
        );
        assert!(signals.disable_marker);

        let signals = EnvironmentSignals::from_lookup(
            &SignalSources::default(),
            lookup_from(&[("GITHUB_COMMIT_MESSAGE", "wip: [ci:disabled-ish]")]),
        );
        assert!(!signals.disable_marker);
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let sources = SignalSources {
            disable_marker: String::new(),
            ..Default::default()
        };
        let signals = EnvironmentSignals::from_lookup(
            &sources,
            lookup_from(&[("CIWRIGHT_COMMIT_MESSAGE", "anything")]),
        );
        assert!(!signals.disable_marker);
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        temp_env::with_vars(
            [
                ("CIWRIGHT_REF_NAME", Some("feature/x")),
                ("GITHUB_REF_NAME", None),
                ("CIWRIGHT_CONTEXT", Some("ALL_OS")),
                ("CIWRIGHT_COMMIT_MESSAGE", Some("fix: thing [ci:disable]")),
                ("GITHUB_COMMIT_MESSAGE", None),
            ],
            || {
                let signals = EnvironmentSignals::from_env(&SignalSources::default());
                assert_eq!(
                    signals,
                    EnvironmentSignals::new(Some("feature/x"), Some("ALL_OS"), true)
                );
            },
        );
    }
}
