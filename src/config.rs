//! Application-level configuration loading: team color palette, live update queue and
//! status transition policy.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::status::TransitionPolicy;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MATCHPLAY_BACK_CONFIG_PATH";
/// Fallback color returned when the palette is exhausted.
const DEFAULT_COLOR: &str = "#2563eb";
/// Pending broadcast requests the live update queue holds before coalescing.
pub const DEFAULT_NOTIFIER_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    team_colors: Vec<String>,
    notifier_queue_capacity: usize,
    status_transitions: TransitionPolicy,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        colors = app_config.team_colors.len(),
                        queue_capacity = app_config.notifier_queue_capacity,
                        transitions = ?app_config.status_transitions,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Return the first palette color not already listed in `used` (case-insensitive).
    ///
    /// When every palette entry is taken the fixed fallback color is returned.
    pub fn first_unused_color(&self, used: &[&str]) -> String {
        self.team_colors
            .iter()
            .find(|candidate| {
                used.iter()
                    .all(|existing| !existing.eq_ignore_ascii_case(candidate))
            })
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }

    pub fn notifier_queue_capacity(&self) -> usize {
        self.notifier_queue_capacity
    }

    pub fn status_transitions(&self) -> TransitionPolicy {
        self.status_transitions
    }

    /// Same defaults with a different transition policy.
    pub fn with_status_transitions(mut self, policy: TransitionPolicy) -> Self {
        self.status_transitions = policy;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            team_colors: default_colors(),
            notifier_queue_capacity: DEFAULT_NOTIFIER_QUEUE_CAPACITY,
            status_transitions: TransitionPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    team_colors: Option<Vec<String>>,
    #[serde(default)]
    notifier_queue_capacity: Option<usize>,
    #[serde(default)]
    status_transitions: Option<TransitionPolicy>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let team_colors = value
            .team_colors
            .filter(|colors| !colors.is_empty())
            .unwrap_or_else(default_colors);
        Self {
            team_colors,
            notifier_queue_capacity: value
                .notifier_queue_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_NOTIFIER_QUEUE_CAPACITY),
            status_transitions: value.status_transitions.unwrap_or_default(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in palette shipped with the binary.
fn default_colors() -> Vec<String> {
    [
        "#2563eb", "#dc2626", "#16a34a", "#d97706", "#7c3aed", "#0891b2", "#db2777", "#4b5563",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_unused_color_skips_taken_entries() {
        let config = AppConfig::default();
        assert_eq!(config.first_unused_color(&[]), "#2563eb");
        assert_eq!(config.first_unused_color(&["#2563EB"]), "#dc2626");
    }

    #[test]
    fn exhausted_palette_falls_back() {
        let config: AppConfig = RawConfig {
            team_colors: Some(vec!["#000000".into()]),
            notifier_queue_capacity: None,
            status_transitions: None,
        }
        .into();
        assert_eq!(config.first_unused_color(&["#000000"]), DEFAULT_COLOR);
    }

    #[test]
    fn raw_config_fills_missing_keys_with_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{ "status_transitions": "forward_only" }"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.status_transitions(), TransitionPolicy::ForwardOnly);
        assert_eq!(
            config.notifier_queue_capacity(),
            DEFAULT_NOTIFIER_QUEUE_CAPACITY
        );
        assert_eq!(config.team_colors, default_colors());
    }

    #[test]
    fn zero_queue_capacity_is_replaced() {
        let raw: RawConfig = serde_json::from_str(r#"{ "notifier_queue_capacity": 0 }"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(
            config.notifier_queue_capacity(),
            DEFAULT_NOTIFIER_QUEUE_CAPACITY
        );
    }
}
