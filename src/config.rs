//! Application-level configuration loading, plus the static rule book offered
//! to referee stations.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::arena::MatchTiming;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "REALTIME_SCORING_CONFIG_PATH";

const DEFAULT_NOTIFIER_CAPACITY: usize = 16;
const DEFAULT_SCORE_QUEUE_DEPTH: usize = 64;
const DEFAULT_OUTBOUND_QUEUE_DEPTH: usize = 32;

/// Rule codes a foul may be assessed under.
pub const RULE_CODES: [&str; 33] = [
    "G3", "G5", "G10", "G11", "G12", "G14", "G15", "G16", "G17", "G18", "G19", "G21", "G22", "G23",
    "G24", "G25", "G26", "G26-1", "G27", "G28", "G29", "G30", "G31", "G32", "G34", "G35", "G36",
    "G37", "G38", "G39", "G40", "G41", "G42",
];

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    match_timing: MatchTiming,
    notifier_capacity: usize,
    score_queue_depth: usize,
    outbound_queue_depth: usize,
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
                        timing = ?app_config.match_timing,
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

    /// Durations of the match periods, sent to announcer stations.
    pub fn match_timing(&self) -> MatchTiming {
        self.match_timing
    }

    /// Per-listener buffer of every notifier.
    pub fn notifier_capacity(&self) -> usize {
        self.notifier_capacity
    }

    /// Pending requests a score keeper accepts before callers wait.
    pub fn score_queue_depth(&self) -> usize {
        self.score_queue_depth
    }

    /// Outbound frames buffered per connection.
    pub fn outbound_queue_depth(&self) -> usize {
        self.outbound_queue_depth
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            match_timing: MatchTiming::default(),
            notifier_capacity: DEFAULT_NOTIFIER_CAPACITY,
            score_queue_depth: DEFAULT_SCORE_QUEUE_DEPTH,
            outbound_queue_depth: DEFAULT_OUTBOUND_QUEUE_DEPTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    match_timing: Option<RawMatchTiming>,
    notifier_capacity: Option<usize>,
    score_queue_depth: Option<usize>,
    outbound_queue_depth: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            match_timing: value
                .match_timing
                .map(Into::into)
                .unwrap_or(defaults.match_timing),
            notifier_capacity: value
                .notifier_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.notifier_capacity),
            score_queue_depth: value
                .score_queue_depth
                .filter(|depth| *depth > 0)
                .unwrap_or(defaults.score_queue_depth),
            outbound_queue_depth: value
                .outbound_queue_depth
                .filter(|depth| *depth > 0)
                .unwrap_or(defaults.outbound_queue_depth),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the match period durations.
struct RawMatchTiming {
    auto_duration_sec: u32,
    pause_duration_sec: u32,
    teleop_duration_sec: u32,
}

impl From<RawMatchTiming> for MatchTiming {
    fn from(value: RawMatchTiming) -> Self {
        Self {
            auto_duration_sec: value.auto_duration_sec,
            pause_duration_sec: value.pause_duration_sec,
            teleop_duration_sec: value.teleop_duration_sec,
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
