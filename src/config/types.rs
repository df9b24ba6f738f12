use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Timeouts and intervals used by the feature processors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// How long a map scene may load before it is reported as timed out (default: 5000).
    #[serde(default = "default_scene_loading_timeout_ms")]
    pub scene_loading_timeout_ms: u64,
    /// Interval between location updates (default: 5000).
    #[serde(default = "default_location_update_interval_ms")]
    pub location_update_interval_ms: u64,
    /// Upper bound for a single places query (default: 10000).
    #[serde(default = "default_places_loading_timeout_ms")]
    pub places_loading_timeout_ms: u64,
    /// Quiet period before an autocomplete query is sent (default: 500).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Poll interval while waiting for location to become available (default: 1000).
    #[serde(default = "default_location_availability_poll_ms")]
    pub location_availability_poll_ms: u64,
}

/// Search tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries with this many letters or digits or fewer are rejected (default: 3).
    #[serde(default = "default_min_alphanumeric_chars")]
    pub min_alphanumeric_chars: usize,
    /// Radius in meters for places-around queries (default: 5000).
    #[serde(default = "default_places_radius_m")]
    pub places_radius_m: f64,
    /// How many recent searches one page adds (default: 10).
    #[serde(default = "default_recent_searches_page_size")]
    pub recent_searches_page_size: usize,
}

/// Container logging switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log every applied update at debug level.
    #[serde(default)]
    pub log_updates: bool,
    /// Log every published state at trace level.
    #[serde(default)]
    pub log_states: bool,
}

/// Where saved state snapshots live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Snapshot file path (default: `<data dir>/lookaround/saved_state.json`).
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

fn default_scene_loading_timeout_ms() -> u64 {
    5_000
}

fn default_location_update_interval_ms() -> u64 {
    5_000
}

fn default_places_loading_timeout_ms() -> u64 {
    10_000
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_location_availability_poll_ms() -> u64 {
    1_000
}

fn default_min_alphanumeric_chars() -> usize {
    3
}

fn default_places_radius_m() -> f64 {
    5_000.0
}

fn default_recent_searches_page_size() -> usize {
    10
}

fn default_snapshot_path() -> PathBuf {
    let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data_dir.join("lookaround").join("saved_state.json")
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scene_loading_timeout_ms: default_scene_loading_timeout_ms(),
            location_update_interval_ms: default_location_update_interval_ms(),
            places_loading_timeout_ms: default_places_loading_timeout_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            location_availability_poll_ms: default_location_availability_poll_ms(),
        }
    }
}

impl TimingConfig {
    pub fn scene_loading_timeout(&self) -> Duration {
        Duration::from_millis(self.scene_loading_timeout_ms)
    }

    pub fn location_update_interval(&self) -> Duration {
        Duration::from_millis(self.location_update_interval_ms)
    }

    pub fn places_loading_timeout(&self) -> Duration {
        Duration::from_millis(self.places_loading_timeout_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn location_availability_poll(&self) -> Duration {
        Duration::from_millis(self.location_availability_poll_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_alphanumeric_chars: default_min_alphanumeric_chars(),
            places_radius_m: default_places_radius_m(),
            recent_searches_page_size: default_recent_searches_page_size(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}
