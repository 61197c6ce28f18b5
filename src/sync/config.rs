use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_MINIMUM_REFRESH_INTERVAL_MS: u64 = 5_000;
const DEFAULT_POST_MUTATION_REFRESH_DELAY_MS: u64 = 2_000;

/// Configuration for a `CampaignSyncStore`.
///
/// Durations are stored in milliseconds so the config reads naturally as JSON:
///
/// ```json
/// { "minimum_refresh_interval_ms": 5000, "remote_timeout_ms": 10000 }
/// ```
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Minimum time between two non-forced refreshes.
    pub minimum_refresh_interval_ms: u64,
    /// Upper bound for a single remote call. `None` waits indefinitely.
    pub remote_timeout_ms: Option<u64>,
    /// How long to wait after a successful mutation before the follow-up
    /// refresh, giving the service time to make the change visible.
    pub post_mutation_refresh_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            minimum_refresh_interval_ms: DEFAULT_MINIMUM_REFRESH_INTERVAL_MS,
            remote_timeout_ms: None,
            post_mutation_refresh_delay_ms: DEFAULT_POST_MUTATION_REFRESH_DELAY_MS,
        }
    }
}

impl SyncConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_minimum_refresh_interval(mut self, interval: Duration) -> Self {
        self.minimum_refresh_interval_ms = duration_ms(interval);
        self
    }

    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout_ms = Some(duration_ms(timeout));
        self
    }

    pub fn with_post_mutation_refresh_delay(mut self, delay: Duration) -> Self {
        self.post_mutation_refresh_delay_ms = duration_ms(delay);
        self
    }

    pub fn minimum_refresh_interval(&self) -> Duration {
        Duration::from_millis(self.minimum_refresh_interval_ms)
    }

    pub fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout_ms.map(Duration::from_millis)
    }

    pub fn post_mutation_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.post_mutation_refresh_delay_ms)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Error loading a `SyncConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "invalid sync config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
