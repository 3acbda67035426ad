use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::automation::fingerprint::DEFAULT_BUCKETS;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    /// JSON fixture the sidecar serves instead of a live accessibility service
    pub fixture_path: Option<PathBuf>,
    pub engine: EngineConfig,
}

/// Tunables of the snapshot and action engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub max_text_len: usize,
    pub fingerprint_buckets: usize,
    /// How long an action waits for the dispatcher before reporting busy
    pub action_wait: Duration,
    /// How long the platform gets to complete one action
    pub action_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8765),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            fixture_path: env::var("UITREE_FIXTURE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            engine: EngineConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8765,
            host: "127.0.0.1".to_string(),
            fixture_path: None,
            engine: EngineConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset, unparsable or zero values keep their defaults
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        Self {
            max_text_len: positive("UITREE_MAX_TEXT_LEN")
                .map(|v| v as usize)
                .unwrap_or(defaults.max_text_len),
            fingerprint_buckets: positive("UITREE_FINGERPRINT_BUCKETS")
                .map(|v| v as usize)
                .unwrap_or(defaults.fingerprint_buckets),
            action_wait: positive("UITREE_ACTION_WAIT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.action_wait),
            action_timeout: positive("UITREE_ACTION_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.action_timeout),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_text_len: 100,
            fingerprint_buckets: DEFAULT_BUCKETS,
            action_wait: Duration::from_millis(5_000),
            action_timeout: Duration::from_millis(10_000),
        }
    }
}
