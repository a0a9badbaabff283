//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retransmission interval shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// The same interval before every attempt.
    Fixed,
    /// The interval doubles after each attempt.
    Exponential,
}

/// RADIUS client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Total send attempts per request, first transmission included.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Base interval between attempts in milliseconds.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Interval growth across attempts.
    #[serde(default = "default_backoff")]
    pub backoff: Backoff,

    /// Suppression window after the failure threshold is reached.
    #[serde(default = "default_blacklist_ttl_ms")]
    pub blacklist_ttl_ms: u64,

    /// Consecutive failures to an endpoint that open the circuit breaker.
    #[serde(default = "default_fail_count_threshold")]
    pub fail_count_threshold: u32,
}

fn default_retries() -> u32 {
    3
}

fn default_retry_interval_ms() -> u64 {
    3000
}

fn default_backoff() -> Backoff {
    Backoff::Fixed
}

fn default_blacklist_ttl_ms() -> u64 {
    60_000
}

fn default_fail_count_threshold() -> u32 {
    3
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            retries: default_retries(),
            retry_interval_ms: default_retry_interval_ms(),
            backoff: default_backoff(),
            blacklist_ttl_ms: default_blacklist_ttl_ms(),
            fail_count_threshold: default_fail_count_threshold(),
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn blacklist_ttl(&self) -> Duration {
        Duration::from_millis(self.blacklist_ttl_ms)
    }

    /// Interval to wait after the given attempt (0-based).
    pub fn interval_for(&self, attempt: u32) -> Duration {
        let base = Duration::from_millis(self.retry_interval_ms);
        match self.backoff {
            Backoff::Fixed => base,
            Backoff::Exponential => base.saturating_mul(1u32 << attempt.min(16)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.retries, 3);
        assert_eq!(config.retry_interval_ms, 3000);
        assert_eq!(config.backoff, Backoff::Fixed);
        assert_eq!(config.blacklist_ttl_ms, 60_000);
        assert_eq!(config.fail_count_threshold, 3);
    }

    #[test]
    fn test_interval_shapes() {
        let mut config = ClientConfig {
            retry_interval_ms: 100,
            ..ClientConfig::default()
        };

        assert_eq!(config.interval_for(0), Duration::from_millis(100));
        assert_eq!(config.interval_for(5), Duration::from_millis(100));

        config.backoff = Backoff::Exponential;
        assert_eq!(config.interval_for(0), Duration::from_millis(100));
        assert_eq!(config.interval_for(1), Duration::from_millis(200));
        assert_eq!(config.interval_for(3), Duration::from_millis(800));
    }

    #[test]
    fn test_from_json_with_partial_fields() {
        let config = ClientConfig::from_json(r#"{"retries": 5, "backoff": "exponential"}"#).unwrap();
        assert_eq!(config.retries, 5);
        assert_eq!(config.backoff, Backoff::Exponential);
        assert_eq!(config.retry_interval_ms, 3000);
    }
}
