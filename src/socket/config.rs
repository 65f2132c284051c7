//! Connection race configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default stagger between successive attempts, per RFC 8305's
/// "Connection Attempt Delay" recommendation range.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Timing knobs of a connection race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Stagger between launching attempts; also the per-iteration poll wait.
    pub delay: Duration,
    /// Wall-clock budget for the whole race. `None` or zero is unbounded.
    pub timeout: Option<Duration>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self { delay: DEFAULT_DELAY, timeout: None }
    }
}

impl RaceConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stagger delay.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the overall timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the overall timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// The effective budget, with zero normalized to unbounded.
    pub fn budget(&self) -> Option<Duration> {
        self.timeout.filter(|t| !t.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RaceConfig::default();
        assert_eq!(config.delay, Duration::from_millis(300));
        assert_eq!(config.timeout, None);
        assert_eq!(config.budget(), None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RaceConfig::new()
            .delay(Duration::from_millis(50))
            .timeout(Duration::from_secs(5));

        assert_eq!(config.delay, Duration::from_millis(50));
        assert_eq!(config.budget(), Some(Duration::from_secs(5)));
        assert_eq!(config.no_timeout().budget(), None);
    }

    #[test]
    fn test_zero_timeout_is_unbounded() {
        let config = RaceConfig::new().timeout(Duration::ZERO);
        assert_eq!(config.timeout, Some(Duration::ZERO));
        assert_eq!(config.budget(), None);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RaceConfig =
            serde_json::from_str(r#"{"timeout": {"secs": 2, "nanos": 0}}"#).unwrap();
        assert_eq!(config.delay, DEFAULT_DELAY);
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = RaceConfig::new().delay(Duration::from_millis(250));
        let json = serde_json::to_string(&config).unwrap();
        let back: RaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
