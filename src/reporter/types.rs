use serde::{Deserialize, Serialize};

/// Accuracy/power tradeoff requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    HighAccuracy,
    BalancedPower,
    LowPower,
    Passive,
}

/// Immutable configuration for one reporting session.
///
/// `fastest_interval_ms` is deliberately not validated against
/// `interval_ms`; a config where it is larger still starts a session (the
/// reporter logs a warning).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Desired update interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Minimum acceptable delivery interval if updates arrive faster.
    #[serde(default = "default_fastest_interval_ms")]
    pub fastest_interval_ms: u64,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    /// Optional ceiling on how long the provider may batch updates.
    #[serde(default)]
    pub max_wait_ms: Option<u64>,
}

fn default_interval_ms() -> u64 {
    10_000
}

fn default_fastest_interval_ms() -> u64 {
    5_000
}

fn default_priority() -> Priority {
    Priority::HighAccuracy
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            fastest_interval_ms: default_fastest_interval_ms(),
            priority: default_priority(),
            max_wait_ms: None,
        }
    }
}
