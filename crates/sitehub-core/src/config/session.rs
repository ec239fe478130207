//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session validity window in days. Tokens and their persisted rows
    /// share this expiry.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
    /// Interval for the expired-session sweep in minutes.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            sweep_interval_minutes: default_sweep_interval(),
        }
    }
}

fn default_ttl_days() -> u64 {
    7
}

fn default_sweep_interval() -> u64 {
    15
}
