//! Configurable parameters for the worker scheduler.
//!
//! These values correspond to the `scheduler` key of `colony-config.yaml`.

use serde::Deserialize;

/// Scheduler tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SchedulerConfig {
    /// Abandon behaviors that outlive their own tick bound (default: true).
    #[serde(default = "default_enforce_max_ticks")]
    pub enforce_max_ticks: bool,
}

const fn default_enforce_max_ticks() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enforce_max_ticks: default_enforce_max_ticks(),
        }
    }
}
