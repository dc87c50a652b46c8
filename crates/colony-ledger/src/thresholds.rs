//! Tunable amounts that decide when a node offers or requests.
//!
//! Loaded from the `ledger` section of the configuration file. Every field
//! has a default so a partial section is valid.

use serde::Deserialize;

/// Thresholds used by the ledger scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerThresholds {
    /// Tombstone resources above this amount are offered.
    #[serde(default = "default_tombstone_min")]
    pub tombstone_min: u32,

    /// Dropped piles above this amount are offered.
    #[serde(default = "default_dropped_min")]
    pub dropped_min: u32,

    /// Source and extractor container contents above this amount are offered.
    #[serde(default = "default_container_min")]
    pub container_min: u32,

    /// Controller container energy below this amount is requested.
    #[serde(default = "default_controller_container_fill")]
    pub controller_container_fill: u32,

    /// Tower energy below this amount is requested.
    #[serde(default = "default_tower_fill")]
    pub tower_fill: u32,

    /// Lab energy below this amount is requested.
    #[serde(default = "default_lab_energy_fill")]
    pub lab_energy_fill: u32,

    /// Power spawn energy below this amount is requested.
    #[serde(default = "default_power_spawn_fill")]
    pub power_spawn_fill: u32,

    /// Storage energy low-water mark.
    #[serde(default = "default_storage_energy_low")]
    pub storage_energy_low: u32,

    /// Storage energy high-water mark.
    #[serde(default = "default_storage_energy_high")]
    pub storage_energy_high: u32,

    /// Storage minerals at or above this amount are offered at the higher tier.
    #[serde(default = "default_mineral_threshold")]
    pub storage_mineral_threshold: u32,

    /// Terminal energy low-water mark.
    #[serde(default = "default_terminal_energy_low")]
    pub terminal_energy_low: u32,

    /// Terminal energy high-water mark.
    #[serde(default = "default_terminal_energy_high")]
    pub terminal_energy_high: u32,

    /// Terminal minerals at or above this amount are offered at the higher tier.
    #[serde(default = "default_mineral_threshold")]
    pub terminal_mineral_threshold: u32,
}

const fn default_tombstone_min() -> u32 {
    100
}

const fn default_dropped_min() -> u32 {
    100
}

const fn default_container_min() -> u32 {
    600
}

const fn default_controller_container_fill() -> u32 {
    1_500
}

const fn default_tower_fill() -> u32 {
    800
}

const fn default_lab_energy_fill() -> u32 {
    1_000
}

const fn default_power_spawn_fill() -> u32 {
    1_000
}

const fn default_storage_energy_low() -> u32 {
    10_000
}

const fn default_storage_energy_high() -> u32 {
    50_000
}

const fn default_mineral_threshold() -> u32 {
    5_000
}

const fn default_terminal_energy_low() -> u32 {
    5_000
}

const fn default_terminal_energy_high() -> u32 {
    20_000
}

impl Default for LedgerThresholds {
    fn default() -> Self {
        Self {
            tombstone_min: default_tombstone_min(),
            dropped_min: default_dropped_min(),
            container_min: default_container_min(),
            controller_container_fill: default_controller_container_fill(),
            tower_fill: default_tower_fill(),
            lab_energy_fill: default_lab_energy_fill(),
            power_spawn_fill: default_power_spawn_fill(),
            storage_energy_low: default_storage_energy_low(),
            storage_energy_high: default_storage_energy_high(),
            storage_mineral_threshold: default_mineral_threshold(),
            terminal_energy_low: default_terminal_energy_low(),
            terminal_energy_high: default_terminal_energy_high(),
            terminal_mineral_threshold: default_mineral_threshold(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let t: LedgerThresholds = serde_json::from_str(r#"{"tombstone_min": 250}"#).unwrap();
        assert_eq!(t.tombstone_min, 250);
        assert_eq!(t.container_min, 600);
        assert_eq!(t.storage_energy_low, 10_000);
    }
}
