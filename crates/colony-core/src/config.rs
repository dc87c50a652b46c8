//! Configuration loading and typed config structures for the colony core.
//!
//! The configuration lives in `colony-config.yaml` in the working directory.
//! Every section and field has a default, so an empty or partial file is
//! valid and a missing file means defaults throughout.

use std::collections::BTreeMap;
use std::path::Path;

use colony_agents::{RoleBook, SchedulerConfig};
use colony_ledger::LedgerThresholds;
use colony_types::RoleKind;
use serde::Deserialize;
use tracing::debug;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level colony configuration, mirroring `colony-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColonyConfig {
    /// Tick loop settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Compute budget gates.
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Ledger thresholds.
    #[serde(default)]
    pub ledger: LedgerThresholds,

    /// Spawn energy and bootstrap settings.
    #[serde(default)]
    pub spawn: SpawnConfig,

    /// Per-role overrides on top of the built-in role table.
    #[serde(default)]
    pub roles: BTreeMap<RoleKind, RoleOverride>,

    /// Worker scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Lab reaction settings.
    #[serde(default)]
    pub labs: LabConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ColonyConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The built-in role table with the `roles` overrides applied.
    pub fn role_book(&self) -> RoleBook {
        let mut book = RoleBook::standard();
        for (role, over) in &self.roles {
            if !over.enabled {
                debug!(%role, "Role disabled by configuration");
                book.disable(*role);
                continue;
            }
            if let Some(quota) = over.quota
                && let Some(config) = book.get_mut(*role)
            {
                config.quota = quota;
            }
        }
        book
    }
}

/// Tick loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Stop after this many ticks (0 = run until interrupted).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seed for the lab cluster shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Persist offer and request counts in each room record.
    #[serde(default = "default_true")]
    pub record_ledger_summary: bool,

    /// Ticks between status log lines in the driver (0 = never).
    #[serde(default = "default_status_interval")]
    pub status_interval: u64,

    /// Ticks between sweeps of dead worker records. The first tick of the
    /// process always sweeps.
    #[serde(default = "default_gc_interval")]
    pub gc_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            tick_interval_ms: default_tick_interval_ms(),
            seed: default_seed(),
            record_ledger_summary: true,
            status_interval: default_status_interval(),
            gc_interval: default_gc_interval(),
        }
    }
}

/// Compute budget gates for expensive per-room analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BudgetConfig {
    /// Structural classification is skipped below this bucket level.
    #[serde(default = "default_classification_min_cpu")]
    pub classification_min_cpu: u32,

    /// Ticks between classification refreshes.
    #[serde(default = "default_classification_interval")]
    pub classification_interval: u64,

    /// Radius of the protected zone around the controller.
    #[serde(default = "default_protected_range")]
    pub protected_range: u8,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            classification_min_cpu: default_classification_min_cpu(),
            classification_interval: default_classification_interval(),
            protected_range: default_protected_range(),
        }
    }
}

/// Spawn energy accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SpawnConfig {
    /// Energy budget before extensions.
    #[serde(default = "default_base_energy")]
    pub base_energy: u32,

    /// Energy each built extension adds to the budget.
    #[serde(default = "default_energy_per_extension")]
    pub energy_per_extension: u32,

    /// Shrink harvester bodies to the energy on hand when none are alive.
    #[serde(default = "default_true")]
    pub emergency_bootstrap: bool,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_energy: default_base_energy(),
            energy_per_extension: default_energy_per_extension(),
            emergency_bootstrap: true,
        }
    }
}

/// Override of one role's built-in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RoleOverride {
    /// Whether the role exists at all (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Live workers wanted per room.
    #[serde(default)]
    pub quota: Option<u32>,
}

/// Lab reaction configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LabConfig {
    /// Whether labs are planned and run at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum distance between any two labs of one cluster.
    #[serde(default = "default_cluster_range")]
    pub cluster_range: u8,

    /// Stock of each reagent needed in storage or terminal before a
    /// reaction is assigned.
    #[serde(default = "default_reagent_min")]
    pub reagent_min: u32,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cluster_range: default_cluster_range(),
            reagent_min: default_reagent_min(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_max_ticks() -> u64 {
    1_500
}

const fn default_tick_interval_ms() -> u64 {
    0
}

const fn default_seed() -> u64 {
    42
}

const fn default_status_interval() -> u64 {
    100
}

const fn default_gc_interval() -> u64 {
    1
}

const fn default_classification_min_cpu() -> u32 {
    5_000
}

const fn default_classification_interval() -> u64 {
    100
}

const fn default_protected_range() -> u8 {
    3
}

const fn default_base_energy() -> u32 {
    300
}

const fn default_energy_per_extension() -> u32 {
    50
}

const fn default_cluster_range() -> u8 {
    2
}

const fn default_reagent_min() -> u32 {
    1_000
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ColonyConfig::default();
        assert_eq!(config.engine.seed, 42);
        assert_eq!(config.spawn.base_energy, 300);
        assert_eq!(config.labs.cluster_range, 2);
        assert_eq!(config.budget.classification_interval, 100);
        assert!(config.scheduler.enforce_max_ticks);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
engine:
  max_ticks: 20
  tick_interval_ms: 250
  seed: 7
  record_ledger_summary: false
  status_interval: 25
  gc_interval: 20

budget:
  classification_min_cpu: 1000
  classification_interval: 50
  protected_range: 4

ledger:
  tombstone_min: 200
  storage_energy_low: 20000

spawn:
  base_energy: 250
  emergency_bootstrap: false

roles:
  scout:
    enabled: false
  upgrader:
    quota: 4

scheduler:
  enforce_max_ticks: false

labs:
  cluster_range: 3

logging:
  level: debug
";
        let config = ColonyConfig::parse(yaml).unwrap();
        assert_eq!(config.engine.max_ticks, 20);
        assert!(!config.engine.record_ledger_summary);
        assert_eq!(config.engine.status_interval, 25);
        assert_eq!(config.engine.gc_interval, 20);
        assert_eq!(config.budget.protected_range, 4);
        assert_eq!(config.ledger.tombstone_min, 200);
        assert_eq!(config.ledger.dropped_min, 100);
        assert_eq!(config.spawn.base_energy, 250);
        assert_eq!(config.spawn.energy_per_extension, 50);
        assert!(!config.spawn.emergency_bootstrap);
        assert!(!config.scheduler.enforce_max_ticks);
        assert_eq!(config.labs.cluster_range, 3);
        assert_eq!(config.labs.reagent_min, 1_000);
        assert_eq!(config.logging.level, "debug");

        let book = config.role_book();
        assert!(book.get(RoleKind::Scout).is_none());
        assert_eq!(book.get(RoleKind::Upgrader).unwrap().quota, 4);
        assert_eq!(book.get(RoleKind::Harvester).unwrap().quota, 2);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = ColonyConfig::parse("").unwrap();
        assert_eq!(config, ColonyConfig::default());
        assert_eq!(config.role_book(), RoleBook::standard());
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(ColonyConfig::parse("roles:\n  miner:\n    quota: 1\n").is_err());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("colony-config.yaml");
        if path.exists() {
            let config = ColonyConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
