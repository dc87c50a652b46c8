//! Headless driver for the colony control core.
//!
//! Wires the tick cycle to an in-memory sandbox world. It loads
//! configuration, builds the starting room, and runs the tick loop until
//! the tick limit is reached, every room is lost, or Ctrl-C is pressed.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `colony-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the starting sandbox room
//! 4. Run the colony loop
//! 5. Log the result

mod error;
mod status;

use std::path::Path;

use colony_core::{Colony, ColonyConfig, runner};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::status::StatusReporter;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "colony-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the colony run fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging depends on it, so it comes first.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("colony-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        max_ticks = config.engine.max_ticks,
        tick_interval_ms = config.engine.tick_interval_ms,
        seed = config.engine.seed,
        roles_overridden = config.roles.len(),
        labs = config.labs.enabled,
        "Configuration loaded"
    );

    // 3. Create the starting room.
    let (mut world, ids) = colony_world::starting_room().map_err(EngineError::from)?;
    info!(
        room = %ids.room,
        spawn = %ids.spawn,
        sources = ids.sources.len(),
        "Starting room created"
    );

    // 4. Run the colony.
    let bounds = config.engine.clone();
    let mut callback = StatusReporter::new(bounds.status_interval);
    let mut colony = Colony::new(config);

    let result = tokio::select! {
        result = runner::run_colony(&mut colony, &mut world, &bounds, &mut callback) => {
            result.map_err(EngineError::from)?
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Interrupted, shutting down");
            return Ok(());
        }
    };

    // 5. Log results.
    runner::log_colony_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        status_lines = callback.reports(),
        "colony-engine shutdown complete"
    );

    Ok(())
}

/// Load the colony configuration from `colony-config.yaml`.
///
/// Looks for the file relative to the current working directory. Returns
/// the configuration and whether it came from the file.
fn load_config() -> Result<(ColonyConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((ColonyConfig::from_file(config_path)?, true))
    } else {
        Ok((ColonyConfig::default(), false))
    }
}
