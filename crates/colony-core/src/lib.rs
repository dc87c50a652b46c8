//! Spawning, lab planning, memory lifecycle, and the tick cycle for the
//! colony control core.
//!
//! This crate ties the worker layer to a simulation: it loads persistent
//! memory, runs every owned room, and writes memory back, once per tick.
//!
//! # Modules
//!
//! - [`budget`] -- Compute budget backpressure for room classification.
//! - [`config`] -- Configuration loading from `colony-config.yaml` into
//!   strongly-typed structs.
//! - [`labs`] -- The [`LabReactionPlanner`].
//! - [`memory`] -- Decode, garbage collection, and encode of persistent
//!   memory.
//! - [`room`] -- The per-room [`RoomController`].
//! - [`runner`] -- The bounded async tick loop ([`run_colony`]).
//! - [`spawn`] -- Body selection and the [`SpawnPlanner`].
//! - [`tick`] -- The single-tick entry point ([`run_tick`]).

pub mod budget;
pub mod config;
pub mod labs;
pub mod memory;
pub mod room;
pub mod runner;
pub mod spawn;
pub mod tick;

// Re-export primary types at crate root for convenience.
pub use config::{ColonyConfig, ConfigError};
pub use labs::LabReactionPlanner;
pub use room::{RoomController, RoomReport};
pub use runner::{
    ColonyEndReason, ColonyResult, NoOpCallback, RunnerError, TickCallback, TickSource,
    log_colony_end, run_colony,
};
pub use spawn::{SpawnPlanner, SpawnSite, select_body, shrink_to_fit};
pub use tick::{Colony, TickError, TickSummary, run_tick};
