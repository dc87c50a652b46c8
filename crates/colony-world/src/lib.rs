//! Room model and simulation interfaces for the colony control core.
//!
//! This crate models what the control core can see and touch: rooms with
//! their structures and ground objects, live workers, and the two external
//! collaborators the core talks to.
//!
//! # Modules
//!
//! - [`store`] -- Resource stores with a shared capacity.
//! - [`room`] -- [`RoomState`] and the objects it contains.
//! - [`creep`] -- Live worker state.
//! - [`simulation`] -- The [`Simulation`] and [`LayoutPlanner`] traits.
//! - [`classify`] -- Structural classification of links and containers.
//! - [`sandbox`] -- [`Sandbox`], an in-memory implementation of both traits.
//! - [`starting_room`] -- Default starting room for the driver.
//! - [`error`] -- Error types for world construction.

pub mod classify;
pub mod creep;
pub mod error;
pub mod room;
pub mod sandbox;
pub mod simulation;
pub mod starting_room;
pub mod store;

// Re-export primary types at crate root.
pub use classify::classify_room;
pub use creep::Creep;
pub use error::WorldError;
pub use room::{
    ConstructionSite, Controller, DroppedResource, Hostile, Mineral, RoomState, Source,
    Structure, Tombstone,
};
pub use sandbox::{Sandbox, SpawnCall};
pub use simulation::{LayoutPlanner, Simulation};
pub use starting_room::{StartingRoomIds, starting_room};
pub use store::Store;
