//! Shared type definitions for the colony control core.
//!
//! This crate is the single source of truth for the identifiers, enums, and
//! persistent memory records used across the colony workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe object ids and worker/room names
//! - [`enums`] -- Resources, body parts, structures, action codes, roles, behaviors
//! - [`position`] -- Room-local grid positions and ranges
//! - [`records`] -- Versioned memory records and the encode/decode boundary

pub mod enums;
pub mod ids;
pub mod position;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ActionCode, BehaviorKind, BodyPart, CARRY_CAPACITY_PER_PART, LabRole, LabStatus, REACTIONS,
    ResourceKind, RoleKind, StructureKind, body_cost, count_parts, reaction_product,
};
pub use ids::{ObjectId, RoomName, WorkerName};
pub use position::{Position, ROOM_SIZE};
pub use records::{
    LabRecord, LedgerSummary, MEMORY_VERSION, MemoryDocument, MemoryError, RoomClassification,
    RoomRecord, WorkerRecord,
};
