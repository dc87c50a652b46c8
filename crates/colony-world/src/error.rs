//! Error types for the `colony-world` crate.
//!
//! Effect calls report failure through [`ActionCode`] values, never through
//! these errors. [`WorldError`] covers setting up and editing a world.
//!
//! [`ActionCode`]: colony_types::ActionCode

use colony_types::{RoomName, WorkerName};

/// Errors that can occur while constructing or editing a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A room was not found.
    #[error("room not found: {0}")]
    RoomNotFound(RoomName),

    /// A room with the same name already exists.
    #[error("duplicate room: {0}")]
    DuplicateRoom(RoomName),

    /// A worker with the same name already exists.
    #[error("duplicate worker: {0}")]
    DuplicateWorker(WorkerName),
}
