//! Interfaces to the external simulation and layout planner.
//!
//! The control core reads the world and issues effects exclusively through
//! [`Simulation`]. Every effect call returns immediately with an
//! [`ActionCode`]; nothing is pending or asynchronous. Effects take the
//! acting worker by name and the target by [`ObjectId`].

use colony_types::{
    ActionCode, BodyPart, ObjectId, Position, ResourceKind, RoomName, WorkerName,
};

use crate::creep::Creep;
use crate::room::RoomState;

/// The external simulation API.
pub trait Simulation {
    /// Current tick.
    fn time(&self) -> u64;

    /// Remaining compute budget signal.
    fn cpu_bucket(&self) -> u32;

    /// Names of owned rooms, in stable order.
    fn room_names(&self) -> Vec<RoomName>;

    /// Live state of an owned room.
    fn room(&self, name: &RoomName) -> Option<&RoomState>;

    /// Names of all live workers, in stable order.
    fn creep_names(&self) -> Vec<WorkerName>;

    /// Live state of a worker.
    fn creep(&self, name: &WorkerName) -> Option<&Creep>;

    /// Position of any resolvable object (including workers).
    fn object_pos(&self, id: ObjectId) -> Option<Position>;

    /// Amount of `resource` the object holds, if it has a store.
    fn stored(&self, id: ObjectId, resource: ResourceKind) -> Option<u32>;

    /// Free room in the object's store, if it has one.
    fn free_capacity(&self, id: ObjectId) -> Option<u32>;

    /// The raw persistent memory string.
    fn raw_memory(&self) -> &str;

    /// Replace the raw persistent memory string.
    fn set_raw_memory(&mut self, raw: String);

    /// Harvest energy from a source.
    fn harvest(&mut self, worker: &WorkerName, source: ObjectId) -> ActionCode;

    /// Withdraw from a structure or tombstone. `None` takes as much as fits.
    fn withdraw(
        &mut self,
        worker: &WorkerName,
        target: ObjectId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionCode;

    /// Pick up a dropped resource pile.
    fn pickup(&mut self, worker: &WorkerName, target: ObjectId) -> ActionCode;

    /// Transfer to a structure or another worker. `None` moves as much as fits.
    fn transfer(
        &mut self,
        worker: &WorkerName,
        target: ObjectId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionCode;

    /// Spend energy on the room controller.
    fn upgrade_controller(&mut self, worker: &WorkerName, controller: ObjectId) -> ActionCode;

    /// Spend energy on a construction site.
    fn build(&mut self, worker: &WorkerName, site: ObjectId) -> ActionCode;

    /// Spend energy repairing a structure.
    fn repair(&mut self, worker: &WorkerName, structure: ObjectId) -> ActionCode;

    /// Attack a hostile creep.
    fn attack(&mut self, worker: &WorkerName, hostile: ObjectId) -> ActionCode;

    /// Move one step toward a position. Path finding is opaque.
    fn move_to(&mut self, worker: &WorkerName, pos: Position) -> ActionCode;

    /// Start spawning a worker with the given body and name.
    fn spawn_creep(&mut self, spawn: ObjectId, body: &[BodyPart], name: &WorkerName)
    -> ActionCode;

    /// Run a reaction into `output` from two input labs.
    fn run_reaction(&mut self, output: ObjectId, input_a: ObjectId, input_b: ObjectId)
    -> ActionCode;
}

/// The layout planner collaborator.
pub trait LayoutPlanner {
    /// Whether a construction site exists within `range` of `pos`.
    fn has_construction_site_near(&self, room: &RoomName, pos: Position, range: u8) -> bool;
}
