//! Live worker state as reported by the simulation.

use colony_types::{
    BodyPart, CARRY_CAPACITY_PER_PART, ObjectId, Position, ResourceKind, RoomName, WorkerName,
    count_parts,
};

use crate::store::Store;

/// Ticks a freshly spawned worker lives.
pub const CREEP_LIFE_TIME: u32 = 1_500;

/// A live worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creep {
    /// Unique name, keys the worker's memory record.
    pub name: WorkerName,
    /// Object id, used when the worker itself is a transport target.
    pub id: ObjectId,
    /// Room the worker is in.
    pub room: RoomName,
    /// Tile the worker is on.
    pub pos: Position,
    /// Body parts in spawn order.
    pub body: Vec<BodyPart>,
    /// Carried resources.
    pub store: Store,
    /// Ticks left before the worker dies.
    pub ticks_to_live: u32,
    /// Whether the worker is still being spawned.
    pub spawning: bool,
}

impl Creep {
    /// A worker with an empty store sized from its carry parts.
    pub fn new(name: WorkerName, room: RoomName, pos: Position, body: Vec<BodyPart>) -> Self {
        let capacity = count_parts(&body, BodyPart::Carry).saturating_mul(CARRY_CAPACITY_PER_PART);
        Self {
            name,
            id: ObjectId::new(),
            room,
            pos,
            body,
            store: Store::new(capacity),
            ticks_to_live: CREEP_LIFE_TIME,
            spawning: false,
        }
    }

    /// Number of body parts of one kind.
    pub fn parts(&self, kind: BodyPart) -> u32 {
        count_parts(&self.body, kind)
    }

    /// Total carry capacity.
    pub const fn carry_capacity(&self) -> u32 {
        self.store.capacity()
    }

    /// Energy carried.
    pub fn energy(&self) -> u32 {
        self.store.get(ResourceKind::Energy)
    }

    /// The resource carried in the largest amount.
    pub fn carried(&self) -> Option<(ResourceKind, u32)> {
        self.store.primary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_capacity_follows_carry_parts() {
        let creep = Creep::new(
            WorkerName::new("t"),
            RoomName::new("W1N1"),
            Position::new(1, 1),
            vec![BodyPart::Carry, BodyPart::Carry, BodyPart::Move],
        );
        assert_eq!(creep.carry_capacity(), 100);
        assert_eq!(creep.parts(BodyPart::Work), 0);
        assert_eq!(creep.carried(), None);
    }
}
