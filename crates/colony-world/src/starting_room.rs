//! Default starting room for the headless driver.
//!
//! A freshly claimed level-2 room: one spawn with a full energy store, two
//! extensions, two sources, a mineral deposit, and a handful of planned
//! construction sites. No workers exist yet, so the first spawn goes through
//! the emergency bootstrap path.

use colony_types::{ObjectId, Position, ResourceKind, RoomName, StructureKind};

use crate::error::WorldError;
use crate::room::{ConstructionSite, Controller, Mineral, RoomState, Source, Structure};
use crate::sandbox::Sandbox;

/// Identifiers for the objects in the starting room, returned alongside the
/// sandbox so callers can reference them.
#[derive(Debug, Clone)]
pub struct StartingRoomIds {
    /// The room name.
    pub room: RoomName,
    /// The only spawn.
    pub spawn: ObjectId,
    /// The controller.
    pub controller: ObjectId,
    /// Both sources, nearest the spawn first.
    pub sources: [ObjectId; 2],
}

/// Create the default starting sandbox.
///
/// # Errors
///
/// Returns [`WorldError`] if the room cannot be added (should not happen
/// with the hard-coded layout).
pub fn starting_room() -> Result<(Sandbox, StartingRoomIds), WorldError> {
    let name = RoomName::new("W1N1");
    let mut room = RoomState::new(name.clone());

    let controller = Controller::new(Position::new(25, 38), 2);
    let spawn = Structure::new(StructureKind::Spawn, Position::new(25, 25))
        .holding(ResourceKind::Energy, 300);
    let near = Source::new(Position::new(18, 20), 3_000);
    let far = Source::new(Position::new(36, 14), 3_000);

    let ids = StartingRoomIds {
        room: name,
        spawn: spawn.id,
        controller: controller.id,
        sources: [near.id, far.id],
    };

    room.controller = Some(controller);
    room.structures.push(spawn);
    for x in [23, 27] {
        room.structures
            .push(Structure::new(StructureKind::Extension, Position::new(x, 27)));
    }
    room.sources.extend([near, far]);
    room.minerals.push(Mineral {
        id: ObjectId::new(),
        pos: Position::new(44, 42),
        kind: ResourceKind::Hydrogen,
        amount: 70_000,
    });
    for x in [22, 24, 26] {
        room.construction_sites.push(ConstructionSite::new(
            StructureKind::Extension,
            Position::new(x, 29),
            3_000,
        ));
    }
    room.construction_sites.push(ConstructionSite::new(
        StructureKind::Container,
        Position::new(24, 36),
        5_000,
    ));

    let mut sandbox = Sandbox::new();
    sandbox.add_room(room)?;
    Ok((sandbox, ids))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Simulation;

    #[test]
    fn starting_room_is_level_two_with_full_spawn() {
        let (sandbox, ids) = starting_room().unwrap();
        let room = sandbox.room(&ids.room).unwrap();
        assert_eq!(room.level(), 2);
        assert_eq!(room.energy_available(), 300);
        assert_eq!(room.extension_count(), 2);
        assert_eq!(room.sources.len(), 2);
        assert!(sandbox.creep_names().is_empty());
        assert!(sandbox.object_pos(ids.spawn).is_some());
    }
}
