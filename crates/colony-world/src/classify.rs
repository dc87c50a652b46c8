//! Structural classification of a room.
//!
//! Links and containers play different roles depending on where they sit:
//! a link next to a source pushes energy away, any other link receives it;
//! a container next to a source or the mineral holds harvested output, a
//! container next to the controller feeds upgraders. The classification is
//! comparatively expensive, so the core runs it only when the compute
//! budget allows and caches the result in the room record.

use colony_types::{Position, RoomClassification, StructureKind};
use tracing::debug;

use crate::room::RoomState;

/// Range within which a link or container counts as belonging to a source
/// or mineral.
pub const SOURCE_RANGE: u8 = 2;

/// Range within which a container counts as the controller container.
pub const CONTROLLER_CONTAINER_RANGE: u8 = 3;

/// Classify the room's links and containers at tick `tick`.
///
/// `protected_range` sets the radius of the zone around the controller
/// whose links and dropped resources are never offered.
pub fn classify_room(room: &RoomState, tick: u64, protected_range: u8) -> RoomClassification {
    let harvest_points: Vec<Position> = room
        .sources
        .iter()
        .map(|s| s.pos)
        .chain(room.minerals.iter().map(|m| m.pos))
        .collect();
    let near_harvest_point = |pos: Position| {
        harvest_points
            .iter()
            .any(|point| point.in_range_to(pos, SOURCE_RANGE))
    };
    let controller_pos = room.controller.as_ref().map(|c| c.pos);

    let mut classification = RoomClassification {
        classified_at: tick,
        protected_center: controller_pos,
        protected_range,
        ..RoomClassification::default()
    };

    for link in room.structures_of(StructureKind::Link) {
        let near_source = room
            .sources
            .iter()
            .any(|s| s.pos.in_range_to(link.pos, SOURCE_RANGE));
        if near_source {
            classification.sender_links.insert(link.id);
        } else {
            classification.receiver_links.insert(link.id);
        }
    }

    for container in room.structures_of(StructureKind::Container) {
        if near_harvest_point(container.pos) {
            classification.source_containers.insert(container.id);
        } else if classification.controller_container.is_none()
            && controller_pos.is_some_and(|c| c.in_range_to(container.pos, CONTROLLER_CONTAINER_RANGE))
        {
            classification.controller_container = Some(container.id);
        }
    }

    debug!(
        room = %room.name,
        tick,
        receivers = classification.receiver_links.len(),
        senders = classification.sender_links.len(),
        source_containers = classification.source_containers.len(),
        controller_container = classification.controller_container.is_some(),
        "Room classified"
    );

    classification
}

#[cfg(test)]
mod tests {
    use colony_types::RoomName;

    use super::*;
    use crate::room::{Controller, Source, Structure};

    #[test]
    fn links_and_containers_are_classified_by_location() {
        let mut room = RoomState::new(RoomName::new("W1N1"));
        room.controller = Some(Controller::new(Position::new(40, 40), 3));
        room.sources.push(Source::new(Position::new(5, 5), 3000));

        let sender = Structure::new(StructureKind::Link, Position::new(6, 6));
        let receiver = Structure::new(StructureKind::Link, Position::new(25, 25));
        let source_box = Structure::new(StructureKind::Container, Position::new(4, 5));
        let controller_box = Structure::new(StructureKind::Container, Position::new(38, 41));
        let stray_box = Structure::new(StructureKind::Container, Position::new(20, 30));
        let ids = (sender.id, receiver.id, source_box.id, controller_box.id, stray_box.id);
        room.structures
            .extend([sender, receiver, source_box, controller_box, stray_box]);

        let c = classify_room(&room, 7, 3);
        assert_eq!(c.classified_at, 7);
        assert!(c.sender_links.contains(&ids.0));
        assert!(c.receiver_links.contains(&ids.1));
        assert!(c.source_containers.contains(&ids.2));
        assert_eq!(c.controller_container, Some(ids.3));
        assert!(!c.source_containers.contains(&ids.4));
        assert_eq!(c.protected_center, Some(Position::new(40, 40)));
    }
}
