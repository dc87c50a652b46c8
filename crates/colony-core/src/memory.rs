//! The persistent memory lifecycle.
//!
//! Raw memory is decoded once at tick start and encoded once at tick end.
//! Undecodable or too-new memory is logged and replaced by an empty
//! document rather than stopping the colony. Worker records whose worker
//! no longer exists are garbage-collected when the process starts.

use chrono::{DateTime, Utc};
use colony_types::{MemoryDocument, MemoryError, RoomName};
use colony_world::Simulation;
use tracing::{debug, info, warn};

/// Decode the simulation's raw memory, falling back to an empty document.
pub fn load(sim: &dyn Simulation) -> MemoryDocument {
    match MemoryDocument::decode(sim.raw_memory()) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "Discarding unreadable memory");
            MemoryDocument::default()
        }
    }
}

/// Stamp and encode `doc` into the simulation's raw memory.
///
/// # Errors
///
/// Returns [`MemoryError::Encode`] if the document cannot be serialized;
/// the raw memory is left untouched in that case.
pub fn save(
    sim: &mut dyn Simulation,
    doc: &mut MemoryDocument,
    now: DateTime<Utc>,
) -> Result<(), MemoryError> {
    doc.saved_at = Some(now);
    let raw = doc.encode()?;
    debug!(bytes = raw.len(), workers = doc.workers.len(), "Memory saved");
    sim.set_raw_memory(raw);
    Ok(())
}

/// Remove worker records with no live worker and room records for rooms
/// that are no longer owned. Returns the number of worker records removed.
pub fn collect_garbage(sim: &dyn Simulation, doc: &mut MemoryDocument) -> usize {
    let before = doc.workers.len();
    doc.workers.retain(|name, record| {
        let alive = sim.creep(name).is_some();
        if !alive {
            info!(
                worker = %name,
                role = %record.role,
                born = record.born,
                "Forgetting dead worker"
            );
        }
        alive
    });

    let owned: Vec<RoomName> = sim.room_names();
    doc.rooms.retain(|name, _| {
        let keep = owned.contains(name);
        if !keep {
            debug!(room = %name, "Forgetting room record");
        }
        keep
    });

    before.saturating_sub(doc.workers.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{Position, RoleKind, WorkerName, WorkerRecord};
    use colony_world::{Creep, RoomState, Sandbox};

    use super::*;

    fn sandbox() -> Sandbox {
        let mut sandbox = Sandbox::new();
        sandbox.add_room(RoomState::new(RoomName::new("W1N1"))).unwrap();
        sandbox
            .add_creep(Creep::new(
                WorkerName::new("harvester_1"),
                RoomName::new("W1N1"),
                Position::new(10, 10),
                vec![colony_types::BodyPart::Move],
            ))
            .unwrap();
        sandbox
    }

    #[test]
    fn unreadable_memory_starts_fresh() {
        let mut sandbox = sandbox();
        sandbox.set_raw_memory(String::from("{broken"));
        assert_eq!(load(&sandbox), MemoryDocument::default());
    }

    #[test]
    fn dead_workers_and_lost_rooms_are_collected() {
        let sandbox = sandbox();
        let mut doc = MemoryDocument::default();
        for name in ["harvester_1", "harvester_2"] {
            doc.workers.insert(
                WorkerName::new(name),
                WorkerRecord::spawned(RoleKind::Harvester, 0, 300),
            );
        }
        doc.room_mut(&RoomName::new("W1N1"));
        doc.room_mut(&RoomName::new("W9N9"));

        assert_eq!(collect_garbage(&sandbox, &mut doc), 1);
        assert!(doc.workers.contains_key(&WorkerName::new("harvester_1")));
        assert!(!doc.workers.contains_key(&WorkerName::new("harvester_2")));
        assert_eq!(doc.rooms.len(), 1);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut sandbox = sandbox();
        let mut doc = MemoryDocument::default();
        doc.workers.insert(
            WorkerName::new("harvester_1"),
            WorkerRecord::spawned(RoleKind::Harvester, 3, 300),
        );
        let now = Utc::now();
        save(&mut sandbox, &mut doc, now).unwrap();
        let loaded = load(&sandbox);
        assert_eq!(loaded.saved_at, Some(now));
        assert_eq!(loaded.workers, doc.workers);
    }
}
