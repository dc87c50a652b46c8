//! Per-tick context handed to every behavior.
//!
//! A [`RoomCache`] is built once per room at tick start and is read-only
//! afterwards. The only state that changes while workers run is the
//! [`TargetClaims`] view and the worker's own [`WorkerRecord`], both passed
//! mutably.

use std::collections::BTreeMap;

use colony_ledger::{
    Asker, LedgerThresholds, MatchingEngine, ResourceLedger, RoomWorker, TargetClaims,
};
use colony_types::{
    BehaviorKind, ObjectId, Position, ROOM_SIZE, ResourceKind, RoomName, RoomRecord,
    StructureKind, WorkerName, WorkerRecord,
};
use colony_world::{Creep, LayoutPlanner, RoomState, Simulation};

// ---------------------------------------------------------------------------
// RoomCache
// ---------------------------------------------------------------------------

/// Everything derived from one room at tick start.
#[derive(Debug)]
pub struct RoomCache {
    tick: u64,
    ledger: ResourceLedger,
    idle_spawns: Vec<ObjectId>,
    construction_wanted: bool,
}

impl RoomCache {
    /// Snapshot `name` from the simulation. Returns `None` when the room is
    /// not visible.
    ///
    /// Workers are included in the ledger only when they are in this room
    /// and have a memory record, since requests are keyed by role.
    pub fn build(
        sim: &dyn Simulation,
        planner: &dyn LayoutPlanner,
        name: &RoomName,
        record: &RoomRecord,
        workers: &BTreeMap<WorkerName, WorkerRecord>,
        thresholds: &LedgerThresholds,
    ) -> Option<Self> {
        let tick = sim.time();
        let room = sim.room(name)?.clone();

        let room_workers = sim
            .creep_names()
            .iter()
            .filter_map(|n| sim.creep(n))
            .filter(|c| &c.room == name && !c.spawning)
            .filter_map(|c| workers.get(&c.name).map(|r| RoomWorker::from_creep(c, r.role)))
            .collect();

        let idle_spawns = room.idle_spawns(tick).map(|s| s.id).collect();
        let construction_wanted =
            planner.has_construction_site_near(name, anchor(&room, record), ROOM_SIZE);

        Some(Self {
            tick,
            ledger: ResourceLedger::new(room, record.clone(), room_workers, thresholds.clone()),
            idle_spawns,
            construction_wanted,
        })
    }

    /// Tick the cache was built for.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Room snapshot.
    pub const fn room(&self) -> &RoomState {
        self.ledger.room()
    }

    /// Room record snapshot.
    pub const fn record(&self) -> &RoomRecord {
        self.ledger.record()
    }

    /// The room's resource ledger.
    pub const fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Spawns that were idle at tick start.
    pub fn idle_spawns(&self) -> &[ObjectId] {
        &self.idle_spawns
    }

    /// Whether the layout planner reports construction work in the room.
    pub const fn construction_wanted(&self) -> bool {
        self.construction_wanted
    }
}

/// Point the layout planner is asked about: the planned centre, else the
/// first spawn, else the controller, else the middle of the room.
fn anchor(room: &RoomState, record: &RoomRecord) -> Position {
    const MIDDLE: u8 = ROOM_SIZE / 2;
    record
        .planned_center
        .or_else(|| {
            room.structures_of(StructureKind::Spawn)
                .next()
                .map(|s| s.pos)
        })
        .or_else(|| room.controller.as_ref().map(|c| c.pos))
        .unwrap_or(Position::new(MIDDLE, MIDDLE))
}

// ---------------------------------------------------------------------------
// TickContext
// ---------------------------------------------------------------------------

/// The room-level view a behavior works against.
pub struct TickContext<'a> {
    /// Read-only snapshot of the room.
    pub cache: &'a RoomCache,
    /// Live exclusive-target claims.
    pub claims: &'a mut TargetClaims,
    /// The simulation, for effect calls and live lookups.
    pub sim: &'a mut dyn Simulation,
}

impl<'a> TickContext<'a> {
    /// Bundle the pieces for one room.
    pub fn new(
        cache: &'a RoomCache,
        claims: &'a mut TargetClaims,
        sim: &'a mut dyn Simulation,
    ) -> Self {
        Self { cache, claims, sim }
    }

    /// Current tick.
    pub const fn tick(&self) -> u64 {
        self.cache.tick()
    }

    /// Matching over this room's ledger and the live claims.
    pub fn matching(&self) -> MatchingEngine<'_> {
        MatchingEngine::new(self.cache.ledger(), self.claims)
    }
}

impl core::fmt::Debug for TickContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickContext")
            .field("tick", &self.cache.tick())
            .field("room", &self.cache.room().name)
            .field("claims", &self.claims.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

/// A live worker paired with its memory record for one scheduler run.
#[derive(Debug)]
pub struct Worker<'a> {
    /// Live state captured at the start of the run.
    pub creep: &'a Creep,
    /// Persistent record, written back at tick end.
    pub record: &'a mut WorkerRecord,
}

impl<'a> Worker<'a> {
    /// Pair a live worker with its record.
    pub const fn new(creep: &'a Creep, record: &'a mut WorkerRecord) -> Self {
        Self { creep, record }
    }

    /// Worker name.
    pub const fn name(&self) -> &WorkerName {
        &self.creep.name
    }

    /// This worker as a matching participant.
    pub const fn asker(&self) -> Asker<'_> {
        Asker {
            name: &self.creep.name,
            id: self.creep.id,
        }
    }

    /// Commit to `target`. Behaviors with exclusive targets claim it first
    /// and fail if another worker already holds it.
    pub fn set_target(&mut self, target: ObjectId, claims: &mut TargetClaims) -> bool {
        let exclusive = self
            .record
            .current_behavior
            .is_some_and(BehaviorKind::has_exclusive_target);
        if exclusive && !claims.claim(target, &self.creep.name) {
            return false;
        }
        self.record.target = Some(target);
        true
    }

    /// Drop the current target and release any claim on it.
    pub fn clear_target(&mut self, claims: &mut TargetClaims) {
        if let Some(target) = self.record.target.take() {
            claims.release(target, &self.creep.name);
        }
    }

    /// The resource this worker should deliver: the transport cargo if it
    /// still holds some, otherwise whatever it carries most of.
    pub fn cargo(&self) -> Option<ResourceKind> {
        self.record
            .carrying
            .filter(|r| self.creep.store.get(*r) > 0)
            .or_else(|| self.creep.carried().map(|(r, _)| r))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{BodyPart, RoleKind};

    use super::*;

    fn creep() -> Creep {
        Creep::new(
            WorkerName::new("t"),
            RoomName::new("W1N1"),
            Position::new(5, 5),
            vec![BodyPart::Carry, BodyPart::Carry, BodyPart::Move],
        )
    }

    #[test]
    fn exclusive_targets_are_claimed_and_released() {
        let creep = creep();
        let mut record = WorkerRecord::spawned(RoleKind::Transporter, 0, 300);
        record.current_behavior = Some(BehaviorKind::Collect);
        let mut claims = TargetClaims::new();
        let target = ObjectId::new();
        claims.claim(target, &WorkerName::new("other"));

        let mut worker = Worker::new(&creep, &mut record);
        assert!(!worker.set_target(target, &mut claims));
        assert_eq!(worker.record.target, None);

        let free = ObjectId::new();
        assert!(worker.set_target(free, &mut claims));
        assert_eq!(claims.holder(free), Some(&creep.name));
        worker.clear_target(&mut claims);
        assert_eq!(claims.holder(free), None);
        assert_eq!(worker.record.target, None);
    }

    #[test]
    fn shared_targets_are_not_claimed() {
        let creep = creep();
        let mut record = WorkerRecord::spawned(RoleKind::Upgrader, 0, 300);
        record.current_behavior = Some(BehaviorKind::Upgrade);
        let mut claims = TargetClaims::new();
        let controller = ObjectId::new();
        let mut worker = Worker::new(&creep, &mut record);
        assert!(worker.set_target(controller, &mut claims));
        assert!(claims.is_empty());
    }

    #[test]
    fn cargo_prefers_transport_resource_still_held() {
        let mut creep = creep();
        creep.store.add(ResourceKind::Energy, 60);
        creep.store.add(ResourceKind::Hydrogen, 20);
        let mut record = WorkerRecord::spawned(RoleKind::Transporter, 0, 300);
        record.carrying = Some(ResourceKind::Hydrogen);
        assert_eq!(
            Worker::new(&creep, &mut record).cargo(),
            Some(ResourceKind::Hydrogen)
        );
        record.carrying = Some(ResourceKind::Oxygen);
        assert_eq!(
            Worker::new(&creep, &mut record).cargo(),
            Some(ResourceKind::Energy)
        );
    }
}
