//! Per-room tick orchestration.
//!
//! [`RoomController::run`] takes one owned room through a tick: controller
//! progress bookkeeping, budget-gated classification, the room cache, every
//! resident worker, the spawns, and finally the labs.

use colony_agents::{
    BehaviorRegistry, RoleBook, RoomCache, RunOutcome, TickContext, Worker, WorkerScheduler,
};
use colony_ledger::TargetClaims;
use colony_types::{MemoryDocument, RoomName, RoomRecord, WorkerName};
use colony_world::{LayoutPlanner, RoomState, Simulation};
use rand::Rng;
use tracing::{debug, info, trace, warn};

use crate::budget::{self, Classification};
use crate::config::ColonyConfig;
use crate::labs::LabReactionPlanner;
use crate::spawn::SpawnPlanner;

/// What happened in one room during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomReport {
    /// The room.
    pub room: RoomName,
    /// Workers whose behavior ran.
    pub workers_run: u32,
    /// Workers left without a behavior.
    pub workers_idle: u32,
    /// Workers spawned.
    pub spawned: u32,
    /// Lab clusters newly assigned.
    pub labs_assigned: u32,
    /// Reactions run.
    pub reactions: u32,
    /// Outcome of the classification gate.
    pub classification: Classification,
}

/// Runs one room per call against the shared role table and registry.
#[derive(Debug, Clone, Copy)]
pub struct RoomController<'a> {
    registry: &'a BehaviorRegistry,
    roles: &'a RoleBook,
    config: &'a ColonyConfig,
}

impl<'a> RoomController<'a> {
    /// A controller over the given registry, role table, and configuration.
    pub const fn new(
        registry: &'a BehaviorRegistry,
        roles: &'a RoleBook,
        config: &'a ColonyConfig,
    ) -> Self {
        Self {
            registry,
            roles,
            config,
        }
    }

    /// Run `name` for the current tick. Returns `None` when the room is not
    /// visible.
    pub fn run<W, R>(
        &self,
        world: &mut W,
        memory: &mut MemoryDocument,
        name: &RoomName,
        rng: &mut R,
    ) -> Option<RoomReport>
    where
        W: Simulation + LayoutPlanner,
        R: Rng + ?Sized,
    {
        let tick = world.time();
        let Some(room) = world.room(name) else {
            warn!(room = %name, "Owned room is not visible");
            return None;
        };
        let record = memory.rooms.entry(name.clone()).or_default();
        note_controller_level(room, record, tick);
        let classification = budget::refresh_classification(
            &self.config.budget,
            room,
            record,
            tick,
            world.cpu_bucket(),
        );

        let labs = LabReactionPlanner::new(self.config.labs);
        labs.forget_missing_labs(room, record);

        let cache = RoomCache::build(
            &*world,
            &*world,
            name,
            record,
            &memory.workers,
            &self.config.ledger,
        )?;
        if self.config.engine.record_ledger_summary {
            record.ledger_summary = Some(cache.ledger().summary(tick));
        }

        let (workers_run, workers_idle) = self.run_workers(world, memory, &cache);

        let spawned = SpawnPlanner::new(self.roles, self.config.spawn).populate(
            &cache,
            world,
            &mut memory.workers,
        );

        let (labs_assigned, reactions) = if labs.enabled() {
            let record = memory.rooms.entry(name.clone()).or_default();
            let room = cache.room();
            let assigned = labs.plan_reactions(room, record, rng);
            labs.assign_reagents(room, record);
            let reactions = labs.advance_reactions(world, room, record, tick);
            (count(assigned), count(reactions))
        } else {
            (0, 0)
        };

        let report = RoomReport {
            room: name.clone(),
            workers_run,
            workers_idle,
            spawned,
            labs_assigned,
            reactions,
            classification,
        };
        debug!(
            room = %name,
            tick,
            workers_run,
            workers_idle,
            spawned,
            reactions,
            "Room tick complete"
        );
        Some(report)
    }

    /// Run every resident, fully spawned worker that has a memory record.
    /// Returns `(ran, idle)`.
    fn run_workers<W>(
        &self,
        world: &mut W,
        memory: &mut MemoryDocument,
        cache: &RoomCache,
    ) -> (u32, u32)
    where
        W: Simulation,
    {
        let room = &cache.room().name;
        let mut claims = TargetClaims::from_records(
            memory
                .workers
                .iter()
                .filter(|(n, _)| world.creep(n).is_some_and(|c| &c.room == room)),
        );
        let names: Vec<WorkerName> = world
            .creep_names()
            .into_iter()
            .filter(|n| {
                world
                    .creep(n)
                    .is_some_and(|c| &c.room == room && !c.spawning)
            })
            .collect();

        let scheduler = WorkerScheduler::new(self.registry, self.roles, self.config.scheduler);
        let mut ran = 0_u32;
        let mut idle = 0_u32;
        for name in names {
            let Some(creep) = world.creep(&name).cloned() else {
                continue;
            };
            let Some(record) = memory.workers.get_mut(&name) else {
                trace!(worker = %name, "Worker has no memory record");
                continue;
            };
            let mut ctx = TickContext::new(cache, &mut claims, &mut *world);
            let mut worker = Worker::new(&creep, record);
            match scheduler.run(&mut worker, &mut ctx) {
                RunOutcome::Ran { .. } => ran = ran.saturating_add(1),
                RunOutcome::Idle => idle = idle.saturating_add(1),
                RunOutcome::NoRole => {}
            }
        }
        (ran, idle)
    }
}

/// Record the first tick each controller level was seen.
fn note_controller_level(room: &RoomState, record: &mut RoomRecord, tick: u64) {
    let level = room.level();
    if level == 0 || record.rcl_upgrade_times.contains_key(&level) {
        return;
    }
    record.rcl_upgrade_times.insert(level, tick);
    info!(room = %room.name, level, tick, "Controller level reached");
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_world::starting_room;

    use super::*;

    #[test]
    fn unclaimed_room_records_nothing() {
        let room = RoomState::new(RoomName::new("W1N1"));
        let mut record = RoomRecord::default();
        note_controller_level(&room, &mut record, 5);
        assert!(record.rcl_upgrade_times.is_empty());
    }

    #[test]
    fn controller_level_is_recorded_once() {
        let (sandbox, ids) = starting_room().unwrap();
        let room = sandbox.room(&ids.room).unwrap();
        let mut record = RoomRecord::default();
        note_controller_level(room, &mut record, 7);
        note_controller_level(room, &mut record, 9);
        assert_eq!(record.rcl_upgrade_times.get(&2), Some(&7));
        assert_eq!(record.rcl_upgrade_times.len(), 1);
    }
}
