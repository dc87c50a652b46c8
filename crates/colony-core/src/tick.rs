//! The single-tick entry point.
//!
//! One call to [`run_tick`] is one colony tick:
//!
//! 1. **Load** -- decode persistent memory from the simulation. On the
//!    first tick of the process, and every `engine.gc_interval` ticks after
//!    it, dead workers and lost rooms are garbage-collected.
//! 2. **Rooms** -- run every owned room in name order through the
//!    [`RoomController`].
//! 3. **Save** -- stamp and encode memory back into the simulation.
//!
//! The simulation owns the clock. Advancing it between ticks is the
//! caller's job.

use chrono::Utc;
use colony_agents::{BehaviorRegistry, RoleBook};
use colony_world::{LayoutPlanner, Simulation};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::ColonyConfig;
use crate::memory;
use crate::room::RoomController;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// Memory could not be written back to the simulation.
    #[error("memory error: {source}")]
    Memory {
        /// The underlying memory error.
        #[from]
        source: colony_types::MemoryError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick that was executed.
    pub tick: u64,
    /// Rooms run to completion.
    pub rooms_run: u32,
    /// Owned rooms that were not visible.
    pub rooms_skipped: u32,
    /// Workers alive at the end of the tick, spawning ones included.
    pub workers_alive: u32,
    /// Workers whose behavior ran.
    pub workers_run: u32,
    /// Workers left without a behavior.
    pub workers_idle: u32,
    /// Spawns issued.
    pub spawns_issued: u32,
    /// Lab clusters newly assigned.
    pub labs_assigned: u32,
    /// Reactions run.
    pub reactions_run: u32,
    /// Worker records removed by garbage collection.
    pub records_collected: u32,
}

/// Process-lifetime colony state carried between ticks.
///
/// Everything else lives in the simulation's persistent memory and is
/// reloaded each tick.
#[derive(Debug)]
pub struct Colony {
    config: ColonyConfig,
    registry: BehaviorRegistry,
    roles: RoleBook,
    rng: StdRng,
    last_collected: Option<u64>,
}

impl Colony {
    /// A colony with the standard behaviors and the configured role table.
    pub fn new(config: ColonyConfig) -> Self {
        let roles = config.role_book();
        let rng = StdRng::seed_from_u64(config.engine.seed);
        Self {
            config,
            registry: BehaviorRegistry::standard(),
            roles,
            rng,
            last_collected: None,
        }
    }

    /// The loaded configuration.
    pub const fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// The role table in use.
    pub const fn roles(&self) -> &RoleBook {
        &self.roles
    }
}

/// Execute one tick against `world`.
///
/// # Errors
///
/// Returns [`TickError::Memory`] if memory cannot be encoded at tick end.
/// Room and worker failures inside the tick are logged, never returned.
pub fn run_tick<W>(colony: &mut Colony, world: &mut W) -> Result<TickSummary, TickError>
where
    W: Simulation + LayoutPlanner,
{
    let tick = world.time();
    let mut doc = memory::load(world);
    let mut summary = TickSummary {
        tick,
        ..TickSummary::default()
    };

    let interval = colony.config.engine.gc_interval;
    if colony
        .last_collected
        .is_none_or(|last| tick.saturating_sub(last) >= interval)
    {
        colony.last_collected = Some(tick);
        let removed = memory::collect_garbage(world, &mut doc);
        summary.records_collected = u32::try_from(removed).unwrap_or(u32::MAX);
    }

    let controller = RoomController::new(&colony.registry, &colony.roles, &colony.config);
    for name in world.room_names() {
        let Some(report) = controller.run(world, &mut doc, &name, &mut colony.rng) else {
            summary.rooms_skipped = summary.rooms_skipped.saturating_add(1);
            continue;
        };
        summary.rooms_run = summary.rooms_run.saturating_add(1);
        summary.workers_run = summary.workers_run.saturating_add(report.workers_run);
        summary.workers_idle = summary.workers_idle.saturating_add(report.workers_idle);
        summary.spawns_issued = summary.spawns_issued.saturating_add(report.spawned);
        summary.labs_assigned = summary.labs_assigned.saturating_add(report.labs_assigned);
        summary.reactions_run = summary.reactions_run.saturating_add(report.reactions);
    }

    summary.workers_alive = u32::try_from(world.creep_names().len()).unwrap_or(u32::MAX);
    memory::save(world, &mut doc, Utc::now())?;

    info!(
        tick,
        rooms = summary.rooms_run,
        workers_alive = summary.workers_alive,
        workers_run = summary.workers_run,
        spawns = summary.spawns_issued,
        reactions = summary.reactions_run,
        "Tick complete"
    );
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{MemoryDocument, RoleKind, WorkerName, WorkerRecord};
    use colony_world::{Sandbox, starting_room};

    use super::*;

    #[test]
    fn first_tick_spawns_and_persists() {
        let (mut sandbox, ids) = starting_room().unwrap();
        let mut colony = Colony::new(ColonyConfig::default());
        let summary = run_tick(&mut colony, &mut sandbox).unwrap();

        assert_eq!(summary.rooms_run, 1);
        assert_eq!(summary.spawns_issued, 1);
        assert_eq!(summary.workers_alive, 1);

        let doc = MemoryDocument::decode(sandbox.raw_memory()).unwrap();
        assert!(doc.saved_at.is_some());
        assert_eq!(doc.workers.len(), 1);
        let record = doc.rooms.get(&ids.room).unwrap();
        assert_eq!(record.rcl_upgrade_times.get(&2), Some(&0));
        assert!(record.ledger_summary.is_some());
    }

    fn haunt(sandbox: &mut Sandbox, name: &str) {
        let mut doc = MemoryDocument::decode(sandbox.raw_memory()).unwrap();
        doc.workers.insert(
            WorkerName::new(name),
            WorkerRecord::spawned(RoleKind::Harvester, 0, 300),
        );
        sandbox.set_raw_memory(doc.encode().unwrap());
    }

    #[test]
    fn garbage_is_collected_on_the_configured_interval() {
        let (mut sandbox, _) = starting_room().unwrap();
        haunt(&mut sandbox, "harvester_ghost");
        let mut config = ColonyConfig::default();
        config.engine.gc_interval = 5;
        let mut colony = Colony::new(config);

        let first = run_tick(&mut colony, &mut sandbox).unwrap();
        assert_eq!(first.records_collected, 1);

        let mut collected = Vec::new();
        for _ in 1..=5 {
            sandbox.advance();
            haunt(&mut sandbox, "harvester_ghost");
            collected.push(run_tick(&mut colony, &mut sandbox).unwrap().records_collected);
        }
        assert_eq!(collected, vec![0, 0, 0, 0, 1]);
    }
}
