//! Spawn body selection and room population.
//!
//! [`SpawnPlanner::create_creep`] picks the strongest body tier the room
//! can afford at its controller level and asks a spawn to create it.
//! [`SpawnPlanner::populate`] decides which role each idle spawn should
//! produce. Bodies are only ever shrunk by popping parts off the end, never
//! reordered, so the last parts of a template are the first sacrificed.

use std::collections::BTreeMap;

use colony_agents::{RoleBook, RoleConfig, RoomCache};
use colony_types::{
    BodyPart, ObjectId, RoleKind, RoomName, WorkerName, WorkerRecord, body_cost,
};
use colony_world::{RoomState, Simulation};
use tracing::{debug, info, trace, warn};

use crate::config::SpawnConfig;

// ---------------------------------------------------------------------------
// Body selection
// ---------------------------------------------------------------------------

/// The tier to spawn: start at index `min(len, level) - 1` and walk down to
/// the first tier costing at most `max_energy`.
pub fn select_body(tiers: &[Vec<BodyPart>], level: u8, max_energy: u32) -> Option<&[BodyPart]> {
    let len = u8::try_from(tiers.len()).unwrap_or(u8::MAX);
    let start = usize::from(len.min(level).checked_sub(1)?);
    tiers
        .get(..=start)?
        .iter()
        .rev()
        .find(|tier| body_cost(tier) <= max_energy)
        .map(Vec::as_slice)
}

/// Pop parts off the end of `body` until it costs at most `energy`, keeping
/// at least `min_parts`. `None` if even the shortest allowed body is too
/// expensive.
pub fn shrink_to_fit(body: &[BodyPart], min_parts: usize, energy: u32) -> Option<Vec<BodyPart>> {
    let mut body = body.to_vec();
    while body_cost(&body) > energy && body.len() > min_parts {
        body.pop();
    }
    (!body.is_empty() && body_cost(&body) <= energy).then_some(body)
}

// ---------------------------------------------------------------------------
// SpawnPlanner
// ---------------------------------------------------------------------------

/// Where and when a worker is being spawned.
#[derive(Debug, Clone)]
pub struct SpawnSite {
    /// The spawn asked to create the worker.
    pub spawn: ObjectId,
    /// The room the spawn is in.
    pub room: RoomName,
    /// Controller level of the room.
    pub level: u8,
    /// Energy budget for body selection.
    pub max_energy: u32,
    /// Current tick.
    pub tick: u64,
    /// Energy on hand when the body must be shrunk to get a worker out at
    /// all; `None` for a normal spawn.
    pub bootstrap_energy: Option<u32>,
}

/// Chooses bodies and roles for idle spawns.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPlanner<'a> {
    roles: &'a RoleBook,
    config: SpawnConfig,
}

impl<'a> SpawnPlanner<'a> {
    /// A planner over the given role table.
    pub const fn new(roles: &'a RoleBook, config: SpawnConfig) -> Self {
        Self { roles, config }
    }

    /// Base energy plus the share of every built extension.
    pub fn max_energy(&self, extensions: u32) -> u32 {
        self.config
            .base_energy
            .saturating_add(self.config.energy_per_extension.saturating_mul(extensions))
    }

    /// Try to spawn one worker of `role` at `site`.
    ///
    /// Returns `false` without calling the spawn when no tier fits. On a
    /// successful call the worker's memory record is created.
    pub fn create_creep(
        &self,
        sim: &mut dyn Simulation,
        workers: &mut BTreeMap<WorkerName, WorkerRecord>,
        site: &SpawnSite,
        role: &RoleConfig,
    ) -> bool {
        let Some(tier) = select_body(&role.body_tiers, site.level, site.max_energy) else {
            debug!(
                role = %role.role,
                room = %site.room,
                max_energy = site.max_energy,
                level = site.level,
                "No body tier fits the energy budget"
            );
            return false;
        };

        let body = match site.bootstrap_energy {
            None => tier.to_vec(),
            Some(energy) => {
                let Some(body) = shrink_to_fit(tier, role.min_parts, energy) else {
                    debug!(
                        role = %role.role,
                        room = %site.room,
                        energy,
                        "Too little energy to bootstrap"
                    );
                    return false;
                };
                body
            }
        };

        let name = unique_name(sim, workers, role.role, site.tick);
        let code = sim.spawn_creep(site.spawn, &body, &name);
        if code.is_ok() {
            info!(
                worker = %name,
                role = %role.role,
                room = %site.room,
                parts = body.len(),
                cost = body_cost(&body),
                bootstrap = site.bootstrap_energy.is_some(),
                "Spawning worker"
            );
            workers.insert(
                name,
                WorkerRecord::spawned(role.role, site.tick, site.max_energy),
            );
            true
        } else {
            warn!(
                worker = %name,
                role = %role.role,
                room = %site.room,
                ?code,
                "Spawn rejected"
            );
            false
        }
    }

    /// Give every idle spawn in the room one attempt at the most important
    /// role that is admitted and under quota. Returns the number of workers
    /// spawned.
    pub fn populate(
        &self,
        cache: &RoomCache,
        sim: &mut dyn Simulation,
        workers: &mut BTreeMap<WorkerName, WorkerRecord>,
    ) -> u32 {
        let room = cache.room();
        let level = room.level();
        let max_energy = self.max_energy(room.extension_count());
        let mut counts = live_counts(sim, workers, &room.name);
        let mut spawned = 0_u32;

        for &spawn in cache.idle_spawns() {
            let Some(role) = self.next_role(cache, &counts) else {
                trace!(room = %room.name, "Every admitted role is at quota");
                break;
            };
            let harvesters = counts.get(&RoleKind::Harvester).copied().unwrap_or(0);
            let bootstrap_energy = (self.config.emergency_bootstrap
                && role.role == RoleKind::Harvester
                && harvesters == 0)
                .then(|| sim.room(&room.name).map_or(0, RoomState::energy_available));

            let site = SpawnSite {
                spawn,
                room: room.name.clone(),
                level,
                max_energy,
                tick: cache.tick(),
                bootstrap_energy,
            };
            if self.create_creep(sim, workers, &site, role) {
                spawned = spawned.saturating_add(1);
                let count = counts.entry(role.role).or_default();
                *count = count.saturating_add(1);
            }
        }
        spawned
    }

    /// First role in table order that the room admits and wants more of.
    fn next_role(
        &self,
        cache: &RoomCache,
        counts: &BTreeMap<RoleKind, u32>,
    ) -> Option<&'a RoleConfig> {
        let level = cache.room().level();
        self.roles.iter().find(|config| {
            if !config.level_allows(level) {
                return false;
            }
            let Some(admission) = config.admission else {
                debug!(role = %config.role, "No admission rule configured, skipping");
                return false;
            };
            admission.admits(cache)
                && counts.get(&config.role).copied().unwrap_or(0) < config.quota
        })
    }
}

/// Live workers per role in `room`, including ones still spawning.
fn live_counts(
    sim: &dyn Simulation,
    workers: &BTreeMap<WorkerName, WorkerRecord>,
    room: &RoomName,
) -> BTreeMap<RoleKind, u32> {
    let mut counts = BTreeMap::new();
    for (name, record) in workers {
        if sim.creep(name).is_some_and(|c| &c.room == room) {
            let count: &mut u32 = counts.entry(record.role).or_default();
            *count = count.saturating_add(1);
        }
    }
    counts
}

/// `{role}_{tick}`, with a numeric suffix when that name is taken.
fn unique_name(
    sim: &dyn Simulation,
    workers: &BTreeMap<WorkerName, WorkerRecord>,
    role: RoleKind,
    tick: u64,
) -> WorkerName {
    let taken = |name: &WorkerName| sim.creep(name).is_some() || workers.contains_key(name);
    let base = WorkerName::new(format!("{role}_{tick}"));
    if !taken(&base) {
        return base;
    }
    (1_u32..)
        .map(|n| WorkerName::new(format!("{base}_{n}")))
        .find(|name| !taken(name))
        .unwrap_or(base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::BodyPart::{Carry as C, Move as M, Work as W};

    use super::*;

    fn tiers() -> Vec<Vec<BodyPart>> {
        vec![vec![M, C], vec![M, M, C, C]]
    }

    #[test]
    fn affordable_tier_is_chosen_walking_down() {
        assert_eq!(select_body(&tiers(), 8, 150), Some([M, C].as_slice()));
        assert_eq!(select_body(&tiers(), 8, 200), Some([M, M, C, C].as_slice()));
    }

    #[test]
    fn level_caps_the_starting_tier() {
        assert_eq!(select_body(&tiers(), 1, 1_000), Some([M, C].as_slice()));
    }

    #[test]
    fn nothing_fits() {
        assert_eq!(select_body(&tiers(), 8, 90), None);
        assert_eq!(select_body(&tiers(), 0, 1_000), None);
        assert_eq!(select_body(&[], 8, 1_000), None);
    }

    #[test]
    fn shrinking_pops_from_the_end() {
        let body = [W, W, C, M, M];
        assert_eq!(shrink_to_fit(&body, 3, 250), Some(vec![W, W, C]));
        assert_eq!(shrink_to_fit(&body, 3, 400), Some(body.to_vec()));
        assert_eq!(shrink_to_fit(&body, 3, 200), None);
    }

    #[test]
    fn extensions_raise_the_budget() {
        let book = RoleBook::standard();
        let planner = SpawnPlanner::new(&book, SpawnConfig::default());
        assert_eq!(planner.max_energy(0), 300);
        assert_eq!(planner.max_energy(5), 550);
    }
}
