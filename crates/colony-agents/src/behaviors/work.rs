//! Behaviors that spend carried energy, and the refill that precedes them.

use colony_types::{BehaviorKind, ObjectId, ResourceKind, StructureKind};
use colony_world::Structure;

use super::{can_spend_energy, nearest, target_or};
use crate::behavior::Behavior;
use crate::context::{TickContext, Worker};
use crate::outcome::{ActionOutcome, execute};

/// Spend energy on the room controller.
#[derive(Debug, Clone, Copy)]
pub struct Upgrade;

impl Behavior for Upgrade {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Upgrade
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        can_spend_energy(worker) && ctx.cache.room().controller.is_some()
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let Some(controller) = target_or(worker, ctx, |_, ctx| {
            ctx.cache.room().controller.as_ref().map(|c| c.id)
        }) else {
            return ActionOutcome::Invalid;
        };
        execute(worker, ctx, controller, |sim, name| {
            sim.upgrade_controller(name, controller)
        })
    }

    fn is_done(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        worker.creep.energy() == 0
    }
}

/// Spend energy on the nearest construction site.
#[derive(Debug, Clone, Copy)]
pub struct Build;

impl Behavior for Build {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Build
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        can_spend_energy(worker)
            && ctx.cache.construction_wanted()
            && !ctx.cache.room().construction_sites.is_empty()
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let Some(site) = target_or(worker, ctx, |w, ctx| {
            nearest(
                w.creep.pos,
                ctx.cache
                    .room()
                    .construction_sites
                    .iter()
                    .map(|s| (s.id, s.pos)),
            )
        }) else {
            return ActionOutcome::Invalid;
        };
        execute(worker, ctx, site, |sim, name| sim.build(name, site))
    }

    fn is_done(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        worker.creep.energy() == 0
    }
}

/// Spend energy on the most damaged structure, relative to its maximum.
#[derive(Debug, Clone, Copy)]
pub struct Repair;

/// Hit points per mille of maximum, for ranking damage across kinds.
fn health_per_mille(s: &Structure) -> u64 {
    u64::from(s.hits)
        .saturating_mul(1_000)
        .checked_div(u64::from(s.hits_max))
        .unwrap_or(0)
}

impl Behavior for Repair {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Repair
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        can_spend_energy(worker)
            && ctx
                .cache
                .room()
                .structures
                .iter()
                .any(Structure::needs_repair)
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let Some(structure) = target_or(worker, ctx, |_, ctx| {
            ctx.cache
                .room()
                .structures
                .iter()
                .filter(|s| s.needs_repair())
                .min_by_key(|s| health_per_mille(s))
                .map(|s| s.id)
        }) else {
            return ActionOutcome::Invalid;
        };
        execute(worker, ctx, structure, |sim, name| sim.repair(name, structure))
    }

    fn is_done(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        worker.creep.energy() == 0
    }
}

/// Withdraw energy for the worker's own use from the nearest store:
/// the controller container, the storage, a source container, or the
/// terminal.
#[derive(Debug, Clone, Copy)]
pub struct Refill;

impl Refill {
    fn pick(worker: &Worker<'_>, ctx: &TickContext<'_>) -> Option<ObjectId> {
        let room = ctx.cache.room();
        let classification = ctx.cache.record().classification.as_ref();
        let candidates = room.structures.iter().filter(|s| {
            let usable = match s.kind {
                StructureKind::Storage | StructureKind::Terminal => true,
                StructureKind::Container => classification.is_some_and(|c| {
                    c.controller_container == Some(s.id) || c.source_containers.contains(&s.id)
                }),
                _ => false,
            };
            usable && s.store.get(ResourceKind::Energy) > 0
        });
        nearest(worker.creep.pos, candidates.map(|s| (s.id, s.pos)))
    }

    fn wants_energy(worker: &Worker<'_>) -> bool {
        worker.creep.carry_capacity() > 0 && worker.creep.energy() == 0
    }
}

impl Behavior for Refill {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Refill
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        Self::wants_energy(worker) && Self::pick(worker, ctx).is_some()
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let Some(store) = target_or(worker, ctx, Self::pick) else {
            return ActionOutcome::Invalid;
        };
        execute(worker, ctx, store, |sim, name| {
            sim.withdraw(name, store, ResourceKind::Energy, None)
        })
    }

    fn is_done(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        worker.creep.energy() > 0 || worker.record.target.is_none()
    }
}
