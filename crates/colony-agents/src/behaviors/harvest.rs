//! Mining energy from sources.

use colony_types::{BehaviorKind, BodyPart};

use super::{nearest, target_or};
use crate::behavior::Behavior;
use crate::context::{TickContext, Worker};
use crate::outcome::{ActionOutcome, execute};

/// Harvest from the nearest source that still has energy, until full.
#[derive(Debug, Clone, Copy)]
pub struct Harvest;

impl Behavior for Harvest {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Harvest
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        worker.creep.parts(BodyPart::Work) > 0
            && !worker.creep.store.is_full()
            && ctx.cache.room().sources.iter().any(|s| s.energy > 0)
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let Some(source) = target_or(worker, ctx, |w, ctx| {
            nearest(
                w.creep.pos,
                ctx.cache
                    .room()
                    .sources
                    .iter()
                    .filter(|s| s.energy > 0)
                    .map(|s| (s.id, s.pos)),
            )
        }) else {
            return ActionOutcome::Invalid;
        };
        execute(worker, ctx, source, |sim, name| sim.harvest(name, source))
    }

    fn is_done(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        worker.creep.store.is_full()
    }
}
