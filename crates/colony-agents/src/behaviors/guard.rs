//! Defending the room and patrolling its edges.

use colony_types::{BehaviorKind, BodyPart, Position};
use tracing::trace;

use super::{nearest, target_or};
use crate::behavior::Behavior;
use crate::context::{TickContext, Worker};
use crate::outcome::{ActionOutcome, execute};

/// Attack the nearest hostile until the room is clear.
#[derive(Debug, Clone, Copy)]
pub struct Defend;

impl Behavior for Defend {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Defend
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        worker.creep.parts(BodyPart::Attack) > 0 && ctx.cache.room().has_hostiles()
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let Some(hostile) = target_or(worker, ctx, |w, ctx| {
            nearest(
                w.creep.pos,
                ctx.cache.room().hostiles.iter().map(|h| (h.id, h.pos)),
            )
        }) else {
            return ActionOutcome::Invalid;
        };
        execute(worker, ctx, hostile, |sim, name| sim.attack(name, hostile))
    }

    fn is_done(&self, _worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        !ctx.cache.room().has_hostiles()
    }
}

/// Patrol waypoints near the room corners, clockwise from the top left.
pub const PATROL: [Position; 4] = [
    Position::new(2, 2),
    Position::new(47, 2),
    Position::new(47, 47),
    Position::new(2, 47),
];

/// Memory key holding the index of the next patrol waypoint.
const WAYPOINT_KEY: &str = "waypoint";

/// Walk the patrol loop forever. Never completes.
#[derive(Debug, Clone, Copy)]
pub struct Scout;

impl Scout {
    fn waypoint_index(worker: &Worker<'_>) -> usize {
        worker
            .record
            .custom
            .get(WAYPOINT_KEY)
            .and_then(serde_json::Value::as_u64)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| i.checked_rem(PATROL.len()))
            .unwrap_or(0)
    }
}

impl Behavior for Scout {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Scout
    }

    fn can_run(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        worker.creep.parts(BodyPart::Move) > 0
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let mut index = Self::waypoint_index(worker);
        let Some(mut goal) = PATROL.get(index).copied() else {
            return ActionOutcome::Invalid;
        };
        if worker.creep.pos == goal {
            index = index.saturating_add(1).checked_rem(PATROL.len()).unwrap_or(0);
            goal = PATROL.get(index).copied().unwrap_or(goal);
            worker
                .record
                .custom
                .insert(WAYPOINT_KEY.to_owned(), serde_json::Value::from(index));
            trace!(worker = %worker.name(), %goal, "Next patrol waypoint");
        }
        let code = ctx.sim.move_to(worker.name(), goal);
        if code.is_ok() {
            ActionOutcome::Retry(goal)
        } else {
            ActionOutcome::Unknown(code)
        }
    }

    fn is_done(&self, _worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        false
    }
}
