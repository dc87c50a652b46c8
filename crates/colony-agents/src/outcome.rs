//! The shared "execute action and interpret the result" step.
//!
//! Every behavior's `perform` funnels its effect call through [`execute`],
//! so each [`ActionCode`] means the same thing everywhere:
//!
//! | Code | Outcome | Effect on the worker |
//! |------|---------|----------------------|
//! | `Ok`, `Busy` | [`ActionOutcome::Success`] | none |
//! | `NotInRange` | [`ActionOutcome::Retry`] | step toward the target |
//! | `Full`, `NotEnoughResources` | [`ActionOutcome::Finished`] | target cleared |
//! | `InvalidTarget` | [`ActionOutcome::Invalid`] | target cleared |
//! | `Unknown` | [`ActionOutcome::Unknown`] | warning, target cleared |

use colony_types::{ActionCode, ObjectId, Position, WorkerName};
use colony_world::Simulation;
use tracing::{trace, warn};

use crate::context::{TickContext, Worker};

/// What an effect call means for the worker that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was accepted.
    Success,
    /// The target is out of range; the worker moves toward this position.
    Retry(Position),
    /// The sub-task is over because a store ran full or empty.
    Finished,
    /// The target no longer accepts this action.
    Invalid,
    /// The simulation rejected the action for an unlisted reason.
    Unknown(ActionCode),
}

impl ActionOutcome {
    /// Whether the worker keeps its target after this outcome.
    pub const fn keeps_target(self) -> bool {
        matches!(self, Self::Success | Self::Retry(_))
    }
}

/// Map a result code to an outcome. `target_pos` is where the worker would
/// move on `NotInRange`; without it the target counts as invalid.
pub const fn interpret(code: ActionCode, target_pos: Option<Position>) -> ActionOutcome {
    match code {
        ActionCode::Ok | ActionCode::Busy => ActionOutcome::Success,
        ActionCode::NotInRange => match target_pos {
            Some(pos) => ActionOutcome::Retry(pos),
            None => ActionOutcome::Invalid,
        },
        ActionCode::Full | ActionCode::NotEnoughResources => ActionOutcome::Finished,
        ActionCode::InvalidTarget => ActionOutcome::Invalid,
        ActionCode::Unknown => ActionOutcome::Unknown(code),
    }
}

/// Issue `action` against `target` and apply the outcome to the worker.
pub fn execute<F>(
    worker: &mut Worker<'_>,
    ctx: &mut TickContext<'_>,
    target: ObjectId,
    action: F,
) -> ActionOutcome
where
    F: FnOnce(&mut dyn Simulation, &WorkerName) -> ActionCode,
{
    let code = action(&mut *ctx.sim, worker.name());
    let outcome = interpret(code, ctx.sim.object_pos(target));

    match outcome {
        ActionOutcome::Success => {}
        ActionOutcome::Retry(pos) => {
            let moved = ctx.sim.move_to(worker.name(), pos);
            if !moved.is_ok() {
                trace!(worker = %worker.name(), code = ?moved, "Move rejected");
            }
        }
        ActionOutcome::Finished | ActionOutcome::Invalid => worker.clear_target(ctx.claims),
        ActionOutcome::Unknown(code) => {
            warn!(
                worker = %worker.name(),
                behavior = ?worker.record.current_behavior,
                %target,
                ?code,
                "Unexpected action result, clearing target"
            );
            worker.clear_target(ctx.claims);
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_outcomes() {
        let pos = Position::new(3, 4);
        assert_eq!(interpret(ActionCode::Ok, None), ActionOutcome::Success);
        assert_eq!(interpret(ActionCode::Busy, None), ActionOutcome::Success);
        assert_eq!(
            interpret(ActionCode::NotInRange, Some(pos)),
            ActionOutcome::Retry(pos)
        );
        assert_eq!(interpret(ActionCode::NotInRange, None), ActionOutcome::Invalid);
        assert_eq!(interpret(ActionCode::Full, None), ActionOutcome::Finished);
        assert_eq!(
            interpret(ActionCode::NotEnoughResources, None),
            ActionOutcome::Finished
        );
        assert_eq!(interpret(ActionCode::InvalidTarget, None), ActionOutcome::Invalid);
        assert_eq!(
            interpret(ActionCode::Unknown, None),
            ActionOutcome::Unknown(ActionCode::Unknown)
        );
    }

    #[test]
    fn only_success_and_retry_keep_the_target() {
        assert!(ActionOutcome::Success.keeps_target());
        assert!(ActionOutcome::Retry(Position::new(0, 0)).keeps_target());
        assert!(!ActionOutcome::Finished.keeps_target());
        assert!(!ActionOutcome::Invalid.keeps_target());
        assert!(!ActionOutcome::Unknown(ActionCode::Unknown).keeps_target());
    }
}
