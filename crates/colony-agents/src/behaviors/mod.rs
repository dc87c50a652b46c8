//! The built-in behaviors.
//!
//! # Submodules
//!
//! - [`harvest`] -- Mining energy from sources.
//! - [`transport`] -- Collect and deliver halves of a transport order.
//! - [`work`] -- Spending energy: upgrade, build, repair, and refilling.
//! - [`guard`] -- Defending against hostiles and scouting.

pub mod guard;
pub mod harvest;
pub mod transport;
pub mod work;

use colony_types::{BodyPart, ObjectId, Position};

use crate::context::{TickContext, Worker};

pub use guard::{Defend, Scout};
pub use harvest::Harvest;
pub use transport::{Collect, Deliver, TRANSPORT_MAX_TICKS};
pub use work::{Build, Refill, Repair, Upgrade};

/// Registered instance of [`Harvest`].
pub static HARVEST: Harvest = Harvest;
/// Registered instance of [`Collect`].
pub static COLLECT: Collect = Collect;
/// Registered instance of [`Deliver`].
pub static DELIVER: Deliver = Deliver;
/// Registered instance of [`Upgrade`].
pub static UPGRADE: Upgrade = Upgrade;
/// Registered instance of [`Build`].
pub static BUILD: Build = Build;
/// Registered instance of [`Repair`].
pub static REPAIR: Repair = Repair;
/// Registered instance of [`Refill`].
pub static REFILL: Refill = Refill;
/// Registered instance of [`Defend`].
pub static DEFEND: Defend = Defend;
/// Registered instance of [`Scout`].
pub static SCOUT: Scout = Scout;

/// The held target, or a freshly picked one committed to the worker.
fn target_or<F>(worker: &mut Worker<'_>, ctx: &mut TickContext<'_>, pick: F) -> Option<ObjectId>
where
    F: FnOnce(&Worker<'_>, &TickContext<'_>) -> Option<ObjectId>,
{
    if let Some(target) = worker.record.target {
        return Some(target);
    }
    let picked = pick(worker, ctx)?;
    worker.set_target(picked, ctx.claims).then_some(picked)
}

/// The candidate closest to `from`; ties go to the first listed.
fn nearest(
    from: Position,
    candidates: impl Iterator<Item = (ObjectId, Position)>,
) -> Option<ObjectId> {
    candidates
        .min_by_key(|(_, pos)| from.range_to(*pos))
        .map(|(id, _)| id)
}

/// Whether the worker can spend energy on work this tick.
fn can_spend_energy(worker: &Worker<'_>) -> bool {
    worker.creep.parts(BodyPart::Work) > 0 && worker.creep.energy() > 0
}
