//! The two halves of a transport order.
//!
//! [`Collect`] asks the matching engine for an `(offer, request)` pair,
//! claims the offer's node and picks up the resource. [`Deliver`] then asks
//! for the most urgent request for what the worker carries, claims that
//! node and transfers, clamping to the requested amount when the request is
//! exact. Both targets are exclusive: while one worker holds a node no other
//! worker is matched against it.

use colony_types::{BehaviorKind, ResourceKind};
use tracing::debug;

use crate::behavior::Behavior;
use crate::context::{TickContext, Worker};
use crate::outcome::{ActionOutcome, execute};

/// Ticks a transport half may run before it is abandoned and re-matched.
pub const TRANSPORT_MAX_TICKS: u64 = 50;

/// Pick up the offer side of a transport order.
#[derive(Debug, Clone, Copy)]
pub struct Collect;

impl Behavior for Collect {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Collect
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        worker.creep.carry_capacity() > 0
            && worker.creep.store.is_empty()
            && ctx.matching().get_transport_order(worker.asker()).is_some()
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let source = if let Some(target) = worker.record.target {
            target
        } else {
            let Some(order) = ctx.matching().get_transport_order(worker.asker()) else {
                return ActionOutcome::Invalid;
            };
            if !worker.set_target(order.offer.source_id, ctx.claims) {
                return ActionOutcome::Invalid;
            }
            worker.record.carrying = Some(order.offer.resource);
            debug!(
                worker = %worker.name(),
                resource = %order.offer.resource,
                offer = %order.offer.source_id,
                offer_priority = order.offer.priority,
                request = %order.request.target_id,
                request_priority = order.request.priority,
                "Transport order committed"
            );
            order.offer.source_id
        };

        let Some(resource) = worker.record.carrying else {
            worker.clear_target(ctx.claims);
            return ActionOutcome::Invalid;
        };
        let is_pile = ctx.cache.room().dropped.iter().any(|d| d.id == source);
        execute(worker, ctx, source, |sim, name| {
            if is_pile {
                sim.pickup(name, source)
            } else {
                sim.withdraw(name, source, resource, None)
            }
        })
    }

    fn is_done(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        !worker.creep.store.is_empty() || worker.record.target.is_none()
    }

    fn max_ticks(&self) -> Option<u64> {
        Some(TRANSPORT_MAX_TICKS)
    }
}

/// Deliver carried resources to the most urgent matching request.
#[derive(Debug, Clone, Copy)]
pub struct Deliver;

impl Deliver {
    fn has_order(worker: &Worker<'_>, ctx: &TickContext<'_>, resource: ResourceKind) -> bool {
        ctx.matching()
            .get_delivery_order(worker.asker(), resource)
            .is_some()
    }
}

impl Behavior for Deliver {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Deliver
    }

    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool {
        worker
            .cargo()
            .is_some_and(|resource| Self::has_order(worker, ctx, resource))
    }

    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome {
        let Some(resource) = worker.cargo() else {
            worker.clear_target(ctx.claims);
            return ActionOutcome::Finished;
        };

        let target = if let Some(target) = worker.record.target {
            target
        } else {
            let Some(request) = ctx.matching().get_delivery_order(worker.asker(), resource)
            else {
                return ActionOutcome::Invalid;
            };
            if !worker.set_target(request.target_id, ctx.claims) {
                return ActionOutcome::Invalid;
            }
            request.target_id
        };

        let held = worker.creep.store.get(resource);
        let amount = ctx
            .cache
            .ledger()
            .needs_resources()
            .iter()
            .find(|r| r.target_id == target && r.resource == resource && r.exact)
            .map(|r| r.clamp(held));
        execute(worker, ctx, target, |sim, name| {
            sim.transfer(name, target, resource, amount)
        })
    }

    fn is_done(&self, worker: &Worker<'_>, _ctx: &TickContext<'_>) -> bool {
        worker.creep.store.is_empty() || worker.record.target.is_none()
    }

    fn max_ticks(&self) -> Option<u64> {
        Some(TRANSPORT_MAX_TICKS)
    }
}
