//! The per-worker behavior state machine.
//!
//! A worker is either idle (`current_behavior == None`) or running one
//! behavior. Each call to [`WorkerScheduler::run`]:
//!
//! 1. skips workers whose role has no configuration,
//! 2. keeps the stored behavior unless it is unknown, missing from the
//!    role's list, done, overdue, or its target went stale,
//! 3. otherwise clears the target and scans the role's behavior list from
//!    the top, taking the first that can run,
//! 4. performs the selected behavior in the same call, or goes idle.
//!
//! There is no terminal state; the worker cycles until it dies.

use colony_types::BehaviorKind;
use tracing::{debug, warn};

use crate::behavior::{Behavior, BehaviorRegistry};
use crate::config::SchedulerConfig;
use crate::context::{TickContext, Worker};
use crate::outcome::ActionOutcome;
use crate::roles::{RoleBook, RoleConfig};

/// What one scheduler run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The worker's role is not configured; nothing happened.
    NoRole,
    /// No behavior could run; the worker is idle.
    Idle,
    /// A behavior was performed.
    Ran {
        /// The behavior performed.
        behavior: BehaviorKind,
        /// Whether it was just selected this call.
        switched: bool,
        /// The result of its action.
        outcome: ActionOutcome,
    },
}

/// Drives workers through their roles' behaviors.
#[derive(Debug, Clone, Copy)]
pub struct WorkerScheduler<'a> {
    registry: &'a BehaviorRegistry,
    roles: &'a RoleBook,
    config: SchedulerConfig,
}

impl<'a> WorkerScheduler<'a> {
    /// A scheduler over the given registry and role table.
    pub const fn new(
        registry: &'a BehaviorRegistry,
        roles: &'a RoleBook,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry,
            roles,
            config,
        }
    }

    /// Run one tick of `worker`.
    pub fn run(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> RunOutcome {
        let role = worker.record.role;
        let Some(role_config) = self.roles.get(role) else {
            debug!(worker = %worker.name(), %role, "No role configuration, skipping");
            return RunOutcome::NoRole;
        };

        if worker.creep.store.is_empty()
            && worker.record.current_behavior != Some(BehaviorKind::Collect)
        {
            worker.record.carrying = None;
        }

        let stored = worker.record.current_behavior.filter(|kind| {
            let listed = role_config.behaviors.contains(kind);
            if !listed {
                debug!(
                    worker = %worker.name(),
                    %role,
                    behavior = %kind,
                    "Stored behavior is not in the role's list"
                );
            }
            listed
        });
        let kept = match stored.and_then(|k| self.registry.get(k)) {
            Some(behavior) if !self.should_stop(behavior, worker, ctx) => Some(behavior),
            _ => None,
        };

        let (behavior, switched) = if let Some(behavior) = kept {
            (behavior, false)
        } else {
            worker.clear_target(ctx.claims);
            let Some(found) = self.search(role_config, worker, ctx) else {
                if let Some(previous) = worker.record.current_behavior.take() {
                    debug!(worker = %worker.name(), from = %previous, "Worker idle");
                }
                worker.record.behavior_since = None;
                return RunOutcome::Idle;
            };
            (found, true)
        };

        let outcome = behavior.perform(worker, ctx);
        RunOutcome::Ran {
            behavior: behavior.kind(),
            switched,
            outcome,
        }
    }

    /// Whether the stored behavior has to give way to a fresh search.
    fn should_stop(
        &self,
        behavior: &dyn Behavior,
        worker: &Worker<'_>,
        ctx: &TickContext<'_>,
    ) -> bool {
        if let Some(target) = worker.record.target {
            if ctx.sim.object_pos(target).is_none() {
                debug!(worker = %worker.name(), %target, "Target no longer resolves");
                return true;
            }
            if ctx.claims.is_claimed_by_other(target, worker.name()) {
                debug!(worker = %worker.name(), %target, "Target held by another worker");
                return true;
            }
        }

        if self.config.enforce_max_ticks
            && let Some(limit) = behavior.max_ticks()
            && let Some(since) = worker.record.behavior_since
            && ctx.tick().saturating_sub(since) > limit
        {
            warn!(
                worker = %worker.name(),
                behavior = %behavior.kind(),
                since,
                limit,
                "Behavior exceeded its tick bound"
            );
            return true;
        }

        behavior.is_done(worker, ctx)
    }

    /// First behavior in the role's list that can run, persisted as the
    /// worker's current behavior.
    fn search(
        &self,
        role_config: &RoleConfig,
        worker: &mut Worker<'_>,
        ctx: &TickContext<'_>,
    ) -> Option<&'static dyn Behavior> {
        let view: &Worker<'_> = worker;
        let found = role_config
            .behaviors
            .iter()
            .filter_map(|kind| self.registry.get(*kind))
            .find(|behavior| behavior.can_run(view, ctx))?;

        let kind = found.kind();
        if worker.record.current_behavior != Some(kind) {
            debug!(
                worker = %worker.name(),
                from = ?worker.record.current_behavior,
                to = %kind,
                tick = ctx.tick(),
                "Behavior transition"
            );
        }
        worker.record.current_behavior = Some(kind);
        worker.record.behavior_since = Some(ctx.tick());
        Some(found)
    }
}
