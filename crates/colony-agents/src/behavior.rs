//! The behavior interface and the registry that maps tags to behaviors.

use std::collections::BTreeMap;

use colony_types::BehaviorKind;

use crate::behaviors::{
    BUILD, COLLECT, DEFEND, DELIVER, HARVEST, REFILL, REPAIR, SCOUT, UPGRADE,
};
use crate::context::{TickContext, Worker};
use crate::outcome::ActionOutcome;

/// One unit of worker logic.
///
/// `can_run` and `is_done` must not issue effect calls; only `perform`
/// touches the simulation.
pub trait Behavior {
    /// The tag this behavior is registered under.
    fn kind(&self) -> BehaviorKind;

    /// Whether the worker should start this behavior now.
    fn can_run(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool;

    /// Do one tick of work, resolving a target first if none is held.
    fn perform(&self, worker: &mut Worker<'_>, ctx: &mut TickContext<'_>) -> ActionOutcome;

    /// Whether the behavior has run its course.
    fn is_done(&self, worker: &Worker<'_>, ctx: &TickContext<'_>) -> bool;

    /// Ticks after which a still-running behavior is abandoned. `None` means
    /// the behavior may run for as long as `is_done` says so.
    fn max_ticks(&self) -> Option<u64> {
        None
    }
}

/// Lookup table from [`BehaviorKind`] to its implementation.
pub struct BehaviorRegistry {
    behaviors: BTreeMap<BehaviorKind, &'static dyn Behavior>,
}

impl BehaviorRegistry {
    /// A registry with nothing registered.
    pub const fn empty() -> Self {
        Self {
            behaviors: BTreeMap::new(),
        }
    }

    /// A registry holding every built-in behavior.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for behavior in [
            &HARVEST as &'static dyn Behavior,
            &COLLECT,
            &DELIVER,
            &UPGRADE,
            &BUILD,
            &REPAIR,
            &REFILL,
            &DEFEND,
            &SCOUT,
        ] {
            registry.register(behavior);
        }
        registry
    }

    /// Register `behavior` under its own tag, replacing any previous entry.
    pub fn register(&mut self, behavior: &'static dyn Behavior) {
        self.behaviors.insert(behavior.kind(), behavior);
    }

    /// The behavior registered for `kind`.
    pub fn get(&self, kind: BehaviorKind) -> Option<&'static dyn Behavior> {
        self.behaviors.get(&kind).copied()
    }

    /// Number of registered behaviors.
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl core::fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.behaviors.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_tag() {
        let registry = BehaviorRegistry::standard();
        assert_eq!(registry.len(), BehaviorKind::ALL.len());
        for kind in BehaviorKind::ALL {
            assert_eq!(registry.get(kind).map(|b| b.kind()), Some(kind));
        }
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry = BehaviorRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get(BehaviorKind::Harvest).is_none());
    }
}
