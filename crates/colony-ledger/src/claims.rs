//! Live view of which worker holds which exclusive target.
//!
//! Built from worker records at tick start and updated the moment a worker
//! commits to or releases a target, so a worker processed later in the same
//! tick already sees the claim.

use std::collections::BTreeMap;

use colony_types::{BehaviorKind, ObjectId, WorkerName, WorkerRecord};
use tracing::warn;

/// Exclusive target holders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetClaims {
    holders: BTreeMap<ObjectId, WorkerName>,
}

impl TargetClaims {
    /// An empty claim set.
    pub const fn new() -> Self {
        Self {
            holders: BTreeMap::new(),
        }
    }

    /// Claims held by workers whose current behavior has an exclusive
    /// target. When memory holds two workers on one target the first (in
    /// name order) keeps it.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = (&'a WorkerName, &'a WorkerRecord)>,
    ) -> Self {
        let mut claims = Self::new();
        for (name, record) in records {
            let exclusive = record
                .current_behavior
                .is_some_and(BehaviorKind::has_exclusive_target);
            if exclusive
                && let Some(target) = record.target
                && !claims.claim(target, name)
            {
                warn!(worker = %name, %target, "Duplicate exclusive target in memory");
            }
        }
        claims
    }

    /// The worker holding `target`, if any.
    pub fn holder(&self, target: ObjectId) -> Option<&WorkerName> {
        self.holders.get(&target)
    }

    /// Whether a worker other than `worker` holds `target`.
    pub fn is_claimed_by_other(&self, target: ObjectId, worker: &WorkerName) -> bool {
        self.holders.get(&target).is_some_and(|h| h != worker)
    }

    /// Claim `target` for `worker`. Fails if another worker holds it.
    pub fn claim(&mut self, target: ObjectId, worker: &WorkerName) -> bool {
        if self.is_claimed_by_other(target, worker) {
            return false;
        }
        self.holders.insert(target, worker.clone());
        true
    }

    /// Release `target` if `worker` holds it.
    pub fn release(&mut self, target: ObjectId, worker: &WorkerName) {
        if self.holders.get(&target).is_some_and(|h| h == worker) {
            self.holders.remove(&target);
        }
    }

    /// Number of held claims.
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    /// Whether no claims are held.
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use colony_types::RoleKind;

    use super::*;

    fn record(behavior: BehaviorKind, target: ObjectId) -> WorkerRecord {
        let mut record = WorkerRecord::spawned(RoleKind::Transporter, 0, 300);
        record.current_behavior = Some(behavior);
        record.target = Some(target);
        record
    }

    #[test]
    fn only_exclusive_behaviors_claim() {
        let a = WorkerName::new("a");
        let b = WorkerName::new("b");
        let ra = record(BehaviorKind::Collect, ObjectId::new());
        let rb = record(BehaviorKind::Upgrade, ObjectId::new());
        let claims = TargetClaims::from_records([(&a, &ra), (&b, &rb)]);
        assert_eq!(claims.len(), 1);
        assert_eq!(ra.target.and_then(|t| claims.holder(t)), Some(&a));
    }

    #[test]
    fn duplicate_targets_keep_first_holder() {
        let target = ObjectId::new();
        let a = WorkerName::new("a");
        let b = WorkerName::new("b");
        let ra = record(BehaviorKind::Collect, target);
        let rb = record(BehaviorKind::Deliver, target);
        let claims = TargetClaims::from_records([(&a, &ra), (&b, &rb)]);
        assert_eq!(claims.holder(target), Some(&a));
        assert!(claims.is_claimed_by_other(target, &b));
        assert!(!claims.is_claimed_by_other(target, &a));
    }

    #[test]
    fn release_only_by_holder() {
        let target = ObjectId::new();
        let a = WorkerName::new("a");
        let b = WorkerName::new("b");
        let mut claims = TargetClaims::new();
        assert!(claims.claim(target, &a));
        assert!(!claims.claim(target, &b));
        claims.release(target, &b);
        assert_eq!(claims.holder(target), Some(&a));
        claims.release(target, &a);
        assert!(claims.is_empty());
    }
}
