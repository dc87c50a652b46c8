//! Compute budget backpressure.
//!
//! Structural room classification is the one expensive analysis in a tick.
//! It runs only while the simulation's compute bucket is at or above
//! `classification_min_cpu` and the stored result is missing or older than
//! `classification_interval`. Otherwise the stored classification, possibly
//! none, stays in use.

use colony_types::RoomRecord;
use colony_world::{RoomState, classify_room};
use tracing::{debug, trace};

use crate::config::BudgetConfig;

/// Why the classification pass did or did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The room was classified this tick.
    Refreshed,
    /// The stored classification is recent enough.
    Current,
    /// The compute bucket is too low; the pass was deferred.
    Deferred,
}

/// Whether the room is due for classification.
pub const fn is_due(config: &BudgetConfig, record: &RoomRecord, tick: u64) -> bool {
    match &record.classification {
        None => true,
        Some(c) => tick.saturating_sub(c.classified_at) >= config.classification_interval,
    }
}

/// Refresh the room's classification if it is due and the bucket allows.
pub fn refresh_classification(
    config: &BudgetConfig,
    room: &RoomState,
    record: &mut RoomRecord,
    tick: u64,
    cpu_bucket: u32,
) -> Classification {
    if !is_due(config, record, tick) {
        return Classification::Current;
    }
    if cpu_bucket < config.classification_min_cpu {
        trace!(
            room = %room.name,
            cpu_bucket,
            min = config.classification_min_cpu,
            "Classification deferred"
        );
        return Classification::Deferred;
    }
    let classification = classify_room(room, tick, config.protected_range);
    debug!(
        room = %room.name,
        tick,
        receiver_links = classification.receiver_links.len(),
        source_containers = classification.source_containers.len(),
        controller_container = classification.controller_container.is_some(),
        "Room classified"
    );
    record.classification = Some(classification);
    Classification::Refreshed
}

#[cfg(test)]
mod tests {
    use colony_types::RoomName;

    use super::*;

    #[test]
    fn low_bucket_defers_classification() {
        let room = RoomState::new(RoomName::new("W1N1"));
        let mut record = RoomRecord::default();
        let config = BudgetConfig::default();
        let low = config.classification_min_cpu.saturating_sub(1);
        assert_eq!(
            refresh_classification(&config, &room, &mut record, 10, low),
            Classification::Deferred
        );
        assert!(record.classification.is_none());
    }

    #[test]
    fn classification_refreshes_on_interval() {
        let room = RoomState::new(RoomName::new("W1N1"));
        let mut record = RoomRecord::default();
        let config = BudgetConfig::default();
        let full = config.classification_min_cpu;
        assert_eq!(
            refresh_classification(&config, &room, &mut record, 10, full),
            Classification::Refreshed
        );
        assert_eq!(
            refresh_classification(&config, &room, &mut record, 50, full),
            Classification::Current
        );
        let later = 10_u64.saturating_add(config.classification_interval);
        assert_eq!(
            refresh_classification(&config, &room, &mut record, later, full),
            Classification::Refreshed
        );
        assert_eq!(
            record.classification.map(|c| c.classified_at),
            Some(later)
        );
    }
}
