//! The per-tick, per-room resource ledger.
//!
//! A [`ResourceLedger`] owns a snapshot of one room taken at tick start.
//! [`ResourceLedger::gives_resources`] and [`ResourceLedger::needs_resources`]
//! scan that snapshot at most once each; later calls in the same tick return
//! the same slice. A new ledger is built every tick, so nothing carries over.

use std::cell::OnceCell;

use colony_types::{LedgerSummary, ObjectId, RoleKind, RoomRecord, WorkerName};
use colony_world::{Creep, RoomState};

use crate::entry::{ResourceOffer, ResourceRequest};
use crate::scan::{scan_offers, scan_requests};
use crate::thresholds::LedgerThresholds;

/// A worker in the room as the ledger sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomWorker {
    /// Worker name.
    pub name: WorkerName,
    /// Object id, the target of requests for this worker.
    pub id: ObjectId,
    /// Role from the worker's memory record.
    pub role: RoleKind,
    /// Energy carried.
    pub energy: u32,
    /// Free carry capacity.
    pub free_capacity: u32,
    /// Total carry capacity.
    pub carry_capacity: u32,
}

impl RoomWorker {
    /// Snapshot a live worker with its role.
    pub fn from_creep(creep: &Creep, role: RoleKind) -> Self {
        Self {
            name: creep.name.clone(),
            id: creep.id,
            role,
            energy: creep.energy(),
            free_capacity: creep.store.free(),
            carry_capacity: creep.carry_capacity(),
        }
    }

    /// Whether the worker is below half of its carry capacity.
    pub const fn needs_energy(&self) -> bool {
        self.carry_capacity > 0 && self.energy < self.carry_capacity / 2
    }
}

/// Memoised offers and requests for one room and one tick.
#[derive(Debug)]
pub struct ResourceLedger {
    room: RoomState,
    record: RoomRecord,
    workers: Vec<RoomWorker>,
    thresholds: LedgerThresholds,
    offers: OnceCell<Vec<ResourceOffer>>,
    requests: OnceCell<Vec<ResourceRequest>>,
}

impl ResourceLedger {
    /// Build a ledger over a tick-start snapshot. Nothing is scanned yet.
    pub const fn new(
        room: RoomState,
        record: RoomRecord,
        workers: Vec<RoomWorker>,
        thresholds: LedgerThresholds,
    ) -> Self {
        Self {
            room,
            record,
            workers,
            thresholds,
            offers: OnceCell::new(),
            requests: OnceCell::new(),
        }
    }

    /// The room snapshot.
    pub const fn room(&self) -> &RoomState {
        &self.room
    }

    /// The room record snapshot.
    pub const fn record(&self) -> &RoomRecord {
        &self.record
    }

    /// Workers in the room at tick start.
    pub fn workers(&self) -> &[RoomWorker] {
        &self.workers
    }

    /// Offers, sorted descending by priority. Scanned on first call.
    pub fn gives_resources(&self) -> &[ResourceOffer] {
        self.offers
            .get_or_init(|| scan_offers(&self.room, &self.record, &self.thresholds))
    }

    /// Requests, sorted ascending by priority. Scanned on first call.
    pub fn needs_resources(&self) -> &[ResourceRequest] {
        self.requests.get_or_init(|| {
            scan_requests(&self.room, &self.record, &self.workers, &self.thresholds)
        })
    }

    /// Offer and request counts for the room record.
    pub fn summary(&self, tick: u64) -> LedgerSummary {
        LedgerSummary {
            tick,
            offers: u32::try_from(self.gives_resources().len()).unwrap_or(u32::MAX),
            requests: u32::try_from(self.needs_resources().len()).unwrap_or(u32::MAX),
        }
    }
}
