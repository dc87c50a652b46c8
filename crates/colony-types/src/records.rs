//! Persistent memory records.
//!
//! The simulation keeps a single raw memory string between ticks. The core
//! decodes it into a [`MemoryDocument`] at tick start and encodes it back at
//! tick end; nothing else reads or writes the raw form. Each entity kind has
//! an explicit record with named optional fields:
//!
//! - [`WorkerRecord`] -- one per live worker, keyed by [`WorkerName`].
//! - [`RoomRecord`] -- one per owned room, keyed by [`RoomName`].
//! - [`LabRecord`] -- one per lab assigned to a reaction cluster.
//!
//! Round trips are exact for `role`, `target`, and `current_behavior`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{BehaviorKind, LabRole, LabStatus, ResourceKind, RoleKind};
use crate::ids::{ObjectId, RoomName, WorkerName};
use crate::position::Position;

/// Current memory layout version written by [`MemoryDocument::encode`].
pub const MEMORY_VERSION: u32 = 1;

/// Errors that can occur at the memory encode/decode boundary.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The raw memory is not a valid document.
    #[error("failed to decode memory: {source}")]
    Decode {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The document could not be serialized.
    #[error("failed to encode memory: {source}")]
    Encode {
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The document was written by a newer layout than this build understands.
    #[error("unsupported memory version {found} (supported up to {supported})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Highest version this build reads.
        supported: u32,
    },
}

/// Persistent state of one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// The worker's role.
    pub role: RoleKind,

    /// The object the current behavior is working on.
    #[serde(default)]
    pub target: Option<ObjectId>,

    /// The behavior the worker is running (`None` = idle).
    #[serde(default)]
    pub current_behavior: Option<BehaviorKind>,

    /// Tick at which `current_behavior` was selected.
    #[serde(default)]
    pub behavior_since: Option<u64>,

    /// Tick the worker was spawned.
    pub born: u64,

    /// Room energy capacity at the time the worker was spawned.
    pub born_energy_level: u32,

    /// Resource the worker picked up for a transport order.
    #[serde(default)]
    pub carrying: Option<ResourceKind>,

    /// Free-form fields owned by individual behaviors.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl WorkerRecord {
    /// Initial record for a freshly spawned worker.
    pub const fn spawned(role: RoleKind, born: u64, born_energy_level: u32) -> Self {
        Self {
            role,
            target: None,
            current_behavior: None,
            behavior_since: None,
            born,
            born_energy_level,
            carrying: None,
            custom: BTreeMap::new(),
        }
    }
}

/// Persistent state of a lab that belongs to a reaction cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabRecord {
    /// Whether transporters should fill or empty the lab.
    #[serde(default)]
    pub status: Option<LabStatus>,

    /// Input or output position in the cluster.
    #[serde(default)]
    pub role: Option<LabRole>,

    /// Reagent (inputs) or product (output) the lab is assigned to.
    #[serde(default)]
    pub resource: Option<ResourceKind>,

    /// The other two labs in the cluster.
    #[serde(default)]
    pub partners: Vec<ObjectId>,
}

/// Result of the room structural classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomClassification {
    /// Tick the classification was computed.
    pub classified_at: u64,

    /// Links away from every source; they receive energy and are emptied
    /// by transporters.
    #[serde(default)]
    pub receiver_links: BTreeSet<ObjectId>,

    /// Links next to a source.
    #[serde(default)]
    pub sender_links: BTreeSet<ObjectId>,

    /// Containers next to a source or the extractor.
    #[serde(default)]
    pub source_containers: BTreeSet<ObjectId>,

    /// Container next to the controller, if any.
    #[serde(default)]
    pub controller_container: Option<ObjectId>,

    /// Centre of the zone near the controller that offers must not drain.
    #[serde(default)]
    pub protected_center: Option<Position>,

    /// Radius of the protected zone.
    #[serde(default)]
    pub protected_range: u8,
}

impl RoomClassification {
    /// Whether `pos` lies inside the protected zone near the controller.
    pub const fn is_protected(&self, pos: Position) -> bool {
        match self.protected_center {
            Some(center) => center.in_range_to(pos, self.protected_range),
            None => false,
        }
    }
}

/// Offer and request counts from the most recent ledger build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Tick the ledger was built.
    pub tick: u64,
    /// Number of offers.
    pub offers: u32,
    /// Number of requests.
    pub requests: u32,
}

/// Persistent state of one owned room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Anchor chosen by the layout planner.
    #[serde(default)]
    pub planned_center: Option<Position>,

    /// Ledger counts from the last tick, when enabled.
    #[serde(default)]
    pub ledger_summary: Option<LedgerSummary>,

    /// Lab cluster assignments keyed by lab id.
    #[serde(default)]
    pub labs: BTreeMap<ObjectId, LabRecord>,

    /// First tick each controller level was observed.
    #[serde(default)]
    pub rcl_upgrade_times: BTreeMap<u8, u64>,

    /// Latest structural classification.
    #[serde(default)]
    pub classification: Option<RoomClassification>,
}

impl RoomRecord {
    /// The assignment of a lab, if it has a status.
    pub fn lab_status(&self, lab: ObjectId) -> Option<LabStatus> {
        self.labs.get(&lab).and_then(|record| record.status)
    }
}

/// The whole persistent memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDocument {
    /// Layout version.
    #[serde(default)]
    pub version: u32,

    /// Wall-clock time of the last encode.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,

    /// Worker records keyed by worker name.
    #[serde(default)]
    pub workers: BTreeMap<WorkerName, WorkerRecord>,

    /// Room records keyed by room name.
    #[serde(default)]
    pub rooms: BTreeMap<RoomName, RoomRecord>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self {
            version: MEMORY_VERSION,
            saved_at: None,
            workers: BTreeMap::new(),
            rooms: BTreeMap::new(),
        }
    }
}

impl MemoryDocument {
    /// Decode raw memory.
    ///
    /// Blank memory decodes to an empty document. Documents without a
    /// version (written before versioning) are upgraded in place.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Decode`] for malformed input and
    /// [`MemoryError::UnsupportedVersion`] for documents newer than
    /// [`MEMORY_VERSION`].
    pub fn decode(raw: &str) -> Result<Self, MemoryError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut doc: Self =
            serde_json::from_str(raw).map_err(|source| MemoryError::Decode { source })?;
        if doc.version > MEMORY_VERSION {
            return Err(MemoryError::UnsupportedVersion {
                found: doc.version,
                supported: MEMORY_VERSION,
            });
        }
        doc.version = MEMORY_VERSION;
        Ok(doc)
    }

    /// Encode the document for storage.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, MemoryError> {
        serde_json::to_string(self).map_err(|source| MemoryError::Encode { source })
    }

    /// The room record, created empty on first access.
    pub fn room_mut(&mut self, room: &RoomName) -> &mut RoomRecord {
        self.rooms.entry(room.clone()).or_default()
    }
}
