//! Room model: structures, sources, ground objects, and hostiles.
//!
//! [`RoomState`] is the snapshot a room exposes to the control core each
//! tick. Effect calls mutate it through the [`Simulation`] implementation;
//! the core never mutates it directly.
//!
//! [`Simulation`]: crate::Simulation

use colony_types::{ObjectId, Position, ResourceKind, RoomName, StructureKind};

use crate::store::Store;

/// Energy a spawn holds at full.
pub const SPAWN_ENERGY_CAPACITY: u32 = 300;

/// Energy an extension adds to the room's spawn budget.
pub const EXTENSION_ENERGY_CAPACITY: u32 = 50;

/// Controller progress needed to leave each level, indexed by level.
const CONTROLLER_PROGRESS: [u32; 9] = [
    0, 200, 45_000, 135_000, 405_000, 1_215_000, 3_645_000, 10_935_000, 0,
];

/// Highest controller level.
pub const MAX_CONTROLLER_LEVEL: u8 = 8;

// ---------------------------------------------------------------------------
// Structures
// ---------------------------------------------------------------------------

/// An owned structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    /// Object id.
    pub id: ObjectId,
    /// Structure kind.
    pub kind: StructureKind,
    /// Tile the structure occupies.
    pub pos: Position,
    /// Resources held.
    pub store: Store,
    /// Current hit points.
    pub hits: u32,
    /// Maximum hit points.
    pub hits_max: u32,
    /// First tick the structure can act again (spawning, reactions).
    pub cooldown_until: u64,
}

impl Structure {
    /// A freshly built, undamaged, empty structure.
    pub fn new(kind: StructureKind, pos: Position) -> Self {
        let hits_max = default_hits(kind);
        Self {
            id: ObjectId::new(),
            kind,
            pos,
            store: Store::new(default_capacity(kind)),
            hits: hits_max,
            hits_max,
            cooldown_until: 0,
        }
    }

    /// Builder-style helper that fills the store.
    #[must_use]
    pub fn holding(mut self, resource: ResourceKind, amount: u32) -> Self {
        self.store.add(resource, amount);
        self
    }

    /// Builder-style helper that damages the structure.
    #[must_use]
    pub const fn damaged(mut self, hits: u32) -> Self {
        self.hits = if hits < self.hits_max { hits } else { self.hits_max };
        self
    }

    /// Whether the structure can act at tick `now`.
    pub const fn is_ready(&self, now: u64) -> bool {
        self.cooldown_until <= now
    }

    /// Whether the structure is below its maximum hit points.
    pub const fn needs_repair(&self) -> bool {
        self.hits < self.hits_max
    }
}

/// Store capacity of a freshly built structure.
#[allow(clippy::match_same_arms)] // Capacities are listed per kind to keep the table readable.
pub const fn default_capacity(kind: StructureKind) -> u32 {
    match kind {
        StructureKind::Spawn => SPAWN_ENERGY_CAPACITY,
        StructureKind::Extension => EXTENSION_ENERGY_CAPACITY,
        StructureKind::Tower => 1_000,
        StructureKind::Storage => 1_000_000,
        StructureKind::Terminal => 300_000,
        StructureKind::Container => 2_000,
        StructureKind::Link => 800,
        StructureKind::Lab => 3_000,
        StructureKind::PowerSpawn => 5_000,
        StructureKind::Nuker => 300_000,
        StructureKind::Extractor | StructureKind::Road | StructureKind::Wall => 0,
    }
}

/// Hit points of a freshly built structure.
#[allow(clippy::match_same_arms)] // Hit points are listed per kind to keep the table readable.
pub const fn default_hits(kind: StructureKind) -> u32 {
    match kind {
        StructureKind::Spawn => 5_000,
        StructureKind::Extension => 1_000,
        StructureKind::Tower => 3_000,
        StructureKind::Storage => 10_000,
        StructureKind::Terminal => 3_000,
        StructureKind::Container => 250_000,
        StructureKind::Link => 1_000,
        StructureKind::Lab => 500,
        StructureKind::PowerSpawn => 5_000,
        StructureKind::Nuker => 1_000,
        StructureKind::Extractor => 500,
        StructureKind::Road => 5_000,
        StructureKind::Wall => 1_000_000,
    }
}

// ---------------------------------------------------------------------------
// Natural and ground objects
// ---------------------------------------------------------------------------

/// An energy source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Object id.
    pub id: ObjectId,
    /// Tile.
    pub pos: Position,
    /// Energy left.
    pub energy: u32,
    /// Energy after regeneration.
    pub energy_capacity: u32,
    /// Interval between regenerations.
    pub regen_interval: u64,
    /// Tick of the next regeneration.
    pub regen_at: u64,
}

impl Source {
    /// A full source regenerating every 300 ticks.
    pub fn new(pos: Position, energy_capacity: u32) -> Self {
        Self {
            id: ObjectId::new(),
            pos,
            energy: energy_capacity,
            energy_capacity,
            regen_interval: 300,
            regen_at: 300,
        }
    }
}

/// A mineral deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mineral {
    /// Object id.
    pub id: ObjectId,
    /// Tile.
    pub pos: Position,
    /// Mineral kind.
    pub kind: ResourceKind,
    /// Amount left.
    pub amount: u32,
}

/// A resource pile lying on the ground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedResource {
    /// Object id.
    pub id: ObjectId,
    /// Tile.
    pub pos: Position,
    /// Resource kind.
    pub resource: ResourceKind,
    /// Amount in the pile.
    pub amount: u32,
}

/// What remains of a worker that died, with its carried store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tombstone {
    /// Object id.
    pub id: ObjectId,
    /// Tile.
    pub pos: Position,
    /// Resources left behind.
    pub store: Store,
    /// Tick at which the tombstone disappears.
    pub decays_at: u64,
}

/// A planned structure that workers build up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionSite {
    /// Object id.
    pub id: ObjectId,
    /// Tile.
    pub pos: Position,
    /// Structure that appears when complete.
    pub kind: StructureKind,
    /// Progress so far.
    pub progress: u32,
    /// Progress needed.
    pub progress_total: u32,
}

impl ConstructionSite {
    /// A new site with no progress.
    pub fn new(kind: StructureKind, pos: Position, progress_total: u32) -> Self {
        Self {
            id: ObjectId::new(),
            pos,
            kind,
            progress: 0,
            progress_total,
        }
    }
}

/// The room controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    /// Object id.
    pub id: ObjectId,
    /// Tile.
    pub pos: Position,
    /// Current level, `0..=8`.
    pub level: u8,
    /// Progress toward the next level.
    pub progress: u32,
}

impl Controller {
    /// A controller at the given level with no progress.
    pub fn new(pos: Position, level: u8) -> Self {
        Self {
            id: ObjectId::new(),
            pos,
            level: level.min(MAX_CONTROLLER_LEVEL),
            progress: 0,
        }
    }

    /// Progress required to reach the next level (0 at max level).
    pub fn progress_total(&self) -> u32 {
        CONTROLLER_PROGRESS
            .get(usize::from(self.level))
            .copied()
            .unwrap_or(0)
    }
}

/// A hostile creep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hostile {
    /// Object id.
    pub id: ObjectId,
    /// Tile.
    pub pos: Position,
    /// Hit points left.
    pub hits: u32,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// Everything visible in one owned room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    /// Room name.
    pub name: RoomName,
    /// The controller, if the room has one.
    pub controller: Option<Controller>,
    /// Owned structures in discovery order.
    pub structures: Vec<Structure>,
    /// Energy sources.
    pub sources: Vec<Source>,
    /// Mineral deposits.
    pub minerals: Vec<Mineral>,
    /// Resource piles on the ground.
    pub dropped: Vec<DroppedResource>,
    /// Tombstones.
    pub tombstones: Vec<Tombstone>,
    /// Construction sites.
    pub construction_sites: Vec<ConstructionSite>,
    /// Hostile creeps.
    pub hostiles: Vec<Hostile>,
}

impl RoomState {
    /// An empty room.
    pub const fn new(name: RoomName) -> Self {
        Self {
            name,
            controller: None,
            structures: Vec::new(),
            sources: Vec::new(),
            minerals: Vec::new(),
            dropped: Vec::new(),
            tombstones: Vec::new(),
            construction_sites: Vec::new(),
            hostiles: Vec::new(),
        }
    }

    /// Controller level (0 without a controller).
    pub fn level(&self) -> u8 {
        self.controller.as_ref().map_or(0, |c| c.level)
    }

    /// Structures of one kind, in discovery order.
    pub fn structures_of(&self, kind: StructureKind) -> impl Iterator<Item = &Structure> + '_ {
        self.structures.iter().filter(move |s| s.kind == kind)
    }

    /// Structure by id.
    pub fn structure(&self, id: ObjectId) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }

    /// Mutable structure by id.
    pub fn structure_mut(&mut self, id: ObjectId) -> Option<&mut Structure> {
        self.structures.iter_mut().find(|s| s.id == id)
    }

    /// The first storage, if built.
    pub fn storage(&self) -> Option<&Structure> {
        self.structures_of(StructureKind::Storage).next()
    }

    /// The first terminal, if built.
    pub fn terminal(&self) -> Option<&Structure> {
        self.structures_of(StructureKind::Terminal).next()
    }

    /// Number of built extensions.
    pub fn extension_count(&self) -> u32 {
        let count = self.structures_of(StructureKind::Extension).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Energy currently available for spawning.
    pub fn energy_available(&self) -> u32 {
        self.structures
            .iter()
            .filter(|s| matches!(s.kind, StructureKind::Spawn | StructureKind::Extension))
            .fold(0_u32, |total, s| {
                total.saturating_add(s.store.get(ResourceKind::Energy))
            })
    }

    /// Whether hostile creeps are present.
    pub fn has_hostiles(&self) -> bool {
        !self.hostiles.is_empty()
    }

    /// Spawns that are not busy at tick `now`.
    pub fn idle_spawns(&self, now: u64) -> impl Iterator<Item = &Structure> + '_ {
        self.structures_of(StructureKind::Spawn)
            .filter(move |s| s.is_ready(now))
    }

    /// Position of any object in the room.
    pub fn position_of(&self, id: ObjectId) -> Option<Position> {
        if let Some(c) = self.controller.as_ref().filter(|c| c.id == id) {
            return Some(c.pos);
        }
        self.structure(id)
            .map(|s| s.pos)
            .or_else(|| self.sources.iter().find(|s| s.id == id).map(|s| s.pos))
            .or_else(|| self.minerals.iter().find(|m| m.id == id).map(|m| m.pos))
            .or_else(|| self.dropped.iter().find(|d| d.id == id).map(|d| d.pos))
            .or_else(|| self.tombstones.iter().find(|t| t.id == id).map(|t| t.pos))
            .or_else(|| {
                self.construction_sites
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.pos)
            })
            .or_else(|| self.hostiles.iter().find(|h| h.id == id).map(|h| h.pos))
    }
}
