//! Enumeration types for the colony control core.
//!
//! Resources, body parts and their spawn costs, structure kinds, the closed
//! set of action result codes returned by the simulation, worker roles,
//! behavior tags, and lab assignment state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource that can be stored, carried, dropped, or transported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Energy, the universal currency of the room economy.
    Energy,
    /// Base mineral H.
    Hydrogen,
    /// Base mineral O.
    Oxygen,
    /// Base mineral U.
    Utrium,
    /// Base mineral K.
    Keanium,
    /// Base mineral L.
    Lemergium,
    /// Base mineral Z.
    Zynthium,
    /// Base mineral X.
    Catalyst,
    /// Compound OH, produced from hydrogen and oxygen.
    Hydroxide,
    /// Compound ZK, produced from zynthium and keanium.
    ZynthiumKeanite,
    /// Compound UL, produced from utrium and lemergium.
    UtriumLemergite,
    /// Compound G, produced from ZK and UL.
    Ghodium,
}

impl ResourceKind {
    /// Every resource kind, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Energy,
        Self::Hydrogen,
        Self::Oxygen,
        Self::Utrium,
        Self::Keanium,
        Self::Lemergium,
        Self::Zynthium,
        Self::Catalyst,
        Self::Hydroxide,
        Self::ZynthiumKeanite,
        Self::UtriumLemergite,
        Self::Ghodium,
    ];

    /// Whether this resource is anything other than energy.
    pub const fn is_mineral(self) -> bool {
        !matches!(self, Self::Energy)
    }
}

/// Known lab reactions as `(reagent, reagent, product)`.
pub const REACTIONS: [(ResourceKind, ResourceKind, ResourceKind); 4] = [
    (ResourceKind::Hydrogen, ResourceKind::Oxygen, ResourceKind::Hydroxide),
    (ResourceKind::Zynthium, ResourceKind::Keanium, ResourceKind::ZynthiumKeanite),
    (ResourceKind::Utrium, ResourceKind::Lemergium, ResourceKind::UtriumLemergite),
    (ResourceKind::ZynthiumKeanite, ResourceKind::UtriumLemergite, ResourceKind::Ghodium),
];

/// Product of combining two reagents, in either order.
pub fn reaction_product(a: ResourceKind, b: ResourceKind) -> Option<ResourceKind> {
    REACTIONS
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, product)| *product)
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Energy => "energy",
            Self::Hydrogen => "H",
            Self::Oxygen => "O",
            Self::Utrium => "U",
            Self::Keanium => "K",
            Self::Lemergium => "L",
            Self::Zynthium => "Z",
            Self::Catalyst => "X",
            Self::Hydroxide => "OH",
            Self::ZynthiumKeanite => "ZK",
            Self::UtriumLemergite => "UL",
            Self::Ghodium => "G",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Body parts
// ---------------------------------------------------------------------------

/// A single part of a worker's body. The body determines what the worker
/// can do and how much it costs to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    /// Movement.
    Move,
    /// Harvesting, building, repairing, upgrading.
    Work,
    /// Carry capacity (50 per part).
    Carry,
    /// Melee attack.
    Attack,
    /// Ranged attack.
    RangedAttack,
    /// Healing.
    Heal,
    /// Cheap hit points.
    Tough,
}

impl BodyPart {
    /// Spawn cost of this part in energy.
    #[allow(clippy::match_same_arms)] // Move and Carry share a price but are listed separately for readability.
    pub const fn cost(self) -> u32 {
        match self {
            Self::Move => 50,
            Self::Carry => 50,
            Self::Work => 100,
            Self::Attack => 80,
            Self::RangedAttack => 150,
            Self::Heal => 200,
            Self::Tough => 10,
        }
    }
}

/// Carry capacity contributed by a single `Carry` part.
pub const CARRY_CAPACITY_PER_PART: u32 = 50;

/// Total spawn cost of a body.
pub fn body_cost(body: &[BodyPart]) -> u32 {
    body.iter()
        .fold(0_u32, |total, part| total.saturating_add(part.cost()))
}

/// Number of parts of the given kind in a body.
pub fn count_parts(body: &[BodyPart], kind: BodyPart) -> u32 {
    let count = body.iter().filter(|part| **part == kind).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Structures
// ---------------------------------------------------------------------------

/// The kind of an owned structure inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Spawns new workers; holds 300 energy.
    Spawn,
    /// Adds 50 energy to the room's spawn budget.
    Extension,
    /// Defensive turret fed with energy.
    Tower,
    /// Large general-purpose store.
    Storage,
    /// Trade store, second general-purpose store.
    Terminal,
    /// Small store placed next to sources, extractors, or the controller.
    Container,
    /// Remote energy teleport.
    Link,
    /// Mineral reaction vessel.
    Lab,
    /// Power processing structure.
    PowerSpawn,
    /// Long range launcher, slowly filled with energy.
    Nuker,
    /// Allows harvesting the room's mineral deposit.
    Extractor,
    /// Damaged by decay, needs repair.
    Road,
    /// Player built wall.
    Wall,
}

// ---------------------------------------------------------------------------
// Action result codes
// ---------------------------------------------------------------------------

/// Result code returned by every effect call into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionCode {
    /// The action was accepted.
    Ok,
    /// The target is too far away.
    NotInRange,
    /// The actor or target does not hold enough of the resource.
    NotEnoughResources,
    /// The target does not exist or cannot be acted on this way.
    InvalidTarget,
    /// The actor is busy (still spawning, already spawning).
    Busy,
    /// The receiving store (or the actor's own store) is full.
    Full,
    /// Any other result.
    Unknown,
}

impl ActionCode {
    /// Whether the action succeeded.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

// ---------------------------------------------------------------------------
// Roles and behaviors
// ---------------------------------------------------------------------------

/// A worker role. Each role has a static configuration in the role book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Mines sources and feeds spawns early on.
    Harvester,
    /// Moves resources from offers to requests.
    Transporter,
    /// Spends energy on the room controller.
    Upgrader,
    /// Builds construction sites and repairs damaged structures.
    Constructor,
    /// Fights hostile creeps.
    Defender,
    /// Wanders the room edges to keep vision.
    Scout,
}

impl RoleKind {
    /// Every role, in spawn priority order.
    pub const ALL: [Self; 6] = [
        Self::Harvester,
        Self::Transporter,
        Self::Upgrader,
        Self::Constructor,
        Self::Defender,
        Self::Scout,
    ];

    /// Lowercase role name used in worker names and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harvester => "harvester",
            Self::Transporter => "transporter",
            Self::Upgrader => "upgrader",
            Self::Constructor => "constructor",
            Self::Defender => "defender",
            Self::Scout => "scout",
        }
    }
}

impl core::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag naming one behavior in the closed behavior set.
///
/// Persisted in worker memory as the worker's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Harvest energy from a source.
    Harvest,
    /// Pick up the source side of a transport order.
    Collect,
    /// Deliver carried resources to the most urgent request.
    Deliver,
    /// Spend energy on the controller.
    Upgrade,
    /// Spend energy on a construction site.
    Build,
    /// Spend energy repairing a damaged structure.
    Repair,
    /// Withdraw energy from a nearby store for own use.
    Refill,
    /// Attack hostile creeps.
    Defend,
    /// Patrol the room edges. Never completes.
    Scout,
}

impl BehaviorKind {
    /// Every behavior tag, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Harvest,
        Self::Collect,
        Self::Deliver,
        Self::Upgrade,
        Self::Build,
        Self::Repair,
        Self::Refill,
        Self::Defend,
        Self::Scout,
    ];

    /// Behaviors whose target is a resource node that at most one worker
    /// may hold at a time.
    pub const fn has_exclusive_target(self) -> bool {
        matches!(self, Self::Collect | Self::Deliver)
    }

    /// Lowercase behavior name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harvest => "harvest",
            Self::Collect => "collect",
            Self::Deliver => "deliver",
            Self::Upgrade => "upgrade",
            Self::Build => "build",
            Self::Repair => "repair",
            Self::Refill => "refill",
            Self::Defend => "defend",
            Self::Scout => "scout",
        }
    }
}

impl core::fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Labs
// ---------------------------------------------------------------------------

/// Transport status of a lab assigned to a reaction cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabStatus {
    /// The lab should be emptied (reaction output).
    Empty,
    /// The lab should be filled with its assigned reagent (reaction input).
    Fill,
}

/// Position of a lab inside its reaction cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabRole {
    /// Holds one reagent.
    Input,
    /// Receives the reaction product.
    Output,
}
