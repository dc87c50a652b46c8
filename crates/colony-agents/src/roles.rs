//! Static per-role configuration.
//!
//! A [`RoleConfig`] names the controller levels a role is spawned at, its
//! body tiers from weakest to strongest, the behaviors it runs in priority
//! order, the room condition that admits it, and how many of it a room
//! wants. The [`RoleBook`] holds one entry per enabled role and is built
//! once at process start.

use std::collections::BTreeMap;

use colony_types::{BehaviorKind, BodyPart, RoleKind, StructureKind};
use serde::{Deserialize, Serialize};

use crate::context::RoomCache;

use colony_types::BodyPart::{Attack as A, Carry as C, Move as M, Tough as T, Work as W};

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

/// Room condition a role needs before it is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// Always admitted.
    Always,
    /// The layout planner reports construction work.
    ConstructionSitesPresent,
    /// Hostile creeps are in the room.
    HostilesPresent,
    /// A storage or any container exists.
    StoresPresent,
}

impl Admission {
    /// Whether the room currently admits the role.
    pub fn admits(self, cache: &RoomCache) -> bool {
        let room = cache.room();
        match self {
            Self::Always => true,
            Self::ConstructionSitesPresent => cache.construction_wanted(),
            Self::HostilesPresent => room.has_hostiles(),
            Self::StoresPresent => {
                room.storage().is_some()
                    || room.structures_of(StructureKind::Container).next().is_some()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RoleConfig
// ---------------------------------------------------------------------------

/// Static configuration of one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    /// The role.
    pub role: RoleKind,
    /// Lowest controller level the role is spawned at.
    pub level_min: u8,
    /// Highest controller level the role is spawned at.
    pub level_max: u8,
    /// Body templates, weakest first.
    pub body_tiers: Vec<Vec<BodyPart>>,
    /// Fewest parts an emergency body may be shrunk to.
    pub min_parts: usize,
    /// Behaviors in priority order; the first that can run wins.
    pub behaviors: Vec<BehaviorKind>,
    /// Room condition for spawning. `None` means the role is not spawned.
    pub admission: Option<Admission>,
    /// Live workers of this role wanted per room.
    pub quota: u32,
}

impl RoleConfig {
    /// Whether the role is spawned at controller `level`.
    pub const fn level_allows(&self, level: u8) -> bool {
        level >= self.level_min && level <= self.level_max
    }
}

// ---------------------------------------------------------------------------
// RoleBook
// ---------------------------------------------------------------------------

/// The role table, iterated in spawn priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBook {
    roles: BTreeMap<RoleKind, RoleConfig>,
}

impl RoleBook {
    /// The built-in role table.
    pub fn standard() -> Self {
        let roles = [
            RoleConfig {
                role: RoleKind::Harvester,
                level_min: 1,
                level_max: 8,
                body_tiers: vec![
                    vec![W, C, M],
                    vec![W, W, C, M],
                    vec![W, W, W, C, M, M],
                    vec![W, W, W, W, W, C, M, M, M],
                ],
                min_parts: 3,
                behaviors: vec![
                    BehaviorKind::Harvest,
                    BehaviorKind::Deliver,
                    BehaviorKind::Upgrade,
                ],
                admission: Some(Admission::Always),
                quota: 2,
            },
            RoleConfig {
                role: RoleKind::Transporter,
                level_min: 2,
                level_max: 8,
                body_tiers: vec![
                    vec![C, C, M],
                    vec![C, C, C, C, M, M],
                    vec![C, C, C, C, C, C, M, M, M],
                    vec![C, C, C, C, C, C, C, C, C, C, M, M, M, M, M],
                ],
                min_parts: 2,
                behaviors: vec![BehaviorKind::Deliver, BehaviorKind::Collect],
                admission: Some(Admission::StoresPresent),
                quota: 2,
            },
            RoleConfig {
                role: RoleKind::Upgrader,
                level_min: 1,
                level_max: 8,
                body_tiers: vec![
                    vec![W, C, M],
                    vec![W, W, C, M],
                    vec![W, W, W, C, C, M, M],
                    vec![W, W, W, W, W, C, C, M, M, M],
                ],
                min_parts: 3,
                behaviors: vec![BehaviorKind::Upgrade, BehaviorKind::Refill],
                admission: Some(Admission::Always),
                quota: 2,
            },
            RoleConfig {
                role: RoleKind::Constructor,
                level_min: 1,
                level_max: 8,
                body_tiers: vec![
                    vec![W, C, M],
                    vec![W, W, C, C, M, M],
                    vec![W, W, W, C, C, C, M, M, M],
                ],
                min_parts: 3,
                behaviors: vec![
                    BehaviorKind::Build,
                    BehaviorKind::Repair,
                    BehaviorKind::Upgrade,
                    BehaviorKind::Refill,
                    BehaviorKind::Harvest,
                ],
                admission: Some(Admission::ConstructionSitesPresent),
                quota: 1,
            },
            RoleConfig {
                role: RoleKind::Defender,
                level_min: 3,
                level_max: 8,
                body_tiers: vec![
                    vec![T, A, M, M],
                    vec![T, T, A, A, M, M, M, M],
                    vec![T, T, T, T, A, A, A, A, M, M, M, M, M, M, M, M],
                ],
                min_parts: 3,
                behaviors: vec![BehaviorKind::Defend],
                admission: Some(Admission::HostilesPresent),
                quota: 1,
            },
            RoleConfig {
                role: RoleKind::Scout,
                level_min: 4,
                level_max: 8,
                body_tiers: vec![vec![M]],
                min_parts: 1,
                behaviors: vec![BehaviorKind::Scout],
                admission: Some(Admission::Always),
                quota: 0,
            },
        ];
        Self::from_configs(roles)
    }

    /// A book holding exactly `configs`; later entries replace earlier ones
    /// for the same role.
    pub fn from_configs(configs: impl IntoIterator<Item = RoleConfig>) -> Self {
        Self {
            roles: configs.into_iter().map(|c| (c.role, c)).collect(),
        }
    }

    /// Configuration of `role`, if enabled.
    pub fn get(&self, role: RoleKind) -> Option<&RoleConfig> {
        self.roles.get(&role)
    }

    /// Mutable configuration of `role`, if enabled.
    pub fn get_mut(&mut self, role: RoleKind) -> Option<&mut RoleConfig> {
        self.roles.get_mut(&role)
    }

    /// Remove `role`; its workers idle and it is never spawned.
    pub fn disable(&mut self, role: RoleKind) -> Option<RoleConfig> {
        self.roles.remove(&role)
    }

    /// Enabled roles in spawn priority order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleConfig> + '_ {
        self.roles.values()
    }

    /// Number of enabled roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether no role is enabled.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleBook {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::body_cost;

    use super::*;

    #[test]
    fn tiers_grow_in_cost() {
        for config in RoleBook::standard().iter() {
            let costs: Vec<u32> = config.body_tiers.iter().map(|t| body_cost(t)).collect();
            assert!(
                costs.windows(2).all(|w| w.first() < w.get(1)),
                "{} tiers must be weakest first: {costs:?}",
                config.role
            );
            assert!(config.body_tiers.iter().all(|t| t.len() >= config.min_parts));
        }
    }

    #[test]
    fn every_role_is_in_the_standard_book() {
        let book = RoleBook::standard();
        assert_eq!(book.len(), RoleKind::ALL.len());
        let order: Vec<RoleKind> = book.iter().map(|c| c.role).collect();
        assert_eq!(order, RoleKind::ALL.to_vec());
    }

    #[test]
    fn disabled_roles_disappear() {
        let mut book = RoleBook::standard();
        assert!(book.disable(RoleKind::Scout).is_some());
        assert!(book.get(RoleKind::Scout).is_none());
        assert_eq!(book.len(), RoleKind::ALL.len().saturating_sub(1));
    }

    #[test]
    fn level_gate_is_inclusive() {
        let book = RoleBook::standard();
        let transporter = book.get(RoleKind::Transporter).unwrap();
        assert!(!transporter.level_allows(1));
        assert!(transporter.level_allows(2));
        assert!(transporter.level_allows(8));
    }
}
