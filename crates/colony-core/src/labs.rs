//! Lab reaction clusters.
//!
//! Labs react in clusters of three: two inputs filled with reagents and one
//! output that collects the product. The planner only decides which labs
//! belong together and what each one holds; transporters move the
//! resources because the ledger turns `Fill` labs into requests and `Empty`
//! labs into offers.
//!
//! A cluster's life in memory:
//!
//! 1. [`LabReactionPlanner::plan_reactions`] groups unassigned labs.
//! 2. [`LabReactionPlanner::assign_reagents`] picks a reaction whose
//!    reagents are stocked.
//! 3. [`LabReactionPlanner::advance_reactions`] runs the reaction whenever
//!    both inputs hold reagent, and clears the reaction once stock runs out.

use colony_types::{
    ActionCode, LabRecord, LabRole, LabStatus, ObjectId, Position, REACTIONS, ResourceKind,
    RoomRecord, StructureKind,
};
use colony_world::{RoomState, Simulation};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, trace, warn};

use crate::config::LabConfig;

/// Labs per cluster.
pub const CLUSTER_SIZE: usize = 3;

/// Assigns lab clusters and keeps their reactions running.
#[derive(Debug, Clone, Copy)]
pub struct LabReactionPlanner {
    config: LabConfig,
}

impl LabReactionPlanner {
    /// A planner with the given settings.
    pub const fn new(config: LabConfig) -> Self {
        Self { config }
    }

    /// Group unassigned labs into clusters whose members are all within
    /// `cluster_range` of each other.
    ///
    /// Labs are shuffled first so ties do not always favour the same
    /// cluster. At most one cluster per three unassigned labs is formed; if
    /// no three labs qualify nothing is written and the next tick tries
    /// again. Returns the number of clusters assigned.
    pub fn plan_reactions<R: Rng + ?Sized>(
        &self,
        room: &RoomState,
        record: &mut RoomRecord,
        rng: &mut R,
    ) -> usize {
        let mut free: Vec<(ObjectId, Position)> = room
            .structures_of(StructureKind::Lab)
            .filter(|lab| record.lab_status(lab.id).is_none())
            .map(|lab| (lab.id, lab.pos))
            .collect();
        if free.len() < CLUSTER_SIZE {
            return 0;
        }
        free.shuffle(rng);

        let wanted = free.len().checked_div(CLUSTER_SIZE).unwrap_or(0);
        let mut assigned = 0_usize;
        while assigned < wanted {
            let Some([output, input_a, input_b]) =
                take_cluster(&mut free, self.config.cluster_range)
            else {
                break;
            };
            record.labs.insert(
                output,
                LabRecord {
                    status: Some(LabStatus::Empty),
                    role: Some(LabRole::Output),
                    resource: None,
                    partners: vec![input_a, input_b],
                },
            );
            for (input, other) in [(input_a, input_b), (input_b, input_a)] {
                record.labs.insert(
                    input,
                    LabRecord {
                        status: Some(LabStatus::Fill),
                        role: Some(LabRole::Input),
                        resource: None,
                        partners: vec![output, other],
                    },
                );
            }
            info!(room = %room.name, %output, %input_a, %input_b, "Lab cluster assigned");
            assigned = assigned.saturating_add(1);
        }

        if assigned == 0 {
            trace!(room = %room.name, unassigned = free.len(), "No lab cluster qualifies");
        }
        assigned
    }

    /// Give every idle cluster the first known reaction whose reagents are
    /// stocked in storage and terminal. Returns the number of clusters that
    /// received a reaction.
    pub fn assign_reagents(&self, room: &RoomState, record: &mut RoomRecord) -> usize {
        let idle: Vec<(ObjectId, ObjectId, ObjectId)> = outputs(record)
            .filter(|(_, lab)| lab.resource.is_none())
            .filter_map(|(id, lab)| match lab.partners.as_slice() {
                [a, b] => Some((id, *a, *b)),
                _ => None,
            })
            .collect();

        let mut assigned = 0_usize;
        for (output, input_a, input_b) in idle {
            let stocked = |r: ResourceKind| stock(room, r) >= self.config.reagent_min;
            let Some((reagent_a, reagent_b, product)) = REACTIONS
                .iter()
                .copied()
                .find(|(a, b, _)| stocked(*a) && stocked(*b))
            else {
                continue;
            };
            for (lab, resource) in [(output, product), (input_a, reagent_a), (input_b, reagent_b)] {
                if let Some(entry) = record.labs.get_mut(&lab) {
                    entry.resource = Some(resource);
                }
            }
            info!(room = %room.name, %output, %product, "Lab reaction assigned");
            assigned = assigned.saturating_add(1);
        }
        assigned
    }

    /// Run the reaction of every cluster whose inputs hold reagent. Clears
    /// the reaction of clusters whose inputs are empty and whose reagents
    /// are no longer stocked. Returns the number of reactions run.
    pub fn advance_reactions(
        &self,
        sim: &mut dyn Simulation,
        room: &RoomState,
        record: &mut RoomRecord,
        tick: u64,
    ) -> usize {
        let active: Vec<(ObjectId, ObjectId, ObjectId)> = outputs(record)
            .filter(|(_, lab)| lab.resource.is_some())
            .filter_map(|(id, lab)| match lab.partners.as_slice() {
                [a, b] => Some((id, *a, *b)),
                _ => None,
            })
            .collect();

        let mut reacted = 0_usize;
        let mut exhausted = Vec::new();
        for (output, input_a, input_b) in active {
            let held = |lab: ObjectId| {
                let resource = record.labs.get(&lab).and_then(|r| r.resource);
                match (room.structure(lab), resource) {
                    (Some(s), Some(r)) => Some((r, s.store.get(r))),
                    _ => None,
                }
            };
            let (Some((reagent_a, held_a)), Some((reagent_b, held_b))) =
                (held(input_a), held(input_b))
            else {
                continue;
            };

            if held_a == 0 || held_b == 0 {
                let a_gone = held_a == 0 && stock(room, reagent_a) < self.config.reagent_min;
                let b_gone = held_b == 0 && stock(room, reagent_b) < self.config.reagent_min;
                if a_gone || b_gone {
                    exhausted.push([output, input_a, input_b]);
                }
                continue;
            }
            if !room.structure(output).is_some_and(|s| s.is_ready(tick)) {
                continue;
            }

            match sim.run_reaction(output, input_a, input_b) {
                ActionCode::Ok => {
                    trace!(room = %room.name, %output, "Reaction ran");
                    reacted = reacted.saturating_add(1);
                }
                code @ (ActionCode::Busy | ActionCode::NotEnoughResources | ActionCode::Full) => {
                    debug!(room = %room.name, %output, ?code, "Reaction deferred");
                }
                code => warn!(room = %room.name, %output, ?code, "Reaction rejected"),
            }
        }

        for [output, input_a, input_b] in exhausted {
            for lab in [output, input_a, input_b] {
                if let Some(entry) = record.labs.get_mut(&lab) {
                    entry.resource = None;
                }
            }
            info!(room = %room.name, %output, "Lab reaction exhausted");
        }
        reacted
    }

    /// Drop every cluster that lost a lab, returning its survivors to the
    /// unassigned pool.
    pub fn forget_missing_labs(&self, room: &RoomState, record: &mut RoomRecord) {
        let broken: Vec<ObjectId> = record
            .labs
            .iter()
            .filter(|(id, lab)| {
                room.structure(**id).is_none()
                    || lab.partners.iter().any(|p| room.structure(*p).is_none())
            })
            .map(|(id, _)| *id)
            .collect();
        for id in broken {
            if record.labs.remove(&id).is_some() {
                debug!(room = %room.name, lab = %id, "Lab cluster dissolved");
            }
        }
    }

    /// Whether lab planning is enabled.
    pub const fn enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Output labs and their records.
fn outputs(record: &RoomRecord) -> impl Iterator<Item = (ObjectId, &LabRecord)> + '_ {
    record
        .labs
        .iter()
        .filter(|(_, lab)| lab.role == Some(LabRole::Output))
        .map(|(id, lab)| (*id, lab))
}

/// Amount of `resource` held by storage and terminal together.
fn stock(room: &RoomState, resource: ResourceKind) -> u32 {
    let storage = room.storage().map_or(0, |s| s.store.get(resource));
    let terminal = room.terminal().map_or(0, |s| s.store.get(resource));
    storage.saturating_add(terminal)
}

/// Remove and return the first three labs, in order, that are pairwise
/// within `range`.
fn take_cluster(labs: &mut Vec<(ObjectId, Position)>, range: u8) -> Option<[ObjectId; 3]> {
    let near = |a: Position, b: Position| a.in_range_to(b, range);
    let mut found = None;
    'search: for (i, (_, first)) in labs.iter().enumerate() {
        for (j, (_, second)) in labs.iter().enumerate().skip(i.saturating_add(1)) {
            if !near(*first, *second) {
                continue;
            }
            for (k, (_, third)) in labs.iter().enumerate().skip(j.saturating_add(1)) {
                if near(*first, *third) && near(*second, *third) {
                    found = Some((i, j, k));
                    break 'search;
                }
            }
        }
    }
    let (i, j, k) = found?;
    let third = labs.remove(k).0;
    let second = labs.remove(j).0;
    let first = labs.remove(i).0;
    Some([first, second, third])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_world::Structure;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn lab_room(positions: &[(u8, u8)]) -> RoomState {
        let mut room = RoomState::new(colony_types::RoomName::new("W1N1"));
        for (x, y) in positions {
            room.structures
                .push(Structure::new(StructureKind::Lab, Position::new(*x, *y)));
        }
        room
    }

    #[test]
    fn fewer_than_three_labs_plan_nothing() {
        let room = lab_room(&[(10, 10), (11, 10)]);
        let mut record = RoomRecord::default();
        let planner = LabReactionPlanner::new(LabConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(planner.plan_reactions(&room, &mut record, &mut rng), 0);
        assert!(record.labs.is_empty());
    }

    #[test]
    fn six_close_labs_form_two_clusters() {
        let room = lab_room(&[(10, 10), (11, 10), (12, 10), (10, 11), (11, 11), (12, 11)]);
        let mut record = RoomRecord::default();
        let planner = LabReactionPlanner::new(LabConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(planner.plan_reactions(&room, &mut record, &mut rng), 2);
        assert_eq!(record.labs.len(), 6);
        let outputs = record
            .labs
            .values()
            .filter(|l| l.status == Some(LabStatus::Empty))
            .count();
        assert_eq!(outputs, 2);
    }

    #[test]
    fn take_cluster_respects_range() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let c = ObjectId::new();
        let mut labs = vec![
            (a, Position::new(0, 0)),
            (b, Position::new(2, 0)),
            (c, Position::new(4, 0)),
        ];
        assert_eq!(take_cluster(&mut labs, 2), None);
        assert_eq!(labs.len(), 3);
        assert_eq!(take_cluster(&mut labs, 4), Some([a, b, c]));
        assert!(labs.is_empty());
    }

    #[test]
    fn reagents_follow_stock() {
        let mut room = lab_room(&[(10, 10), (11, 10), (12, 10)]);
        let mut record = RoomRecord::default();
        let planner = LabReactionPlanner::new(LabConfig::default());
        planner.plan_reactions(&room, &mut record, &mut StdRng::seed_from_u64(3));
        assert_eq!(planner.assign_reagents(&room, &mut record), 0);

        room.structures.push(
            Structure::new(StructureKind::Storage, Position::new(20, 20))
                .holding(ResourceKind::Zynthium, 2_000)
                .holding(ResourceKind::Keanium, 1_500),
        );
        assert_eq!(planner.assign_reagents(&room, &mut record), 1);
        let products: Vec<ResourceKind> = outputs(&record)
            .filter_map(|(_, lab)| lab.resource)
            .collect();
        assert_eq!(products, vec![ResourceKind::ZynthiumKeanite]);
    }
}
