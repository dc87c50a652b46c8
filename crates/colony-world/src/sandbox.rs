//! In-memory simulation used by the headless driver and the tests.
//!
//! [`Sandbox`] implements [`Simulation`] and [`LayoutPlanner`] over a set of
//! [`RoomState`]s and live [`Creep`]s. Effects apply immediately and follow
//! the usual rules:
//!
//! - harvest, withdraw, pickup, transfer, and attack need range 1;
//!   upgrade, build, and repair need range 3; reactions need the input labs
//!   within range 2 of the output.
//! - spawning deducts energy from spawns first, then extensions, and keeps
//!   the spawn busy for three ticks per body part.
//! - [`Sandbox::advance`] moves time forward: workers age and leave
//!   tombstones, sources regenerate, spawns trickle energy back in, and
//!   ground piles and tombstones decay.
//!
//! Every `spawn_creep` call is recorded so callers can verify whether a
//! create call was issued at all.

use std::collections::BTreeMap;

use colony_types::{
    ActionCode, BodyPart, ObjectId, Position, ResourceKind, RoomName, StructureKind, WorkerName,
    body_cost, reaction_product,
};
use tracing::debug;

use crate::creep::Creep;
use crate::error::WorldError;
use crate::room::{RoomState, SPAWN_ENERGY_CAPACITY, Structure, Tombstone};
use crate::simulation::{LayoutPlanner, Simulation};
use crate::store::Store;

/// Energy harvested per `Work` part per tick.
pub const HARVEST_POWER: u32 = 2;
/// Construction progress per `Work` part per tick.
pub const BUILD_POWER: u32 = 5;
/// Hit points restored per `Work` part per tick.
pub const REPAIR_POWER: u32 = 100;
/// Damage per `Attack` part per tick.
pub const ATTACK_POWER: u32 = 30;
/// Ticks a spawn is busy per body part.
pub const SPAWN_TIME_PER_PART: u64 = 3;
/// Reagent consumed from each input lab per reaction.
pub const REACTION_AMOUNT: u32 = 5;
/// Ticks an output lab rests between reactions.
pub const REACTION_COOLDOWN: u64 = 10;

/// A recorded `spawn_creep` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnCall {
    /// Tick of the call.
    pub tick: u64,
    /// Spawn that was asked.
    pub spawn: ObjectId,
    /// Requested worker name.
    pub name: WorkerName,
    /// Requested body.
    pub body: Vec<BodyPart>,
    /// Result returned to the caller.
    pub result: ActionCode,
}

/// In-memory [`Simulation`].
#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    time: u64,
    cpu_bucket: u32,
    rooms: BTreeMap<RoomName, RoomState>,
    creeps: BTreeMap<WorkerName, Creep>,
    raw_memory: String,
    spawn_calls: Vec<SpawnCall>,
}

type Effect = Result<(), ActionCode>;

fn code(effect: Effect) -> ActionCode {
    effect.map_or_else(|code| code, |()| ActionCode::Ok)
}

/// Amount to move given an optional request, what the giver holds and what
/// the receiver can take.
fn transfer_amount(requested: Option<u32>, held: u32, free: u32) -> Result<u32, ActionCode> {
    if held == 0 {
        return Err(ActionCode::NotEnoughResources);
    }
    if free == 0 {
        return Err(ActionCode::Full);
    }
    match requested {
        Some(amount) if amount > held => Err(ActionCode::NotEnoughResources),
        Some(amount) if amount > free => Err(ActionCode::Full),
        Some(amount) => Ok(amount),
        None => Ok(held.min(free)),
    }
}

/// Position and store of a structure or tombstone.
fn store_target(room: &mut RoomState, id: ObjectId) -> Option<(Position, &mut Store)> {
    if let Some(s) = room.structures.iter_mut().find(|s| s.id == id) {
        return Some((s.pos, &mut s.store));
    }
    room.tombstones
        .iter_mut()
        .find(|t| t.id == id)
        .map(|t| (t.pos, &mut t.store))
}

fn lab(room: &RoomState, id: ObjectId) -> Result<&Structure, ActionCode> {
    room.structure(id)
        .filter(|s| s.kind == StructureKind::Lab)
        .ok_or(ActionCode::InvalidTarget)
}

impl Sandbox {
    /// An empty sandbox at tick 0 with a full compute bucket.
    pub fn new() -> Self {
        Self {
            cpu_bucket: 10_000,
            ..Self::default()
        }
    }

    /// Add a room.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRoom`] if a room with that name exists.
    pub fn add_room(&mut self, room: RoomState) -> Result<(), WorldError> {
        if self.rooms.contains_key(&room.name) {
            return Err(WorldError::DuplicateRoom(room.name));
        }
        self.rooms.insert(room.name.clone(), room);
        Ok(())
    }

    /// Add a live worker and return its object id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RoomNotFound`] if the worker's room is unknown
    /// and [`WorldError::DuplicateWorker`] if the name is taken.
    pub fn add_creep(&mut self, creep: Creep) -> Result<ObjectId, WorldError> {
        if !self.rooms.contains_key(&creep.room) {
            return Err(WorldError::RoomNotFound(creep.room));
        }
        if self.creeps.contains_key(&creep.name) {
            return Err(WorldError::DuplicateWorker(creep.name));
        }
        let id = creep.id;
        self.creeps.insert(creep.name.clone(), creep);
        Ok(id)
    }

    /// Mutable access to a room.
    pub fn room_mut(&mut self, name: &RoomName) -> Option<&mut RoomState> {
        self.rooms.get_mut(name)
    }

    /// Mutable access to a worker.
    pub fn creep_mut(&mut self, name: &WorkerName) -> Option<&mut Creep> {
        self.creeps.get_mut(name)
    }

    /// Remove a worker without leaving a tombstone.
    pub fn remove_creep(&mut self, name: &WorkerName) -> Option<Creep> {
        self.creeps.remove(name)
    }

    /// Set the current tick.
    pub const fn set_time(&mut self, time: u64) {
        self.time = time;
    }

    /// Set the compute budget signal.
    pub const fn set_cpu_bucket(&mut self, bucket: u32) {
        self.cpu_bucket = bucket;
    }

    /// Every `spawn_creep` call so far.
    pub fn spawn_calls(&self) -> &[SpawnCall] {
        &self.spawn_calls
    }

    /// Move time forward one tick and apply ageing and regeneration.
    pub fn advance(&mut self) {
        self.time = self.time.saturating_add(1);
        let now = self.time;

        for room in self.rooms.values_mut() {
            for source in &mut room.sources {
                if now >= source.regen_at {
                    source.energy = source.energy_capacity;
                    source.regen_at = now.saturating_add(source.regen_interval);
                }
            }
            if room.energy_available() < SPAWN_ENERGY_CAPACITY {
                for spawn in room
                    .structures
                    .iter_mut()
                    .filter(|s| s.kind == StructureKind::Spawn)
                {
                    spawn.store.add(ResourceKind::Energy, 1);
                }
            }
            room.tombstones.retain(|t| t.decays_at > now);
            for pile in &mut room.dropped {
                pile.amount = pile.amount.saturating_sub(pile.amount.div_ceil(1_000));
            }
            room.dropped.retain(|pile| pile.amount > 0);
        }

        let mut dead = Vec::new();
        for creep in self.creeps.values_mut() {
            if creep.spawning {
                let ready = self.rooms.get(&creep.room).is_some_and(|room| {
                    room.structures_of(StructureKind::Spawn)
                        .any(|s| s.pos == creep.pos && s.is_ready(now))
                });
                if ready {
                    creep.spawning = false;
                }
                continue;
            }
            creep.ticks_to_live = creep.ticks_to_live.saturating_sub(1);
            if creep.ticks_to_live == 0 {
                dead.push(creep.name.clone());
            }
        }
        for name in dead {
            if let Some(creep) = self.creeps.remove(&name) {
                debug!(worker = %creep.name, room = %creep.room, tick = now, "Worker died");
                let lifetime = u64::try_from(creep.body.len())
                    .unwrap_or(u64::MAX)
                    .saturating_mul(5);
                if let Some(room) = self.rooms.get_mut(&creep.room) {
                    room.tombstones.push(Tombstone {
                        id: ObjectId::new(),
                        pos: creep.pos,
                        store: creep.store,
                        decays_at: now.saturating_add(lifetime),
                    });
                }
            }
        }
    }

    /// Worker position, room, and store view, rejecting missing or
    /// still-spawning workers.
    fn actor(&self, worker: &WorkerName) -> Result<&Creep, ActionCode> {
        let creep = self.creeps.get(worker).ok_or(ActionCode::InvalidTarget)?;
        if creep.spawning {
            return Err(ActionCode::Busy);
        }
        Ok(creep)
    }

    fn try_harvest(&mut self, worker: &WorkerName, source_id: ObjectId) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, work, free) = (
            actor.pos,
            actor.room.clone(),
            actor.parts(BodyPart::Work),
            actor.store.free(),
        );
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let source = room
            .sources
            .iter_mut()
            .find(|s| s.id == source_id)
            .ok_or(ActionCode::InvalidTarget)?;
        if !source.pos.in_range_to(pos, 1) {
            return Err(ActionCode::NotInRange);
        }
        if work == 0 {
            return Err(ActionCode::Unknown);
        }
        if source.energy == 0 {
            return Err(ActionCode::NotEnoughResources);
        }
        if free == 0 {
            return Err(ActionCode::Full);
        }
        let amount = work
            .saturating_mul(HARVEST_POWER)
            .min(source.energy)
            .min(free);
        source.energy = source.energy.saturating_sub(amount);
        if let Some(creep) = self.creeps.get_mut(worker) {
            creep.store.add(ResourceKind::Energy, amount);
        }
        Ok(())
    }

    fn try_withdraw(
        &mut self,
        worker: &WorkerName,
        target: ObjectId,
        resource: ResourceKind,
        requested: Option<u32>,
    ) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, free) = (actor.pos, actor.room.clone(), actor.store.free());
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let (target_pos, store) = store_target(room, target).ok_or(ActionCode::InvalidTarget)?;
        if !target_pos.in_range_to(pos, 1) {
            return Err(ActionCode::NotInRange);
        }
        let amount = transfer_amount(requested, store.get(resource), free)?;
        let taken = store.remove(resource, amount);
        if let Some(creep) = self.creeps.get_mut(worker) {
            creep.store.add(resource, taken);
        }
        Ok(())
    }

    fn try_pickup(&mut self, worker: &WorkerName, target: ObjectId) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, free) = (actor.pos, actor.room.clone(), actor.store.free());
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let pile = room
            .dropped
            .iter_mut()
            .find(|d| d.id == target)
            .ok_or(ActionCode::InvalidTarget)?;
        if !pile.pos.in_range_to(pos, 1) {
            return Err(ActionCode::NotInRange);
        }
        let amount = transfer_amount(None, pile.amount, free)?;
        pile.amount = pile.amount.saturating_sub(amount);
        let resource = pile.resource;
        room.dropped.retain(|d| d.amount > 0);
        if let Some(creep) = self.creeps.get_mut(worker) {
            creep.store.add(resource, amount);
        }
        Ok(())
    }

    fn try_transfer(
        &mut self,
        worker: &WorkerName,
        target: ObjectId,
        resource: ResourceKind,
        requested: Option<u32>,
    ) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, held) = (actor.pos, actor.room.clone(), actor.store.get(resource));

        let receiver = self
            .creeps
            .values()
            .find(|c| c.id == target)
            .map(|c| (c.name.clone(), c.room.clone(), c.pos, c.store.free()));
        if let Some((receiver_name, receiver_room, receiver_pos, free)) = receiver {
            if receiver_room != room_name || !receiver_pos.in_range_to(pos, 1) {
                return Err(ActionCode::NotInRange);
            }
            let amount = transfer_amount(requested, held, free)?;
            let moved = self
                .creeps
                .get_mut(worker)
                .map_or(0, |c| c.store.remove(resource, amount));
            if let Some(c) = self.creeps.get_mut(&receiver_name) {
                c.store.add(resource, moved);
            }
            return Ok(());
        }

        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let structure = room
            .structure_mut(target)
            .ok_or(ActionCode::InvalidTarget)?;
        if !structure.pos.in_range_to(pos, 1) {
            return Err(ActionCode::NotInRange);
        }
        let amount = transfer_amount(requested, held, structure.store.free())?;
        let moved = self
            .creeps
            .get_mut(worker)
            .map_or(0, |c| c.store.remove(resource, amount));
        structure.store.add(resource, moved);
        Ok(())
    }

    fn try_upgrade(&mut self, worker: &WorkerName, controller_id: ObjectId) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, work, energy) = (
            actor.pos,
            actor.room.clone(),
            actor.parts(BodyPart::Work),
            actor.energy(),
        );
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let controller = room
            .controller
            .as_mut()
            .filter(|c| c.id == controller_id)
            .ok_or(ActionCode::InvalidTarget)?;
        if !controller.pos.in_range_to(pos, 3) {
            return Err(ActionCode::NotInRange);
        }
        if work == 0 {
            return Err(ActionCode::Unknown);
        }
        if energy == 0 {
            return Err(ActionCode::NotEnoughResources);
        }
        let amount = work.min(energy);
        controller.progress = controller.progress.saturating_add(amount);
        let total = controller.progress_total();
        if total > 0 && controller.progress >= total {
            controller.progress = controller.progress.saturating_sub(total);
            controller.level = controller.level.saturating_add(1);
            debug!(room = %room_name, level = controller.level, "Controller upgraded");
        }
        if let Some(creep) = self.creeps.get_mut(worker) {
            creep.store.remove(ResourceKind::Energy, amount);
        }
        Ok(())
    }

    fn try_build(&mut self, worker: &WorkerName, site_id: ObjectId) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, work, energy) = (
            actor.pos,
            actor.room.clone(),
            actor.parts(BodyPart::Work),
            actor.energy(),
        );
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let site = room
            .construction_sites
            .iter_mut()
            .find(|s| s.id == site_id)
            .ok_or(ActionCode::InvalidTarget)?;
        if !site.pos.in_range_to(pos, 3) {
            return Err(ActionCode::NotInRange);
        }
        if work == 0 {
            return Err(ActionCode::Unknown);
        }
        if energy == 0 {
            return Err(ActionCode::NotEnoughResources);
        }
        let remaining = site.progress_total.saturating_sub(site.progress);
        let amount = work.saturating_mul(BUILD_POWER).min(energy).min(remaining);
        site.progress = site.progress.saturating_add(amount);
        if site.progress >= site.progress_total {
            let (kind, site_pos) = (site.kind, site.pos);
            room.construction_sites.retain(|s| s.id != site_id);
            room.structures.push(Structure::new(kind, site_pos));
            debug!(room = %room_name, ?kind, pos = %site_pos, "Construction finished");
        }
        if let Some(creep) = self.creeps.get_mut(worker) {
            creep.store.remove(ResourceKind::Energy, amount);
        }
        Ok(())
    }

    fn try_repair(&mut self, worker: &WorkerName, target: ObjectId) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, work, energy) = (
            actor.pos,
            actor.room.clone(),
            actor.parts(BodyPart::Work),
            actor.energy(),
        );
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let structure = room
            .structure_mut(target)
            .ok_or(ActionCode::InvalidTarget)?;
        if !structure.pos.in_range_to(pos, 3) {
            return Err(ActionCode::NotInRange);
        }
        if !structure.needs_repair() {
            return Err(ActionCode::InvalidTarget);
        }
        if work == 0 {
            return Err(ActionCode::Unknown);
        }
        if energy == 0 {
            return Err(ActionCode::NotEnoughResources);
        }
        let spent = work.min(energy);
        let missing = structure.hits_max.saturating_sub(structure.hits);
        structure.hits = structure
            .hits
            .saturating_add(spent.saturating_mul(REPAIR_POWER).min(missing));
        if let Some(creep) = self.creeps.get_mut(worker) {
            creep.store.remove(ResourceKind::Energy, spent);
        }
        Ok(())
    }

    fn try_attack(&mut self, worker: &WorkerName, target: ObjectId) -> Effect {
        let actor = self.actor(worker)?;
        let (pos, room_name, attack) = (
            actor.pos,
            actor.room.clone(),
            actor.parts(BodyPart::Attack),
        );
        let room = self
            .rooms
            .get_mut(&room_name)
            .ok_or(ActionCode::InvalidTarget)?;
        let hostile = room
            .hostiles
            .iter_mut()
            .find(|h| h.id == target)
            .ok_or(ActionCode::InvalidTarget)?;
        if !hostile.pos.in_range_to(pos, 1) {
            return Err(ActionCode::NotInRange);
        }
        if attack == 0 {
            return Err(ActionCode::Unknown);
        }
        hostile.hits = hostile
            .hits
            .saturating_sub(attack.saturating_mul(ATTACK_POWER));
        room.hostiles.retain(|h| h.hits > 0);
        Ok(())
    }

    fn try_move(&mut self, worker: &WorkerName, goal: Position) -> Effect {
        self.actor(worker)?;
        if let Some(creep) = self.creeps.get_mut(worker) {
            creep.pos = creep.pos.step_toward(goal);
        }
        Ok(())
    }

    fn try_spawn(&mut self, spawn_id: ObjectId, body: &[BodyPart], name: &WorkerName) -> Effect {
        let now = self.time;
        let room = self
            .rooms
            .values_mut()
            .find(|r| {
                r.structure(spawn_id)
                    .is_some_and(|s| s.kind == StructureKind::Spawn)
            })
            .ok_or(ActionCode::InvalidTarget)?;
        let spawn = room.structure(spawn_id).ok_or(ActionCode::InvalidTarget)?;
        if self.creeps.contains_key(name) {
            return Err(ActionCode::Unknown);
        }
        if !spawn.is_ready(now) {
            return Err(ActionCode::Busy);
        }
        if body.is_empty() {
            return Err(ActionCode::InvalidTarget);
        }
        let cost = body_cost(body);
        if cost > room.energy_available() {
            return Err(ActionCode::NotEnoughResources);
        }
        let spawn_pos = spawn.pos;

        let mut owed = cost;
        for kind in [StructureKind::Spawn, StructureKind::Extension] {
            for s in room.structures.iter_mut().filter(|s| s.kind == kind) {
                if owed == 0 {
                    break;
                }
                let taken = s.store.remove(ResourceKind::Energy, owed);
                owed = owed.saturating_sub(taken);
            }
        }
        let busy = u64::try_from(body.len())
            .unwrap_or(u64::MAX)
            .saturating_mul(SPAWN_TIME_PER_PART);
        if let Some(spawn) = room.structure_mut(spawn_id) {
            spawn.cooldown_until = now.saturating_add(busy);
        }

        let mut creep = Creep::new(name.clone(), room.name.clone(), spawn_pos, body.to_vec());
        creep.spawning = true;
        self.creeps.insert(name.clone(), creep);
        Ok(())
    }

    fn try_react(&mut self, output: ObjectId, input_a: ObjectId, input_b: ObjectId) -> Effect {
        let now = self.time;
        let room = self
            .rooms
            .values_mut()
            .find(|r| r.structure(output).is_some())
            .ok_or(ActionCode::InvalidTarget)?;
        let (out, a, b) = (
            lab(room, output)?,
            lab(room, input_a)?,
            lab(room, input_b)?,
        );
        if !out.pos.in_range_to(a.pos, 2) || !out.pos.in_range_to(b.pos, 2) {
            return Err(ActionCode::NotInRange);
        }
        if !out.is_ready(now) {
            return Err(ActionCode::Busy);
        }
        let (reagent_a, held_a) = a
            .store
            .minerals()
            .next()
            .ok_or(ActionCode::NotEnoughResources)?;
        let (reagent_b, held_b) = b
            .store
            .minerals()
            .next()
            .ok_or(ActionCode::NotEnoughResources)?;
        let product = reaction_product(reagent_a, reagent_b).ok_or(ActionCode::InvalidTarget)?;
        if held_a < REACTION_AMOUNT || held_b < REACTION_AMOUNT {
            return Err(ActionCode::NotEnoughResources);
        }
        if out.store.minerals().any(|(r, _)| r != product) {
            return Err(ActionCode::InvalidTarget);
        }
        if out.store.free() < REACTION_AMOUNT {
            return Err(ActionCode::Full);
        }

        if let Some(s) = room.structure_mut(input_a) {
            s.store.remove(reagent_a, REACTION_AMOUNT);
        }
        if let Some(s) = room.structure_mut(input_b) {
            s.store.remove(reagent_b, REACTION_AMOUNT);
        }
        if let Some(s) = room.structure_mut(output) {
            s.store.add(product, REACTION_AMOUNT);
            s.cooldown_until = now.saturating_add(REACTION_COOLDOWN);
        }
        Ok(())
    }
}

impl Simulation for Sandbox {
    fn time(&self) -> u64 {
        self.time
    }

    fn cpu_bucket(&self) -> u32 {
        self.cpu_bucket
    }

    fn room_names(&self) -> Vec<RoomName> {
        self.rooms.keys().cloned().collect()
    }

    fn room(&self, name: &RoomName) -> Option<&RoomState> {
        self.rooms.get(name)
    }

    fn creep_names(&self) -> Vec<WorkerName> {
        self.creeps.keys().cloned().collect()
    }

    fn creep(&self, name: &WorkerName) -> Option<&Creep> {
        self.creeps.get(name)
    }

    fn object_pos(&self, id: ObjectId) -> Option<Position> {
        self.rooms
            .values()
            .find_map(|room| room.position_of(id))
            .or_else(|| self.creeps.values().find(|c| c.id == id).map(|c| c.pos))
    }

    fn stored(&self, id: ObjectId, resource: ResourceKind) -> Option<u32> {
        for room in self.rooms.values() {
            if let Some(s) = room.structure(id) {
                return Some(s.store.get(resource));
            }
            if let Some(t) = room.tombstones.iter().find(|t| t.id == id) {
                return Some(t.store.get(resource));
            }
            if let Some(d) = room.dropped.iter().find(|d| d.id == id) {
                return Some(if d.resource == resource { d.amount } else { 0 });
            }
        }
        self.creeps
            .values()
            .find(|c| c.id == id)
            .map(|c| c.store.get(resource))
    }

    fn free_capacity(&self, id: ObjectId) -> Option<u32> {
        for room in self.rooms.values() {
            if let Some(s) = room.structure(id) {
                return Some(s.store.free());
            }
        }
        self.creeps
            .values()
            .find(|c| c.id == id)
            .map(|c| c.store.free())
    }

    fn raw_memory(&self) -> &str {
        &self.raw_memory
    }

    fn set_raw_memory(&mut self, raw: String) {
        self.raw_memory = raw;
    }

    fn harvest(&mut self, worker: &WorkerName, source: ObjectId) -> ActionCode {
        code(self.try_harvest(worker, source))
    }

    fn withdraw(
        &mut self,
        worker: &WorkerName,
        target: ObjectId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionCode {
        code(self.try_withdraw(worker, target, resource, amount))
    }

    fn pickup(&mut self, worker: &WorkerName, target: ObjectId) -> ActionCode {
        code(self.try_pickup(worker, target))
    }

    fn transfer(
        &mut self,
        worker: &WorkerName,
        target: ObjectId,
        resource: ResourceKind,
        amount: Option<u32>,
    ) -> ActionCode {
        code(self.try_transfer(worker, target, resource, amount))
    }

    fn upgrade_controller(&mut self, worker: &WorkerName, controller: ObjectId) -> ActionCode {
        code(self.try_upgrade(worker, controller))
    }

    fn build(&mut self, worker: &WorkerName, site: ObjectId) -> ActionCode {
        code(self.try_build(worker, site))
    }

    fn repair(&mut self, worker: &WorkerName, structure: ObjectId) -> ActionCode {
        code(self.try_repair(worker, structure))
    }

    fn attack(&mut self, worker: &WorkerName, hostile: ObjectId) -> ActionCode {
        code(self.try_attack(worker, hostile))
    }

    fn move_to(&mut self, worker: &WorkerName, pos: Position) -> ActionCode {
        code(self.try_move(worker, pos))
    }

    fn spawn_creep(
        &mut self,
        spawn: ObjectId,
        body: &[BodyPart],
        name: &WorkerName,
    ) -> ActionCode {
        let result = code(self.try_spawn(spawn, body, name));
        self.spawn_calls.push(SpawnCall {
            tick: self.time,
            spawn,
            name: name.clone(),
            body: body.to_vec(),
            result,
        });
        result
    }

    fn run_reaction(
        &mut self,
        output: ObjectId,
        input_a: ObjectId,
        input_b: ObjectId,
    ) -> ActionCode {
        code(self.try_react(output, input_a, input_b))
    }
}

impl LayoutPlanner for Sandbox {
    fn has_construction_site_near(&self, room: &RoomName, pos: Position, range: u8) -> bool {
        self.rooms.get(room).is_some_and(|r| {
            r.construction_sites
                .iter()
                .any(|site| site.pos.in_range_to(pos, range))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::room::{ConstructionSite, Controller, DroppedResource, Source};

    fn sandbox() -> (Sandbox, RoomName) {
        let name = RoomName::new("W1N1");
        let mut room = RoomState::new(name.clone());
        room.controller = Some(Controller::new(Position::new(30, 30), 1));
        room.structures.push(
            Structure::new(StructureKind::Spawn, Position::new(10, 10))
                .holding(ResourceKind::Energy, 300),
        );
        room.sources.push(Source::new(Position::new(5, 5), 3000));
        let mut sandbox = Sandbox::new();
        sandbox.add_room(room).unwrap();
        (sandbox, name)
    }

    fn worker(sandbox: &mut Sandbox, room: &RoomName, name: &str, pos: Position) -> WorkerName {
        let name = WorkerName::new(name);
        let creep = Creep::new(
            name.clone(),
            room.clone(),
            pos,
            vec![BodyPart::Work, BodyPart::Carry, BodyPart::Move, BodyPart::Attack],
        );
        sandbox.add_creep(creep).unwrap();
        name
    }

    #[test]
    fn harvest_requires_adjacency() {
        let (mut sandbox, room) = sandbox();
        let w = worker(&mut sandbox, &room, "h", Position::new(8, 8));
        let source = sandbox.room(&room).unwrap().sources.first().unwrap().id;
        assert_eq!(sandbox.harvest(&w, source), ActionCode::NotInRange);
        sandbox.move_to(&w, Position::new(5, 5));
        sandbox.move_to(&w, Position::new(5, 5));
        assert_eq!(sandbox.harvest(&w, source), ActionCode::Ok);
        assert_eq!(sandbox.creep(&w).unwrap().energy(), HARVEST_POWER);
    }

    #[test]
    fn spawn_deducts_energy_and_records_call() {
        let (mut sandbox, room) = sandbox();
        let spawn = sandbox.room(&room).unwrap().structures.first().unwrap().id;
        let body = [BodyPart::Work, BodyPart::Carry, BodyPart::Move];
        let name = WorkerName::new("harvester_0");
        assert_eq!(sandbox.spawn_creep(spawn, &body, &name), ActionCode::Ok);
        assert_eq!(sandbox.room(&room).unwrap().energy_available(), 100);
        assert!(sandbox.creep(&name).unwrap().spawning);
        assert_eq!(sandbox.spawn_creep(spawn, &body, &name), ActionCode::Unknown);
        assert_eq!(sandbox.spawn_calls().len(), 2);
    }

    #[test]
    fn spawn_rejects_unaffordable_body() {
        let (mut sandbox, room) = sandbox();
        let spawn = sandbox.room(&room).unwrap().structures.first().unwrap().id;
        let body = [BodyPart::Heal, BodyPart::Heal];
        let result = sandbox.spawn_creep(spawn, &body, &WorkerName::new("x"));
        assert_eq!(result, ActionCode::NotEnoughResources);
    }

    #[test]
    fn transfer_between_workers() {
        let (mut sandbox, room) = sandbox();
        let a = worker(&mut sandbox, &room, "a", Position::new(20, 20));
        let b = worker(&mut sandbox, &room, "b", Position::new(21, 20));
        sandbox
            .creep_mut(&a)
            .unwrap()
            .store
            .add(ResourceKind::Energy, 50);
        let b_id = sandbox.creep(&b).unwrap().id;
        assert_eq!(
            sandbox.transfer(&a, b_id, ResourceKind::Energy, Some(20)),
            ActionCode::Ok
        );
        assert_eq!(sandbox.creep(&b).unwrap().energy(), 20);
        assert_eq!(sandbox.creep(&a).unwrap().energy(), 30);
        assert_eq!(
            sandbox.transfer(&a, b_id, ResourceKind::Energy, None),
            ActionCode::Ok
        );
        assert_eq!(
            sandbox.transfer(&a, b_id, ResourceKind::Energy, None),
            ActionCode::NotEnoughResources
        );
    }

    #[test]
    fn pickup_removes_empty_pile() {
        let (mut sandbox, room) = sandbox();
        let w = worker(&mut sandbox, &room, "p", Position::new(15, 15));
        let pile = DroppedResource {
            id: ObjectId::new(),
            pos: Position::new(15, 16),
            resource: ResourceKind::Energy,
            amount: 30,
        };
        let pile_id = pile.id;
        sandbox.room_mut(&room).unwrap().dropped.push(pile);
        assert_eq!(sandbox.pickup(&w, pile_id), ActionCode::Ok);
        assert!(sandbox.room(&room).unwrap().dropped.is_empty());
        assert_eq!(sandbox.pickup(&w, pile_id), ActionCode::InvalidTarget);
    }

    #[test]
    fn build_completes_structure() {
        let (mut sandbox, room) = sandbox();
        let w = worker(&mut sandbox, &room, "c", Position::new(20, 20));
        let site = ConstructionSite::new(StructureKind::Extension, Position::new(22, 22), 5);
        let site_id = site.id;
        sandbox.room_mut(&room).unwrap().construction_sites.push(site);
        sandbox
            .creep_mut(&w)
            .unwrap()
            .store
            .add(ResourceKind::Energy, 50);
        assert!(sandbox.has_construction_site_near(&room, Position::new(20, 20), 3));
        assert_eq!(sandbox.build(&w, site_id), ActionCode::Ok);
        let r = sandbox.room(&room).unwrap();
        assert!(r.construction_sites.is_empty());
        assert_eq!(r.extension_count(), 1);
    }

    #[test]
    fn dying_worker_leaves_tombstone() {
        let (mut sandbox, room) = sandbox();
        let w = worker(&mut sandbox, &room, "old", Position::new(12, 12));
        {
            let creep = sandbox.creep_mut(&w).unwrap();
            creep.ticks_to_live = 1;
            creep.store.add(ResourceKind::Energy, 40);
        }
        sandbox.advance();
        assert!(sandbox.creep(&w).is_none());
        let r = sandbox.room(&room).unwrap();
        let tomb = r.tombstones.first().unwrap();
        assert_eq!(tomb.store.get(ResourceKind::Energy), 40);
    }

    #[test]
    fn labs_react_into_output() {
        let (mut sandbox, room) = sandbox();
        let a = Structure::new(StructureKind::Lab, Position::new(30, 20))
            .holding(ResourceKind::Hydrogen, 100);
        let b = Structure::new(StructureKind::Lab, Position::new(32, 20))
            .holding(ResourceKind::Oxygen, 100);
        let out = Structure::new(StructureKind::Lab, Position::new(31, 21));
        let ids = (a.id, b.id, out.id);
        sandbox.room_mut(&room).unwrap().structures.extend([a, b, out]);
        assert_eq!(sandbox.run_reaction(ids.2, ids.0, ids.1), ActionCode::Ok);
        assert_eq!(sandbox.stored(ids.2, ResourceKind::Hydroxide), Some(5));
        assert_eq!(sandbox.run_reaction(ids.2, ids.0, ids.1), ActionCode::Busy);
    }
}
