//! Spawn planning against the sandbox.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::collections::BTreeMap;

use colony_agents::{Admission, RoleBook, RoleConfig, RoomCache};
use colony_core::config::SpawnConfig;
use colony_core::{SpawnPlanner, SpawnSite};
use colony_ledger::LedgerThresholds;
use colony_types::BodyPart::{Carry as C, Move as M, Work as W};
use colony_types::{
    BehaviorKind, ObjectId, Position, ResourceKind, RoleKind, RoomName, RoomRecord,
    StructureKind, WorkerName, WorkerRecord,
};
use colony_world::{Controller, Creep, RoomState, Sandbox, Structure, starting_room};

fn transporter_book() -> RoleBook {
    RoleBook::from_configs([RoleConfig {
        role: RoleKind::Transporter,
        level_min: 1,
        level_max: 8,
        body_tiers: vec![vec![M, C], vec![M, M, C, C]],
        min_parts: 2,
        behaviors: vec![BehaviorKind::Deliver, BehaviorKind::Collect],
        admission: Some(Admission::Always),
        quota: 2,
    }])
}

/// A level-8 room with one spawn holding `energy`.
fn spawn_room(energy: u32) -> (Sandbox, RoomName, ObjectId) {
    let name = RoomName::new("W1N1");
    let mut room = RoomState::new(name.clone());
    room.controller = Some(Controller::new(Position::new(40, 40), 8));
    let spawn = Structure::new(StructureKind::Spawn, Position::new(10, 10))
        .holding(ResourceKind::Energy, energy);
    let spawn_id = spawn.id;
    room.structures.push(spawn);
    let mut sandbox = Sandbox::new();
    sandbox.add_room(room).unwrap();
    (sandbox, name, spawn_id)
}

fn site(spawn: ObjectId, room: &RoomName, max_energy: u32) -> SpawnSite {
    SpawnSite {
        spawn,
        room: room.clone(),
        level: 8,
        max_energy,
        tick: 0,
        bootstrap_energy: None,
    }
}

#[test]
fn ninety_energy_spawns_nothing() {
    let book = transporter_book();
    let config = SpawnConfig {
        base_energy: 90,
        energy_per_extension: 50,
        emergency_bootstrap: false,
    };
    let planner = SpawnPlanner::new(&book, config);
    let (mut sandbox, room, spawn) = spawn_room(300);
    let mut workers = BTreeMap::new();

    let role = book.get(RoleKind::Transporter).unwrap();
    let created = planner.create_creep(
        &mut sandbox,
        &mut workers,
        &site(spawn, &room, planner.max_energy(0)),
        role,
    );

    assert!(!created);
    assert!(sandbox.spawn_calls().is_empty());
    assert!(workers.is_empty());
}

#[test]
fn one_fifty_energy_selects_the_first_tier() {
    let book = transporter_book();
    let config = SpawnConfig {
        base_energy: 150,
        ..SpawnConfig::default()
    };
    let planner = SpawnPlanner::new(&book, config);
    let (mut sandbox, room, spawn) = spawn_room(300);
    let mut workers = BTreeMap::new();

    let role = book.get(RoleKind::Transporter).unwrap();
    assert!(planner.create_creep(
        &mut sandbox,
        &mut workers,
        &site(spawn, &room, planner.max_energy(0)),
        role,
    ));

    let calls = sandbox.spawn_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].body, vec![M, C]);
    assert_eq!(calls[0].name, WorkerName::new("transporter_0"));
    let record = workers.get(&WorkerName::new("transporter_0")).unwrap();
    assert_eq!(record.role, RoleKind::Transporter);
    assert_eq!(record.born_energy_level, 150);
}

#[test]
fn taken_names_get_a_suffix() {
    let book = transporter_book();
    let planner = SpawnPlanner::new(&book, SpawnConfig::default());
    let (mut sandbox, room, spawn) = spawn_room(300);
    let mut workers = BTreeMap::new();
    workers.insert(
        WorkerName::new("transporter_0"),
        WorkerRecord::spawned(RoleKind::Transporter, 0, 300),
    );

    let role = book.get(RoleKind::Transporter).unwrap();
    assert!(planner.create_creep(&mut sandbox, &mut workers, &site(spawn, &room, 150), role));
    assert_eq!(sandbox.spawn_calls()[0].name, WorkerName::new("transporter_0_1"));
}

#[test]
fn rejected_spawn_creates_no_record() {
    let book = transporter_book();
    let planner = SpawnPlanner::new(&book, SpawnConfig::default());
    let (mut sandbox, room, spawn) = spawn_room(50);
    let mut workers = BTreeMap::new();

    let role = book.get(RoleKind::Transporter).unwrap();
    assert!(!planner.create_creep(&mut sandbox, &mut workers, &site(spawn, &room, 150), role));
    assert_eq!(sandbox.spawn_calls().len(), 1);
    assert!(workers.is_empty());
}

#[test]
fn first_harvester_is_bootstrapped_from_energy_on_hand() {
    let (mut sandbox, ids) = starting_room().unwrap();
    let spawn = sandbox
        .room_mut(&ids.room)
        .unwrap()
        .structure_mut(ids.spawn)
        .unwrap();
    spawn.store.remove(ResourceKind::Energy, 50);

    let book = RoleBook::standard();
    let planner = SpawnPlanner::new(&book, SpawnConfig::default());
    let mut workers = BTreeMap::new();
    let cache = RoomCache::build(
        &sandbox,
        &sandbox,
        &ids.room,
        &RoomRecord::default(),
        &workers,
        &LedgerThresholds::default(),
    )
    .unwrap();

    assert_eq!(planner.populate(&cache, &mut sandbox, &mut workers), 1);

    let calls = sandbox.spawn_calls();
    assert_eq!(calls.len(), 1);
    // Level 2 with two extensions picks [W, W, C, M] (300); with 250 on
    // hand the trailing move is popped.
    assert_eq!(calls[0].body, vec![W, W, C]);
    assert!(calls[0].result.is_ok());
    assert_eq!(
        workers.values().next().map(|r| r.role),
        Some(RoleKind::Harvester)
    );
}

#[test]
fn full_quotas_leave_the_spawn_idle() {
    let (mut sandbox, room, _) = spawn_room(300);
    let book = transporter_book();
    let planner = SpawnPlanner::new(&book, SpawnConfig::default());
    let mut workers = BTreeMap::new();
    for n in 0..2 {
        let name = WorkerName::new(format!("transporter_old_{n}"));
        sandbox
            .add_creep(Creep::new(name.clone(), room.clone(), Position::new(12, 12), vec![M, C]))
            .unwrap();
        workers.insert(name, WorkerRecord::spawned(RoleKind::Transporter, 0, 300));
    }
    let cache = RoomCache::build(
        &sandbox,
        &sandbox,
        &room,
        &RoomRecord::default(),
        &workers,
        &LedgerThresholds::default(),
    )
    .unwrap();

    assert_eq!(planner.populate(&cache, &mut sandbox, &mut workers), 0);
    assert!(sandbox.spawn_calls().is_empty());
}

#[test]
fn role_without_admission_is_passed_over() {
    let (mut sandbox, room, _) = spawn_room(300);
    let book = RoleBook::from_configs([
        RoleConfig {
            role: RoleKind::Harvester,
            level_min: 1,
            level_max: 8,
            body_tiers: vec![vec![W, C, M]],
            min_parts: 3,
            behaviors: vec![BehaviorKind::Harvest],
            admission: None,
            quota: 2,
        },
        transporter_book().get(RoleKind::Transporter).unwrap().clone(),
    ]);
    let planner = SpawnPlanner::new(&book, SpawnConfig::default());
    let mut workers = BTreeMap::new();
    let cache = RoomCache::build(
        &sandbox,
        &sandbox,
        &room,
        &RoomRecord::default(),
        &workers,
        &LedgerThresholds::default(),
    )
    .unwrap();

    assert_eq!(planner.populate(&cache, &mut sandbox, &mut workers), 1);
    assert!(sandbox.spawn_calls()[0].name.as_str().starts_with("transporter_"));
    assert!(workers.values().all(|r| r.role == RoleKind::Transporter));
}
