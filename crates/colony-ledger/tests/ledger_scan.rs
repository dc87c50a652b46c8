//! Integration tests for the room ledger scan and matching.
//!
//! Rooms are assembled by hand from `colony-world` types; no sandbox is
//! needed because the ledger only reads a snapshot.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use colony_ledger::priority::{
    OFFER_STORAGE_EMERGENCY, OFFER_STORAGE_SURPLUS, OFFER_TOMBSTONE, REQUEST_STORAGE_LOW,
    REQUEST_TOWER, REQUEST_TOWER_UNDER_ATTACK,
};
use colony_ledger::{
    Asker, LedgerThresholds, OfferSource, RequestTarget, ResourceLedger, RoomWorker, TargetClaims,
};
use colony_types::{
    LabRecord, LabRole, LabStatus, ObjectId, Position, ResourceKind, RoleKind, RoomName,
    RoomRecord, StructureKind, WorkerName,
};
use colony_world::{
    Controller, DroppedResource, Hostile, RoomState, Store, Structure, Tombstone, classify_room,
};

fn base_room() -> RoomState {
    let mut room = RoomState::new(RoomName::new("W1N1"));
    room.controller = Some(Controller::new(Position::new(40, 40), 4));
    room.structures.push(Structure::new(StructureKind::Spawn, Position::new(10, 10)));
    room.structures
        .push(Structure::new(StructureKind::Extension, Position::new(11, 10)));
    room.structures.push(
        Structure::new(StructureKind::Storage, Position::new(20, 20))
            .holding(ResourceKind::Energy, 30_000),
    );
    room.tombstones.push(Tombstone {
        id: ObjectId::new(),
        pos: Position::new(5, 30),
        store: Store::with(500, ResourceKind::Energy, 150),
        decays_at: 100,
    });
    room.dropped.push(DroppedResource {
        id: ObjectId::new(),
        pos: Position::new(6, 30),
        resource: ResourceKind::Energy,
        amount: 300,
    });
    room
}

fn ledger(room: RoomState, record: RoomRecord, workers: Vec<RoomWorker>) -> ResourceLedger {
    ResourceLedger::new(room, record, workers, LedgerThresholds::default())
}

fn classified(room: &RoomState) -> RoomRecord {
    RoomRecord {
        classification: Some(classify_room(room, 1, 3)),
        ..RoomRecord::default()
    }
}

#[test]
fn offers_descend_and_requests_ascend() {
    let room = base_room();
    let record = classified(&room);
    let ledger = ledger(room, record, Vec::new());

    let offers = ledger.gives_resources();
    assert!(!offers.is_empty());
    assert!(offers.windows(2).all(|w| w[0].priority >= w[1].priority));
    assert!(offers.iter().all(|o| o.amount > 0));

    let requests = ledger.needs_resources();
    assert!(!requests.is_empty());
    assert!(requests.windows(2).all(|w| w[0].priority <= w[1].priority));
    assert!(requests.iter().all(|r| r.amount > 0));
}

#[test]
fn second_call_in_a_tick_returns_the_same_list() {
    let room = base_room();
    let record = classified(&room);
    let ledger = ledger(room, record, Vec::new());
    let first = ledger.gives_resources();
    let second = ledger.gives_resources();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first, second);
    assert!(std::ptr::eq(ledger.needs_resources(), ledger.needs_resources()));
}

#[test]
fn small_tombstones_and_piles_are_not_offered() {
    let mut room = base_room();
    room.tombstones.push(Tombstone {
        id: ObjectId::new(),
        pos: Position::new(7, 30),
        store: Store::with(500, ResourceKind::Energy, 100),
        decays_at: 100,
    });
    room.dropped.push(DroppedResource {
        id: ObjectId::new(),
        pos: Position::new(8, 30),
        resource: ResourceKind::Energy,
        amount: 99,
    });
    let record = classified(&room);
    let ledger = ledger(room, record, Vec::new());
    let tombstones = ledger
        .gives_resources()
        .iter()
        .filter(|o| o.source_kind == OfferSource::Tombstone)
        .count();
    let piles = ledger
        .gives_resources()
        .iter()
        .filter(|o| o.source_kind == OfferSource::Dropped)
        .count();
    assert_eq!(tombstones, 1);
    assert_eq!(piles, 1);
    assert_eq!(
        ledger.gives_resources().first().map(|o| o.priority),
        Some(OFFER_TOMBSTONE)
    );
}

#[test]
fn piles_inside_protected_zone_are_left_alone() {
    let mut room = base_room();
    room.dropped.push(DroppedResource {
        id: ObjectId::new(),
        pos: Position::new(41, 41),
        resource: ResourceKind::Energy,
        amount: 800,
    });
    let record = classified(&room);
    let ledger = ledger(room, record, Vec::new());
    let offered: Vec<u32> = ledger
        .gives_resources()
        .iter()
        .filter(|o| o.source_kind == OfferSource::Dropped)
        .map(|o| o.amount)
        .collect();
    assert_eq!(offered, vec![300]);
}

#[test]
fn storage_tiers_follow_low_water_mark() {
    let mut room = base_room();
    let storage_id = room.storage().unwrap().id;
    let ledger_rich = ledger(room.clone(), classified(&room), Vec::new());
    let storage_offer = ledger_rich
        .gives_resources()
        .iter()
        .find(|o| o.source_id == storage_id)
        .unwrap();
    assert_eq!(storage_offer.priority, OFFER_STORAGE_SURPLUS);

    if let Some(s) = room.structure_mut(storage_id) {
        let _ = s.store.remove(ResourceKind::Energy, 26_000);
    }
    let record = classified(&room);
    let ledger_poor = ledger(room, record, Vec::new());
    let storage_offer = ledger_poor
        .gives_resources()
        .iter()
        .find(|o| o.source_id == storage_id)
        .unwrap();
    assert_eq!(storage_offer.priority, OFFER_STORAGE_EMERGENCY);
    let storage_request = ledger_poor
        .needs_resources()
        .iter()
        .find(|r| r.target_id == storage_id && r.resource == ResourceKind::Energy)
        .unwrap();
    assert_eq!(storage_request.priority, REQUEST_STORAGE_LOW);
    assert!(storage_request.exact);
    assert_eq!(storage_request.amount, 6_000);
    assert_eq!(storage_request.clamp(10_000), 6_000);
}

#[test]
fn towers_get_urgent_under_attack() {
    let mut room = base_room();
    let tower = Structure::new(StructureKind::Tower, Position::new(30, 30));
    let tower_id = tower.id;
    room.structures.push(tower);

    let calm = ledger(room.clone(), classified(&room), Vec::new());
    let calm_priority = calm
        .needs_resources()
        .iter()
        .find(|r| r.target_id == tower_id)
        .map(|r| r.priority);
    assert_eq!(calm_priority, Some(REQUEST_TOWER));

    room.hostiles.push(Hostile {
        id: ObjectId::new(),
        pos: Position::new(1, 1),
        hits: 100,
    });
    let record = classified(&room);
    let attacked = ledger(room, record, Vec::new());
    let first = attacked.needs_resources().first().unwrap();
    assert_eq!(first.target_id, tower_id);
    assert_eq!(first.priority, REQUEST_TOWER_UNDER_ATTACK);
}

#[test]
fn upgraders_request_only_without_controller_container() {
    let mut room = base_room();
    let upgrader = RoomWorker {
        name: WorkerName::new("upgrader_1"),
        id: ObjectId::new(),
        role: RoleKind::Upgrader,
        energy: 0,
        free_capacity: 100,
        carry_capacity: 100,
    };
    let without = ledger(room.clone(), classified(&room), vec![upgrader.clone()]);
    assert!(
        without
            .needs_resources()
            .iter()
            .any(|r| r.target_id == upgrader.id && r.target_kind == RequestTarget::Worker)
    );

    room.structures
        .push(Structure::new(StructureKind::Container, Position::new(38, 40)));
    let record = classified(&room);
    let with = ledger(room, record, vec![upgrader.clone()]);
    assert!(!with.needs_resources().iter().any(|r| r.target_id == upgrader.id));
    assert!(
        with.needs_resources()
            .iter()
            .any(|r| r.target_kind == RequestTarget::Container)
    );
}

#[test]
fn lab_statuses_drive_fill_and_empty() {
    let mut room = base_room();
    let input = Structure::new(StructureKind::Lab, Position::new(30, 10));
    let output = Structure::new(StructureKind::Lab, Position::new(31, 10))
        .holding(ResourceKind::Hydroxide, 50);
    let (input_id, output_id) = (input.id, output.id);
    room.structures.extend([input, output]);

    let mut record = classified(&room);
    record.labs.insert(
        input_id,
        LabRecord {
            status: Some(LabStatus::Fill),
            role: Some(LabRole::Input),
            resource: Some(ResourceKind::Hydrogen),
            partners: Vec::new(),
        },
    );
    record.labs.insert(
        output_id,
        LabRecord {
            status: Some(LabStatus::Empty),
            role: Some(LabRole::Output),
            resource: Some(ResourceKind::Hydroxide),
            partners: Vec::new(),
        },
    );
    let ledger = ledger(room, record, Vec::new());
    assert!(ledger.needs_resources().iter().any(|r| {
        r.target_id == input_id && r.resource == ResourceKind::Hydrogen
    }));
    assert!(ledger.gives_resources().iter().any(|o| {
        o.source_id == output_id && o.resource == ResourceKind::Hydroxide
    }));
    assert!(ledger.needs_resources().iter().any(|r| {
        r.target_kind == RequestTarget::Storage && r.resource == ResourceKind::Hydroxide
    }));
}

#[test]
fn transport_orders_respect_priorities() {
    let room = base_room();
    let record = classified(&room);
    let ledger = ledger(room, record, Vec::new());
    let me = WorkerName::new("transporter_1");
    let asker = Asker {
        name: &me,
        id: ObjectId::new(),
    };
    let claims = TargetClaims::new();
    let engine = colony_ledger::MatchingEngine::new(&ledger, &claims);
    let order = engine.get_transport_order(asker).unwrap();
    assert!(order.offer.priority > order.request.priority);
    assert_eq!(order.offer.resource, order.request.resource);
    assert_eq!(order.offer.priority, OFFER_TOMBSTONE);
}

#[test]
fn unclassified_room_skips_link_offers() {
    let mut room = base_room();
    room.structures.push(
        Structure::new(StructureKind::Link, Position::new(25, 25))
            .holding(ResourceKind::Energy, 400),
    );
    let ledger = ledger(room, RoomRecord::default(), Vec::new());
    assert!(
        !ledger
            .gives_resources()
            .iter()
            .any(|o| o.source_kind == OfferSource::Link)
    );
}
