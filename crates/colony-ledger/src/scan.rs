//! The room scan that produces offers and requests.
//!
//! Both scans walk the room in a fixed order and then sort stably, so ties
//! keep discovery order. Offers are sorted descending by priority, requests
//! ascending.

use std::collections::BTreeSet;

use colony_types::{LabStatus, Position, ResourceKind, RoleKind, RoomRecord, StructureKind};
use colony_world::{RoomState, Structure};
use tracing::trace;

use crate::LedgerError;
use crate::entry::{
    OfferBuilder, OfferSource, RequestBuilder, RequestTarget, ResourceOffer, ResourceRequest,
};
use crate::ledger::RoomWorker;
use crate::priority::{
    OFFER_DROPPED, OFFER_LAB_EMPTY, OFFER_RECEIVER_LINK, OFFER_SOURCE_CONTAINER,
    OFFER_STORAGE_EMERGENCY, OFFER_STORAGE_MINERAL, OFFER_STORAGE_MINERAL_LOW,
    OFFER_STORAGE_SURPLUS, OFFER_TERMINAL_EMERGENCY, OFFER_TERMINAL_MINERAL,
    OFFER_TERMINAL_MINERAL_LOW, OFFER_TERMINAL_SURPLUS, OFFER_TOMBSTONE, Priority,
    REQUEST_CONSTRUCTOR, REQUEST_CONTROLLER_CONTAINER, REQUEST_EXTENSION, REQUEST_LAB_ENERGY,
    REQUEST_LAB_FILL, REQUEST_NUKER, REQUEST_POWER_SPAWN, REQUEST_SPAWN, REQUEST_STORAGE_LOW,
    REQUEST_STORAGE_MINERAL_SINK, REQUEST_STORAGE_NOMINAL, REQUEST_TERMINAL_LOW,
    REQUEST_TERMINAL_NOMINAL, REQUEST_TOWER, REQUEST_TOWER_UNDER_ATTACK, REQUEST_UPGRADER,
};
use crate::thresholds::LedgerThresholds;

/// Two-tier thresholds and priorities for a general-purpose store.
struct StoreTiers {
    energy_low: u32,
    energy_high: u32,
    mineral_threshold: u32,
    surplus: Priority,
    emergency: Priority,
    mineral: Priority,
    mineral_low: Priority,
    request_low: Priority,
    request_nominal: Priority,
}

const fn storage_tiers(t: &LedgerThresholds) -> StoreTiers {
    StoreTiers {
        energy_low: t.storage_energy_low,
        energy_high: t.storage_energy_high,
        mineral_threshold: t.storage_mineral_threshold,
        surplus: OFFER_STORAGE_SURPLUS,
        emergency: OFFER_STORAGE_EMERGENCY,
        mineral: OFFER_STORAGE_MINERAL,
        mineral_low: OFFER_STORAGE_MINERAL_LOW,
        request_low: REQUEST_STORAGE_LOW,
        request_nominal: REQUEST_STORAGE_NOMINAL,
    }
}

const fn terminal_tiers(t: &LedgerThresholds) -> StoreTiers {
    StoreTiers {
        energy_low: t.terminal_energy_low,
        energy_high: t.terminal_energy_high,
        mineral_threshold: t.terminal_mineral_threshold,
        surplus: OFFER_TERMINAL_SURPLUS,
        emergency: OFFER_TERMINAL_EMERGENCY,
        mineral: OFFER_TERMINAL_MINERAL,
        mineral_low: OFFER_TERMINAL_MINERAL_LOW,
        request_low: REQUEST_TERMINAL_LOW,
        request_nominal: REQUEST_TERMINAL_NOMINAL,
    }
}

/// Keep a built entry; zero amounts are expected and dropped quietly.
fn keep<T>(list: &mut Vec<T>, built: Result<T, LedgerError>) {
    match built {
        Ok(entry) => list.push(entry),
        Err(e) => trace!(error = %e, "Ledger entry skipped"),
    }
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

/// Build the room's offers, sorted descending by priority.
pub fn scan_offers(
    room: &RoomState,
    record: &RoomRecord,
    t: &LedgerThresholds,
) -> Vec<ResourceOffer> {
    let mut offers = Vec::new();
    let classification = record.classification.as_ref();
    let protected = |pos: Position| classification.is_some_and(|c| c.is_protected(pos));

    for tomb in &room.tombstones {
        for (resource, amount) in tomb.store.iter().filter(|(_, a)| *a > t.tombstone_min) {
            keep(
                &mut offers,
                OfferBuilder::new(OFFER_TOMBSTONE, resource)
                    .amount(amount)
                    .source(tomb.id, OfferSource::Tombstone)
                    .build(),
            );
        }
    }

    if let Some(c) = classification {
        for link in room
            .structures_of(StructureKind::Link)
            .filter(|l| c.receiver_links.contains(&l.id) && !protected(l.pos))
        {
            keep(
                &mut offers,
                OfferBuilder::new(OFFER_RECEIVER_LINK, ResourceKind::Energy)
                    .amount(link.store.get(ResourceKind::Energy))
                    .source(link.id, OfferSource::Link)
                    .build(),
            );
        }
    }

    for pile in room
        .dropped
        .iter()
        .filter(|d| d.amount > t.dropped_min && !protected(d.pos))
    {
        keep(
            &mut offers,
            OfferBuilder::new(OFFER_DROPPED, pile.resource)
                .amount(pile.amount)
                .source(pile.id, OfferSource::Dropped)
                .build(),
        );
    }

    if let Some(c) = classification {
        for container in room
            .structures_of(StructureKind::Container)
            .filter(|s| c.source_containers.contains(&s.id))
        {
            for (resource, amount) in container
                .store
                .iter()
                .filter(|(_, a)| *a > t.container_min)
            {
                keep(
                    &mut offers,
                    OfferBuilder::new(OFFER_SOURCE_CONTAINER, resource)
                        .amount(amount)
                        .source(container.id, OfferSource::Container)
                        .build(),
                );
            }
        }
    }

    for lab in room
        .structures_of(StructureKind::Lab)
        .filter(|l| record.lab_status(l.id) == Some(LabStatus::Empty))
    {
        for (resource, amount) in lab.store.minerals() {
            keep(
                &mut offers,
                OfferBuilder::new(OFFER_LAB_EMPTY, resource)
                    .amount(amount)
                    .source(lab.id, OfferSource::Lab)
                    .build(),
            );
        }
    }

    if let Some(storage) = room.storage() {
        store_offers(&mut offers, storage, OfferSource::Storage, &storage_tiers(t));
    }
    if let Some(terminal) = room.terminal() {
        store_offers(&mut offers, terminal, OfferSource::Terminal, &terminal_tiers(t));
    }

    offers.sort_by(|a, b| b.priority.cmp(&a.priority));
    offers
}

fn store_offers(
    offers: &mut Vec<ResourceOffer>,
    store: &Structure,
    kind: OfferSource,
    tiers: &StoreTiers,
) {
    let energy = store.store.get(ResourceKind::Energy);
    let priority = if energy > tiers.energy_low {
        tiers.surplus
    } else {
        tiers.emergency
    };
    keep(
        offers,
        OfferBuilder::new(priority, ResourceKind::Energy)
            .amount(energy)
            .source(store.id, kind)
            .build(),
    );

    for (resource, amount) in store.store.minerals() {
        let priority = if amount >= tiers.mineral_threshold {
            tiers.mineral
        } else {
            tiers.mineral_low
        };
        keep(
            offers,
            OfferBuilder::new(priority, resource)
                .amount(amount)
                .source(store.id, kind)
                .build(),
        );
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Build the room's requests, sorted ascending by priority.
pub fn scan_requests(
    room: &RoomState,
    record: &RoomRecord,
    workers: &[RoomWorker],
    t: &LedgerThresholds,
) -> Vec<ResourceRequest> {
    let mut requests = Vec::new();
    let classification = record.classification.as_ref();
    let controller_container = classification
        .and_then(|c| c.controller_container)
        .and_then(|id| room.structure(id));

    if controller_container.is_none() {
        worker_requests(&mut requests, workers, RoleKind::Upgrader, REQUEST_UPGRADER);
    }

    if let Some(container) = controller_container {
        let energy = container.store.get(ResourceKind::Energy);
        if energy < t.controller_container_fill {
            keep(
                &mut requests,
                RequestBuilder::new(REQUEST_CONTROLLER_CONTAINER, ResourceKind::Energy)
                    .amount(
                        t.controller_container_fill
                            .saturating_sub(energy)
                            .min(container.store.free()),
                    )
                    .target(container.id, RequestTarget::Container)
                    .build(),
            );
        }
    }

    worker_requests(&mut requests, workers, RoleKind::Constructor, REQUEST_CONSTRUCTOR);

    for lab in room.structures_of(StructureKind::Lab) {
        let assigned = record
            .labs
            .get(&lab.id)
            .filter(|l| l.status == Some(LabStatus::Fill))
            .and_then(|l| l.resource);
        if let Some(resource) = assigned {
            keep(
                &mut requests,
                RequestBuilder::new(REQUEST_LAB_FILL, resource)
                    .amount(lab.store.free())
                    .target(lab.id, RequestTarget::Lab)
                    .build(),
            );
        }
    }

    let under_attack = room.has_hostiles();
    for s in &room.structures {
        let energy = s.store.get(ResourceKind::Energy);
        let free = s.store.free();
        let entry = match s.kind {
            StructureKind::Tower if energy < t.tower_fill => {
                let priority = if under_attack {
                    REQUEST_TOWER_UNDER_ATTACK
                } else {
                    REQUEST_TOWER
                };
                Some((priority, free, RequestTarget::Tower))
            }
            StructureKind::Spawn => Some((REQUEST_SPAWN, free, RequestTarget::Spawn)),
            StructureKind::Extension => Some((REQUEST_EXTENSION, free, RequestTarget::Extension)),
            StructureKind::Lab if energy < t.lab_energy_fill => Some((
                REQUEST_LAB_ENERGY,
                t.lab_energy_fill.saturating_sub(energy).min(free),
                RequestTarget::Lab,
            )),
            StructureKind::PowerSpawn if energy < t.power_spawn_fill => Some((
                REQUEST_POWER_SPAWN,
                t.power_spawn_fill.saturating_sub(energy).min(free),
                RequestTarget::PowerSpawn,
            )),
            StructureKind::Nuker => Some((REQUEST_NUKER, free, RequestTarget::Nuker)),
            _ => None,
        };
        if let Some((priority, amount, target)) = entry {
            keep(
                &mut requests,
                RequestBuilder::new(priority, ResourceKind::Energy)
                    .amount(amount)
                    .target(s.id, target)
                    .build(),
            );
        }
    }

    if let Some(storage) = room.storage() {
        store_requests(&mut requests, storage, RequestTarget::Storage, &storage_tiers(t));
        for resource in loose_minerals(room, record, t) {
            keep(
                &mut requests,
                RequestBuilder::new(REQUEST_STORAGE_MINERAL_SINK, resource)
                    .amount(storage.store.free())
                    .target(storage.id, RequestTarget::Storage)
                    .build(),
            );
        }
    }
    if let Some(terminal) = room.terminal() {
        store_requests(&mut requests, terminal, RequestTarget::Terminal, &terminal_tiers(t));
    }

    requests.sort_by_key(|r| r.priority);
    requests
}

/// Energy requests for workers of `role` that are below half full.
fn worker_requests(
    requests: &mut Vec<ResourceRequest>,
    workers: &[RoomWorker],
    role: RoleKind,
    priority: Priority,
) {
    for worker in workers.iter().filter(|w| w.role == role && w.needs_energy()) {
        keep(
            requests,
            RequestBuilder::new(priority, ResourceKind::Energy)
                .amount(worker.free_capacity)
                .target(worker.id, RequestTarget::Worker)
                .build(),
        );
    }
}

fn store_requests(
    requests: &mut Vec<ResourceRequest>,
    store: &Structure,
    kind: RequestTarget,
    tiers: &StoreTiers,
) {
    let energy = store.store.get(ResourceKind::Energy);
    let free = store.store.free();
    let built = if energy < tiers.energy_low {
        RequestBuilder::new(tiers.request_low, ResourceKind::Energy)
            .amount(tiers.energy_low.saturating_sub(energy).min(free))
            .exact()
    } else if energy < tiers.energy_high {
        RequestBuilder::new(tiers.request_nominal, ResourceKind::Energy)
            .amount(tiers.energy_high.saturating_sub(energy).min(free))
    } else {
        return;
    };
    keep(requests, built.target(store.id, kind).build());
}

/// Minerals lying around the room outside the stores.
fn loose_minerals(
    room: &RoomState,
    record: &RoomRecord,
    t: &LedgerThresholds,
) -> BTreeSet<ResourceKind> {
    let mut found = BTreeSet::new();
    for tomb in &room.tombstones {
        found.extend(
            tomb.store
                .minerals()
                .filter(|(_, a)| *a > t.tombstone_min)
                .map(|(r, _)| r),
        );
    }
    found.extend(
        room.dropped
            .iter()
            .filter(|d| d.resource.is_mineral() && d.amount > t.dropped_min)
            .map(|d| d.resource),
    );
    if let Some(c) = record.classification.as_ref() {
        for container in room
            .structures_of(StructureKind::Container)
            .filter(|s| c.source_containers.contains(&s.id))
        {
            found.extend(
                container
                    .store
                    .minerals()
                    .filter(|(_, a)| *a > t.container_min)
                    .map(|(r, _)| r),
            );
        }
    }
    for lab in room
        .structures_of(StructureKind::Lab)
        .filter(|l| record.lab_status(l.id) == Some(LabStatus::Empty))
    {
        found.extend(lab.store.minerals().map(|(r, _)| r));
    }
    found
}
