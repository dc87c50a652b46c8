//! Greedy pairing of offers and requests.
//!
//! [`get_transport_order`] walks offers outer and requests inner and returns
//! the first compatible pair. The scan is greedy rather than globally
//! optimal; both lists are bounded by the room's structure count and are
//! memoised per tick, so the `O(offers x requests)` walk stays cheap.
//!
//! A pair is compatible when:
//!
//! - both name the same resource,
//! - `offer.priority > request.priority`,
//! - the offer and request are different nodes,
//! - no other worker holds either node, and
//! - the request is not for the asking worker itself.

use colony_types::{ObjectId, ResourceKind, WorkerName};

use crate::claims::TargetClaims;
use crate::entry::{ResourceOffer, ResourceRequest};
use crate::ledger::ResourceLedger;

/// A resolved offer/request pair for one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOrder {
    /// Where to pick up.
    pub offer: ResourceOffer,
    /// Where to drop off.
    pub request: ResourceRequest,
}

/// The asking worker.
#[derive(Debug, Clone, Copy)]
pub struct Asker<'a> {
    /// Worker name, checked against claims.
    pub name: &'a WorkerName,
    /// Worker object id, never matched as a request target.
    pub id: ObjectId,
}

/// First compatible `(offer, request)` pair, or `None`.
pub fn get_transport_order(
    offers: &[ResourceOffer],
    requests: &[ResourceRequest],
    claims: &TargetClaims,
    asker: Asker<'_>,
) -> Option<TransportOrder> {
    offers
        .iter()
        .filter(|offer| !claims.is_claimed_by_other(offer.source_id, asker.name))
        .find_map(|offer| {
            requests
                .iter()
                .find(|request| {
                    request.resource == offer.resource
                        && offer.priority > request.priority
                        && offer.source_id != request.target_id
                        && request.target_id != asker.id
                        && !claims.is_claimed_by_other(request.target_id, asker.name)
                })
                .map(|request| TransportOrder {
                    offer: offer.clone(),
                    request: request.clone(),
                })
        })
}

/// First request for `resource` whose target is free, or `None`.
pub fn get_delivery_order(
    requests: &[ResourceRequest],
    claims: &TargetClaims,
    asker: Asker<'_>,
    resource: ResourceKind,
) -> Option<ResourceRequest> {
    requests
        .iter()
        .find(|request| {
            request.resource == resource
                && request.target_id != asker.id
                && !claims.is_claimed_by_other(request.target_id, asker.name)
        })
        .cloned()
}

/// Matching over one room's ledger and the live claims.
#[derive(Debug, Clone, Copy)]
pub struct MatchingEngine<'a> {
    ledger: &'a ResourceLedger,
    claims: &'a TargetClaims,
}

impl<'a> MatchingEngine<'a> {
    /// Match against `ledger` while respecting `claims`.
    pub const fn new(ledger: &'a ResourceLedger, claims: &'a TargetClaims) -> Self {
        Self { ledger, claims }
    }

    /// See [`get_transport_order`].
    pub fn get_transport_order(&self, asker: Asker<'_>) -> Option<TransportOrder> {
        get_transport_order(
            self.ledger.gives_resources(),
            self.ledger.needs_resources(),
            self.claims,
            asker,
        )
    }

    /// See [`get_delivery_order`].
    pub fn get_delivery_order(
        &self,
        asker: Asker<'_>,
        resource: ResourceKind,
    ) -> Option<ResourceRequest> {
        get_delivery_order(self.ledger.needs_resources(), self.claims, asker, resource)
    }
}
