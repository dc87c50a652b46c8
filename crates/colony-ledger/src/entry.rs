//! Offer and request records and their validated builders.
//!
//! Every [`ResourceOffer`] and [`ResourceRequest`] is produced through
//! [`OfferBuilder`] or [`RequestBuilder`], which reject zero amounts and
//! missing fields. The ledger scan relies on this: a record that exists
//! always names a node and a strictly positive amount.

use colony_types::{ObjectId, ResourceKind};

use crate::LedgerError;
use crate::priority::Priority;

// ---------------------------------------------------------------------------
// Node kinds
// ---------------------------------------------------------------------------

/// What kind of node an offer drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OfferSource {
    /// A tombstone.
    Tombstone,
    /// A receiver link.
    Link,
    /// A resource pile on the ground.
    Dropped,
    /// A source or extractor container.
    Container,
    /// A lab marked for emptying.
    Lab,
    /// The storage.
    Storage,
    /// The terminal.
    Terminal,
}

/// What kind of node a request fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestTarget {
    /// A worker that spends energy itself.
    Worker,
    /// The controller container.
    Container,
    /// A lab.
    Lab,
    /// A tower.
    Tower,
    /// A spawn.
    Spawn,
    /// An extension.
    Extension,
    /// The power spawn.
    PowerSpawn,
    /// The nuker.
    Nuker,
    /// The storage.
    Storage,
    /// The terminal.
    Terminal,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A resource surplus at a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOffer {
    /// Rank; higher is offered first.
    pub priority: Priority,
    /// Offered resource.
    pub resource: ResourceKind,
    /// Offered amount, always positive.
    pub amount: u32,
    /// Node holding the surplus.
    pub source_id: ObjectId,
    /// Kind of that node.
    pub source_kind: OfferSource,
}

/// A resource deficit at a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Rank; lower is more urgent.
    pub priority: Priority,
    /// Requested resource.
    pub resource: ResourceKind,
    /// Requested amount, always positive.
    pub amount: u32,
    /// Node with the deficit.
    pub target_id: ObjectId,
    /// Kind of that node.
    pub target_kind: RequestTarget,
    /// Deliveries must not exceed `amount`.
    pub exact: bool,
}

impl ResourceRequest {
    /// How much of `carried` to hand over: all of it, or at most `amount`
    /// for exact requests.
    pub fn clamp(&self, carried: u32) -> u32 {
        if self.exact {
            carried.min(self.amount)
        } else {
            carried
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Builder for validated [`ResourceOffer`] values.
#[derive(Debug)]
pub struct OfferBuilder {
    priority: Priority,
    resource: ResourceKind,
    amount: Option<u32>,
    source: Option<(ObjectId, OfferSource)>,
}

impl OfferBuilder {
    /// Start an offer of `resource` at `priority`.
    pub const fn new(priority: Priority, resource: ResourceKind) -> Self {
        Self {
            priority,
            resource,
            amount: None,
            source: None,
        }
    }

    /// Set the offered amount.
    #[must_use]
    pub const fn amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the node holding the surplus.
    #[must_use]
    pub const fn source(mut self, id: ObjectId, kind: OfferSource) -> Self {
        self.source = Some((id, kind));
        self
    }

    /// Validate and produce the offer.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] for a zero amount and
    /// [`LedgerError::MissingField`] if the amount or source is unset.
    pub fn build(self) -> Result<ResourceOffer, LedgerError> {
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;
        let (source_id, source_kind) = self.source.ok_or(LedgerError::MissingField("source"))?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount {
                node: source_id,
                resource: self.resource,
            });
        }
        Ok(ResourceOffer {
            priority: self.priority,
            resource: self.resource,
            amount,
            source_id,
            source_kind,
        })
    }
}

/// Builder for validated [`ResourceRequest`] values.
#[derive(Debug)]
pub struct RequestBuilder {
    priority: Priority,
    resource: ResourceKind,
    amount: Option<u32>,
    target: Option<(ObjectId, RequestTarget)>,
    exact: bool,
}

impl RequestBuilder {
    /// Start a request for `resource` at `priority`.
    pub const fn new(priority: Priority, resource: ResourceKind) -> Self {
        Self {
            priority,
            resource,
            amount: None,
            target: None,
            exact: false,
        }
    }

    /// Set the requested amount.
    #[must_use]
    pub const fn amount(mut self, amount: u32) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the node with the deficit.
    #[must_use]
    pub const fn target(mut self, id: ObjectId, kind: RequestTarget) -> Self {
        self.target = Some((id, kind));
        self
    }

    /// Mark the request as exact.
    #[must_use]
    pub const fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Validate and produce the request.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] for a zero amount and
    /// [`LedgerError::MissingField`] if the amount or target is unset.
    pub fn build(self) -> Result<ResourceRequest, LedgerError> {
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;
        let (target_id, target_kind) = self.target.ok_or(LedgerError::MissingField("target"))?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount {
                node: target_id,
                resource: self.resource,
            });
        }
        Ok(ResourceRequest {
            priority: self.priority,
            resource: self.resource,
            amount,
            target_id,
            target_kind,
            exact: self.exact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_requires_positive_amount() {
        let result = OfferBuilder::new(150, ResourceKind::Energy)
            .amount(0)
            .source(ObjectId::new(), OfferSource::Tombstone)
            .build();
        assert!(matches!(result, Err(LedgerError::ZeroAmount { .. })));
    }

    #[test]
    fn offer_requires_source() {
        let result = OfferBuilder::new(150, ResourceKind::Energy).amount(10).build();
        assert!(matches!(result, Err(LedgerError::MissingField("source"))));
    }

    #[test]
    fn exact_request_clamps_delivery() {
        let request = RequestBuilder::new(100, ResourceKind::Energy)
            .amount(30)
            .target(ObjectId::new(), RequestTarget::Storage)
            .exact()
            .build();
        assert!(request.is_ok());
        let request = request.ok();
        assert_eq!(request.as_ref().map(|r| r.clamp(50)), Some(30));
        assert_eq!(request.as_ref().map(|r| r.clamp(10)), Some(10));
    }

    #[test]
    fn loose_request_takes_everything() {
        let request = RequestBuilder::new(12, ResourceKind::Energy)
            .amount(30)
            .target(ObjectId::new(), RequestTarget::Extension)
            .build();
        assert_eq!(request.ok().map(|r| r.clamp(50)), Some(50));
    }
}
