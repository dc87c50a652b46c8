//! Resource supply and demand for the colony control core.
//!
//! Every tick each room's producers and consumers are ranked into offers and
//! requests, and transporters are matched greedily against them.
//!
//! # Architecture
//!
//! - [`entry`] -- [`ResourceOffer`] / [`ResourceRequest`] and their validated
//!   builders.
//! - [`priority`] -- The offer and request priority bands.
//! - [`thresholds`] -- [`LedgerThresholds`], loaded from configuration.
//! - [`scan`] -- The room scans that produce the two ranked lists.
//! - [`ledger`] -- [`ResourceLedger`], memoising both scans for one tick.
//! - [`claims`] -- [`TargetClaims`], the live exclusive-target view.
//! - [`matching`] -- [`get_transport_order`] and [`get_delivery_order`].
//!
//! # Ordering contract
//!
//! Offers are sorted descending and requests ascending by priority, stable
//! in discovery order. A transport order always satisfies
//! `offer.priority > request.priority` and `offer.resource == request.resource`.
//! The exact numbers are policy; only that comparison is load-bearing.

pub mod claims;
pub mod entry;
pub mod ledger;
pub mod matching;
pub mod priority;
pub mod scan;
pub mod thresholds;

// Re-export primary types at crate root.
pub use claims::TargetClaims;
pub use entry::{
    OfferBuilder, OfferSource, RequestBuilder, RequestTarget, ResourceOffer, ResourceRequest,
};
pub use ledger::{ResourceLedger, RoomWorker};
pub use matching::{
    Asker, MatchingEngine, TransportOrder, get_delivery_order, get_transport_order,
};
pub use thresholds::LedgerThresholds;

use colony_types::{ObjectId, ResourceKind};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when building ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Offers and requests must carry a strictly positive amount.
    #[error("zero amount of {resource} at {node}")]
    ZeroAmount {
        /// The node the entry would name.
        node: ObjectId,
        /// The resource.
        resource: ResourceKind,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
