//! Priority bands for offers and requests.
//!
//! Offers are ranked high to low, requests low to high (lower = more
//! urgent). A transport order only forms when `offer > request`, so the two
//! bands together decide which flows exist:
//!
//! ```text
//!  150 tombstone
//!  145 receiver link
//!  140 dropped pile
//!  135 source container
//!  128 emptying lab
//!  126 terminal nominal / storage mineral sink
//!  125 storage nominal
//!  120 storage surplus        118 terminal surplus
//!  110 storage mineral        108 terminal mineral
//!  102 terminal below low-water (exact)
//!  100 storage below low-water (exact)
//!   90 nuker   80 power spawn   70 lab energy
//!   60 storage emergency      58 terminal emergency
//!   57 controller container   55 upgrader   50 constructor
//!   40 storage mineral (low)  38 terminal mineral (low)
//!   35 lab fill
//!   30 tower   12 extension   10 spawn   5 tower under attack
//! ```
//!
//! Storage and terminal never feed each other's nominal request, which
//! keeps energy from bouncing between them.

/// Numeric priority of an offer or request.
pub type Priority = u32;

// ---------------------------------------------------------------------------
// Offers (sorted descending)
// ---------------------------------------------------------------------------

/// Tombstone contents.
pub const OFFER_TOMBSTONE: Priority = 150;
/// Energy in a receiver link.
pub const OFFER_RECEIVER_LINK: Priority = 145;
/// Resource pile on the ground.
pub const OFFER_DROPPED: Priority = 140;
/// Container next to a source or the extractor.
pub const OFFER_SOURCE_CONTAINER: Priority = 135;
/// Minerals in a lab marked for emptying.
pub const OFFER_LAB_EMPTY: Priority = 128;
/// Storage energy above its low-water mark.
pub const OFFER_STORAGE_SURPLUS: Priority = 120;
/// Terminal energy above its low-water mark.
pub const OFFER_TERMINAL_SURPLUS: Priority = 118;
/// Storage minerals above the mineral threshold.
pub const OFFER_STORAGE_MINERAL: Priority = 110;
/// Terminal minerals above the mineral threshold.
pub const OFFER_TERMINAL_MINERAL: Priority = 108;
/// Storage energy at or below its low-water mark.
pub const OFFER_STORAGE_EMERGENCY: Priority = 60;
/// Terminal energy at or below its low-water mark.
pub const OFFER_TERMINAL_EMERGENCY: Priority = 58;
/// Storage minerals below the mineral threshold.
pub const OFFER_STORAGE_MINERAL_LOW: Priority = 40;
/// Terminal minerals below the mineral threshold.
pub const OFFER_TERMINAL_MINERAL_LOW: Priority = 38;

// ---------------------------------------------------------------------------
// Requests (sorted ascending)
// ---------------------------------------------------------------------------

/// Tower while hostiles are present.
pub const REQUEST_TOWER_UNDER_ATTACK: Priority = 5;
/// Spawn.
pub const REQUEST_SPAWN: Priority = 10;
/// Extension.
pub const REQUEST_EXTENSION: Priority = 12;
/// Tower in peace time.
pub const REQUEST_TOWER: Priority = 30;
/// Lab input waiting for its reagent.
pub const REQUEST_LAB_FILL: Priority = 35;
/// Constructor worker low on energy.
pub const REQUEST_CONSTRUCTOR: Priority = 50;
/// Upgrader worker low on energy (no controller container).
pub const REQUEST_UPGRADER: Priority = 55;
/// Container next to the controller.
pub const REQUEST_CONTROLLER_CONTAINER: Priority = 57;
/// Lab energy.
pub const REQUEST_LAB_ENERGY: Priority = 70;
/// Power spawn energy.
pub const REQUEST_POWER_SPAWN: Priority = 80;
/// Nuker energy.
pub const REQUEST_NUKER: Priority = 90;
/// Storage energy below its low-water mark.
pub const REQUEST_STORAGE_LOW: Priority = 100;
/// Terminal energy below its low-water mark.
pub const REQUEST_TERMINAL_LOW: Priority = 102;
/// Storage energy between its low- and high-water marks.
pub const REQUEST_STORAGE_NOMINAL: Priority = 125;
/// Terminal energy between its low- and high-water marks.
pub const REQUEST_TERMINAL_NOMINAL: Priority = 126;
/// Storage accepting loose minerals found in the room.
pub const REQUEST_STORAGE_MINERAL_SINK: Priority = 126;

// Orderings between the two bands that the flows depend on.
const _: () = {
    assert!(OFFER_LAB_EMPTY > REQUEST_STORAGE_MINERAL_SINK);
    assert!(OFFER_LAB_EMPTY > REQUEST_TERMINAL_NOMINAL);
    assert!(OFFER_STORAGE_SURPLUS < REQUEST_TERMINAL_NOMINAL);
    assert!(OFFER_TERMINAL_SURPLUS < REQUEST_STORAGE_NOMINAL);
    assert!(OFFER_STORAGE_SURPLUS > REQUEST_TERMINAL_LOW);
    assert!(OFFER_TERMINAL_SURPLUS > REQUEST_STORAGE_LOW);
    assert!(OFFER_STORAGE_EMERGENCY > REQUEST_CONTROLLER_CONTAINER);
    assert!(OFFER_STORAGE_EMERGENCY < REQUEST_LAB_ENERGY);
    assert!(OFFER_TERMINAL_MINERAL_LOW > REQUEST_LAB_FILL);
};
