//! Resource stores held by structures, workers, and tombstones.
//!
//! A [`Store`] has a single total capacity shared by every resource kind.
//! All mutation goes through [`Store::add`] and [`Store::remove`], which
//! clamp to what actually fits or is present and return the moved amount.

use std::collections::BTreeMap;

use colony_types::ResourceKind;

/// Resource contents with a shared capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    capacity: u32,
    contents: BTreeMap<ResourceKind, u32>,
}

impl Store {
    /// An empty store with the given total capacity.
    pub const fn new(capacity: u32) -> Self {
        Self {
            capacity,
            contents: BTreeMap::new(),
        }
    }

    /// A store pre-filled with one resource, clamped to capacity.
    pub fn with(capacity: u32, resource: ResourceKind, amount: u32) -> Self {
        let mut store = Self::new(capacity);
        store.add(resource, amount);
        store
    }

    /// Total capacity.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Amount of one resource held.
    pub fn get(&self, resource: ResourceKind) -> u32 {
        self.contents.get(&resource).copied().unwrap_or(0)
    }

    /// Total amount held across all resources.
    pub fn used(&self) -> u32 {
        self.contents
            .values()
            .fold(0_u32, |total, amount| total.saturating_add(*amount))
    }

    /// Remaining room.
    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    /// Whether no more can be added.
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Add up to `amount`, returning how much fit.
    pub fn add(&mut self, resource: ResourceKind, amount: u32) -> u32 {
        let added = amount.min(self.free());
        if added > 0 {
            let entry = self.contents.entry(resource).or_insert(0);
            *entry = entry.saturating_add(added);
        }
        added
    }

    /// Remove up to `amount`, returning how much was taken.
    pub fn remove(&mut self, resource: ResourceKind, amount: u32) -> u32 {
        let held = self.get(resource);
        let taken = amount.min(held);
        let left = held.saturating_sub(taken);
        if left == 0 {
            self.contents.remove(&resource);
        } else {
            self.contents.insert(resource, left);
        }
        taken
    }

    /// Held resources with non-zero amounts, in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.contents
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(resource, amount)| (*resource, *amount))
    }

    /// The resource held in the largest amount.
    pub fn primary(&self) -> Option<(ResourceKind, u32)> {
        self.iter().max_by_key(|(_, amount)| *amount)
    }

    /// Held minerals (everything except energy).
    pub fn minerals(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.iter().filter(|(resource, _)| resource.is_mineral())
    }
}
