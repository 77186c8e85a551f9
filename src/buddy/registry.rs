//! Allocation registry
//!
//! Owns the `(start, order)` of every live reservation, keyed by name.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

#[cfg(feature = "log")]
use log::error;

use crate::{BuddyError, BuddyResult};

use super::buddy_block::BuddyBlock;

/// Live reservations sorted by name.
#[derive(Debug, Default)]
pub struct AllocationRegistry {
    entries: BTreeMap<String, BuddyBlock>,
}

impl AllocationRegistry {
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Fail with `DuplicateId` if `id` names a live reservation.
    pub fn ensure_vacant(&self, id: &str) -> BuddyResult {
        if self.entries.contains_key(id) {
            return Err(BuddyError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    /// Record a reservation under a name checked with [`Self::ensure_vacant`].
    ///
    /// A live name is never overwritten.
    pub fn insert(&mut self, id: &str, block: BuddyBlock) {
        let vacant = !self.entries.contains_key(id);
        if vacant {
            self.entries.insert(id.to_string(), block);
        } else {
            error!("Name '{}' already reserved", id);
        }
        debug_assert!(vacant, "duplicate reservation '{id}'");
    }

    /// Drop a reservation and hand back its block.
    pub fn remove(&mut self, id: &str) -> BuddyResult<BuddyBlock> {
        self.entries
            .remove(id)
            .ok_or_else(|| BuddyError::UnknownId(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<BuddyBlock> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reservations in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, BuddyBlock)> + '_ {
        self.entries.iter().map(|(id, block)| (id.as_str(), *block))
    }

    /// Total units held by live reservations.
    pub fn used_units(&self) -> usize {
        self.entries.values().map(BuddyBlock::size).sum()
    }
}
