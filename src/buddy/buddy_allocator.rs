//! Buddy unit allocator
//!
//! Orchestrates order resolution, the free-list table and the allocation
//! registry to serve named reservations from a single pool.

use alloc::string::ToString;

use crate::snapshot::{AllocationEntry, FreeListSnapshot, Snapshot};
use crate::{BuddyError, BuddyResult};

#[cfg(feature = "log")]
use log::{debug, trace};

use super::{
    buddy_block::BuddyBlock,
    free_lists::{FreeListError, FreeListTable},
    order::{pool_order, resolve_order},
    registry::AllocationRegistry,
    stats::{BuddyStats, MemoryStatsReporter},
};

/// Buddy allocator over `total_units` units.
///
/// Every unit is covered by exactly one block at all times: either a free
/// block in the free-list table or a reserved block in the registry.
pub struct BuddyAllocator {
    total_units: usize,
    max_order: usize,
    pub(crate) free_lists: FreeListTable,
    pub(crate) registry: AllocationRegistry,
}

impl BuddyAllocator {
    /// Create an allocator whose whole pool starts as one free block.
    pub fn new(total_units: usize) -> BuddyResult<Self> {
        let max_order = pool_order(total_units)?;
        debug!(
            "buddy allocator: pool of {} units (max order {})",
            total_units, max_order
        );
        Ok(Self {
            total_units,
            max_order,
            free_lists: FreeListTable::new(max_order),
            registry: AllocationRegistry::new(),
        })
    }

    pub const fn total_units(&self) -> usize {
        self.total_units
    }

    pub const fn max_order(&self) -> usize {
        self.max_order
    }

    /// Reserve at least `units` contiguous units under `id`.
    ///
    /// The returned block is aligned to its own size. Nothing is modified
    /// when an error is returned.
    pub fn reserve(&mut self, units: usize, id: &str) -> BuddyResult<BuddyBlock> {
        self.registry.ensure_vacant(id)?;
        let desired = resolve_order(units)?;

        // Try to find a block of the required order or higher
        let Some(found) = self.take_free_block(desired) else {
            MemoryStatsReporter::log_out_of_space(&self.stats(), self.max_order, units, desired);
            return Err(BuddyError::OutOfSpace {
                units,
                order: desired,
            });
        };

        let block = self.split_down(found, desired);
        debug_assert!(block.is_aligned());

        self.registry.insert(id, block);
        debug!(
            "buddy allocator: reserved '{}' at {} (order {}, from order {})",
            id, block.start, block.order, found.order
        );
        Ok(block)
    }

    /// Release the reservation named `id` and merge it with free buddies.
    ///
    /// Returns the free block the reservation ended up in after coalescing.
    pub fn free(&mut self, id: &str) -> BuddyResult<BuddyBlock> {
        let block = self.registry.remove(id)?;
        let merged = self.coalesce(block);
        debug!(
            "buddy allocator: freed '{}' at {} (order {}), now free at {} (order {})",
            id, block.start, block.order, merged.start, merged.order
        );
        Ok(merged)
    }

    /// Structural view of the free lists and live reservations.
    pub fn inspect(&self) -> Snapshot {
        let free_lists = (0..=self.max_order)
            .rev()
            .map(|order| FreeListSnapshot {
                order,
                starts: self.free_lists.iter(order).collect(),
            })
            .collect();
        let allocations = self
            .registry
            .iter()
            .map(|(id, block)| AllocationEntry {
                id: id.to_string(),
                block,
            })
            .collect();
        Snapshot {
            total_units: self.total_units,
            max_order: self.max_order,
            free_lists,
            allocations,
        }
    }

    /// Block currently reserved under `id`.
    pub fn allocation(&self, id: &str) -> Option<BuddyBlock> {
        self.registry.get(id)
    }

    pub fn allocation_count(&self) -> usize {
        self.registry.len()
    }

    pub fn free_units(&self) -> usize {
        self.free_lists.free_units()
    }

    pub fn used_units(&self) -> usize {
        self.registry.used_units()
    }

    /// Highest order holding a free block, if any unit is free.
    pub fn largest_free_order(&self) -> Option<usize> {
        (0..=self.max_order)
            .rev()
            .find(|&order| !self.free_lists.is_empty(order))
    }

    /// Get statistics for this pool
    pub fn stats(&self) -> BuddyStats {
        let mut stats = BuddyStats::new();
        stats.total_units = self.total_units;
        for order in 0..=self.max_order {
            stats.free_blocks_by_order[order] = self.free_lists.len(order);
        }
        stats.free_units = self.free_lists.free_units();
        stats.used_units = self.registry.used_units();
        stats.live_allocations = self.registry.len();
        stats
    }

    /// Take the first free block at `order` or above.
    fn take_free_block(&mut self, order: usize) -> Option<BuddyBlock> {
        let found = self.free_lists.first_non_empty(order)?;
        self.free_lists
            .take_any(found)
            .ok()
            .map(|start| BuddyBlock::new(start, found))
    }

    /// Split down to `target`, keeping the lower half each time and pushing
    /// the upper half back to the free list of the new order.
    fn split_down(&mut self, mut block: BuddyBlock, target: usize) -> BuddyBlock {
        while block.order > target {
            let Some((lower, upper)) = block.halves() else {
                break;
            };
            self.free_lists.insert(upper.order, upper.start);
            trace!(
                "buddy allocator: split, upper half {} free at order {}",
                upper.start,
                upper.order
            );
            block = lower;
        }
        block
    }

    /// Merge `block` with its buddy for as long as the buddy is free, then
    /// put the result on the free list of its final order.
    fn coalesce(&mut self, mut block: BuddyBlock) -> BuddyBlock {
        loop {
            let buddy = block.buddy_start();
            match self.free_lists.remove(block.order, buddy) {
                Ok(()) => {
                    trace!(
                        "buddy allocator: merged {} with buddy {} at order {}",
                        block.start,
                        buddy,
                        block.order
                    );
                    block = block.parent();
                    // At most one top-order block exists, so it never has a free buddy.
                    assert!(
                        block.order <= self.max_order,
                        "coalesced past max order {}",
                        self.max_order
                    );
                }
                Err(FreeListError::NotFree { .. }) | Err(FreeListError::Empty { .. }) => break,
            }
        }
        self.free_lists.insert(block.order, block.start);
        block
    }
}
