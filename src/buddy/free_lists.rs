//! Order-indexed free lists
//!
//! One ordered set of start offsets per order. Sets keep starts sorted, which
//! makes buddy lookup O(log n) and snapshots deterministic.

use alloc::collections::BTreeSet;

#[cfg(feature = "log")]
use log::error;

use super::buddy_block::{BuddyBlock, MAX_SUPPORTED_ORDER};

/// Internal free-list consistency errors.
///
/// These never surface through [`BuddyAllocator`](super::BuddyAllocator):
/// correct orchestration only removes starts it knows to be free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FreeListError {
    /// The start is not in the free list of that order.
    #[error("block at {start} is not free at order {order}")]
    NotFree { order: usize, start: usize },
    /// The free list of that order has no entries.
    #[error("no free block at order {order}")]
    Empty { order: usize },
}

/// Free lists for each order of one pool.
pub struct FreeListTable {
    max_order: usize,
    lists: [BTreeSet<usize>; MAX_SUPPORTED_ORDER + 1],
}

impl FreeListTable {
    /// Create the table for a pool of order `max_order`, holding a single free
    /// block that covers the whole pool.
    pub fn new(max_order: usize) -> Self {
        assert!(
            max_order <= MAX_SUPPORTED_ORDER,
            "Order {} exceeds maximum order {}",
            max_order,
            MAX_SUPPORTED_ORDER
        );
        let mut table = Self {
            max_order,
            lists: [const { BTreeSet::<usize>::new() }; MAX_SUPPORTED_ORDER + 1],
        };
        table.lists[max_order].insert(0);
        table
    }

    pub const fn max_order(&self) -> usize {
        self.max_order
    }

    /// Add a free block to the list for its order.
    pub fn insert(&mut self, order: usize, start: usize) {
        debug_assert!(order <= self.max_order);
        let inserted = self.lists[order].insert(start);
        if !inserted {
            error!("Block at {} already free at order {}", start, order);
        }
        debug_assert!(inserted, "duplicate free block {start} at order {order}");
    }

    /// Remove a specific free block.
    pub fn remove(&mut self, order: usize, start: usize) -> Result<(), FreeListError> {
        if order <= self.max_order && self.lists[order].remove(&start) {
            Ok(())
        } else {
            Err(FreeListError::NotFree { order, start })
        }
    }

    /// Remove and return a free block of the given order.
    ///
    /// The lowest start is taken, so repeated runs pick the same blocks.
    pub fn take_any(&mut self, order: usize) -> Result<usize, FreeListError> {
        if order > self.max_order {
            return Err(FreeListError::Empty { order });
        }
        self.lists[order]
            .pop_first()
            .ok_or(FreeListError::Empty { order })
    }

    pub fn contains(&self, order: usize, start: usize) -> bool {
        order <= self.max_order && self.lists[order].contains(&start)
    }

    pub fn is_empty(&self, order: usize) -> bool {
        order > self.max_order || self.lists[order].is_empty()
    }

    /// Get the number of blocks in a specific order
    pub fn len(&self, order: usize) -> usize {
        if order <= self.max_order {
            self.lists[order].len()
        } else {
            0
        }
    }

    /// Lowest order at or above `from` with at least one free block.
    pub fn first_non_empty(&self, from: usize) -> Option<usize> {
        (from..=self.max_order).find(|&order| !self.lists[order].is_empty())
    }

    /// Free starts of one order, ascending.
    pub fn iter(&self, order: usize) -> impl Iterator<Item = usize> + '_ {
        self.lists[..=self.max_order]
            .get(order)
            .into_iter()
            .flat_map(|list| list.iter().copied())
    }

    /// Every free block, ordered by order then start.
    pub fn blocks(&self) -> impl Iterator<Item = BuddyBlock> + '_ {
        self.lists[..=self.max_order]
            .iter()
            .enumerate()
            .flat_map(|(order, list)| list.iter().map(move |&start| BuddyBlock::new(start, order)))
    }

    /// Total units held by free blocks.
    pub fn free_units(&self) -> usize {
        self.lists[..=self.max_order]
            .iter()
            .enumerate()
            .map(|(order, list)| list.len() << order)
            .sum()
    }
}
