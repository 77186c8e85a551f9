//! Check operations for validating allocator state.
//!
//! Used by tests and debugging code; the allocator never calls these on its
//! own hot paths.

use alloc::vec::Vec;

use super::{buddy_allocator::BuddyAllocator, buddy_block::BuddyBlock};

/// A broken structural invariant found by [`BuddyAllocator::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// A block start is not a multiple of its size.
    #[error("block at {start} is not aligned to order {order}")]
    Misaligned { start: usize, order: usize },
    /// A block extends past the end of the pool.
    #[error("block at {start} (order {order}) extends past the pool end")]
    OutOfBounds { start: usize, order: usize },
    /// Two blocks cover the same unit.
    #[error("blocks overlap at unit {at}")]
    Overlap { at: usize },
    /// A unit is covered by no block.
    #[error("unit {at} is covered by no block")]
    Gap { at: usize },
    /// A free block's buddy is also free at the same order.
    #[error("free block at {start} has a free buddy at order {order}")]
    MissedCoalesce { start: usize, order: usize },
}

impl BuddyAllocator {
    /// Check every structural invariant of the pool.
    ///
    /// Free and reserved blocks must be aligned, inside the pool, and tile
    /// `[0, total_units)` exactly. No free block may have a free buddy.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let total = self.total_units();
        let mut blocks: Vec<BuddyBlock> = self
            .free_lists
            .blocks()
            .chain(self.registry.iter().map(|(_, block)| block))
            .collect();

        for block in &blocks {
            if !block.is_aligned() {
                return Err(InvariantViolation::Misaligned {
                    start: block.start,
                    order: block.order,
                });
            }
            if block.order > self.max_order() || block.end() > total {
                return Err(InvariantViolation::OutOfBounds {
                    start: block.start,
                    order: block.order,
                });
            }
        }

        // Tiling: walk blocks by start; each must begin where the last ended.
        blocks.sort_unstable();
        let mut cursor = 0;
        for block in &blocks {
            if block.start > cursor {
                return Err(InvariantViolation::Gap { at: cursor });
            }
            if block.start < cursor {
                return Err(InvariantViolation::Overlap { at: block.start });
            }
            cursor = block.end();
        }
        if cursor != total {
            return Err(InvariantViolation::Gap { at: cursor });
        }

        for block in self.free_lists.blocks() {
            if block.order < self.max_order()
                && self.free_lists.contains(block.order, block.buddy_start())
            {
                return Err(InvariantViolation::MissedCoalesce {
                    start: block.start,
                    order: block.order,
                });
            }
        }
        Ok(())
    }
}
