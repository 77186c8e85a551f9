//! Buddy block metadata
//!
//! Represents a block of units in the buddy system with order and start offset.

/// Largest order a pool may have: the pool size must fit in a `usize`.
pub const MAX_SUPPORTED_ORDER: usize = usize::BITS as usize - 1;

/// Buddy block metadata
///
/// Blocks are never materialized; a block is fully described by its start
/// offset and its order, which implies a size of `2^order` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuddyBlock {
    pub start: usize,
    pub order: usize,
}

impl BuddyBlock {
    /// Create a new buddy block
    pub const fn new(start: usize, order: usize) -> Self {
        Self { start, order }
    }

    /// Number of units covered by this block.
    pub const fn size(&self) -> usize {
        1 << self.order
    }

    /// One past the last unit covered by this block.
    pub const fn end(&self) -> usize {
        self.start + self.size()
    }

    /// Calculate the buddy start for this block
    /// The buddy is the other half of the parent block at the next higher order
    pub const fn buddy_start(&self) -> usize {
        self.start ^ self.size()
    }

    /// Whether `start` is a multiple of the block size.
    pub const fn is_aligned(&self) -> bool {
        crate::is_aligned(self.start, self.size())
    }

    /// The block one order up that contains this block.
    pub const fn parent(&self) -> Self {
        Self::new(self.start & !self.size(), self.order + 1)
    }

    /// Split into lower and upper halves one order down.
    ///
    /// Returns `None` for order-0 blocks.
    pub const fn halves(&self) -> Option<(Self, Self)> {
        if self.order == 0 {
            return None;
        }
        let half = self.order - 1;
        Some((
            Self::new(self.start, half),
            Self::new(self.start + (1 << half), half),
        ))
    }
}
