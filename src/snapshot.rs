//! Read-only view of allocator state.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::buddy::BuddyBlock;

/// Free starts of a single order, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeListSnapshot {
    pub order: usize,
    pub starts: Vec<usize>,
}

/// One live reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationEntry {
    pub id: String,
    pub block: BuddyBlock,
}

/// Deterministic structural snapshot returned by `inspect`.
///
/// Free lists run from the top order down to order 0; reservations are
/// sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub total_units: usize,
    pub max_order: usize,
    pub free_lists: Vec<FreeListSnapshot>,
    pub allocations: Vec<AllocationEntry>,
}

impl Snapshot {
    /// Free starts recorded for `order`, if the pool has that order.
    pub fn free_starts(&self, order: usize) -> Option<&[usize]> {
        self.free_lists
            .iter()
            .find(|list| list.order == order)
            .map(|list| list.starts.as_slice())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total units: {} (orders 0..{})",
            self.total_units, self.max_order
        )?;
        writeln!(f, "Free lists:")?;
        for list in &self.free_lists {
            writeln!(
                f,
                "  order {} (size={}): {:?}",
                list.order,
                1usize << list.order,
                list.starts
            )?;
        }
        write!(f, "Allocations:")?;
        for entry in &self.allocations {
            write!(
                f,
                "\n  {}: start={}, size={} (order {})",
                entry.id,
                entry.block.start,
                entry.block.size(),
                entry.block.order
            )?;
        }
        Ok(())
    }
}
