//! Statistics and debugging for buddy allocator
//!
//! Provides statistics snapshots and failure reporting.

#[cfg(feature = "log")]
use log::debug;

use super::buddy_block::MAX_SUPPORTED_ORDER;

/// Buddy system statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuddyStats {
    pub total_units: usize,
    pub free_units: usize,
    pub used_units: usize,
    pub live_allocations: usize,
    pub free_blocks_by_order: [usize; MAX_SUPPORTED_ORDER + 1],
}

impl Default for BuddyStats {
    fn default() -> Self {
        Self::new()
    }
}

impl BuddyStats {
    pub const fn new() -> Self {
        Self {
            total_units: 0,
            free_units: 0,
            used_units: 0,
            live_allocations: 0,
            free_blocks_by_order: [0; MAX_SUPPORTED_ORDER + 1],
        }
    }

    /// Highest order that currently has a free block.
    pub fn largest_free_order(&self) -> Option<usize> {
        self.free_blocks_by_order.iter().rposition(|&count| count > 0)
    }
}

/// Detailed memory statistics reporter
pub struct MemoryStatsReporter;

impl MemoryStatsReporter {
    /// Log the pool state behind a failed reservation
    /// This is a standalone function to keep allocation logic clean
    #[allow(unused_variables)]
    pub fn log_out_of_space(stats: &BuddyStats, max_order: usize, units: usize, order: usize) {
        debug!("========================================");
        debug!("Request: {} units (order {})", units, order);
        debug!(
            "  Total units: {}, free: {}, used: {}, live reservations: {}",
            stats.total_units, stats.free_units, stats.used_units, stats.live_allocations
        );
        debug!("  Free blocks by order:");
        for order in (0..=max_order).rev() {
            let count = stats.free_blocks_by_order[order];
            if count > 0 {
                debug!(
                    "    Order {}: {} blocks ({} units each, {} units total)",
                    order,
                    count,
                    1usize << order,
                    count << order
                );
            }
        }
        debug!("========================================");
    }
}
