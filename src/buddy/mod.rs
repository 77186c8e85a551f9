//! Buddy unit allocator module
//!
//! This module provides the buddy system engine with:
//! - Order resolution for requested unit counts
//! - Ordered free sets per order for O(log n) buddy lookup
//! - An allocation registry keyed by reservation name
//! - Statistics and invariant checking

pub mod buddy_allocator;
pub mod buddy_block;
pub mod check;
pub mod free_lists;
pub mod order;
pub mod registry;
pub mod stats;

pub use buddy_allocator::BuddyAllocator;
pub use buddy_block::{BuddyBlock, MAX_SUPPORTED_ORDER};
pub use check::InvariantViolation;
pub use free_lists::{FreeListError, FreeListTable};
pub use order::resolve_order;
pub use registry::AllocationRegistry;
pub use stats::BuddyStats;
