//! Order resolution
//!
//! Maps unit counts to block orders.

use crate::{BuddyError, BuddyResult};

use super::buddy_block::MAX_SUPPORTED_ORDER;

/// Smallest order whose block size covers `units`.
///
/// Counts too large for any `usize` pool resolve to `usize::BITS`, an order no
/// pool can hold, so the caller reports them as out of space.
pub fn resolve_order(units: usize) -> BuddyResult<usize> {
    if units == 0 {
        return Err(BuddyError::InvalidSize);
    }

    // Find the required order (round up to next power of 2)
    let order = match units.checked_next_power_of_two() {
        Some(size) => size.trailing_zeros() as usize,
        None => usize::BITS as usize,
    };
    Ok(order)
}

/// Validate a pool size and return its top order.
pub fn pool_order(total_units: usize) -> BuddyResult<usize> {
    if !total_units.is_power_of_two() {
        return Err(BuddyError::InvalidTotal(total_units));
    }
    let order = total_units.trailing_zeros() as usize;
    debug_assert!(order <= MAX_SUPPORTED_ORDER);
    Ok(order)
}
