//! Buddy Unit Allocator
//!
//! This crate manages a fixed pool of `N` addressable units (`N` a power of
//! two) with the buddy system, featuring:
//! - Order-indexed free lists backed by ordered sets
//! - Split-on-reserve and eager coalesce-on-free
//! - Named reservations tracked by an allocation registry
//! - A spin-locked wrapper for sharing one pool between threads
//! - A line-oriented command shell (`std` feature)

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;

// Logging support - conditionally import log crate
#[cfg(feature = "log")]
extern crate log;

// Stub macros when log is disabled - these become no-ops
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! error {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! info {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// The error type returned by allocator operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuddyError {
    /// The pool size is zero or not a power of two.
    #[error("total units must be a positive power of two, got {0}")]
    InvalidTotal(usize),
    /// The requested unit count is not positive.
    #[error("requested unit count must be positive")]
    InvalidSize,
    /// The name already identifies a live reservation.
    #[error("name '{0}' is already reserved")]
    DuplicateId(String),
    /// No free block of sufficient order exists.
    #[error("no free block large enough for {units} units (order {order})")]
    OutOfSpace { units: usize, order: usize },
    /// The name does not identify a live reservation.
    #[error("name '{0}' was not found")]
    UnknownId(String),
    /// A shared allocator was used before `init`.
    #[error("allocator has not been initialized")]
    Uninitialized,
}

/// A [`Result`] type with [`BuddyError`] as the error type.
pub type BuddyResult<T = ()> = Result<T, BuddyError>;

/// Checks whether the offset has the demanded alignment.
///
/// Equivalent to `offset % align == 0`, but the alignment must be a power of two.
#[inline]
const fn is_aligned(offset: usize, align: usize) -> bool {
    offset & (align - 1) == 0
}

pub mod buddy;
pub use buddy::{
    resolve_order, AllocationRegistry, BuddyAllocator, BuddyBlock, BuddyStats, FreeListError,
    FreeListTable, InvariantViolation, MAX_SUPPORTED_ORDER,
};

pub mod snapshot;
pub use snapshot::{AllocationEntry, FreeListSnapshot, Snapshot};

pub mod locked;
pub use locked::LockedBuddyAllocator;

#[cfg(feature = "std")]
pub mod shell;
#[cfg(feature = "std")]
pub use shell::{Command, CommandError, Flow, Shell, ShellArgs, ShellConfig};
