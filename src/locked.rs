//! Shared allocator behind a spin lock.
//!
//! `reserve` and `free` touch several orders per call, so the free lists and
//! the registry are guarded together by a single lock. No caller can see a
//! block that has left one free list but not yet reached another.

use kspin::SpinNoIrq;

use crate::buddy::{BuddyAllocator, BuddyBlock, BuddyStats, InvariantViolation};
use crate::snapshot::Snapshot;
use crate::{BuddyError, BuddyResult};

#[cfg(feature = "log")]
use log::{error, info};

/// Buddy allocator that can be shared between threads or placed in a `static`.
pub struct LockedBuddyAllocator {
    inner: SpinNoIrq<Option<BuddyAllocator>>,
}

impl LockedBuddyAllocator {
    /// Create an uninitialized allocator; call [`init`](Self::init) before use.
    pub const fn new() -> Self {
        Self {
            inner: SpinNoIrq::new(None),
        }
    }

    /// Create and initialize in one step.
    pub fn with_total_units(total_units: usize) -> BuddyResult<Self> {
        let locked = Self::new();
        locked.init(total_units)?;
        Ok(locked)
    }

    /// Initialize with a fresh pool, discarding any previous state.
    pub fn init(&self, total_units: usize) -> BuddyResult {
        let allocator = BuddyAllocator::new(total_units)?;
        let mut inner = self.inner.lock();
        if inner.is_some() {
            info!("locked allocator: re-initializing with {} units", total_units);
        }
        *inner = Some(allocator);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Run `f` with exclusive access to the allocator.
    ///
    /// Use this for compound operations that must appear atomic.
    pub fn with<R>(&self, f: impl FnOnce(&mut BuddyAllocator) -> R) -> BuddyResult<R> {
        let mut inner = self.inner.lock();
        match inner.as_mut() {
            Some(allocator) => Ok(f(allocator)),
            None => {
                error!("locked allocator: used before initialization");
                Err(BuddyError::Uninitialized)
            }
        }
    }

    pub fn reserve(&self, units: usize, id: &str) -> BuddyResult<BuddyBlock> {
        self.with(|allocator| allocator.reserve(units, id))?
    }

    pub fn free(&self, id: &str) -> BuddyResult<BuddyBlock> {
        self.with(|allocator| allocator.free(id))?
    }

    pub fn inspect(&self) -> BuddyResult<Snapshot> {
        self.with(|allocator| allocator.inspect())
    }

    pub fn stats(&self) -> BuddyResult<BuddyStats> {
        self.with(|allocator| allocator.stats())
    }

    pub fn verify(&self) -> BuddyResult<Result<(), InvariantViolation>> {
        self.with(|allocator| allocator.verify())
    }
}

impl Default for LockedBuddyAllocator {
    fn default() -> Self {
        Self::new()
    }
}
