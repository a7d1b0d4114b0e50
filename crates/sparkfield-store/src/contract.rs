//! The particle store contract.
//!
//! A store owns the live [`ParticleRecord`]s of one emitter and keeps them in
//! creation order. Callers walk it with the classic cursor protocol:
//!
//! ```text
//! let mut h = store.first();
//! while h != store.end() {
//!     if done(store.get(h)?) { h = store.remove(h)?; continue; }
//!     h = store.next(h)?;
//! }
//! ```
//!
//! `remove` hands back the successor of the removed record, so removal
//! during traversal never skips or revisits anything. Removal never reorders
//! survivors.

use core::fmt;

use serde::Deserialize;
use sparkfield_types::{ParticleRecord, StoreKind};

use crate::error::StoreError;

/// Construction options shared by every store strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StoreOptions {
    /// Records preallocated into the pooled store's free chain.
    ///
    /// Ignored by the other strategies.
    #[serde(default)]
    pub pool_prealloc: usize,

    /// Maximum records the store may ever hold storage for.
    ///
    /// Reaching it makes `create` fail with [`StoreError::OutOfMemory`],
    /// which stands in for allocator exhaustion. `None` means unbounded.
    #[serde(default)]
    pub capacity_limit: Option<usize>,
}

impl StoreOptions {
    /// Whether a store currently holding storage for `held` records may
    /// obtain one more.
    pub const fn allows(&self, held: usize) -> bool {
        match self.capacity_limit {
            Some(limit) => held < limit,
            None => true,
        }
    }
}

/// Allocation counters kept by every store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationStats {
    /// Storage obtained from the allocator.
    pub fresh_allocations: u64,
    /// Storage handed back to the allocator.
    pub deallocations: u64,
    /// Creates served from retained storage without allocating.
    pub reused: u64,
    /// Idle records (or container slots) currently held for reuse.
    pub retained: usize,
    /// Highest live count ever observed.
    pub peak_live: usize,
}

impl AllocationStats {
    pub(crate) const fn note_live(&mut self, live: usize) {
        if live > self.peak_live {
            self.peak_live = live;
        }
    }
}

/// Owner of a set of live particle records with stable traversal order.
pub trait ParticleStore {
    /// Opaque reference to one record of this store.
    type Handle: Copy + Eq + fmt::Debug;

    /// Which strategy this store implements.
    fn kind(&self) -> StoreKind;

    /// Obtain storage for a new default record and link it at the tail.
    fn create(&mut self) -> Result<Self::Handle, StoreError>;

    /// Unlink a record and return the handle of the record after it.
    ///
    /// Returns [`end`](Self::end) when the removed record was the last one.
    fn remove(&mut self, handle: Self::Handle) -> Result<Self::Handle, StoreError>;

    /// Handle of the oldest live record, or `end()` when empty.
    fn first(&self) -> Self::Handle;

    /// One-past-last sentinel.
    fn end(&self) -> Self::Handle;

    /// Handle of the record after `handle`, or `end()`.
    fn next(&self, handle: Self::Handle) -> Result<Self::Handle, StoreError>;

    /// Borrow a live record.
    fn get(&self, handle: Self::Handle) -> Result<&ParticleRecord, StoreError>;

    /// Mutably borrow a live record.
    fn get_mut(&mut self, handle: Self::Handle) -> Result<&mut ParticleRecord, StoreError>;

    /// Number of live records, in O(1).
    fn len(&self) -> usize;

    /// Whether no records are live.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocation counters.
    fn stats(&self) -> AllocationStats;

    /// Iterate live records from `first()` to `end()`.
    fn iter(&self) -> Records<'_, Self>
    where
        Self: Sized,
    {
        Records {
            store: self,
            cursor: self.first(),
        }
    }
}

/// Forward iterator over a store's live records.
#[derive(Debug)]
pub struct Records<'a, S: ParticleStore> {
    store: &'a S,
    cursor: S::Handle,
}

impl<'a, S: ParticleStore> Iterator for Records<'a, S> {
    type Item = &'a ParticleRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        if self.cursor == store.end() {
            return None;
        }
        let record = store.get(self.cursor).ok()?;
        self.cursor = store.next(self.cursor).unwrap_or_else(|_| store.end());
        Some(record)
    }
}
