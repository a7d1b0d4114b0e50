//! Runtime-selected store: one enum over the three strategies.
//!
//! The strategy is fixed when the store is built from a [`StoreKind`].
//! Simulator code stays generic over [`ParticleStore`]; `AnyStore` is the
//! implementation to use when the strategy comes from configuration.

use sparkfield_types::{ParticleRecord, StoreKind};

use crate::contract::{AllocationStats, ParticleStore, StoreOptions};
use crate::error::StoreError;
use crate::handle::ParticleHandle;
use crate::handle_list::{HandleListStore, ListHandle};
use crate::heap::HeapIntrusiveStore;
use crate::pooled::PooledIntrusiveStore;

/// A store whose strategy was chosen at construction time.
#[derive(Debug)]
pub enum AnyStore {
    /// Heap intrusive strategy.
    Heap(HeapIntrusiveStore),
    /// Pooled intrusive strategy.
    Pooled(PooledIntrusiveStore),
    /// Handle-list strategy.
    HandleList(HandleListStore),
}

/// Handle into an [`AnyStore`].
///
/// A handle of one variant passed to a store of another is rejected as
/// [`StoreError::InvalidHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyHandle {
    /// Handle into a heap or pooled store.
    Slot(ParticleHandle),
    /// Handle into a handle-list store.
    List(ListHandle),
}

impl AnyStore {
    /// Build the store for `kind`.
    pub fn new(kind: StoreKind, options: StoreOptions) -> Result<Self, StoreError> {
        Ok(match kind {
            StoreKind::Heap => Self::Heap(HeapIntrusiveStore::with_options(options)),
            StoreKind::Pooled => Self::Pooled(PooledIntrusiveStore::with_options(options)?),
            StoreKind::HandleList => Self::HandleList(HandleListStore::with_options(options)),
        })
    }
}

impl ParticleStore for AnyStore {
    type Handle = AnyHandle;

    fn kind(&self) -> StoreKind {
        match self {
            Self::Heap(s) => s.kind(),
            Self::Pooled(s) => s.kind(),
            Self::HandleList(s) => s.kind(),
        }
    }

    fn create(&mut self) -> Result<AnyHandle, StoreError> {
        match self {
            Self::Heap(s) => s.create().map(AnyHandle::Slot),
            Self::Pooled(s) => s.create().map(AnyHandle::Slot),
            Self::HandleList(s) => s.create().map(AnyHandle::List),
        }
    }

    fn remove(&mut self, handle: AnyHandle) -> Result<AnyHandle, StoreError> {
        match (self, handle) {
            (Self::Heap(s), AnyHandle::Slot(h)) => s.remove(h).map(AnyHandle::Slot),
            (Self::Pooled(s), AnyHandle::Slot(h)) => s.remove(h).map(AnyHandle::Slot),
            (Self::HandleList(s), AnyHandle::List(h)) => s.remove(h).map(AnyHandle::List),
            _ => Err(StoreError::InvalidHandle { operation: "remove" }),
        }
    }

    fn first(&self) -> AnyHandle {
        match self {
            Self::Heap(s) => AnyHandle::Slot(s.first()),
            Self::Pooled(s) => AnyHandle::Slot(s.first()),
            Self::HandleList(s) => AnyHandle::List(s.first()),
        }
    }

    fn end(&self) -> AnyHandle {
        match self {
            Self::Heap(_) | Self::Pooled(_) => AnyHandle::Slot(ParticleHandle::END),
            Self::HandleList(_) => AnyHandle::List(ListHandle::END),
        }
    }

    fn next(&self, handle: AnyHandle) -> Result<AnyHandle, StoreError> {
        match (self, handle) {
            (Self::Heap(s), AnyHandle::Slot(h)) => s.next(h).map(AnyHandle::Slot),
            (Self::Pooled(s), AnyHandle::Slot(h)) => s.next(h).map(AnyHandle::Slot),
            (Self::HandleList(s), AnyHandle::List(h)) => s.next(h).map(AnyHandle::List),
            _ => Err(StoreError::InvalidHandle { operation: "next" }),
        }
    }

    fn get(&self, handle: AnyHandle) -> Result<&ParticleRecord, StoreError> {
        match (self, handle) {
            (Self::Heap(s), AnyHandle::Slot(h)) => s.get(h),
            (Self::Pooled(s), AnyHandle::Slot(h)) => s.get(h),
            (Self::HandleList(s), AnyHandle::List(h)) => s.get(h),
            _ => Err(StoreError::InvalidHandle { operation: "get" }),
        }
    }

    fn get_mut(&mut self, handle: AnyHandle) -> Result<&mut ParticleRecord, StoreError> {
        match (self, handle) {
            (Self::Heap(s), AnyHandle::Slot(h)) => s.get_mut(h),
            (Self::Pooled(s), AnyHandle::Slot(h)) => s.get_mut(h),
            (Self::HandleList(s), AnyHandle::List(h)) => s.get_mut(h),
            _ => Err(StoreError::InvalidHandle { operation: "get_mut" }),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Heap(s) => s.len(),
            Self::Pooled(s) => s.len(),
            Self::HandleList(s) => s.len(),
        }
    }

    fn stats(&self) -> AllocationStats {
        match self {
            Self::Heap(s) => s.stats(),
            Self::Pooled(s) => s.stats(),
            Self::HandleList(s) => s.stats(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_requested_kind() {
        for kind in StoreKind::ALL {
            let store = AnyStore::new(kind, StoreOptions::default()).unwrap();
            assert_eq!(store.kind(), kind);
            assert_eq!(store.first(), store.end());
        }
    }

    #[test]
    fn foreign_variant_handle_rejected() {
        let mut list = AnyStore::new(StoreKind::HandleList, StoreOptions::default()).unwrap();
        let mut heap = AnyStore::new(StoreKind::Heap, StoreOptions::default()).unwrap();
        let h = heap.create().unwrap();
        list.create().unwrap();
        assert_eq!(
            list.remove(h).unwrap_err(),
            StoreError::InvalidHandle { operation: "remove" }
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn pooled_prealloc_passes_through() {
        let store = AnyStore::new(
            StoreKind::Pooled,
            StoreOptions {
                pool_prealloc: 5,
                capacity_limit: None,
            },
        )
        .unwrap();
        assert_eq!(store.stats().retained, 5);
    }
}
