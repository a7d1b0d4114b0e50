//! Handle-list store: a linked list threaded through a [`SlotMap`].
//!
//! The slot map owns the storage and hands out versioned keys that stay
//! valid while other elements come and go. Order lives in `prev`/`next`
//! keys on each node. Whether a removed slot is reused or a new one is
//! allocated is the container's decision, not this store's.

use slotmap::{SlotMap, new_key_type};
use sparkfield_types::{ParticleRecord, StoreKind};

use crate::contract::{AllocationStats, ParticleStore, StoreOptions};
use crate::error::StoreError;

new_key_type! {
    /// Versioned key of one node in a [`HandleListStore`].
    pub struct ListKey;
}

/// Opaque reference to a record in a [`HandleListStore`].
///
/// The `end()` sentinel carries no key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListHandle(Option<ListKey>);

impl ListHandle {
    /// One-past-last sentinel returned by `end()`.
    pub const END: Self = Self(None);

    /// Whether this is the `end()` sentinel.
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }
}

#[derive(Debug)]
struct ListNode {
    record: ParticleRecord,
    prev: Option<ListKey>,
    next: Option<ListKey>,
}

/// Store backed by a versioned-key container.
#[derive(Debug)]
pub struct HandleListStore {
    nodes: SlotMap<ListKey, ListNode>,
    head: Option<ListKey>,
    tail: Option<ListKey>,
    options: StoreOptions,
    stats: AllocationStats,
}

impl Default for HandleListStore {
    fn default() -> Self {
        Self::with_options(StoreOptions::default())
    }
}

impl HandleListStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            options,
            stats: AllocationStats::default(),
        }
    }

    fn key(handle: ListHandle, operation: &'static str) -> Result<ListKey, StoreError> {
        handle.0.ok_or(StoreError::InvalidHandle { operation })
    }

    fn node(&self, handle: ListHandle, operation: &'static str) -> Result<&ListNode, StoreError> {
        let key = Self::key(handle, operation)?;
        self.nodes
            .get(key)
            .ok_or(StoreError::InvalidHandle { operation })
    }

    fn node_mut(
        &mut self,
        handle: ListHandle,
        operation: &'static str,
    ) -> Result<&mut ListNode, StoreError> {
        let key = Self::key(handle, operation)?;
        self.nodes
            .get_mut(key)
            .ok_or(StoreError::InvalidHandle { operation })
    }

    fn link_mut(&mut self, key: ListKey) -> Result<&mut ListNode, StoreError> {
        self.nodes
            .get_mut(key)
            .ok_or(StoreError::CorruptLinks { context: "list node" })
    }
}

impl ParticleStore for HandleListStore {
    type Handle = ListHandle;

    fn kind(&self) -> StoreKind {
        StoreKind::HandleList
    }

    fn create(&mut self) -> Result<ListHandle, StoreError> {
        if !self.options.allows(self.nodes.len()) {
            return Err(StoreError::OutOfMemory {
                capacity: self.nodes.len(),
            });
        }
        let capacity_before = self.nodes.capacity();
        let key = self.nodes.insert(ListNode {
            record: ParticleRecord::default(),
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.link_mut(tail)?.next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);

        if self.nodes.capacity() > capacity_before {
            self.stats.fresh_allocations = self.stats.fresh_allocations.saturating_add(1);
        }
        self.stats.retained = self.nodes.capacity().saturating_sub(self.nodes.len());
        self.stats.note_live(self.nodes.len());
        Ok(ListHandle(Some(key)))
    }

    fn remove(&mut self, handle: ListHandle) -> Result<ListHandle, StoreError> {
        let key = Self::key(handle, "remove")?;
        let node = self
            .nodes
            .remove(key)
            .ok_or(StoreError::InvalidHandle { operation: "remove" })?;
        match node.prev {
            Some(prev) => self.link_mut(prev)?.next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.link_mut(next)?.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.stats.retained = self.nodes.capacity().saturating_sub(self.nodes.len());
        Ok(ListHandle(node.next))
    }

    fn first(&self) -> ListHandle {
        ListHandle(self.head)
    }

    fn end(&self) -> ListHandle {
        ListHandle::END
    }

    fn next(&self, handle: ListHandle) -> Result<ListHandle, StoreError> {
        Ok(ListHandle(self.node(handle, "next")?.next))
    }

    fn get(&self, handle: ListHandle) -> Result<&ParticleRecord, StoreError> {
        Ok(&self.node(handle, "get")?.record)
    }

    fn get_mut(&mut self, handle: ListHandle) -> Result<&mut ParticleRecord, StoreError> {
        Ok(&mut self.node_mut(handle, "get_mut")?.record)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn stats(&self) -> AllocationStats {
        self.stats
    }
}
