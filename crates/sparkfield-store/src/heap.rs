//! Heap intrusive store: one allocation per record.
//!
//! Every record lives in its own `Box` together with its `prev`/`next`
//! links. `create` allocates and links at the tail, `remove` unlinks and
//! drops the box. The slot table only maps handles to boxes; vacated slots
//! are reused for addressing, never for record storage.

use sparkfield_types::{ParticleRecord, StoreKind};

use crate::contract::{AllocationStats, ParticleStore, StoreOptions};
use crate::error::StoreError;
use crate::handle::{self, ParticleHandle};

#[derive(Debug)]
struct HeapNode {
    record: ParticleRecord,
    prev: Option<u32>,
    next: Option<u32>,
}

#[derive(Debug, Default)]
struct HeapSlot {
    generation: u32,
    node: Option<Box<HeapNode>>,
}

/// Store that heap-allocates each record individually.
#[derive(Debug, Default)]
pub struct HeapIntrusiveStore {
    slots: Vec<HeapSlot>,
    vacant: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
    options: StoreOptions,
    stats: AllocationStats,
}

impl HeapIntrusiveStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    fn node(&self, index: u32) -> Result<&HeapNode, StoreError> {
        self.slots
            .get(handle::slot(index))
            .and_then(|s| s.node.as_deref())
            .ok_or(StoreError::CorruptLinks { context: "heap node" })
    }

    fn node_mut(&mut self, index: u32) -> Result<&mut HeapNode, StoreError> {
        self.slots
            .get_mut(handle::slot(index))
            .and_then(|s| s.node.as_deref_mut())
            .ok_or(StoreError::CorruptLinks { context: "heap node" })
    }

    /// Check that `handle` names a live slot with a matching generation.
    fn resolve(&self, handle: ParticleHandle, operation: &'static str) -> Result<u32, StoreError> {
        match self.slots.get(handle::slot(handle.index())) {
            Some(slot) if slot.generation == handle.generation() && slot.node.is_some() => {
                Ok(handle.index())
            }
            _ => Err(StoreError::InvalidHandle { operation }),
        }
    }

    fn handle_for(&self, index: Option<u32>) -> ParticleHandle {
        index
            .and_then(|i| self.slots.get(handle::slot(i)).map(|s| (i, s.generation)))
            .map_or(ParticleHandle::END, |(i, generation)| {
                ParticleHandle::new(i, generation)
            })
    }

    /// Pick a slot for a new node, growing the table if none is vacant.
    fn claim_slot(&mut self) -> Result<u32, StoreError> {
        if let Some(index) = self.vacant.pop() {
            return Ok(index);
        }
        let index = handle::next_index(self.slots.len())?;
        self.slots
            .try_reserve(1)
            .map_err(|_err| StoreError::OutOfMemory {
                capacity: self.slots.len(),
            })?;
        self.slots.push(HeapSlot::default());
        Ok(index)
    }
}

impl ParticleStore for HeapIntrusiveStore {
    type Handle = ParticleHandle;

    fn kind(&self) -> StoreKind {
        StoreKind::Heap
    }

    fn create(&mut self) -> Result<ParticleHandle, StoreError> {
        if !self.options.allows(self.len) {
            return Err(StoreError::OutOfMemory { capacity: self.len });
        }
        let index = self.claim_slot()?;
        let node = Box::new(HeapNode {
            record: ParticleRecord::default(),
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail) => self.node_mut(tail)?.next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);

        let slot = self
            .slots
            .get_mut(handle::slot(index))
            .ok_or(StoreError::CorruptLinks { context: "heap slot" })?;
        slot.node = Some(node);
        let generation = slot.generation;

        self.len = self.len.saturating_add(1);
        self.stats.fresh_allocations = self.stats.fresh_allocations.saturating_add(1);
        self.stats.note_live(self.len);
        Ok(ParticleHandle::new(index, generation))
    }

    fn remove(&mut self, handle: ParticleHandle) -> Result<ParticleHandle, StoreError> {
        let index = self.resolve(handle, "remove")?;
        let slot = self
            .slots
            .get_mut(handle::slot(index))
            .ok_or(StoreError::CorruptLinks { context: "heap slot" })?;
        let node = slot
            .node
            .take()
            .ok_or(StoreError::InvalidHandle { operation: "remove" })?;
        slot.generation = slot.generation.wrapping_add(1);

        match node.prev {
            Some(prev) => self.node_mut(prev)?.next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next)?.prev = node.prev,
            None => self.tail = node.prev,
        }
        let successor = node.next;
        drop(node);

        self.vacant.push(index);
        self.len = self.len.saturating_sub(1);
        self.stats.deallocations = self.stats.deallocations.saturating_add(1);
        Ok(self.handle_for(successor))
    }

    fn first(&self) -> ParticleHandle {
        self.handle_for(self.head)
    }

    fn end(&self) -> ParticleHandle {
        ParticleHandle::END
    }

    fn next(&self, handle: ParticleHandle) -> Result<ParticleHandle, StoreError> {
        let index = self.resolve(handle, "next")?;
        Ok(self.handle_for(self.node(index)?.next))
    }

    fn get(&self, handle: ParticleHandle) -> Result<&ParticleRecord, StoreError> {
        let index = self.resolve(handle, "get")?;
        Ok(&self.node(index)?.record)
    }

    fn get_mut(&mut self, handle: ParticleHandle) -> Result<&mut ParticleRecord, StoreError> {
        let index = self.resolve(handle, "get_mut")?;
        Ok(&mut self.node_mut(index)?.record)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn stats(&self) -> AllocationStats {
        self.stats
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Create a record and tag it with `id` in `birth_tick`.
    fn push(store: &mut HeapIntrusiveStore, id: u64) -> ParticleHandle {
        let h = store.create().unwrap();
        store.get_mut(h).unwrap().birth_tick = id;
        h
    }

    fn ids(store: &HeapIntrusiveStore) -> Vec<u64> {
        store.iter().map(|r| r.birth_tick).collect()
    }

    #[test]
    fn empty_store_first_is_end() {
        let store = HeapIntrusiveStore::new();
        assert_eq!(store.first(), store.end());
        assert!(store.is_empty());
        assert_eq!(store.kind(), StoreKind::Heap);
    }

    #[test]
    fn create_appends_at_tail() {
        let mut store = HeapIntrusiveStore::new();
        for id in 1..=4 {
            push(&mut store, id);
        }
        assert_eq!(ids(&store), vec![1, 2, 3, 4]);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn remove_returns_successor() {
        let mut store = HeapIntrusiveStore::new();
        let a = push(&mut store, 1);
        let b = push(&mut store, 2);
        let c = push(&mut store, 3);

        assert_eq!(store.remove(b).unwrap(), c);
        assert_eq!(ids(&store), vec![1, 3]);
        assert_eq!(store.remove(c).unwrap(), store.end());
        assert_eq!(store.remove(a).unwrap(), store.end());
        assert!(store.is_empty());
        assert_eq!(store.first(), store.end());
    }

    #[test]
    fn stale_handle_rejected_after_slot_reuse() {
        let mut store = HeapIntrusiveStore::new();
        let a = push(&mut store, 1);
        store.remove(a).unwrap();
        let b = push(&mut store, 2);
        // Same slot, new generation.
        assert_ne!(a, b);
        assert_eq!(
            store.get(a).unwrap_err(),
            StoreError::InvalidHandle { operation: "get" }
        );
        assert!(store.remove(a).is_err());
        assert_eq!(ids(&store), vec![2]);
    }

    #[test]
    fn next_of_end_is_invalid() {
        let store = HeapIntrusiveStore::new();
        assert!(store.next(store.end()).is_err());
    }

    #[test]
    fn every_create_allocates_and_every_remove_frees() {
        let mut store = HeapIntrusiveStore::new();
        let handles: Vec<_> = (0..5).map(|id| push(&mut store, id)).collect();
        for h in handles {
            store.remove(h).unwrap();
        }
        for id in 0..3 {
            push(&mut store, id);
        }
        let stats = store.stats();
        assert_eq!(stats.fresh_allocations, 8);
        assert_eq!(stats.deallocations, 5);
        assert_eq!(stats.reused, 0);
        assert_eq!(stats.peak_live, 5);
    }

    #[test]
    fn capacity_limit_reports_out_of_memory() {
        let mut store = HeapIntrusiveStore::with_options(StoreOptions {
            pool_prealloc: 0,
            capacity_limit: Some(2),
        });
        let a = push(&mut store, 1);
        push(&mut store, 2);
        assert_eq!(
            store.create().unwrap_err(),
            StoreError::OutOfMemory { capacity: 2 }
        );
        assert_eq!(store.len(), 2);
        store.remove(a).unwrap();
        assert!(store.create().is_ok());
    }

    #[test]
    fn remove_while_iterating_visits_each_once() {
        let mut store = HeapIntrusiveStore::new();
        for id in 0..10 {
            push(&mut store, id);
        }
        let mut visited = Vec::new();
        let mut h = store.first();
        while h != store.end() {
            let id = store.get(h).unwrap().birth_tick;
            visited.push(id);
            h = if id % 3 == 0 {
                store.remove(h).unwrap()
            } else {
                store.next(h).unwrap()
            };
        }
        assert_eq!(visited, (0..10).collect::<Vec<_>>());
        assert_eq!(ids(&store), vec![1, 2, 4, 5, 7, 8]);
    }
}
