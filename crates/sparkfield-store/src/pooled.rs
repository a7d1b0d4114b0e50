//! Pooled intrusive store: two index-linked chains over one arena.
//!
//! Every node in the arena is on exactly one chain:
//!
//! - **live** -- records currently visible to traversal, in creation order.
//! - **free** -- removed records kept for reuse.
//!
//! `create` pops the free tail and appends it to live. Only when the free
//! chain is empty does it grow the arena. `remove` moves the node to the
//! free tail and never gives memory back, so the arena size equals the
//! historical peak live count (or the preallocation, if larger).

use sparkfield_types::{ParticleRecord, StoreKind};
use tracing::trace;

use crate::contract::{AllocationStats, ParticleStore, StoreOptions};
use crate::error::StoreError;
use crate::handle::{self, ParticleHandle};

#[derive(Debug, Default)]
struct PoolNode {
    record: ParticleRecord,
    prev: Option<u32>,
    next: Option<u32>,
    generation: u32,
    live: bool,
}

/// Head, tail, and length of one index-linked chain.
#[derive(Debug, Default, Clone, Copy)]
struct Chain {
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

fn node_mut(nodes: &mut [PoolNode], index: u32) -> Result<&mut PoolNode, StoreError> {
    nodes
        .get_mut(handle::slot(index))
        .ok_or(StoreError::CorruptLinks { context: "pool node" })
}

/// Link `index` after the current tail of `chain`.
fn push_back(nodes: &mut [PoolNode], chain: &mut Chain, index: u32) -> Result<(), StoreError> {
    let old_tail = chain.tail;
    {
        let node = node_mut(nodes, index)?;
        node.prev = old_tail;
        node.next = None;
    }
    match old_tail {
        Some(tail) => node_mut(nodes, tail)?.next = Some(index),
        None => chain.head = Some(index),
    }
    chain.tail = Some(index);
    chain.len = chain.len.saturating_add(1);
    Ok(())
}

/// Detach `index` from `chain`, returning its former successor.
fn unlink(nodes: &mut [PoolNode], chain: &mut Chain, index: u32) -> Result<Option<u32>, StoreError> {
    let (prev, next) = {
        let node = node_mut(nodes, index)?;
        let links = (node.prev, node.next);
        node.prev = None;
        node.next = None;
        links
    };
    match prev {
        Some(p) => node_mut(nodes, p)?.next = next,
        None => chain.head = next,
    }
    match next {
        Some(n) => node_mut(nodes, n)?.prev = prev,
        None => chain.tail = prev,
    }
    chain.len = chain.len.saturating_sub(1);
    Ok(next)
}

/// Store that recycles removed records through a free chain.
#[derive(Debug, Default)]
pub struct PooledIntrusiveStore {
    nodes: Vec<PoolNode>,
    live: Chain,
    free: Chain,
    options: StoreOptions,
    stats: AllocationStats,
}

impl PooledIntrusiveStore {
    /// Create an empty pool with no preallocated records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool whose free chain holds `options.pool_prealloc` records.
    ///
    /// The preallocation is capped by `options.capacity_limit`.
    pub fn with_options(options: StoreOptions) -> Result<Self, StoreError> {
        let prealloc = options
            .capacity_limit
            .map_or(options.pool_prealloc, |limit| options.pool_prealloc.min(limit));
        let mut store = Self {
            options,
            ..Self::default()
        };
        store
            .nodes
            .try_reserve_exact(prealloc)
            .map_err(|_err| StoreError::OutOfMemory { capacity: 0 })?;
        for _ in 0..prealloc {
            let index = store.grow()?;
            push_back(&mut store.nodes, &mut store.free, index)?;
        }
        store.stats.retained = store.free.len;
        Ok(store)
    }

    /// Total records held by the arena, live or free.
    pub fn pool_size(&self) -> usize {
        self.nodes.len()
    }

    /// Records currently idle on the free chain.
    pub const fn free_len(&self) -> usize {
        self.free.len
    }

    /// Append a fresh node to the arena. It is on no chain yet.
    fn grow(&mut self) -> Result<u32, StoreError> {
        let index = handle::next_index(self.nodes.len())?;
        self.nodes
            .try_reserve(1)
            .map_err(|_err| StoreError::OutOfMemory {
                capacity: self.nodes.len(),
            })?;
        self.nodes.push(PoolNode::default());
        self.stats.fresh_allocations = self.stats.fresh_allocations.saturating_add(1);
        Ok(index)
    }

    fn node(&self, index: u32) -> Result<&PoolNode, StoreError> {
        self.nodes
            .get(handle::slot(index))
            .ok_or(StoreError::CorruptLinks { context: "pool node" })
    }

    fn resolve(&self, handle: ParticleHandle, operation: &'static str) -> Result<u32, StoreError> {
        match self.nodes.get(handle::slot(handle.index())) {
            Some(node) if node.live && node.generation == handle.generation() => {
                Ok(handle.index())
            }
            _ => Err(StoreError::InvalidHandle { operation }),
        }
    }

    fn handle_for(&self, index: Option<u32>) -> ParticleHandle {
        index
            .and_then(|i| self.nodes.get(handle::slot(i)).map(|n| (i, n.generation)))
            .map_or(ParticleHandle::END, |(i, generation)| {
                ParticleHandle::new(i, generation)
            })
    }
}

impl ParticleStore for PooledIntrusiveStore {
    type Handle = ParticleHandle;

    fn kind(&self) -> StoreKind {
        StoreKind::Pooled
    }

    fn create(&mut self) -> Result<ParticleHandle, StoreError> {
        let index = if let Some(recycled) = self.free.tail {
            unlink(&mut self.nodes, &mut self.free, recycled)?;
            self.stats.reused = self.stats.reused.saturating_add(1);
            recycled
        } else {
            if !self.options.allows(self.nodes.len()) {
                return Err(StoreError::OutOfMemory {
                    capacity: self.nodes.len(),
                });
            }
            trace!(pool_size = self.nodes.len(), "Pool exhausted, allocating fresh record");
            self.grow()?
        };

        push_back(&mut self.nodes, &mut self.live, index)?;
        let node = node_mut(&mut self.nodes, index)?;
        node.record = ParticleRecord::default();
        node.live = true;
        let generation = node.generation;

        self.stats.retained = self.free.len;
        self.stats.note_live(self.live.len);
        Ok(ParticleHandle::new(index, generation))
    }

    fn remove(&mut self, handle: ParticleHandle) -> Result<ParticleHandle, StoreError> {
        let index = self.resolve(handle, "remove")?;
        let successor = unlink(&mut self.nodes, &mut self.live, index)?;
        {
            let node = node_mut(&mut self.nodes, index)?;
            node.live = false;
            node.generation = node.generation.wrapping_add(1);
        }
        push_back(&mut self.nodes, &mut self.free, index)?;
        self.stats.retained = self.free.len;
        Ok(self.handle_for(successor))
    }

    fn first(&self) -> ParticleHandle {
        self.handle_for(self.live.head)
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
        Ok(&mut node_mut(&mut self.nodes, index)?.record)
    }

    fn len(&self) -> usize {
        self.live.len
    }

    fn stats(&self) -> AllocationStats {
        self.stats
    }
}
