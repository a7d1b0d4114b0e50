//! Particle lifecycle stores for the Sparkfield emitter.
//!
//! One contract, three allocation strategies. All of them keep live records
//! in creation order, append in O(1), and remove an arbitrary record in O(1)
//! while a traversal is in progress.
//!
//! # Modules
//!
//! - [`contract`] -- The [`ParticleStore`] trait, [`StoreOptions`], and
//!   [`AllocationStats`].
//! - [`heap`] -- [`HeapIntrusiveStore`]: one `Box` per record.
//! - [`pooled`] -- [`PooledIntrusiveStore`]: arena with free and live chains.
//! - [`handle_list`] -- [`HandleListStore`]: linked list over a `SlotMap`.
//! - [`any`] -- [`AnyStore`]: strategy picked at runtime from a `StoreKind`.
//! - [`error`] -- [`StoreError`].
//! - [`handle`] -- [`ParticleHandle`], the generation-checked slot handle.

pub mod any;
pub mod contract;
pub mod error;
pub mod handle;
pub mod handle_list;
pub mod heap;
pub mod pooled;

// Re-export primary types at crate root.
pub use any::{AnyHandle, AnyStore};
pub use contract::{AllocationStats, ParticleStore, Records, StoreOptions};
pub use error::StoreError;
pub use handle::ParticleHandle;
pub use handle_list::{HandleListStore, ListHandle, ListKey};
pub use heap::HeapIntrusiveStore;
pub use pooled::PooledIntrusiveStore;
