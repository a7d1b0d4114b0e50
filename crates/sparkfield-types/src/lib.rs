//! Shared value types for the Sparkfield particle emitter.
//!
//! Everything here is plain data: no storage policy, no simulation logic.
//! The store and core crates build on these types.
//!
//! # Modules
//!
//! - [`color`] -- Packed 4x8-bit colors and single-fraction channel blending.
//! - [`particle`] -- [`ParticleRecord`] (per-entity state) and [`Sprite`]
//!   (render snapshot entry).
//! - [`store_kind`] -- [`StoreKind`], the storage strategy selector.
//! - [`vector`] -- [`Vector3`], the 3-component float value type.

pub mod color;
pub mod particle;
pub mod store_kind;
pub mod vector;

// Re-export primary types at crate root.
pub use color::{PackedColor, blend_channels};
pub use particle::{ParticleRecord, Sprite};
pub use store_kind::{ParseStoreKindError, StoreKind};
pub use vector::{Vector3, lerp};
