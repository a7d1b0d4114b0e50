//! Per-particle state and the render snapshot entry.

use serde::{Deserialize, Serialize};

use crate::color::PackedColor;
use crate::vector::Vector3;

/// State of one live particle.
///
/// Created by a store's `create` at the tick it is emitted, integrated in
/// place every tick, and removed once `death_tick <= tick`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// World-space position.
    pub position: Vector3,
    /// Packed 4-channel color.
    pub color: PackedColor,
    /// Distance travelled per tick.
    pub velocity: Vector3,
    /// Tick at which the particle was emitted.
    pub birth_tick: u64,
    /// Tick at which the particle expires (`>= birth_tick`).
    pub death_tick: u64,
}

impl ParticleRecord {
    /// Scheduled lifetime in ticks.
    pub const fn ttl(&self) -> u64 {
        self.death_tick.saturating_sub(self.birth_tick)
    }

    /// Whether the particle is due for removal at `tick`.
    pub const fn is_expired(&self, tick: u64) -> bool {
        self.death_tick <= tick
    }

    /// The render-facing part of this record.
    pub const fn sprite(&self) -> Sprite {
        Sprite {
            position: self.position,
            color: self.color,
        }
    }
}

/// One entry of a render snapshot: position and color only.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// World-space position.
    pub position: Vector3,
    /// Packed 4-channel color.
    pub color: PackedColor,
}
