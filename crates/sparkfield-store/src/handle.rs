//! Generation-checked slot handles shared by the arena-backed stores.
//!
//! A handle is a slot index plus the generation the slot had when the handle
//! was issued. Removing a record bumps its slot generation, so any handle
//! kept past `remove` no longer matches and is rejected.

use crate::error::StoreError;

/// Opaque reference to a record in a heap or pooled store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleHandle {
    index: u32,
    generation: u32,
}

impl ParticleHandle {
    /// One-past-last sentinel returned by `end()`.
    pub const END: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) const fn index(self) -> u32 {
        self.index
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }

    /// Whether this is the `end()` sentinel.
    pub const fn is_end(self) -> bool {
        self.index == u32::MAX
    }
}

/// Convert a slot index into a `Vec` position.
pub(crate) fn slot(index: u32) -> usize {
    usize::try_from(index).unwrap_or(usize::MAX)
}

/// Convert a `Vec` length into the next slot index.
///
/// `u32::MAX` is reserved for [`ParticleHandle::END`].
pub(crate) fn next_index(len: usize) -> Result<u32, StoreError> {
    u32::try_from(len)
        .ok()
        .filter(|index| *index != u32::MAX)
        .ok_or(StoreError::OutOfMemory { capacity: len })
}
