//! The emission simulator: one emitter driving one particle store.
//!
//! Each call to [`EmissionSimulator::tick`] runs two phases in order:
//!
//! 1. **Emit** -- While the schedule is due and emission is still open,
//!    create a record and fill it from four fractions drawn in order:
//!    color, velocity, lifetime, delay to the next emission.
//! 2. **Update** -- Walk the store from first to last. Records whose
//!    `death_tick <= tick` are removed and the walk continues from the
//!    successor; every other record moves by its velocity.
//!
//! A record created with a lifetime of 0 is removed by the update pass of
//! its own tick and never moves.

use serde::Serialize;
use sparkfield_store::{ParticleStore, StoreError};
use sparkfield_types::{ParticleRecord, Sprite, Vector3, blend_channels, lerp};
use tracing::debug;

use crate::clock::{ClockError, EmissionSchedule, TickClock};
use crate::config::{ConfigError, EmitterConfig};
use crate::fraction::{FractionSource, SeededFractions};
use crate::snapshot::{self, SnapshotError};

/// Errors that can occur while building or ticking a simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// The emitter configuration was rejected.
    #[error("emitter config error: {source}")]
    Config {
        /// The underlying validation error.
        #[from]
        source: ConfigError,
    },

    /// The tick counter could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The store failed to create, remove, or resolve a record.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The tick that just ran.
    pub tick: u64,
    /// Records created during this tick.
    pub emitted: usize,
    /// Records removed during this tick.
    pub expired: usize,
    /// Live records after this tick.
    pub live: usize,
}

/// An emitter bound to a store and a fraction source.
#[derive(Debug)]
pub struct EmissionSimulator<S: ParticleStore, F: FractionSource = SeededFractions> {
    config: EmitterConfig,
    pos: Vector3,
    clock: TickClock,
    schedule: EmissionSchedule,
    store: S,
    fractions: F,
}

impl<S: ParticleStore> EmissionSimulator<S, SeededFractions> {
    /// Build a simulator drawing from a [`SeededFractions`] source.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::Config`] if `config` fails validation.
    pub fn seeded(
        origin: Vector3,
        config: EmitterConfig,
        store: S,
        seed: u64,
    ) -> Result<Self, SimulatorError> {
        Self::new(origin, config, store, SeededFractions::new(seed))
    }
}

impl<S: ParticleStore, F: FractionSource> EmissionSimulator<S, F> {
    /// Build an idle simulator at tick 0.
    ///
    /// The store is expected to be empty; whatever it already holds is
    /// treated as live and will be integrated and expired like any other
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::Config`] if `config` fails validation.
    pub fn new(
        origin: Vector3,
        config: EmitterConfig,
        store: S,
        fractions: F,
    ) -> Result<Self, SimulatorError> {
        config.validate()?;
        debug!(
            store = %store.kind(),
            max_emission_tick = ?config.max_emission_tick,
            "Emission simulator created"
        );
        Ok(Self {
            schedule: EmissionSchedule::new(config.max_emission_tick),
            config,
            pos: origin,
            clock: TickClock::new(),
            store,
            fractions,
        })
    }

    /// Move the emitter origin. Records already emitted are unaffected.
    ///
    /// New records also spawn at the zero vector, not at the origin.
    pub const fn set_pos(&mut self, pos: Vector3) {
        self.pos = pos;
    }

    /// The emitter origin.
    pub const fn pos(&self) -> Vector3 {
        self.pos
    }

    /// Run one tick: emit, then update and expire.
    ///
    /// # Errors
    ///
    /// - [`SimulatorError::Clock`] if the tick counter would overflow.
    /// - [`SimulatorError::Store`] if the store cannot create a record.
    ///   The tick counter has already advanced; records emitted earlier in
    ///   the same tick stay live, the schedule keeps the failed emission
    ///   due, and the update pass does not run for this tick.
    pub fn tick(&mut self) -> Result<TickSummary, SimulatorError> {
        let tick = self.clock.advance()?;
        let emitted = self.emit(tick)?;
        let expired = self.update(tick)?;
        let live = self.store.len();

        debug!(tick, emitted, expired, live, "Tick complete");

        Ok(TickSummary {
            tick,
            emitted,
            expired,
            live,
        })
    }

    fn emit(&mut self, tick: u64) -> Result<usize, StoreError> {
        let mut emitted: usize = 0;
        while self.schedule.is_due(tick) {
            let handle = self.store.create()?;
            let record = self.spawn(tick);
            *self.store.get_mut(handle)? = record;

            let k4 = self.fractions.next_fraction();
            self.schedule.defer(lerp(
                self.config.emission_delay_min,
                self.config.emission_delay_max,
                k4,
            ));
            emitted = emitted.saturating_add(1);
        }
        Ok(emitted)
    }

    /// Draw color, velocity, and lifetime for a record born at `tick`.
    fn spawn(&mut self, tick: u64) -> ParticleRecord {
        let config = &self.config;
        let k1 = self.fractions.next_fraction();
        let color = blend_channels(config.color_min, config.color_max, k1);
        let k2 = self.fractions.next_fraction();
        let velocity = Vector3::lerp(config.velocity_min, config.velocity_max, k2);
        let k3 = self.fractions.next_fraction();
        let ttl = lifetime(config.ttl_min, config.ttl_max, k3);

        ParticleRecord {
            position: Vector3::ZERO,
            color,
            velocity,
            birth_tick: tick,
            death_tick: tick.saturating_add(ttl),
        }
    }

    fn update(&mut self, tick: u64) -> Result<usize, StoreError> {
        let mut expired: usize = 0;
        let mut handle = self.store.first();
        while handle != self.store.end() {
            let record = self.store.get_mut(handle)?;
            if record.is_expired(tick) {
                handle = self.store.remove(handle)?;
                expired = expired.saturating_add(1);
            } else {
                record.position += record.velocity;
                handle = self.store.next(handle)?;
            }
        }
        Ok(expired)
    }

    /// Number of live records.
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// The last tick that ran (0 before the first tick).
    pub const fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Accumulated tick at which the next emission is due.
    pub const fn next_emission_tick(&self) -> f64 {
        self.schedule.next_emission_tick()
    }

    /// The emitter configuration.
    pub const fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the simulator and hand back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Write one sprite per live record into `out`, in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::BufferTooSmall`] without writing anything
    /// if `out` is shorter than [`count`](Self::count).
    pub fn get_data(&self, out: &mut [Sprite]) -> Result<usize, SnapshotError> {
        snapshot::export(&self.store, out)
    }
}

/// Truncated interpolation between two tick counts.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lifetime(ttl_min: u32, ttl_max: u32, k: f32) -> u64 {
    let lo = f64::from(ttl_min);
    let hi = f64::from(ttl_max);
    let ttl = (hi - lo).mul_add(f64::from(k), lo).trunc();
    (ttl as u64).min(u64::from(ttl_max.max(ttl_min)))
}
