//! Tick counter and emission schedule.
//!
//! The tick number is the only notion of time in the simulator. It starts
//! at 0 and is incremented at the start of each `tick()`, so the first tick
//! that runs is tick 1. The emission schedule is an accumulated real value
//! compared against the integer tick; it is never rounded.

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickClock {
    tick: u64,
}

impl TickClock {
    /// Create a clock at tick 0 (idle, nothing has run yet).
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock at an explicit tick.
    pub const fn at(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }
}

/// When the next emission is due, and until when emission is allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSchedule {
    next_emission_tick: f64,
    max_emission_tick: Option<u64>,
}

impl EmissionSchedule {
    /// Schedule whose first emission is due at tick 0.
    pub const fn new(max_emission_tick: Option<u64>) -> Self {
        Self {
            next_emission_tick: 0.0,
            max_emission_tick,
        }
    }

    /// Whether emission is still allowed at `tick`.
    pub const fn is_open(&self, tick: u64) -> bool {
        match self.max_emission_tick {
            Some(max) => tick <= max,
            None => true,
        }
    }

    /// Whether one more emission should happen during `tick`.
    #[allow(clippy::cast_precision_loss)]
    pub const fn is_due(&self, tick: u64) -> bool {
        self.is_open(tick) && self.next_emission_tick < tick as f64
    }

    /// Push the next emission back by `delay` ticks.
    pub fn defer(&mut self, delay: f32) {
        self.next_emission_tick += f64::from(delay);
    }

    /// Accumulated tick at which the next emission is due.
    pub const fn next_emission_tick(&self) -> f64 {
        self.next_emission_tick
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_idle_and_advances() {
        let mut clock = TickClock::new();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn clock_overflow_is_reported() {
        let mut clock = TickClock::at(u64::MAX);
        assert_eq!(clock.advance(), Err(ClockError::TickOverflow));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn unbounded_schedule_is_always_open() {
        let schedule = EmissionSchedule::new(None);
        assert!(schedule.is_open(0));
        assert!(schedule.is_open(u64::MAX));
    }

    #[test]
    fn bounded_schedule_is_inclusive() {
        let schedule = EmissionSchedule::new(Some(5));
        assert!(schedule.is_open(5));
        assert!(!schedule.is_open(6));
        assert!(schedule.is_due(5));
        assert!(!schedule.is_due(6));
    }

    #[test]
    fn due_compares_strictly() {
        let mut schedule = EmissionSchedule::new(None);
        // next = 0.0, tick 0 is not strictly later
        assert!(!schedule.is_due(0));
        assert!(schedule.is_due(1));
        schedule.defer(1.0);
        assert!(!schedule.is_due(1));
        schedule.defer(0.25);
        assert!(schedule.is_due(2));
        assert_eq!(schedule.next_emission_tick(), 1.25);
    }

    #[test]
    fn zero_bound_still_open_at_tick_zero_but_never_due() {
        let schedule = EmissionSchedule::new(Some(0));
        assert!(schedule.is_open(0));
        assert!(!schedule.is_due(0));
        assert!(!schedule.is_due(1));
    }
}
