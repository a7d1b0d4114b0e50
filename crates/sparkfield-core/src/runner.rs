//! Bounded tick loop.
//!
//! [`run_ticks`] drives a simulator for a fixed number of ticks, hands each
//! [`TickSummary`] to an observer, and folds the run into a [`RunSummary`].
//! `live_sum` (live count summed over every tick) is the benchmark
//! checksum: any two strategies fed the same fractions must agree on it.

use serde::Serialize;
use sparkfield_store::ParticleStore;
use sparkfield_types::StoreKind;
use tracing::{info, warn};

use crate::fraction::FractionSource;
use crate::simulator::{EmissionSimulator, SimulatorError, TickSummary};

/// Errors that can occur during a bounded run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying simulator error.
        #[from]
        source: SimulatorError,
    },
}

/// Callback invoked after each tick completes.
pub trait TickObserver {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary);
}

/// A no-op observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl TickObserver for NoOpObserver {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Totals for one bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Strategy the run used.
    pub store: StoreKind,
    /// Ticks executed.
    pub ticks_run: u64,
    /// Sum of the live count after every tick.
    pub live_sum: u64,
    /// Records created over the run.
    pub emitted: u64,
    /// Records removed over the run.
    pub expired: u64,
    /// Live records after the last tick.
    pub final_live: usize,
    /// Highest live count after any tick.
    pub peak_live: usize,
}

/// Run exactly `ticks` ticks.
///
/// # Errors
///
/// Returns [`RunnerError`] on the first tick that fails. Ticks already run
/// are not rolled back.
pub fn run_ticks<S: ParticleStore, F: FractionSource>(
    sim: &mut EmissionSimulator<S, F>,
    ticks: u64,
    observer: &mut dyn TickObserver,
) -> Result<RunSummary, RunnerError> {
    let store = sim.store().kind();
    info!(%store, ticks, start_tick = sim.current_tick(), "Run starting");

    let mut summary = RunSummary {
        store,
        ticks_run: 0,
        live_sum: 0,
        emitted: 0,
        expired: 0,
        final_live: sim.count(),
        peak_live: sim.count(),
    };

    for _ in 0..ticks {
        let tick = sim.tick()?;
        summary.ticks_run = summary.ticks_run.saturating_add(1);
        summary.live_sum = summary.live_sum.saturating_add(widen(tick.live));
        summary.emitted = summary.emitted.saturating_add(widen(tick.emitted));
        summary.expired = summary.expired.saturating_add(widen(tick.expired));
        summary.final_live = tick.live;
        summary.peak_live = summary.peak_live.max(tick.live);
        observer.on_tick(&tick);
    }

    Ok(summary)
}

fn widen(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Log the outcome of a run.
pub fn log_run_end(summary: &RunSummary, elapsed_ms: u64) {
    if summary.ticks_run == 0 {
        warn!(store = %summary.store, "Run ended with no ticks executed");
        return;
    }
    info!(
        store = %summary.store,
        ticks_run = summary.ticks_run,
        checksum = summary.live_sum,
        emitted = summary.emitted,
        expired = summary.expired,
        final_live = summary.final_live,
        peak_live = summary.peak_live,
        elapsed_ms,
        "Run finished"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sparkfield_store::HeapIntrusiveStore;
    use sparkfield_types::Vector3;

    use super::*;
    use crate::config::EmitterConfig;
    use crate::fraction::ConstantFraction;

    #[derive(Default)]
    struct Recorder {
        ticks: Vec<u64>,
    }

    impl TickObserver for Recorder {
        fn on_tick(&mut self, summary: &TickSummary) {
            self.ticks.push(summary.tick);
        }
    }

    fn sim(ttl: u32) -> EmissionSimulator<HeapIntrusiveStore, ConstantFraction> {
        let config = EmitterConfig {
            emission_delay_min: 1.0,
            emission_delay_max: 1.0,
            ttl_min: ttl,
            ttl_max: ttl,
            ..EmitterConfig::default()
        };
        EmissionSimulator::new(
            Vector3::ZERO,
            config,
            HeapIntrusiveStore::new(),
            ConstantFraction::new(0.5),
        )
        .unwrap()
    }

    #[test]
    fn observer_sees_every_tick() {
        let mut sim = sim(3);
        let mut recorder = Recorder::default();
        let summary = run_ticks(&mut sim, 4, &mut recorder).unwrap();
        assert_eq!(recorder.ticks, vec![1, 2, 3, 4]);
        assert_eq!(summary.ticks_run, 4);
        assert_eq!(summary.store, StoreKind::Heap);
    }

    #[test]
    fn checksum_sums_live_counts() {
        let mut sim = sim(3);
        let summary = run_ticks(&mut sim, 6, &mut NoOpObserver).unwrap();
        // one per tick, each living three ticks: 1, 2, 3, 3, 3, 3
        assert_eq!(summary.live_sum, 15);
        assert_eq!(summary.emitted, 6);
        assert_eq!(summary.expired, 3);
        assert_eq!(summary.final_live, 3);
        assert_eq!(summary.peak_live, 3);
    }

    #[test]
    fn zero_ticks_is_empty_run() {
        let mut sim = sim(3);
        let summary = run_ticks(&mut sim, 0, &mut NoOpObserver).unwrap();
        assert_eq!(summary.ticks_run, 0);
        assert_eq!(summary.live_sum, 0);
        assert_eq!(sim.current_tick(), 0);
        log_run_end(&summary, 0);
    }

    #[test]
    fn consecutive_runs_continue_the_clock() {
        let mut sim = sim(3);
        run_ticks(&mut sim, 2, &mut NoOpObserver).unwrap();
        let mut recorder = Recorder::default();
        run_ticks(&mut sim, 2, &mut recorder).unwrap();
        assert_eq!(recorder.ticks, vec![3, 4]);
    }
}
