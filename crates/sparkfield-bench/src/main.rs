//! Benchmark driver for the Sparkfield emitter.
//!
//! Runs the same seeded emission schedule against every configured store
//! strategy and logs each run's checksum and wall-clock time. Equal
//! checksums across strategies confirm they behave identically; the
//! timings compare their allocation cost.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`sparkfield.yaml`, or the path given as the
//!    first argument; defaults if the file does not exist)
//! 2. Initialize structured logging (tracing)
//! 3. For each store kind: build the store and a seeded simulator, run the
//!    configured number of ticks, log the summary
//! 4. Write the final sprites of every run as JSON, if requested

mod error;

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use sparkfield_core::config::{RunConfig, SparkfieldConfig};
use sparkfield_core::runner::{self, NoOpObserver, RunSummary};
use sparkfield_core::snapshot;
use sparkfield_core::{EmissionSimulator, EmitterConfig};
use sparkfield_store::{AnyStore, ParticleStore};
use sparkfield_types::{Sprite, StoreKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::BenchError;

const DEFAULT_CONFIG_PATH: &str = "sparkfield.yaml";

/// One strategy's result as written to the snapshot file.
#[derive(Debug, Serialize)]
struct RunReport {
    summary: RunSummary,
    elapsed_ms: u64,
    sprites: Vec<Sprite>,
}

/// Application entry point for the benchmark driver.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a store cannot be built,
/// a run fails, or the snapshot cannot be written.
fn main() -> Result<(), BenchError> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, loaded) = load_config(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        path = %config_path.display(),
        from_file = loaded,
        ticks = config.run.ticks,
        seed = config.run.seed,
        stores = ?config.run.stores,
        "sparkfield-bench starting"
    );

    let mut reports = Vec::with_capacity(config.run.stores.len());
    for kind in &config.run.stores {
        reports.push(bench_store(*kind, &config.emitter, &config.run)?);
    }

    if let Some(path) = &config.run.snapshot_path {
        write_snapshot(path, &reports)?;
        info!(path = %path.display(), runs = reports.len(), "Snapshot written");
    }

    let checksums: Vec<u64> = reports.iter().map(|r| r.summary.live_sum).collect();
    let agree = checksums.windows(2).all(|pair| pair.first() == pair.last());
    info!(?checksums, agree, "sparkfield-bench finished");
    Ok(())
}

/// Load configuration from `path`, or defaults plus environment overrides
/// when the file does not exist. The flag reports which happened.
fn load_config(path: &Path) -> Result<(SparkfieldConfig, bool), BenchError> {
    if path.exists() {
        return Ok((SparkfieldConfig::from_file(path)?, true));
    }
    let mut config = SparkfieldConfig::default();
    config.apply_env_overrides()?;
    config.validate()?;
    Ok((config, false))
}

/// Run one strategy for the configured number of ticks.
fn bench_store(
    kind: StoreKind,
    emitter: &EmitterConfig,
    run: &RunConfig,
) -> Result<RunReport, BenchError> {
    let store = AnyStore::new(kind, run.store_options)?;
    let mut sim = EmissionSimulator::seeded(run.origin, emitter.clone(), store, run.seed)?;

    let started = Instant::now();
    let summary = runner::run_ticks(&mut sim, run.ticks, &mut NoOpObserver)?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    runner::log_run_end(&summary, elapsed_ms);

    let stats = sim.store().stats();
    info!(
        store = %kind,
        fresh_allocations = stats.fresh_allocations,
        deallocations = stats.deallocations,
        reused = stats.reused,
        retained = stats.retained,
        "Allocation stats"
    );

    let sprites = if run.snapshot_path.is_some() {
        snapshot::collect_sprites(sim.store())?
    } else {
        Vec::new()
    };

    Ok(RunReport {
        summary,
        elapsed_ms,
        sprites,
    })
}

fn write_snapshot(path: &Path, reports: &[RunReport]) -> Result<(), BenchError> {
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json).map_err(|source| BenchError::SnapshotWrite {
        path: path.display().to_string(),
        source,
    })
}
