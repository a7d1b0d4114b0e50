//! Emission simulator, configuration, and run loop for Sparkfield.
//!
//! This crate turns an [`EmitterConfig`] and any [`ParticleStore`] into a
//! deterministic per-tick particle simulation.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and the accumulated emission schedule.
//! - [`config`] -- Configuration loading from `sparkfield.yaml` into
//!   strongly-typed structs.
//! - [`fraction`] -- [`FractionSource`] trait, seeded and scripted sources.
//! - [`simulator`] -- [`EmissionSimulator`]: the emit/update tick.
//! - [`snapshot`] -- Live records flattened into render sprites.
//! - [`runner`] -- Bounded tick loop with observer callback and checksum.
//!
//! [`EmitterConfig`]: config::EmitterConfig
//! [`ParticleStore`]: sparkfield_store::ParticleStore
//! [`FractionSource`]: fraction::FractionSource
//! [`EmissionSimulator`]: simulator::EmissionSimulator

pub mod clock;
pub mod config;
pub mod fraction;
pub mod runner;
pub mod simulator;
pub mod snapshot;

pub use config::{EmitterConfig, SparkfieldConfig};
pub use fraction::{ConstantFraction, FractionSource, ScriptedFractions, SeededFractions};
pub use runner::{NoOpObserver, RunSummary, TickObserver, run_ticks};
pub use simulator::{EmissionSimulator, SimulatorError, TickSummary};
pub use snapshot::SnapshotError;
