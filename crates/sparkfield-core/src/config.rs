//! Configuration loading and typed config structures for Sparkfield.
//!
//! The configuration lives in `sparkfield.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, a loader that
//! reads the file, and validation of the emitter parameters.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sparkfield_store::StoreOptions;
use sparkfield_types::{PackedColor, StoreKind, Vector3};

/// Smallest accepted emission delay, in ticks.
///
/// Each emission advances the schedule by at least this much, which bounds
/// the number of emissions a single tick can perform.
pub const MIN_EMISSION_DELAY: f32 = 0.001;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but violates a constraint.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `sparkfield.yaml`. Every section falls back to
/// its defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SparkfieldConfig {
    /// Emitter parameters shared by every run.
    #[serde(default)]
    pub emitter: EmitterConfig,

    /// Benchmark run parameters.
    #[serde(default)]
    pub run: RunConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SparkfieldConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SPARKFIELD_SEED` overrides `run.seed`
    /// - `SPARKFIELD_TICKS` overrides `run.ticks`
    /// - `SPARKFIELD_STORE` replaces `run.stores` with a single strategy
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override or a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply `SPARKFIELD_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("SPARKFIELD_SEED") {
            self.run.seed = val
                .trim()
                .parse()
                .map_err(|e| invalid(format!("SPARKFIELD_SEED={val}: {e}")))?;
        }
        if let Some(val) = lookup("SPARKFIELD_TICKS") {
            self.run.ticks = val
                .trim()
                .parse()
                .map_err(|e| invalid(format!("SPARKFIELD_TICKS={val}: {e}")))?;
        }
        if let Some(val) = lookup("SPARKFIELD_STORE") {
            let kind: StoreKind = val.parse().map_err(|e| invalid(format!("{e}")))?;
            self.run.stores = vec![kind];
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.emitter.validate()?;
        self.run.validate()
    }
}

/// Emitter parameters. Immutable for the lifetime of one simulator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmitterConfig {
    /// Last tick (inclusive) at which emission may happen. `None` = forever.
    #[serde(default)]
    pub max_emission_tick: Option<u64>,

    /// Minimum ticks between consecutive emissions.
    #[serde(default = "default_emission_delay_min")]
    pub emission_delay_min: f32,

    /// Maximum ticks between consecutive emissions.
    #[serde(default = "default_emission_delay_max")]
    pub emission_delay_max: f32,

    /// Velocity at fraction 0.
    #[serde(default = "default_velocity_min")]
    pub velocity_min: Vector3,

    /// Velocity at fraction 1.
    #[serde(default = "default_velocity_max")]
    pub velocity_max: Vector3,

    /// Shortest lifetime in ticks.
    #[serde(default = "default_ttl_min")]
    pub ttl_min: u32,

    /// Longest lifetime in ticks.
    #[serde(default = "default_ttl_max")]
    pub ttl_max: u32,

    /// Color at fraction 0. Channels need not be below `color_max`.
    #[serde(default = "default_color_min")]
    pub color_min: PackedColor,

    /// Color at fraction 1.
    #[serde(default = "default_color_max")]
    pub color_max: PackedColor,

    /// Opacity ramp length before death. Carried as data; not applied.
    #[serde(default = "default_fadeout_ticks")]
    pub fadeout_ticks: u32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_emission_tick: None,
            emission_delay_min: default_emission_delay_min(),
            emission_delay_max: default_emission_delay_max(),
            velocity_min: default_velocity_min(),
            velocity_max: default_velocity_max(),
            ttl_min: default_ttl_min(),
            ttl_max: default_ttl_max(),
            color_min: default_color_min(),
            color_max: default_color_max(),
            fadeout_ticks: default_fadeout_ticks(),
        }
    }
}

impl EmitterConfig {
    /// Check range ordering and float sanity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when:
    /// - a float is NaN or infinite,
    /// - `emission_delay_min < MIN_EMISSION_DELAY` or `min > max`,
    /// - any `velocity_min` component exceeds its `velocity_max` component,
    /// - `ttl_min > ttl_max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.emission_delay_min.is_finite() || !self.emission_delay_max.is_finite() {
            return Err(invalid("emission delays must be finite"));
        }
        if self.emission_delay_min < MIN_EMISSION_DELAY {
            return Err(invalid(format!(
                "emission_delay_min must be at least {MIN_EMISSION_DELAY} (got {})",
                self.emission_delay_min
            )));
        }
        if self.emission_delay_min > self.emission_delay_max {
            return Err(invalid(format!(
                "emission_delay_min {} exceeds emission_delay_max {}",
                self.emission_delay_min, self.emission_delay_max
            )));
        }
        if !self.velocity_min.is_finite() || !self.velocity_max.is_finite() {
            return Err(invalid("velocity bounds must be finite"));
        }
        if !self.velocity_min.le_componentwise(self.velocity_max) {
            return Err(invalid(format!(
                "velocity_min {:?} exceeds velocity_max {:?} in some component",
                self.velocity_min, self.velocity_max
            )));
        }
        if self.ttl_min > self.ttl_max {
            return Err(invalid(format!(
                "ttl_min {} exceeds ttl_max {}",
                self.ttl_min, self.ttl_max
            )));
        }
        Ok(())
    }
}

/// Benchmark run parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Ticks per run.
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Seed for the emission fraction source.
    #[serde(default)]
    pub seed: u64,

    /// World origin handed to each simulator.
    #[serde(default = "default_origin")]
    pub origin: Vector3,

    /// Strategies to run, in order.
    #[serde(default = "default_stores")]
    pub stores: Vec<StoreKind>,

    /// Options passed to every store.
    #[serde(default)]
    pub store_options: StoreOptions,

    /// Where to write the final sprites of each run as JSON, if anywhere.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            seed: 0,
            origin: default_origin(),
            stores: default_stores(),
            store_options: StoreOptions::default(),
            snapshot_path: None,
        }
    }
}

impl RunConfig {
    /// Check that a run has at least one strategy to exercise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stores.is_empty() {
            return Err(invalid("run.stores must name at least one store"));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_emission_delay_min() -> f32 {
    0.33
}

const fn default_emission_delay_max() -> f32 {
    0.5
}

const fn default_velocity_min() -> Vector3 {
    Vector3::new(-1.0, -1.0, -1.0)
}

const fn default_velocity_max() -> Vector3 {
    Vector3::new(1.0, 1.0, 1.0)
}

const fn default_ttl_min() -> u32 {
    800
}

const fn default_ttl_max() -> u32 {
    1200
}

const fn default_color_min() -> PackedColor {
    0xff80_8080
}

const fn default_color_max() -> PackedColor {
    0xffff_ffff
}

const fn default_fadeout_ticks() -> u32 {
    10
}

const fn default_ticks() -> u64 {
    100_000
}

const fn default_origin() -> Vector3 {
    Vector3::new(1.0, 2.0, 3.0)
}

fn default_stores() -> Vec<StoreKind> {
    StoreKind::ALL.to_vec()
}

fn default_log_level() -> String {
    "info".to_owned()
}
