//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]       – how the headless driver steps the system
//! - [`ParametersConfig`]   – physical constants and history tracking
//! - [`GeneratorSettings`]  – optional procedural generation
//! - [`BodyConfig`]         – optional explicit bodies
//!
//! # YAML format
//! A hand-built two body scenario:
//!
//! ```yaml
//! engine:
//!   dt: 1.0                 # fixed time step
//!   steps: 5000             # ticks to run
//!   log_every: 500          # diagnostics period, 0 disables
//!   warmup: false           # fill histories before running
//!
//! parameters:
//!   G: 0.00003              # gravitational constant
//!   min_separation: 1.0e-6  # distance floor for pairwise forces
//!   separation: "reject"    # or "clamp"
//!   track_history: true
//!   history_size: 2000
//!   history_mode: "trailing" # or "leading"
//!
//! bodies:
//!   - m: 10000.0
//!     stationary: true
//!   - m: 500.0
//!     orbit: { around: 0, e: 0.0, a: 250.0 }
//! ```
//!
//! Replacing `bodies` with a `generator:` section grows the system
//! procedurally instead (see [`GeneratorSettings`]). Angles are in degrees.

use serde::Deserialize;

use crate::simulation::generator::GeneratorConfig;
use crate::simulation::params::{HistoryMode, Parameters, SeparationPolicy};

/// How the driver advances the system
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub dt: f64, // fixed time step
    #[serde(default)]
    pub steps: usize, // number of ticks to run
    #[serde(default)]
    pub log_every: usize, // log diagnostics every n ticks, 0 = never
    #[serde(default)]
    pub warmup: bool, // fill position histories before the run
}

/// Physical constants and history tracking, everything optional
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ParametersConfig {
    pub G: Option<f64>, // gravitational constant
    pub min_separation: Option<f64>, // distance floor
    pub separation: Option<SeparationPolicy>, // reject or clamp
    pub track_history: Option<bool>, // keep per-body histories
    pub history_size: Option<usize>, // entries per history
    pub history_mode: Option<HistoryMode>, // leading or trailing
}

impl ParametersConfig {
    /// Fill in defaults for everything left out
    pub fn to_parameters(&self) -> Parameters {
        let d = Parameters::default();
        Parameters {
            G: self.G.unwrap_or(d.G),
            min_separation: self.min_separation.unwrap_or(d.min_separation),
            separation: self.separation.unwrap_or(d.separation),
            track_history: self.track_history.unwrap_or(d.track_history),
            history_size: self.history_size.unwrap_or(d.history_size),
            history_mode: self.history_mode.unwrap_or(d.history_mode),
        }
    }
}

/// Procedural generation settings, everything optional
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GeneratorSettings {
    pub sun_mass: Option<f64>,
    pub planet_count: Option<usize>, // planets and moons together
    pub distance_threshold: Option<f64>,
    pub complexity: Option<u32>, // maximum moon depth
    pub moon_probability: Option<f64>,
    pub moon_distance_divisor: Option<f64>,
    pub inclination: Option<[f64; 2]>, // degree range
    pub ascending_node: Option<[f64; 2]>, // degree range
    pub periapsis: Option<[f64; 2]>, // degree range
    pub true_anomaly: Option<[f64; 2]>, // degree range
    pub seed: Option<u64>,
}

impl GeneratorSettings {
    pub fn to_generator_config(&self) -> GeneratorConfig {
        let d = GeneratorConfig::default();
        GeneratorConfig {
            sun_mass: self.sun_mass.unwrap_or(d.sun_mass),
            planet_count: self.planet_count.unwrap_or(d.planet_count),
            distance_threshold: self.distance_threshold.unwrap_or(d.distance_threshold),
            complexity: self.complexity.unwrap_or(d.complexity),
            moon_probability: self.moon_probability.unwrap_or(d.moon_probability),
            moon_distance_divisor: self.moon_distance_divisor.unwrap_or(d.moon_distance_divisor),
            inclination_deg: self.inclination.unwrap_or(d.inclination_deg),
            ascending_node_deg: self.ascending_node.unwrap_or(d.ascending_node_deg),
            periapsis_deg: self.periapsis.unwrap_or(d.periapsis_deg),
            true_anomaly_deg: self.true_anomaly.unwrap_or(d.true_anomaly_deg),
            seed: self.seed.unwrap_or(d.seed),
        }
    }
}

/// Orbit of a body around an earlier body of the same list, angles in degrees
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct OrbitConfig {
    pub around: usize, // index of the central body in `bodies`
    pub e: f64, // eccentricity
    pub a: f64, // semi-major axis
    #[serde(default)]
    pub i: f64, // inclination
    #[serde(default)]
    pub node: f64, // longitude of the ascending node
    #[serde(default)]
    pub periapsis: f64, // argument of periapsis
    #[serde(default)]
    pub anomaly: f64, // true anomaly
}

/// Initial state of one body: either explicit `x`/`v` or an `orbit`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub m: f64, // mass
    #[serde(default)]
    pub stationary: bool, // pinned in place
    pub x: Option<[f64; 3]>, // position, origin when omitted
    pub v: Option<[f64; 3]>, // velocity, zero when omitted
    pub orbit: Option<OrbitConfig>, // overrides x and v
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    pub generator: Option<GeneratorSettings>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}
