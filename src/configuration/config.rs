//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – force method, integrator and Barnes–Hut options
//! - [`ParametersConfig`] – time span, step size and physical constants
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   method: "barnes_hut"    # or "direct"
//!   integrator: "euler"     # or "verlet"
//!   theta: 0.5              # optional, opening angle
//!   max_depth: 48           # optional, quadtree depth bound
//!
//! parameters:
//!   total_time: 10.0        # total simulated time (yr)
//!   dt: 0.01                # fixed step size (yr)
//!   softening: 1.0e-3       # softening length (AU)
//!   G: 39.47841760435743    # optional, defaults to 4*pi^2
//!
//! bodies:
//!   - m: 1.0
//!     x: [0.0, 0.0]
//!   - m: 3.0e-6
//!     x: [0.0, 1.0]
//!     v: [4.44, 0.0]
//! ```
//!
//! Values are checked when the config is turned into a runtime
//! [`Scenario`](crate::simulation::scenario::Scenario), not while parsing.

use serde::Deserialize;

/// Which integrator method used by the engine
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "euler")] // Semi-implicit Euler, one force evaluation per step
    Euler,

    #[serde(rename = "verlet")] // Velocity Verlet, two force evaluations per step
    Verlet,
}

/// How forces are evaluated
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodConfig {
    #[serde(rename = "direct")] // O(n^2) pairwise summation
    Direct,

    #[default]
    #[serde(rename = "barnes_hut")] // quadtree approximation controlled by `theta`
    BarnesHut,
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub method: MethodConfig,
    #[serde(default)]
    pub integrator: IntegratorConfig,
    pub theta: Option<f64>, // opening angle, smaller is more exact
    pub max_depth: Option<usize>, // quadtree depth bound for coincident bodies
}

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub total_time: f64, // time end
    pub dt: f64, // time step size
    pub softening: f64, // prevent singular forces at very small separations
    pub G: Option<f64>, // gravitational constant
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub m: f64, // Mass of the body
    pub x: Vec<f64>, // Initial position
    #[serde(default = "zero_velocity")]
    pub v: Vec<f64>, // Initial velocity, at rest if omitted
}

fn zero_velocity() -> Vec<f64> {
    vec![0.0, 0.0]
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }
}
