//! Error types for the simulator.

use thiserror::Error;

/// Problems found while turning a scenario or parameter set into a runnable
/// simulation. Reported once, before the first step.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("body {index}: mass must be positive and finite, got {mass}")]
    InvalidMass { index: usize, mass: f64 },

    #[error("body {index}: `{field}` must have 2 components, got {len}")]
    Dimension {
        index: usize,
        field: &'static str,
        len: usize,
    },

    #[error("body {index}: `{field}` contains a non-finite component")]
    NonFiniteState { index: usize, field: &'static str },

    #[error("parameter `{name}` must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("dt ({dt}) is larger than total_time ({total_time}), no step would run")]
    NoSteps { dt: f64, total_time: f64 },

    #[error("total_time ({total_time}) / dt ({dt}) is too many steps to count")]
    TooManySteps { dt: f64, total_time: f64 },

    #[error("max_depth must be at least 1")]
    ZeroDepth,
}

/// Runtime failures of a running simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("step {step}: body {body} reached a non-finite state, update discarded")]
    NonFinite { step: usize, body: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
