//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - total simulated time and fixed step size,
//! - Barnes–Hut opening angle `theta` and tree depth bound,
//! - softening and gravitational constant (`eps2`, `G`)
//!
//! Units follow astronomical conventions: AU, solar masses and years, which
//! makes `G = 4π²`.

use std::f64::consts::PI;

use crate::error::ConfigError;

/// Gravitational constant in AU³ / (M_sun · yr²)
pub const G_SOLAR: f64 = 4.0 * PI * PI;

/// Default opening angle
pub const DEFAULT_THETA: f64 = 0.5;

/// Default depth at which subdivision stops and bodies share a leaf
pub const DEFAULT_MAX_DEPTH: usize = 48;

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub total_time: f64, // time end
    pub dt: f64, // step size
    pub theta: f64, // opening angle
    pub max_depth: usize, // quadtree depth bound
    pub softening: f64, // softening length, as given
    pub eps2: f64, // softening, squared
    pub G: f64, // gravitational constant
}

impl Parameters {
    /// Parameters with the default `theta`, depth bound and `G`
    pub fn new(total_time: f64, dt: f64, softening: f64) -> Self {
        Self {
            total_time,
            dt,
            theta: DEFAULT_THETA,
            max_depth: DEFAULT_MAX_DEPTH,
            softening,
            eps2: softening * softening,
            G: G_SOLAR,
        }
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    #[allow(non_snake_case)]
    pub fn with_G(mut self, G: f64) -> Self {
        self.G = G;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of whole steps that fit in `total_time`
    ///
    /// The quotient is floored with a small relative tolerance so that
    /// `0.3 / 0.1` counts as 3 steps rather than 2. Only meaningful for
    /// parameters that passed [`Parameters::validate`].
    pub fn steps(&self) -> usize {
        self.step_ratio() as usize
    }

    fn step_ratio(&self) -> f64 {
        (self.total_time / self.dt * (1.0 + 1e-9)).floor()
    }

    /// Reject anything that is not strictly positive and finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("total_time", self.total_time),
            ("dt", self.dt),
            ("theta", self.theta),
            ("softening", self.softening),
            ("G", self.G),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        // the cast in `steps` saturates past this
        if !(self.step_ratio() < usize::MAX as f64) {
            return Err(ConfigError::TooManySteps {
                dt: self.dt,
                total_time: self.total_time,
            });
        }
        if self.steps() == 0 {
            return Err(ConfigError::NoSteps {
                dt: self.dt,
                total_time: self.total_time,
            });
        }
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new(10.0, 0.01, 1e-3)
    }
}
