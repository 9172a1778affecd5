//! Step loops for a fixed set of bodies.
//!
//! [`NBodySimulation`] is generic over the force term. The two named
//! instantiations differ only in how forces are evaluated:
//!
//! - [`Simulation`]: direct pairwise summation ([`NewtonianGravity`])
//! - [`FastSimulation`]: a fresh Barnes–Hut quadtree every step
//!   ([`NewtonianGravityBarnesHut`])

use log::{debug, info};

use super::forces::{Acceleration, NewtonianGravity, NewtonianGravityBarnesHut};
use super::integrator::advance;
use super::params::Parameters;
use super::states::{Body, System};
use super::trajectory::Trajectory;
use crate::configuration::config::IntegratorConfig;
use crate::error::{ConfigError, Result};

/// Snapshots allocated up front; longer runs grow the buffer as they go
const RESERVE_LIMIT: usize = 1 << 16;

pub type Simulation = NBodySimulation<NewtonianGravity>;
pub type FastSimulation = NBodySimulation<NewtonianGravityBarnesHut>;

pub struct NBodySimulation<A: Acceleration> {
    system: System,
    parameters: Parameters,
    forces: A,
    integrator: IntegratorConfig,
    steps_taken: usize,
}

/// Every body needs a positive, finite mass and a finite state
pub fn validate_bodies(bodies: &[Body]) -> std::result::Result<(), ConfigError> {
    for (index, b) in bodies.iter().enumerate() {
        if !(b.m.is_finite() && b.m > 0.0) {
            return Err(ConfigError::InvalidMass { index, mass: b.m });
        }
        if !(b.x.x.is_finite() && b.x.y.is_finite()) {
            return Err(ConfigError::NonFiniteState { index, field: "x" });
        }
        if !(b.v.x.is_finite() && b.v.y.is_finite()) {
            return Err(ConfigError::NonFiniteState { index, field: "v" });
        }
    }
    Ok(())
}

impl<A: Acceleration> NBodySimulation<A> {
    /// Simulation of `bodies` under an arbitrary force term. Fails if the
    /// bodies or parameters are invalid.
    pub fn with_forces(bodies: Vec<Body>, parameters: Parameters, forces: A) -> std::result::Result<Self, ConfigError> {
        parameters.validate()?;
        validate_bodies(&bodies)?;
        Ok(Self {
            system: System::new(bodies),
            parameters,
            forces,
            integrator: IntegratorConfig::Euler,
            steps_taken: 0,
        })
    }

    pub fn integrator(mut self, integrator: IntegratorConfig) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn forces(&self) -> &A {
        &self.forces
    }

    /// Total number of steps in a full run
    pub fn timesteps(&self) -> usize {
        self.parameters.steps()
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.timesteps()
    }

    /// Advance one step. On error the body set is unchanged.
    pub fn step(&mut self) -> Result<()> {
        advance(&self.integrator, &mut self.system, &self.forces, &self.parameters, self.steps_taken)?;
        self.steps_taken += 1;
        Ok(())
    }

    /// Run the remaining steps and record a snapshot before the first one
    /// and after each one
    pub fn run(&mut self) -> Result<Trajectory> {
        let remaining = self.timesteps().saturating_sub(self.steps_taken);
        info!(
            "running {} bodies for {} steps (dt = {}, {:?})",
            self.system.bodies.len(),
            remaining,
            self.parameters.dt,
            self.integrator
        );

        let mut trajectory = Trajectory::default();
        trajectory.snapshots.reserve(remaining.saturating_add(1).min(RESERVE_LIMIT));
        trajectory.push(&self.system);

        while !self.is_finished() {
            self.step()?;
            trajectory.push(&self.system);
            if self.steps_taken % 1000 == 0 {
                debug!("{}/{} steps, t = {}", self.steps_taken, self.timesteps(), self.system.t);
            }
        }

        info!("finished at t = {}", self.system.t);
        Ok(trajectory)
    }

    /// Closest approach of any two bodies over the remaining run, `None`
    /// with fewer than two bodies
    pub fn closest_distance(&mut self) -> Result<Option<f64>> {
        if self.system.bodies.len() < 2 {
            return Ok(None);
        }
        Ok(self.run()?.closest_distance())
    }
}

impl NBodySimulation<NewtonianGravity> {
    /// Direct-summation simulation
    pub fn new(bodies: Vec<Body>, parameters: Parameters) -> std::result::Result<Self, ConfigError> {
        let forces = NewtonianGravity {
            G: parameters.G,
            eps2: parameters.eps2,
        };
        Self::with_forces(bodies, parameters, forces)
    }
}

impl NBodySimulation<NewtonianGravityBarnesHut> {
    /// Barnes–Hut simulation with `parameters.theta` as opening angle
    pub fn new(bodies: Vec<Body>, parameters: Parameters) -> std::result::Result<Self, ConfigError> {
        let forces = NewtonianGravityBarnesHut {
            G: parameters.G,
            eps2: parameters.eps2,
            theta: parameters.theta,
            max_depth: parameters.max_depth,
        };
        Self::with_forces(bodies, parameters, forces)
    }
}
