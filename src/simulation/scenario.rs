//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)
//!
//! All checks happen here, so a `Scenario` that exists is runnable.

use crate::configuration::config::{BodyConfig, MethodConfig, ScenarioConfig};
use crate::error::ConfigError;
use crate::simulation::engine::Engine;
use crate::simulation::forces::{AccelSet, NewtonianGravity, NewtonianGravityBarnesHut};
use crate::simulation::params::{Parameters, DEFAULT_MAX_DEPTH, DEFAULT_THETA, G_SOLAR};
use crate::simulation::runner::{validate_bodies, NBodySimulation};
use crate::simulation::states::{Body, NVec2, System};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies = cfg
            .bodies
            .iter()
            .enumerate()
            .map(|(i, bc)| body_from_config(i, bc))
            .collect::<Result<Vec<Body>, _>>()?;
        validate_bodies(&bodies)?;

        let p_cfg = cfg.parameters;

        // Parameters (runtime) from ParametersConfig
        let e_cfg = cfg.engine;
        let parameters = Parameters::new(p_cfg.total_time, p_cfg.dt, p_cfg.softening)
            .with_theta(e_cfg.theta.unwrap_or(DEFAULT_THETA))
            .with_max_depth(e_cfg.max_depth.unwrap_or(DEFAULT_MAX_DEPTH))
            .with_G(p_cfg.G.unwrap_or(G_SOLAR));
        parameters.validate()?;

        let engine = Engine {
            method: e_cfg.method,
            integrator: e_cfg.integrator,
        };

        Ok(Self {
            engine,
            parameters,
            system: System::new(bodies),
        })
    }

    /// Force set for the configured method
    pub fn forces(&self) -> AccelSet {
        let p = &self.parameters;
        match self.engine.method {
            MethodConfig::Direct => AccelSet::new().with(NewtonianGravity { G: p.G, eps2: p.eps2 }),
            MethodConfig::BarnesHut => AccelSet::new().with(NewtonianGravityBarnesHut {
                G: p.G,
                eps2: p.eps2,
                theta: p.theta,
                max_depth: p.max_depth,
            }),
        }
    }

    pub fn into_simulation(self) -> Result<NBodySimulation<AccelSet>, ConfigError> {
        let forces = self.forces();
        let sim = NBodySimulation::with_forces(self.system.bodies, self.parameters, forces)?;
        Ok(sim.integrator(self.engine.integrator))
    }
}

fn body_from_config(index: usize, bc: &BodyConfig) -> Result<Body, ConfigError> {
    let vec2 = |field: &'static str, c: &[f64]| match c {
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(ConfigError::Dimension {
            index,
            field,
            len: c.len(),
        }),
    };
    Ok(Body::new(bc.m, vec2("x", &bc.x[..])?, vec2("v", &bc.v[..])?))
}
