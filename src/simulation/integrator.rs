//! Fixed-step time integrators for the N-body system
//!
//! Both integrators work in two phases: every acceleration is computed from
//! the current, untouched body set first, and only then is the whole set
//! replaced by its updated copy. A step that produces a non-finite value
//! fails with [`SimError::NonFinite`] and leaves the system as it was.

use log::trace;

use super::forces::Acceleration;
use super::params::Parameters;
use super::states::{Body, NVec2, System};
use crate::configuration::config::IntegratorConfig;
use crate::error::{Result, SimError};

/// Advance `sys` by one step of `params.dt` with the chosen integrator.
/// `step` is only used for error reporting.
pub fn advance<A>(kind: &IntegratorConfig, sys: &mut System, forces: &A, params: &Parameters, step: usize) -> Result<()>
where
    A: Acceleration + ?Sized,
{
    match kind {
        IntegratorConfig::Euler => euler_integrator(sys, forces, params, step),
        IntegratorConfig::Verlet => verlet_integrator(sys, forces, params, step),
    }
}

/// Semi-implicit Euler:
/// v_n+1 = v_n + dt * a_n
/// x_n+1 = x_n + dt * v_n+1
pub fn euler_integrator<A>(sys: &mut System, forces: &A, params: &Parameters, step: usize) -> Result<()>
where
    A: Acceleration + ?Sized,
{
    let dt = params.dt;
    let a = accelerations(sys, forces, step)?;

    let next: Vec<Body> = sys
        .bodies
        .iter()
        .zip(a.iter())
        .map(|(b, a)| {
            let v = b.v + dt * *a;
            Body { x: b.x + dt * v, v, m: b.m }
        })
        .collect();

    commit(sys, next, dt, step)
}

/// Velocity–Verlet (kick, drift, kick), two force evaluations per step
pub fn verlet_integrator<A>(sys: &mut System, forces: &A, params: &Parameters, step: usize) -> Result<()>
where
    A: Acceleration + ?Sized,
{
    let dt = params.dt; // time step dt
    let half_dt = 0.5 * dt; // half step dt/2

    // a_n from x_n at time t_n
    let a_old = accelerations(sys, forces, step)?;

    // Kick: v_n+1/2 = v_n + (1/2 * dt) * a_n
    // Drift: x_n+1 = x_n + dt * v_n+1/2
    let half = System {
        bodies: sys
            .bodies
            .iter()
            .zip(a_old.iter())
            .map(|(b, a)| {
                let v = b.v + half_dt * *a;
                Body { x: b.x + dt * v, v, m: b.m }
            })
            .collect(),
        t: sys.t + dt,
    };

    // a_n+1 from x_n+1 at time t_n+1
    let a_new = accelerations(&half, forces, step)?;

    // Second kick: v_n+1 = v_n+1/2 + (dt/2) * a_n+1
    let next = half
        .bodies
        .into_iter()
        .zip(a_new.iter())
        .map(|(mut b, a)| {
            b.v += half_dt * *a;
            b
        })
        .collect();

    commit(sys, next, dt, step)
}

/// Read phase: accelerations of every body against the same snapshot
fn accelerations<A>(sys: &System, forces: &A, step: usize) -> Result<Vec<NVec2>>
where
    A: Acceleration + ?Sized,
{
    let mut out = vec![NVec2::zeros(); sys.bodies.len()];
    forces.acceleration(sys.t, sys, &mut out);

    if let Some(body) = out.iter().position(|a| !(a.x.is_finite() && a.y.is_finite())) {
        return Err(SimError::NonFinite { step, body });
    }
    Ok(out)
}

/// Write phase: swap in the new body set if every body is finite
fn commit(sys: &mut System, next: Vec<Body>, dt: f64, step: usize) -> Result<()> {
    if let Some(body) = next.iter().position(|b| !b.is_finite()) {
        return Err(SimError::NonFinite { step, body });
    }
    sys.bodies = next;
    sys.t += dt;
    trace!("step {step} done, t = {}", sys.t);
    Ok(())
}
