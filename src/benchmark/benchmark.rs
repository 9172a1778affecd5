use std::time::Instant;

use log::info;

use crate::simulation::forces::{Acceleration, NewtonianGravity, NewtonianGravityBarnesHut};
use crate::simulation::params::{Parameters, DEFAULT_MAX_DEPTH};
use crate::simulation::runner::{FastSimulation, Simulation};
use crate::simulation::states::{Body, NVec2, System};

/// One line of the direct vs Barnes–Hut timing table
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    pub n: usize,
    pub direct_s: f64,
    pub bh_s: f64,
}

/// One line of the accuracy sweep
#[derive(Debug, Clone, PartialEq)]
pub struct Accuracy {
    pub theta: f64,
    pub max_rel_error: f64,
}

/// Deterministic spread of `n` unit masses, no rand needed
pub fn make_system(n: usize) -> System {
    let bodies = (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec2::new((i_f * 0.37).sin() * 5.0, (i_f * 0.13).cos() * 5.0);
            Body::new(1.0, x, NVec2::zeros())
        })
        .collect();
    System::new(bodies)
}

fn make_params() -> Parameters {
    Parameters::new(1.0, 0.001, 1e-2).with_G(0.1).with_theta(0.7)
}

/// Time one force evaluation per model for each system size
pub fn bench_gravity(ns: &[usize]) -> Vec<Timing> {
    let params = make_params();
    let direct = NewtonianGravity {
        G: params.G,
        eps2: params.eps2,
    };
    let bh = NewtonianGravityBarnesHut {
        G: params.G,
        eps2: params.eps2,
        theta: params.theta,
        max_depth: DEFAULT_MAX_DEPTH,
    };

    let mut rows = Vec::with_capacity(ns.len());
    for &n in ns {
        let sys = make_system(n);
        let mut out = vec![NVec2::zeros(); n];

        // Warm up
        direct.acceleration(0.0, &sys, &mut out);
        bh.acceleration(0.0, &sys, &mut out);

        let t0 = Instant::now();
        direct.acceleration(0.0, &sys, &mut out);
        let direct_s = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        bh.acceleration(0.0, &sys, &mut out);
        let bh_s = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {direct_s:8.6} s, BH = {bh_s:8.6} s");
        rows.push(Timing { n, direct_s, bh_s });
    }
    rows
}

/// Time whole integration steps of both simulations
pub fn bench_step(ns: &[usize], steps: usize) -> crate::error::Result<Vec<Timing>> {
    let mut rows = Vec::with_capacity(ns.len());
    for &n in ns {
        let sys = make_system(n);
        let mut direct = Simulation::new(sys.bodies.clone(), make_params())?;
        let mut fast = FastSimulation::new(sys.bodies, make_params())?;

        let t0 = Instant::now();
        for _ in 0..steps {
            direct.step()?;
        }
        let direct_s = t0.elapsed().as_secs_f64() / steps.max(1) as f64;

        let t1 = Instant::now();
        for _ in 0..steps {
            fast.step()?;
        }
        let bh_s = t1.elapsed().as_secs_f64() / steps.max(1) as f64;

        println!("N = {n:5}, direct step = {direct_s:8.6} s,   BH step = {bh_s:8.6} s");
        rows.push(Timing { n, direct_s, bh_s });
    }
    Ok(rows)
}

/// Largest relative deviation from direct summation for each `theta`
pub fn bench_theta(n: usize, thetas: &[f64]) -> Vec<Accuracy> {
    let params = make_params();
    let sys = make_system(n);

    let mut exact = vec![NVec2::zeros(); n];
    NewtonianGravity {
        G: params.G,
        eps2: params.eps2,
    }
    .acceleration(0.0, &sys, &mut exact);

    println!("theta,max_rel_error");
    thetas
        .iter()
        .map(|&theta| {
            let mut approx = vec![NVec2::zeros(); n];
            NewtonianGravityBarnesHut {
                G: params.G,
                eps2: params.eps2,
                theta,
                max_depth: DEFAULT_MAX_DEPTH,
            }
            .acceleration(0.0, &sys, &mut approx);

            let max_rel_error = exact
                .iter()
                .zip(&approx)
                .map(|(e, a)| (e - a).norm() / e.norm().max(f64::MIN_POSITIVE))
                .fold(0.0, f64::max);

            println!("{theta},{max_rel_error:.3e}");
            Accuracy { theta, max_rel_error }
        })
        .collect()
}

/// Everything the `--bench` flag runs
pub fn run_all() -> crate::error::Result<()> {
    info!("benchmarking force evaluation");
    bench_gravity(&[200, 400, 800, 1600, 3200, 6400]);
    info!("benchmarking integration steps");
    bench_step(&[200, 400, 800, 1600, 3200], 2)?;
    info!("accuracy against direct summation");
    bench_theta(1000, &[0.0, 0.1, 0.3, 0.5, 0.7, 1.0]);
    Ok(())
}
