//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait, direct Newtonian gravity and a
//! Barnes–Hut–based variant that goes through the quadtree

use log::trace;

use crate::simulation::quadtree::Gadget;
use crate::simulation::states::{NVec2, System};

/// Softened Newtonian force on mass `m1` at `x1` from mass `m2` at `x2`:
///
/// `F = G m1 m2 r / (|r|² + eps2)^(3/2)`, with `r = x2 - x1`
///
/// Points toward `x2`. Coincident positions give a zero vector rather than a
/// singularity as long as `eps2 > 0`.
#[allow(non_snake_case)]
#[inline]
pub fn softened_force(G: f64, eps2: f64, m1: f64, x1: &NVec2, m2: f64, x2: &NVec2) -> NVec2 {
    let r = x2 - x1;
    let d2 = r.norm_squared() + eps2;
    let inv_r = d2.sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    r * (G * m1 * m2 * inv_r3)
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec2]);
}

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
#[derive(Default)]
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Acceleration for AccelSet {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec2]) {
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }
}

/// Newtonian gravity by direct summation over all pairs, O(n²)
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct NewtonianGravity {
    pub G: f64, // gravitional constant
    pub eps2: f64, // softening
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec2]) {
        let n = sys.bodies.len();

        // Each unordered pair once; the pair force is applied to both
        // bodies with opposite signs
        for i in 0..n {
            let bi = &sys.bodies[i];
            for j in (i + 1)..n {
                let bj = &sys.bodies[j];

                // force on i due to j, along +r (toward j)
                let f = softened_force(self.G, self.eps2, bi.m, &bi.x, bj.m, &bj.x);

                out[i] += f / bi.m;
                out[j] -= f / bj.m;
            }
        }
    }
}

/// Newtonian gravity evaluated via a Barnes–Hut quadtree
/// Builds a fresh [`Gadget`] from `sys` on every call, queries it for every
/// body, then drops it. `theta` is the opening angle, `eps2` the softening.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct NewtonianGravityBarnesHut {
    pub G: f64,
    pub eps2: f64,
    pub theta: f64,
    pub max_depth: usize,
}

impl NewtonianGravityBarnesHut {
    /// Net force on every body against a single tree built from `sys`
    pub fn forces(&self, sys: &System) -> Vec<NVec2> {
        let tree = Gadget::build(&sys.bodies, self.max_depth);
        trace!("t = {}: querying {} bodies against the tree", sys.t, tree.len());
        sys.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| tree.compute_force(i, b, self.G, self.eps2, self.theta))
            .collect()
    }
}

impl Acceleration for NewtonianGravityBarnesHut {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec2]) {
        for ((a, f), b) in out.iter_mut().zip(self.forces(sys)).zip(&sys.bodies) {
            *a += f / b.m;
        }
    }
}
