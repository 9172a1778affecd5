//! Core state types for the N-body simulation.
//!
//! - `Body`   a point mass with position and velocity (`NVec2`)
//! - `System` the ordered body set plus the current simulation time `t`
//!
//! Bodies carry no identity of their own; everywhere else in the crate a
//! body is referred to by its index in `System::bodies`.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub m: f64, // mass
}

impl Body {
    pub fn new(m: f64, x: NVec2, v: NVec2) -> Self {
        Self { x, v, m }
    }

    /// Build a body from an `(m, x, y, vx, vy)` tuple
    pub fn from_tuple((m, x, y, vx, vy): (f64, f64, f64, f64, f64)) -> Self {
        Self::new(m, NVec2::new(x, y), NVec2::new(vx, vy))
    }

    pub fn as_tuple(&self) -> (f64, f64, f64, f64, f64) {
        (self.m, self.x.x, self.x.y, self.v.x, self.v.y)
    }

    /// Squared distance between two bodies
    pub fn square_dist(&self, other: &Body) -> f64 {
        (self.x - other.x).norm_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.m.is_finite() && self.x.iter().chain(self.v.iter()).all(|c| c.is_finite())
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.m).sum()
    }

    /// Mass-weighted mean position of all bodies, `None` for an empty system
    pub fn center_of_mass(&self) -> Option<NVec2> {
        let mass = self.total_mass();
        if mass <= 0.0 {
            return None;
        }
        let weighted = self.bodies.iter().fold(NVec2::zeros(), |acc, b| acc + b.x * b.m);
        Some(weighted / mass)
    }

    pub fn positions(&self) -> Vec<NVec2> {
        self.bodies.iter().map(|b| b.x).collect()
    }
}
