//! High-level runtime engine settings
//!
//! Selects the force method and integrator used when building and running
//! a `Scenario`

use crate::configuration::config::{IntegratorConfig, MethodConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub method: MethodConfig, // direct or barnes-hut
    pub integrator: IntegratorConfig, // euler or verlet
}
