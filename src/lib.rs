pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Body, System, NVec2};
pub use simulation::params::{Parameters, G_SOLAR};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, NewtonianGravityBarnesHut};
pub use simulation::integrator::{euler_integrator, verlet_integrator};
pub use simulation::quadtree::{BBox, BarnesHut, GNode, Gadget, OpeningCriterion, Quadrant, Stack};
pub use simulation::runner::{FastSimulation, NBodySimulation, Simulation};
pub use simulation::scenario::Scenario;
pub use simulation::trajectory::{Snapshot, Trajectory};

pub use configuration::config::{IntegratorConfig, MethodConfig, EngineConfig, ParametersConfig, BodyConfig, ScenarioConfig};

pub use error::{ConfigError, SimError};

pub use benchmark::benchmark::{bench_gravity, bench_step, bench_theta};
