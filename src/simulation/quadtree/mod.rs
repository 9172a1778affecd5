pub mod bbox;
pub mod gadget;
pub mod gnode;
pub mod stack;

pub use bbox::{BBox, Quadrant};
pub use gadget::{BarnesHut, Gadget, OpeningCriterion, PseudoBody, Source};
pub use gnode::{GNode, PointMass};
pub use stack::Stack;
