//! # Barnes–Hut quadtree
//!
//! [`Gadget`] owns the root [`GNode`] and the square region it covers. It is
//! built from scratch for every step and only read afterwards, so a step's
//! force queries all see the same snapshot of the body set.
//!
//! ## Force queries
//!
//! [`Gadget::compute_force`] walks the tree with an explicit [`Stack`]
//! instead of recursion. For every internal node the opening criterion
//! decides between
//!
//! - treating the whole subtree as one pseudo-body at its center of mass, or
//! - pushing the four children for a closer look.
//!
//! The default criterion is [`BarnesHut`]: a node is approximated when
//! `side / distance < theta` and the query body is outside the node's box.
//! Leaves are always evaluated body by body, skipping the query body itself.

use std::fmt;

use log::{debug, log_enabled, warn, Level};

use super::bbox::BBox;
use super::gnode::{GNode, PointMass};
use super::stack::Stack;
use crate::simulation::forces::softened_force;
use crate::simulation::params::DEFAULT_MAX_DEPTH;
use crate::simulation::states::{Body, NVec2};

/// Decides whether an internal node has to be opened for a body at `x`.
pub trait OpeningCriterion {
    fn should_open(&self, bbox: &BBox, mass: f64, com: &NVec2, x: &NVec2) -> bool;
}

impl<F> OpeningCriterion for F
where
    F: Fn(&BBox, f64, &NVec2, &NVec2) -> bool,
{
    fn should_open(&self, bbox: &BBox, mass: f64, com: &NVec2, x: &NVec2) -> bool {
        self(bbox, mass, com, x)
    }
}

/// Opening-angle rule. Smaller `theta` opens more nodes and is more exact;
/// `theta = 0` never approximates and reproduces direct summation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarnesHut {
    pub theta: f64,
}

impl OpeningCriterion for BarnesHut {
    fn should_open(&self, bbox: &BBox, _mass: f64, com: &NVec2, x: &NVec2) -> bool {
        // a box holding the body would count the body in its own aggregate
        if bbox.contains(x) {
            return true;
        }
        let d = (com - x).norm();
        if d == 0.0 {
            return true;
        }
        bbox.side() / d >= self.theta
    }
}

/// Where a pseudo-body in an interaction list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Body(usize),
    Aggregate { len: usize },
}

/// A mass acting on a query body: either a real body or a subtree summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoBody {
    pub m: f64,
    pub x: NVec2,
    pub source: Source,
}

#[derive(Debug, Clone)]
pub struct Gadget {
    root: GNode,
    bbox: BBox,
    max_depth: usize,
    bucketed: usize,
}

impl Gadget {
    /// Empty tree covering `bbox`
    pub fn new(bbox: BBox, max_depth: usize) -> Self {
        Self {
            root: GNode::Empty,
            bbox,
            max_depth,
            bucketed: 0,
        }
    }

    /// Build a tree holding every body, with the root box fitted to them.
    /// Body `i` of the slice is stored under index `i`.
    pub fn build(bodies: &[Body], max_depth: usize) -> Self {
        let bbox = BBox::enclosing(bodies.iter().map(|b| &b.x))
            .unwrap_or_else(|| BBox::new(NVec2::zeros(), 1.0));

        let mut gadget = Self::new(bbox, max_depth);
        for (i, b) in bodies.iter().enumerate() {
            gadget.insert(i, b);
        }

        if gadget.bucketed > 0 {
            warn!(
                "{} bodies share a leaf at the depth bound ({}), they are likely coincident",
                gadget.bucketed, max_depth
            );
        }
        if log_enabled!(Level::Debug) {
            debug!(
                "built quadtree: {} bodies, {} nodes, depth {}",
                gadget.len(),
                gadget.node_count(),
                gadget.depth()
            );
        }
        gadget
    }

    /// Insert body `body` under `index`. The position should lie in the
    /// root box; points outside still land in the nearest quadrant.
    pub fn insert(&mut self, index: usize, body: &Body) {
        let pm = PointMass {
            index,
            m: body.m,
            x: body.x,
        };
        if self.root.insert(&self.bbox, pm, 0, self.max_depth) {
            self.bucketed += 1;
        }
    }

    /// Remove body `index`, which was inserted at position `x`
    pub fn remove(&mut self, index: usize, x: &NVec2) -> bool {
        self.root.remove(&self.bbox, index, x)
    }

    pub fn root(&self) -> &GNode {
        &self.root
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn mass(&self) -> f64 {
        self.root.mass()
    }

    pub fn center_of_mass(&self) -> Option<NVec2> {
        self.root.center_of_mass()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Indices of all stored bodies, in traversal order
    pub fn bodies(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = Stack::new();
        stack.push(&self.root);
        while let Some(node) = stack.pop() {
            out.extend(node.residents().iter().map(|b| b.index));
            if let Some(children) = node.children() {
                stack.extend(children.iter());
            }
        }
        out
    }

    /// Net gravitational force on body `i` (located at `body.x`) using the
    /// Barnes–Hut rule with opening angle `theta`
    #[allow(non_snake_case)]
    pub fn compute_force(&self, i: usize, body: &Body, G: f64, eps2: f64, theta: f64) -> NVec2 {
        let mut force = NVec2::zeros();
        self.walk(i, &body.x, &BarnesHut { theta }, |p| {
            force += softened_force(G, eps2, body.m, &body.x, p.m, &p.x);
        });
        force
    }

    /// Everything that acts on body `i` at `x` under `criterion`: real
    /// bodies from opened leaves and aggregates of unopened subtrees
    pub fn interaction_list<C: OpeningCriterion>(&self, i: usize, x: &NVec2, criterion: &C) -> Vec<PseudoBody> {
        let mut list = Vec::new();
        self.walk(i, x, criterion, |p| list.push(p));
        list
    }

    fn walk<C, V>(&self, i: usize, x: &NVec2, criterion: &C, mut visit: V)
    where
        C: OpeningCriterion,
        V: FnMut(PseudoBody),
    {
        let mut stack = Stack::with_capacity(4 * self.max_depth.min(64) + 4);
        stack.push((&self.root, self.bbox));

        while let Some((node, bbox)) = stack.pop() {
            match node {
                GNode::Empty => {}
                GNode::Leaf(leaf) => {
                    for b in leaf.bodies().iter().filter(|b| b.index != i) {
                        visit(PseudoBody {
                            m: b.m,
                            x: b.x,
                            source: Source::Body(b.index),
                        });
                    }
                }
                GNode::Internal(inner) => {
                    let (mass, com) = (node.mass(), node.center_of_mass().unwrap_or(bbox.center));
                    if criterion.should_open(&bbox, mass, &com, x) {
                        let boxes = bbox.split4();
                        stack.extend(inner.children().iter().zip(boxes));
                    } else {
                        visit(PseudoBody {
                            m: mass,
                            x: com,
                            source: Source::Aggregate { len: node.len() },
                        });
                    }
                }
            }
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, node: &GNode, bbox: BBox, prefix: &str, branch: &str) -> fmt::Result {
        write!(f, "{prefix}{branch}{bbox},{}", node.len())?;
        match node.center_of_mass() {
            Some(com) => writeln!(f, " ({}, {}, {})", node.mass(), com.x, com.y)?,
            None => writeln!(f)?,
        }

        if let Some(children) = node.children() {
            let inner = match branch {
                "├─ " => format!("{prefix}│  "),
                "└─ " => format!("{prefix}   "),
                _ => prefix.to_string(),
            };
            for (k, (child, child_box)) in children.iter().zip(bbox.split4()).enumerate() {
                let branch = if k == 3 { "└─ " } else { "├─ " };
                self.fmt_node(f, child, child_box, &inner, branch)?;
            }
        }
        Ok(())
    }
}

impl Default for Gadget {
    fn default() -> Self {
        Self::new(BBox::new(NVec2::zeros(), 1.0), DEFAULT_MAX_DEPTH)
    }
}

/// Indented dump of the tree: region, body count, then `(mass, x, y)`
impl fmt::Display for Gadget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, &self.root, self.bbox, "", "")
    }
}
