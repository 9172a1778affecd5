//! Quadtree nodes.
//!
//! A node is one of three things:
//!
//! - `Empty`: covers a region with no body in it
//! - `Leaf`: holds a single body. Once subdivision hits the depth bound a
//!   leaf becomes a *bucket* and keeps every further body that lands in it,
//!   which is what stops coincident bodies from splitting forever.
//! - `Internal`: four children (one per quadrant) plus the total mass and
//!   center of mass of everything below it
//!
//! Nodes do not store their own region. The caller walks down with the
//! matching [`BBox`] and derives child regions with [`BBox::child_box`].

use smallvec::{smallvec, SmallVec};

use super::bbox::BBox;
use crate::simulation::states::NVec2;

/// What the tree keeps of a body: its index in the body set, its mass and
/// its position at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub index: usize,
    pub m: f64,
    pub x: NVec2,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GNode {
    #[default]
    Empty,
    Leaf(Leaf),
    Internal(Box<Internal>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    bodies: SmallVec<[PointMass; 1]>,
    mass: f64,
    com: NVec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Internal {
    children: [GNode; 4],
    mass: f64,
    com: NVec2,
    len: usize,
}

impl GNode {
    /// Total mass below this node, 0 for an empty node
    pub fn mass(&self) -> f64 {
        match self {
            GNode::Empty => 0.0,
            GNode::Leaf(leaf) => leaf.mass,
            GNode::Internal(node) => node.mass,
        }
    }

    /// Center of mass below this node, `None` for an empty node
    pub fn center_of_mass(&self) -> Option<NVec2> {
        match self {
            GNode::Empty => None,
            GNode::Leaf(leaf) => Some(leaf.com),
            GNode::Internal(node) => Some(node.com),
        }
    }

    /// Number of bodies below this node
    pub fn len(&self) -> usize {
        match self {
            GNode::Empty => 0,
            GNode::Leaf(leaf) => leaf.bodies.len(),
            GNode::Internal(node) => node.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GNode::Empty)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, GNode::Leaf(_))
    }

    pub fn children(&self) -> Option<&[GNode; 4]> {
        match self {
            GNode::Internal(node) => Some(&node.children),
            _ => None,
        }
    }

    /// Bodies held directly by this node (empty unless it is a leaf)
    pub fn residents(&self) -> &[PointMass] {
        match self {
            GNode::Leaf(leaf) => &leaf.bodies,
            _ => &[],
        }
    }

    /// Insert `body` into the subtree rooted here. `bbox` is this node's
    /// region and `depth` its distance from the root.
    ///
    /// Returns `true` if the body had to share a bucket because the depth
    /// bound (or floating point resolution) was reached.
    pub fn insert(&mut self, bbox: &BBox, body: PointMass, depth: usize, max_depth: usize) -> bool {
        match self {
            GNode::Empty => {
                *self = GNode::Leaf(Leaf::new(body));
                false
            }
            GNode::Leaf(leaf) if depth >= max_depth || !bbox.can_subdivide() => {
                leaf.push(body);
                true
            }
            GNode::Leaf(leaf) => {
                // split: the resident moves down alongside the newcomer
                let residents = std::mem::take(&mut leaf.bodies);
                let mut node = Internal::new();
                let mut bucketed = false;
                for b in residents.into_iter().chain(std::iter::once(body)) {
                    bucketed |= node.insert(bbox, b, depth, max_depth);
                }
                *self = GNode::Internal(Box::new(node));
                bucketed
            }
            GNode::Internal(node) => node.insert(bbox, body, depth, max_depth),
        }
    }

    /// Remove the body with `index`, located at `x` when it was inserted.
    ///
    /// Aggregates on the path are recomputed from the children and any
    /// internal node left with fewer than two bodies collapses into a leaf
    /// (or an empty node). Returns `false` if the body was not found.
    pub fn remove(&mut self, bbox: &BBox, index: usize, x: &NVec2) -> bool {
        match self {
            GNode::Empty => false,
            GNode::Leaf(leaf) => {
                let Some(pos) = leaf.bodies.iter().position(|b| b.index == index) else {
                    return false;
                };
                leaf.bodies.remove(pos);
                if leaf.bodies.is_empty() {
                    *self = GNode::Empty;
                } else {
                    leaf.recompute();
                }
                true
            }
            GNode::Internal(node) => {
                let q = bbox.quadrant_for(x);
                if !node.children[q.index()].remove(&bbox.child_box(q), index, x) {
                    return false;
                }
                node.recompute();
                if node.len < 2 {
                    *self = node.collapse();
                }
                true
            }
        }
    }

    /// Number of nodes in this subtree, empty ones included
    pub fn node_count(&self) -> usize {
        match self {
            GNode::Internal(node) => 1 + node.children.iter().map(GNode::node_count).sum::<usize>(),
            _ => 1,
        }
    }

    /// Height of this subtree, 0 for a leaf or empty node
    pub fn depth(&self) -> usize {
        match self {
            GNode::Internal(node) => 1 + node.children.iter().map(GNode::depth).max().unwrap_or(0),
            _ => 0,
        }
    }
}

impl Leaf {
    fn new(body: PointMass) -> Self {
        Self {
            bodies: smallvec![body],
            mass: body.m,
            com: body.x,
        }
    }

    fn push(&mut self, body: PointMass) {
        let mass = self.mass + body.m;
        self.com = (self.com * self.mass + body.x * body.m) / mass;
        self.mass = mass;
        self.bodies.push(body);
    }

    fn recompute(&mut self) {
        self.mass = self.bodies.iter().map(|b| b.m).sum();
        let weighted = self.bodies.iter().fold(NVec2::zeros(), |acc, b| acc + b.x * b.m);
        self.com = weighted / self.mass;
    }

    pub fn bodies(&self) -> &[PointMass] {
        &self.bodies
    }
}

impl Internal {
    fn new() -> Self {
        Self {
            children: Default::default(),
            mass: 0.0,
            com: NVec2::zeros(),
            len: 0,
        }
    }

    fn insert(&mut self, bbox: &BBox, body: PointMass, depth: usize, max_depth: usize) -> bool {
        let q = bbox.quadrant_for(&body.x);
        let bucketed = self.children[q.index()].insert(&bbox.child_box(q), body, depth + 1, max_depth);

        let mass = self.mass + body.m;
        self.com = (self.com * self.mass + body.x * body.m) / mass;
        self.mass = mass;
        self.len += 1;
        bucketed
    }

    fn recompute(&mut self) {
        self.len = self.children.iter().map(GNode::len).sum();
        self.mass = self.children.iter().map(GNode::mass).sum();
        let weighted = self
            .children
            .iter()
            .filter_map(|c| c.center_of_mass().map(|com| com * c.mass()))
            .fold(NVec2::zeros(), |acc, w| acc + w);
        self.com = if self.mass > 0.0 { weighted / self.mass } else { NVec2::zeros() };
    }

    /// With at most one body left, the only non-empty child is a leaf
    fn collapse(&mut self) -> GNode {
        self.children
            .iter_mut()
            .map(std::mem::take)
            .find(|c| !c.is_empty())
            .unwrap_or_default()
    }

    pub fn children(&self) -> &[GNode; 4] {
        &self.children
    }
}
