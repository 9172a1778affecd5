//! Square, axis-aligned regions of the plane and their quadrants.

use std::fmt;

use crate::simulation::states::NVec2;

/// One of the four children of a square region.
///
/// The discriminant is the child's slot in an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NE = 0,
    NW = 1,
    SW = 2,
    SE = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::NE, Quadrant::NW, Quadrant::SW, Quadrant::SE];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit offset of this quadrant's center from the parent center
    fn direction(self) -> (f64, f64) {
        match self {
            Quadrant::NE => (1.0, 1.0),
            Quadrant::NW => (-1.0, 1.0),
            Quadrant::SW => (-1.0, -1.0),
            Quadrant::SE => (1.0, -1.0),
        }
    }
}

/// A square region given by its center and half the side length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub center: NVec2,
    pub half_width: f64,
}

impl BBox {
    pub fn new(center: NVec2, half_width: f64) -> Self {
        Self { center, half_width }
    }

    /// Smallest square enclosing every point, padded by a small relative
    /// margin. A single point (or a set of identical points) gets a unit box.
    ///
    /// Returns `None` when `points` is empty.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a NVec2>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min, mut max) = (*first, *first);
        for p in points {
            min = min.inf(p);
            max = max.sup(p);
        }

        let center = (min + max) * 0.5;
        let half_extent = ((max - min) * 0.5).max();
        let half_width = if half_extent > 0.0 {
            half_extent * (1.0 + ROOT_PADDING)
        } else {
            1.0
        };
        Some(Self::new(center, half_width))
    }

    pub fn side(&self) -> f64 {
        2.0 * self.half_width
    }

    pub fn min(&self) -> NVec2 {
        self.center.add_scalar(-self.half_width)
    }

    pub fn max(&self) -> NVec2 {
        self.center.add_scalar(self.half_width)
    }

    /// Closed containment test, points on the border are inside
    pub fn contains(&self, p: &NVec2) -> bool {
        let d = p - self.center;
        d.x.abs() <= self.half_width && d.y.abs() <= self.half_width
    }

    /// Quadrant a point falls in. Coordinates equal to the center count as
    /// east and north, so the center itself maps to `NE`.
    pub fn quadrant_for(&self, p: &NVec2) -> Quadrant {
        let east = p.x >= self.center.x;
        let north = p.y >= self.center.y;
        match (east, north) {
            (true, true) => Quadrant::NE,
            (false, true) => Quadrant::NW,
            (false, false) => Quadrant::SW,
            (true, false) => Quadrant::SE,
        }
    }

    pub fn child_box(&self, q: Quadrant) -> BBox {
        let half = 0.5 * self.half_width;
        let (dx, dy) = q.direction();
        BBox::new(self.center + NVec2::new(dx * half, dy * half), half)
    }

    pub fn split4(&self) -> [BBox; 4] {
        Quadrant::ALL.map(|q| self.child_box(q))
    }

    /// Whether halving still yields four distinct child centers in f64
    pub fn can_subdivide(&self) -> bool {
        let quarter = 0.5 * self.half_width;
        quarter > 0.0
            && self.center.x + quarter != self.center.x
            && self.center.y + quarter != self.center.y
    }
}

/// Relative margin added around the root box
const ROOT_PADDING: f64 = 1e-6;

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = (self.min(), self.max());
        write!(f, "Box({},{},{},{})", lo.x, lo.y, hi.x, hi.y)
    }
}
