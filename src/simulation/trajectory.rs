//! Recorded output of a run: body positions after every step.
//!
//! This is what an external renderer consumes; nothing in the crate reads it
//! back except [`Trajectory::closest_distance`].

use std::io::{self, BufWriter, Write};

use serde::Serialize;

use super::states::{NVec2, System};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub t: f64,
    pub positions: Vec<NVec2>,
}

impl Snapshot {
    pub fn of(sys: &System) -> Self {
        Self {
            t: sys.t,
            positions: sys.positions(),
        }
    }

    /// Smallest distance between any two bodies, `None` below two bodies
    pub fn closest_distance(&self) -> Option<f64> {
        let p = &self.positions;
        (0..p.len())
            .flat_map(|i| ((i + 1)..p.len()).map(move |j| (p[i] - p[j]).norm_squared()))
            .min_by(f64::total_cmp)
            .map(f64::sqrt)
    }
}

/// Snapshots in time order; the first one is the initial state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    pub snapshots: Vec<Snapshot>,
}

impl Trajectory {
    pub fn push(&mut self, sys: &System) {
        self.snapshots.push(Snapshot::of(sys));
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Positions of body `i` over time
    pub fn path(&self, i: usize) -> Vec<NVec2> {
        self.snapshots.iter().filter_map(|s| s.positions.get(i).copied()).collect()
    }

    /// Write the whole trajectory as YAML, flushing before returning so that
    /// late write failures are reported
    pub fn write_yaml<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut writer = BufWriter::new(writer);
        serde_yaml::to_writer(&mut writer, self).map_err(io::Error::other)?;
        writer.flush()
    }

    /// Closest approach of any two bodies over the whole run
    pub fn closest_distance(&self) -> Option<f64> {
        self.snapshots
            .iter()
            .filter_map(Snapshot::closest_distance)
            .min_by(f64::total_cmp)
    }
}
