//! Link renderer: pairwise proximity links with depth-faded opacity.
//!
//! The brute-force search is O(N²). Past a node-count threshold the driver
//! switches to [`SpatialGrid`], which only compares nodes in neighbouring
//! screen-space cells.

use std::collections::HashMap;

use bevy::color::{Mix, Srgba};
use bevy::prelude::*;

use crate::config::LINK_ALPHA;
use crate::network::field::Node;
use crate::network::projection::Projection;

/// The three brand colors the gradient runs through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub start: Srgba,
    pub middle: Srgba,
    pub end: Srgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            // Cyan -> mint -> violet.
            start: Srgba::new(0.0, 0.788, 1.0, 1.0),
            middle: Srgba::new(0.573, 0.996, 0.616, 1.0),
            end: Srgba::new(0.486, 0.361, 1.0, 1.0),
        }
    }
}

impl Palette {
    /// Piecewise-linear: start→middle on `[0, 0.5]`, middle→end on `[0.5, 1]`.
    pub fn grad_color(&self, t: f32) -> Srgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if t <= 0.5 {
            self.start.mix(&self.middle, t * 2.0)
        } else {
            self.middle.mix(&self.end, (t - 0.5) * 2.0)
        }
    }
}

/// `(1 − distance/link_dist) · LINK_ALPHA · min(d_a, d_b)`, zero at or beyond
/// `link_dist`.
pub fn link_alpha(distance: f32, link_dist: f32, depth_a: f32, depth_b: f32) -> f32 {
    if distance.is_nan() || distance >= link_dist {
        return 0.0;
    }
    ((1.0 - distance / link_dist) * LINK_ALPHA * depth_a.min(depth_b)).max(0.0)
}

/// One line to draw between nodes `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub color: Srgba,
}

/// How candidate pairs are enumerated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PairSearch {
    #[default]
    BruteForce,
    Grid,
}

impl PairSearch {
    pub fn for_node_count(count: usize, grid_threshold: usize) -> Self {
        if count > grid_threshold {
            PairSearch::Grid
        } else {
            PairSearch::BruteForce
        }
    }
}

/// Uniform screen-space bucket grid.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Rebuilds the grid. Keeps the cell allocations around between frames.
    pub fn rebuild(&mut self, cell_size: f32, points: impl Iterator<Item = Vec2>) {
        self.cell_size = cell_size.max(1.0);
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        for (index, point) in points.enumerate() {
            let cell = self.cell_of(point);
            self.cells.entry(cell).or_default().push(index);
        }
    }

    fn cell_of(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Calls `visit(i, j)` once for every pair `i < j` in the same or
    /// adjacent cells.
    pub fn for_each_candidate(&self, mut visit: impl FnMut(usize, usize)) {
        for (&(cx, cy), bucket) in &self.cells {
            for (k, &i) in bucket.iter().enumerate() {
                for &j in &bucket[k + 1..] {
                    visit(i.min(j), i.max(j));
                }
            }
            // Half of the 8 neighbours, so each cell pair is visited once.
            for (dx, dy) in [(1, 0), (-1, 1), (0, 1), (1, 1)] {
                let Some(other) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &i in bucket {
                    for &j in other {
                        visit(i.min(j), i.max(j));
                    }
                }
            }
        }
    }
}

/// Finds every linked pair and writes them into `out`, sorted by `(a, b)`.
pub fn collect_links(
    projections: &[Projection],
    nodes: &[Node],
    link_dist: f32,
    palette: &Palette,
    search: PairSearch,
    grid: &mut SpatialGrid,
    out: &mut Vec<Link>,
) {
    out.clear();
    let mut consider = |a: usize, b: usize| {
        let distance = projections[a].screen.distance(projections[b].screen);
        if distance < link_dist {
            out.push(Link {
                a,
                b,
                distance,
                color: palette.grad_color((nodes[a].ct + nodes[b].ct) * 0.5),
            });
        }
    };

    match search {
        PairSearch::BruteForce => {
            for a in 0..projections.len() {
                for b in a + 1..projections.len() {
                    consider(a, b);
                }
            }
        }
        PairSearch::Grid => {
            grid.rebuild(link_dist, projections.iter().map(|p| p.screen));
            grid.for_each_candidate(&mut consider);
            out.sort_unstable_by_key(|link| (link.a, link.b));
        }
    }
}
