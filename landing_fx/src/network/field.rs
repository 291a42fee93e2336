//! Node field: the point-masses of the network and their per-tick physics.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::config::{HUB_COUNT, MAX_SPEED, PHASE_STEP, SPREAD, VERTICAL_SQUASH};

/// A single animated point in the field.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub offset: Vec3,
    pub velocity: Vec3,
    pub size: f32,
    /// Position along the brand gradient, in `[0, 1]`.
    pub ct: f32,
    /// Pulse phase in radians. Grows without bound.
    pub ph: f32,
    pub hub: bool,
}

/// Owns every node and advances them one tick at a time.
#[derive(Clone, Debug)]
pub struct NodeField {
    nodes: Vec<Node>,
    half_extents: Vec3,
}

impl NodeField {
    pub fn new(count: usize, rng: &mut impl Rng) -> Self {
        Self::with_spread(count, SPREAD, rng)
    }

    pub fn with_spread(count: usize, spread: f32, rng: &mut impl Rng) -> Self {
        let half_extents = Vec3::new(spread, spread * VERTICAL_SQUASH, spread);
        let nodes = (0..count)
            .map(|i| {
                let hub = i < HUB_COUNT;
                Node {
                    offset: Vec3::new(
                        symmetric(rng, half_extents.x),
                        symmetric(rng, half_extents.y),
                        symmetric(rng, half_extents.z),
                    ),
                    velocity: Vec3::new(
                        symmetric(rng, MAX_SPEED),
                        symmetric(rng, MAX_SPEED),
                        symmetric(rng, MAX_SPEED),
                    ),
                    size: if hub {
                        rng.gen_range(4.5..6.5)
                    } else {
                        rng.gen_range(1.4..3.0)
                    },
                    ct: rng.gen_range(0.0..=1.0),
                    ph: rng.gen_range(0.0..TAU),
                    hub,
                }
            })
            .collect();
        Self {
            nodes,
            half_extents,
        }
    }

    /// Builds a field from explicit nodes.
    pub fn from_nodes(nodes: Vec<Node>, spread: f32) -> Self {
        Self {
            nodes,
            half_extents: Vec3::new(spread, spread * VERTICAL_SQUASH, spread),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Euler step with elastic wall reflection.
    ///
    /// A node past a wall has that axis's velocity inverted, but only while it
    /// still heads outward. It may overshoot by at most one tick of velocity.
    pub fn step(&mut self) {
        let bounds = self.half_extents;
        for node in &mut self.nodes {
            node.offset += node.velocity;
            for axis in 0..3 {
                let pos = node.offset[axis];
                let vel = node.velocity[axis];
                if (pos > bounds[axis] && vel > 0.0) || (pos < -bounds[axis] && vel < 0.0) {
                    node.velocity[axis] = -vel;
                }
            }
            node.ph += PHASE_STEP;
        }
    }
}

fn symmetric(rng: &mut impl Rng, half: f32) -> f32 {
    if half > 0.0 {
        rng.gen_range(-half..=half)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_six_nodes_are_larger_hubs() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = NodeField::new(72, &mut rng);

        assert_eq!(field.len(), 72);
        let hubs: Vec<_> = field.nodes().iter().filter(|n| n.hub).collect();
        assert_eq!(hubs.len(), HUB_COUNT);
        assert!(field.nodes()[..HUB_COUNT].iter().all(|n| n.hub));

        let smallest_hub = hubs.iter().map(|n| n.size).fold(f32::MAX, f32::min);
        let largest_plain = field.nodes()[HUB_COUNT..]
            .iter()
            .map(|n| n.size)
            .fold(0.0, f32::max);
        assert!(smallest_hub > largest_plain);
    }

    #[test]
    fn initial_offsets_sit_inside_the_box() {
        let mut rng = StdRng::seed_from_u64(11);
        let field = NodeField::new(500, &mut rng);
        let bounds = field.half_extents();

        for node in field.nodes() {
            assert!(node.offset.abs().cmple(bounds).all(), "{node:?}");
            assert!(node.velocity.abs().max_element() <= MAX_SPEED);
            assert!((0.0..=1.0).contains(&node.ct));
        }
    }

    #[test]
    fn nodes_stay_within_one_tick_of_the_walls() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = NodeField::with_spread(40, 20.0, &mut rng);
        let bounds = field.half_extents();

        for _ in 0..5_000 {
            field.step();
            for node in field.nodes() {
                let limit = bounds + node.velocity.abs() + Vec3::splat(1e-4);
                assert!(node.offset.abs().cmple(limit).all(), "{node:?}");
            }
        }
    }

    #[test]
    fn reflection_inverts_only_the_crossing_axis() {
        let node = Node {
            offset: Vec3::new(9.8, 0.0, 0.0),
            velocity: Vec3::new(0.5, 0.1, -0.2),
            size: 2.0,
            ct: 0.5,
            ph: 0.0,
            hub: false,
        };
        let mut field = NodeField::from_nodes(vec![node], 10.0);

        field.step();

        let node = &field.nodes()[0];
        assert_eq!(node.velocity, Vec3::new(-0.5, 0.1, -0.2));
        assert!((node.offset.x - 10.3).abs() < 1e-5);
        assert!((node.ph - PHASE_STEP).abs() < 1e-6);
    }
}
