//! Flat particle field: drifting dots that shy away from the pointer and link
//! up with their neighbours. Rebuilt from scratch on every resize.

use bevy::prelude::*;
use rand::Rng;

use crate::render::Surface;

/// One particle per this many square pixels.
pub const PARTICLE_AREA: f32 = 9000.0;
pub const POINTER_RADIUS: f32 = 150.0;
const PUSH_STEP: f32 = 3.0;
/// The pointer cannot push a particle closer than `size * EDGE_MARGIN` to an edge.
const EDGE_MARGIN: f32 = 10.0;
const LINK_FADE_SQ: f32 = 20_000.0;
const LINK_ALPHA: f32 = 0.15;
const MAX_DRIFT: f32 = 0.2;

const CYAN: Srgba = Srgba::new(0.0, 0.788, 1.0, 0.6);
const MINT: Srgba = Srgba::new(0.573, 0.996, 0.616, 0.6);
const LINK_COLOR: Srgba = Srgba::new(0.0, 0.788, 1.0, 1.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub direction: Vec2,
    pub size: f32,
    pub color: Srgba,
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Vec2,
    pointer: Option<Vec2>,
}

impl ParticleField {
    pub fn new(width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            bounds: Vec2::ZERO,
            pointer: None,
        };
        field.resize(width, height, rng);
        field
    }

    /// `ceil(width * height / PARTICLE_AREA)`.
    pub fn particle_count(width: f32, height: f32) -> usize {
        let area = width.max(0.0) * height.max(0.0);
        if area.is_finite() {
            (area / PARTICLE_AREA).ceil() as usize
        } else {
            0
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// `None` when the pointer leaves (touch end).
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    /// Adopts the new bounds and reseeds every particle.
    pub fn resize(&mut self, width: f32, height: f32, rng: &mut impl Rng) {
        self.bounds = Vec2::new(width.max(0.0), height.max(0.0));
        let count = Self::particle_count(width, height);
        let bounds = self.bounds;
        self.particles = (0..count)
            .map(|_| {
                let size = rng.gen::<f32>() * 2.0 + 1.0;
                let inset = size * 2.0;
                Particle {
                    position: Vec2::new(
                        rng.gen::<f32>() * (bounds.x - inset - inset) + inset,
                        rng.gen::<f32>() * (bounds.y - inset - inset) + inset,
                    ),
                    direction: Vec2::new(
                        rng.gen::<f32>() * MAX_DRIFT * 2.0 - MAX_DRIFT,
                        rng.gen::<f32>() * MAX_DRIFT * 2.0 - MAX_DRIFT,
                    ),
                    size,
                    color: if rng.gen_bool(0.5) { CYAN } else { MINT },
                }
            })
            .collect();
    }

    pub fn step(&mut self) {
        let bounds = self.bounds;
        let pointer = self.pointer;
        for particle in &mut self.particles {
            let pos = &mut particle.position;
            if pos.x > bounds.x || pos.x < 0.0 {
                particle.direction.x = -particle.direction.x;
            }
            if pos.y > bounds.y || pos.y < 0.0 {
                particle.direction.y = -particle.direction.y;
            }

            if let Some(pointer) = pointer {
                if pointer.distance(*pos) < POINTER_RADIUS {
                    let margin = particle.size * EDGE_MARGIN;
                    if pointer.x < pos.x && pos.x < bounds.x - margin {
                        pos.x += PUSH_STEP;
                    }
                    if pointer.x > pos.x && pos.x > margin {
                        pos.x -= PUSH_STEP;
                    }
                    if pointer.y < pos.y && pos.y < bounds.y - margin {
                        pos.y += PUSH_STEP;
                    }
                    if pointer.y > pos.y && pos.y > margin {
                        pos.y -= PUSH_STEP;
                    }
                }
            }

            *pos += particle.direction;
        }
    }

    /// Pairs closer than this (squared) get a line.
    pub fn link_threshold_sq(&self) -> f32 {
        (self.bounds.x / 7.0) * (self.bounds.y / 7.0)
    }

    /// Line opacity for a squared distance; the fade bottoms out at zero.
    pub fn link_alpha(distance_sq: f32) -> f32 {
        ((1.0 - distance_sq / LINK_FADE_SQ) * LINK_ALPHA).max(0.0)
    }

    /// Paints particles, then their links. Does not clear the surface.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        for particle in &self.particles {
            surface.fill_circle(particle.position, particle.size, particle.color);
        }

        let threshold = self.link_threshold_sq();
        let mut links = 0;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance_sq = a.position.distance_squared(b.position);
                if distance_sq >= threshold {
                    continue;
                }
                let alpha = Self::link_alpha(distance_sq);
                if alpha > 0.0 {
                    surface.stroke_line(
                        a.position,
                        b.position,
                        1.0,
                        Srgba {
                            alpha,
                            ..LINK_COLOR
                        },
                    );
                    links += 1;
                }
            }
        }
        links
    }

    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> usize {
        self.step();
        self.draw(surface)
    }
}
