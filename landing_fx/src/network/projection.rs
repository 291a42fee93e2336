//! Projection engine: rotating/tilting camera and the perspective divide.

use bevy::prelude::*;

use crate::config::{AUTO_ROTATE_STEP, DEPTH_OFFSET, FOV, MAX_TILT, TILT_EASE};

/// Smallest denominator allowed in the perspective divide.
const MIN_DEPTH_DENOM: f32 = 1e-3;

/// Perspective parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lens {
    pub fov: f32,
    pub depth_offset: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov: FOV,
            depth_offset: DEPTH_OFFSET,
        }
    }
}

impl Lens {
    /// `d = fov / (fov + z + depth_offset)`. Larger means closer.
    pub fn depth_factor(&self, world_z: f32) -> f32 {
        self.fov / (self.fov + world_z + self.depth_offset).max(MIN_DEPTH_DENOM)
    }
}

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Zero, negative or non-finite dimensions are clamped to one pixel.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(1.0)
    } else {
        1.0
    }
}

/// Camera state: auto-rotation plus pointer-driven tilt.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewState {
    pub rotation: f32,
    /// Current (yaw, pitch) tilt.
    pub tilt: Vec2,
    pub target_tilt: Vec2,
}

impl ViewState {
    /// One frame of auto-rotation and first-order tilt smoothing.
    pub fn advance(&mut self) {
        self.rotation += AUTO_ROTATE_STEP;
        self.tilt += (self.target_tilt - self.tilt) * TILT_EASE;
    }

    /// Maps a pointer position in viewport pixels to the target tilt.
    pub fn aim_at(&mut self, pointer: Vec2, viewport: &Viewport) {
        let normalized = Vec2::new(
            pointer.x / viewport.width() - 0.5,
            pointer.y / viewport.height() - 0.5,
        ) * 2.0;
        if normalized.is_finite() {
            self.target_tilt = normalized * MAX_TILT;
        }
    }
}

/// A node after projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub screen: Vec2,
    /// Depth factor `d`.
    pub depth: f32,
}

/// Yaw by `rotation + tilt.x`, then pitch by `tilt.y`.
pub fn rotate(offset: Vec3, view: &ViewState) -> Vec3 {
    let (sin_yaw, cos_yaw) = (view.rotation + view.tilt.x).sin_cos();
    let x = offset.x * cos_yaw - offset.z * sin_yaw;
    let z = offset.x * sin_yaw + offset.z * cos_yaw;

    let (sin_pitch, cos_pitch) = view.tilt.y.sin_cos();
    let y = offset.y * cos_pitch - z * sin_pitch;
    let z = offset.y * sin_pitch + z * cos_pitch;

    Vec3::new(x, y, z)
}

pub fn project(offset: Vec3, view: &ViewState, lens: &Lens, center: Vec2) -> Projection {
    let world = rotate(offset, view);
    let depth = lens.depth_factor(world.z);
    Projection {
        screen: world.truncate() * depth + center,
        depth,
    }
}
