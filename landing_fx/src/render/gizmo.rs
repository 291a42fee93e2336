use bevy::math::Isometry2d;
use bevy::prelude::*;

use super::Surface;

/// Immediate-mode outline surface over Bevy gizmos. Gizmos cannot fill, so
/// glows are skipped and circles are stroked.
pub struct GizmoSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    size: Vec2,
}

impl<'a, 'w, 's> GizmoSurface<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>, size: Vec2) -> Self {
        Self { gizmos, size }
    }
}

/// Viewport pixels (top-left origin, y down) to 2D world space under a
/// `Camera2d` centered on the canvas.
pub fn to_world(point: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(point.x - size.x * 0.5, size.y * 0.5 - point.y)
}

impl Surface for GizmoSurface<'_, '_, '_> {
    fn size(&self) -> Vec2 {
        self.size
    }

    // Gizmos are cleared by Bevy every frame.
    fn clear(&mut self) {}

    fn stroke_line(&mut self, from: Vec2, to: Vec2, _width: f32, color: Srgba) {
        self.gizmos
            .line_2d(to_world(from, self.size), to_world(to, self.size), color);
    }

    fn fill_glow(&mut self, _center: Vec2, _radius: f32, _color: Srgba) {}

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgba) {
        self.gizmos.circle_2d(
            Isometry2d::from_translation(to_world(center, self.size)),
            radius,
            color,
        );
    }
}
