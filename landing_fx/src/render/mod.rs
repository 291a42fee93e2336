//! Drawing surfaces the animation paints into.

mod framebuffer;
mod gizmo;
mod recorder;

use bevy::prelude::*;

pub use framebuffer::Framebuffer;
pub use gizmo::{to_world, GizmoSurface};
pub use recorder::{DrawCommand, DrawList};

/// Immediate-mode 2D drawing target, in viewport pixels with a top-left
/// origin and y pointing down. Later calls paint over earlier ones.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Srgba);
    /// Radial gradient from `color` at `center` to transparent at `radius`.
    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Srgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgba);
}
