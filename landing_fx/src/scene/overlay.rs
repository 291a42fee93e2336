//! Gizmo overlay that re-strokes the network's links and node outlines on top
//! of the canvas. Toggled with G.

use bevy::prelude::*;

use crate::render::GizmoSurface;
use crate::scene::NetworkLayer;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkOverlay {
    pub enabled: bool,
}

pub fn draw_link_overlay(
    overlay: Res<LinkOverlay>,
    network: Option<Res<NetworkLayer>>,
    mut gizmos: Gizmos,
) {
    if !overlay.enabled {
        return;
    }
    let Some(layer) = network else {
        return;
    };
    if !layer.enabled {
        return;
    }
    let viewport = layer.scene.viewport();
    let size = Vec2::new(viewport.width(), viewport.height());
    layer.scene.paint(&mut GizmoSurface::new(&mut gizmos, size));
}
