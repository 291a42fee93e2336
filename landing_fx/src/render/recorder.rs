use bevy::prelude::*;

use super::Surface;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Srgba,
    },
    Glow {
        center: Vec2,
        radius: f32,
        color: Srgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Srgba,
    },
}

/// A surface that records calls instead of rasterizing them. `clear` drops
/// whatever was recorded before, so the list always holds a single frame.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Line { .. }))
    }

    /// Centers of the solid node cores, in draw order.
    pub fn circle_centers(&self) -> Vec<Vec2> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Srgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Srgba) {
        self.commands.push(DrawCommand::Glow {
            center,
            radius,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Srgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
