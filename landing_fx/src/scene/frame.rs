//! Frame loop handle and the per-frame system that drives every layer.

use bevy::prelude::*;

use crate::scene::canvas::CanvasTarget;
use crate::scene::{NetworkLayer, ParticleLayer};

/// Host-side scheduling handle for the animation. The `Update` schedule only
/// ticks the layers while this reports running.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct FrameLoop {
    running: bool,
    frames: u64,
    frame_limit: Option<u64>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FrameLoop {
    pub fn new(frame_limit: Option<u64>) -> Self {
        Self {
            running: frame_limit != Some(0),
            frames: 0,
            frame_limit,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Restarts the loop unless the frame limit has been reached.
    pub fn resume(&mut self) -> bool {
        self.running = !self.limit_reached();
        self.running
    }

    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
            false
        } else {
            self.resume()
        }
    }

    /// Counts a rendered frame and stops at the limit.
    pub fn record_frame(&mut self) {
        self.frames += 1;
        if self.limit_reached() {
            self.running = false;
        }
    }

    fn limit_reached(&self) -> bool {
        self.frame_limit.is_some_and(|limit| self.frames >= limit)
    }
}

pub fn frame_loop_running(frame_loop: Res<FrameLoop>) -> bool {
    frame_loop.is_running()
}

/// Ticks each enabled layer into the framebuffer and uploads it.
///
/// No-op when the canvas was never created.
pub fn animate_frame(
    mut frame_loop: ResMut<FrameLoop>,
    canvas: Option<ResMut<CanvasTarget>>,
    network: Option<ResMut<NetworkLayer>>,
    particles: Option<ResMut<ParticleLayer>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(mut canvas) = canvas else {
        return;
    };
    let canvas = &mut *canvas;

    match network {
        Some(mut layer) if layer.enabled => {
            let layer = &mut *layer;
            layer.stats = layer.scene.tick(&mut canvas.framebuffer);
        }
        _ => crate::render::Surface::clear(&mut canvas.framebuffer),
    }
    if let Some(mut layer) = particles {
        if layer.enabled {
            let layer = &mut *layer;
            layer.links = layer.field.tick(&mut canvas.framebuffer);
        }
    }
    canvas.upload(&mut images);

    frame_loop.record_frame();
    if !frame_loop.is_running() {
        info!("constellation: frame limit reached after {} frames", frame_loop.frames());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_loop_runs_until_stopped() {
        let mut frame_loop = FrameLoop::default();
        for _ in 0..1_000 {
            frame_loop.record_frame();
        }
        assert!(frame_loop.is_running());

        frame_loop.stop();
        assert!(!frame_loop.is_running());
        assert!(frame_loop.resume());
        assert_eq!(frame_loop.frames(), 1_000);
    }

    #[test]
    fn frame_limit_stops_the_loop() {
        let mut frame_loop = FrameLoop::new(Some(3));
        frame_loop.record_frame();
        frame_loop.record_frame();
        assert!(frame_loop.is_running());

        frame_loop.record_frame();
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.resume(), "cannot resume past the limit");
        assert!(!frame_loop.toggle());
    }

    #[test]
    fn zero_limit_never_starts() {
        assert!(!FrameLoop::new(Some(0)).is_running());
    }

    #[test]
    fn toggle_flips_running_state() {
        let mut frame_loop = FrameLoop::default();
        assert!(!frame_loop.toggle());
        assert!(frame_loop.toggle());
    }
}
