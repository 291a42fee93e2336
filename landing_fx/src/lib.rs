//! Landing effects — a pseudo-3D node network and a flat particle field
//! rendered into a full-window canvas.
//!
//! Library root: simulation, drawing surfaces, SDK builder, and config modules.

pub mod config;
pub mod contact;
pub mod network;
pub mod particles;
pub mod render;
mod scene;
mod ui;

pub mod prelude;
pub mod sdk;

pub use network::{FrameStats, NetworkScene, NodeField};
pub use particles::ParticleField;
pub use render::{DrawList, Framebuffer, Surface};
pub use scene::FrameLoop;
