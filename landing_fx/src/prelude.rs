//! Minimal prelude for SDK consumers.

pub use crate::config::{landing_config, network_config, LandingConfig, Layers, NetworkConfig};
pub use crate::contact::ContactCard;
pub use crate::network::{NetworkScene, Viewport};
pub use crate::render::{DrawList, Framebuffer, Surface};
pub use crate::sdk::LandingFxBuilder;
