//! Pseudo-3D node network: field physics, projection, links, and the
//! per-frame driver that ties them together.

mod driver;
pub mod field;
pub mod links;
pub mod projection;

pub use driver::{FrameStats, NetworkScene};
pub use field::{Node, NodeField};
pub use links::{link_alpha, Link, PairSearch, Palette, SpatialGrid};
pub use projection::{project, Lens, Projection, ViewState, Viewport};
