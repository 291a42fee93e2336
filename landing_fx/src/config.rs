//! Env parsing, defaults, and tuning constants.

use std::path::PathBuf;
use std::str::FromStr;

use bevy::prelude::*;
use thiserror::Error;

/// Half-extent of the node box on the horizontal and depth axes.
pub const SPREAD: f32 = 260.0;
/// The vertical half-extent is `SPREAD * VERTICAL_SQUASH`.
pub const VERTICAL_SQUASH: f32 = 0.65;
/// Focal length of the perspective divide.
pub const FOV: f32 = 600.0;
/// Pushes the whole field away from the eye so `d` stays below 1 at rest.
pub const DEPTH_OFFSET: f32 = 320.0;
/// Per-axis velocity range is `[-MAX_SPEED, MAX_SPEED]`.
pub const MAX_SPEED: f32 = 0.35;
pub const HUB_COUNT: usize = 6;
pub const PHASE_STEP: f32 = 0.03;
pub const AUTO_ROTATE_STEP: f32 = 0.0018;
/// Fraction of the remaining tilt distance covered each frame.
pub const TILT_EASE: f32 = 0.035;
/// Tilt (yaw, pitch) in radians when the pointer sits on a viewport edge.
pub const MAX_TILT: Vec2 = Vec2::new(0.5, 0.35);
pub const LINK_ALPHA: f32 = 0.25;
pub const LINK_WIDTH: f32 = 0.8;
/// Glow halo radius as a multiple of the depth-scaled node radius.
pub const GLOW_SCALE: f32 = 5.5;
/// Hub radius swings by this fraction of its size.
pub const HUB_PULSE: f32 = 0.28;

const DEFAULT_NODE_COUNT: usize = 72;
const DEFAULT_LINK_DIST: f32 = 150.0;
const DEFAULT_GRID_THRESHOLD: usize = 128;
const DEFAULT_EXPORT_DIR: &str = ".";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} is not a valid {expected}: {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{key} must be {constraint}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: String,
        constraint: &'static str,
    },
}

#[derive(Debug, Error)]
#[error("unknown layer selection {0:?} (expected network, particles or both)")]
pub struct UnknownLayers(String);

/// Which layers are drawn into the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layers {
    #[default]
    Network,
    Particles,
    Both,
}

impl Layers {
    pub fn network(self) -> bool {
        matches!(self, Layers::Network | Layers::Both)
    }

    pub fn particles(self) -> bool {
        matches!(self, Layers::Particles | Layers::Both)
    }
}

impl FromStr for Layers {
    type Err = UnknownLayers;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "network" => Ok(Layers::Network),
            "particles" => Ok(Layers::Particles),
            "both" => Ok(Layers::Both),
            other => Err(UnknownLayers(other.to_string())),
        }
    }
}

/// Settings for the node network.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub seed: Option<u64>,
    pub node_count: usize,
    pub link_dist: f32,
    /// Above this node count links are found through the spatial grid.
    pub grid_threshold: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            seed: None,
            node_count: DEFAULT_NODE_COUNT,
            link_dist: DEFAULT_LINK_DIST,
            grid_threshold: DEFAULT_GRID_THRESHOLD,
        }
    }
}

/// Everything the app reads from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct LandingConfig {
    pub network: NetworkConfig,
    pub layers: Layers,
    pub max_frames: Option<u64>,
    pub contact_card: Option<PathBuf>,
    pub export_dir: PathBuf,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            layers: Layers::default(),
            max_frames: None,
            contact_card: None,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

/// Reads the node network settings. Rejected values fall back to their
/// defaults and are returned alongside, so they can be reported once logging
/// is up.
pub fn network_config() -> (NetworkConfig, Vec<ConfigError>) {
    let mut issues = Vec::new();
    let config = read_network_config(&mut issues);
    (config, issues)
}

/// Reads the full app configuration, with every rejected value.
pub fn landing_config() -> (LandingConfig, Vec<ConfigError>) {
    let mut issues = Vec::new();
    let defaults = LandingConfig::default();
    let config = LandingConfig {
        network: read_network_config(&mut issues),
        layers: or_default(
            read_env::<Layers>("FX_LAYERS", "layer selection"),
            defaults.layers,
            &mut issues,
        ),
        max_frames: or_default(
            read_env::<u64>("FX_MAX_FRAMES", "frame count").map(Some),
            None,
            &mut issues,
        ),
        contact_card: std::env::var("FX_CONTACT_CARD").ok().map(PathBuf::from),
        export_dir: std::env::var("FX_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir),
    };
    (config, issues)
}

fn read_network_config(issues: &mut Vec<ConfigError>) -> NetworkConfig {
    let defaults = NetworkConfig::default();
    NetworkConfig {
        seed: or_default(read_env::<u64>("FX_SEED", "u64").map(Some), None, issues),
        node_count: or_default(
            read_env::<usize>("FX_NODE_COUNT", "node count"),
            defaults.node_count,
            issues,
        ),
        link_dist: or_default(
            read_env::<f32>("FX_LINK_DIST", "distance").and_then(positive_link_dist),
            defaults.link_dist,
            issues,
        ),
        grid_threshold: or_default(
            read_env::<usize>("FX_GRID_THRESHOLD", "node count"),
            defaults.grid_threshold,
            issues,
        ),
    }
}

fn read_env<T: FromStr>(key: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key,
                value: raw,
                expected,
            }),
        Err(_) => Ok(None),
    }
}

fn positive_link_dist(value: Option<f32>) -> Result<Option<f32>, ConfigError> {
    match value {
        Some(dist) if !(dist.is_finite() && dist > 0.0) => Err(ConfigError::OutOfRange {
            key: "FX_LINK_DIST",
            value: dist.to_string(),
            constraint: "a positive finite distance",
        }),
        other => Ok(other),
    }
}

fn or_default<T>(
    result: Result<Option<T>, ConfigError>,
    default: T,
    issues: &mut Vec<ConfigError>,
) -> T {
    match result {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(err) => {
            issues.push(err);
            default
        }
    }
}
