//! Keyboard controls: P pauses, N and F toggle layers, G toggles the link
//! overlay, C exports the card.

use std::path::PathBuf;

use bevy::prelude::*;

use crate::contact::ContactCard;
use crate::scene::frame::FrameLoop;
use crate::scene::overlay::LinkOverlay;
use crate::scene::{NetworkLayer, ParticleLayer};

/// The card written by the export key and where it goes.
#[derive(Resource, Clone, Debug)]
pub struct CardExport {
    pub card: ContactCard,
    pub dir: PathBuf,
}

pub fn control_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut frame_loop: ResMut<FrameLoop>,
    network: Option<ResMut<NetworkLayer>>,
    particles: Option<ResMut<ParticleLayer>>,
    overlay: Option<ResMut<LinkOverlay>>,
    card: Option<Res<CardExport>>,
) {
    if keys.just_pressed(KeyCode::KeyP) {
        if frame_loop.toggle() {
            info!("constellation: resumed at frame {}", frame_loop.frames());
        } else {
            info!("constellation: paused at frame {}", frame_loop.frames());
        }
    }

    if keys.just_pressed(KeyCode::KeyN) {
        if let Some(mut layer) = network {
            layer.enabled = !layer.enabled;
            info!("constellation: network layer {}", on_off(layer.enabled));
        }
    }

    if keys.just_pressed(KeyCode::KeyF) {
        if let Some(mut layer) = particles {
            layer.enabled = !layer.enabled;
            info!("constellation: particle layer {}", on_off(layer.enabled));
        }
    }

    if keys.just_pressed(KeyCode::KeyG) {
        if let Some(mut overlay) = overlay {
            overlay.enabled = !overlay.enabled;
            info!("constellation: link overlay {}", on_off(overlay.enabled));
        }
    }

    if keys.just_pressed(KeyCode::KeyC) {
        match card {
            Some(export) => match export.card.export(&export.dir) {
                Ok(path) => info!("constellation: contact card written to {}", path.display()),
                Err(err) => error!("constellation: {err}"),
            },
            None => warn!("constellation: no contact card configured"),
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
