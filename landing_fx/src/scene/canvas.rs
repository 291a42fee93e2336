//! Full-window canvas: a software framebuffer shown through a sprite.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;

use crate::network::{NetworkScene, Viewport};
use crate::particles::ParticleField;
use crate::render::Framebuffer;
use crate::scene::{NetworkLayer, ParticleLayer, SceneRng, SceneSettings};

/// The drawing surface and the GPU image it is copied into each frame.
#[derive(Resource)]
pub struct CanvasTarget {
    pub image: Handle<Image>,
    pub sprite: Entity,
    pub framebuffer: Framebuffer,
}

impl CanvasTarget {
    /// Copies the framebuffer into the image asset.
    pub fn upload(&self, images: &mut Assets<Image>) {
        let Some(image) = images.get_mut(&self.image) else {
            return;
        };
        let bytes = self.framebuffer.bytes();
        if image.data.len() == bytes.len() {
            image.data.copy_from_slice(bytes);
        } else {
            *image = canvas_image(&self.framebuffer);
        }
    }

    pub fn resize(&mut self, viewport: &Viewport, images: &mut Assets<Image>) {
        let (width, height) = pixel_size(viewport);
        self.framebuffer.resize(width, height);
        if let Some(image) = images.get_mut(&self.image) {
            *image = canvas_image(&self.framebuffer);
        }
    }
}

pub fn canvas_image(framebuffer: &Framebuffer) -> Image {
    Image::new(
        Extent3d {
            width: framebuffer.width(),
            height: framebuffer.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        framebuffer.bytes().to_vec(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

fn pixel_size(viewport: &Viewport) -> (u32, u32) {
    (
        viewport.width().round() as u32,
        viewport.height().round() as u32,
    )
}

/// Spawns the camera and canvas and seeds both layers from the window size.
/// Without a primary window the layers are never created and every frame
/// system stays idle.
pub fn setup_canvas(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut images: ResMut<Assets<Image>>,
    mut rng: ResMut<SceneRng>,
    settings: Res<SceneSettings>,
) {
    let Ok(window) = windows.get_single() else {
        warn!("constellation: no primary window, animation disabled");
        return;
    };
    commands.spawn(Camera2d);
    let viewport = Viewport::new(window.width(), window.height());
    let config = &settings.config;

    let scene = NetworkScene::new(&config.network, viewport, &mut rng.0);
    info!(
        "constellation: {} nodes, link distance {}, {:?} pair search",
        scene.field().len(),
        config.network.link_dist,
        scene.last_frame().search
    );
    let field = ParticleField::new(viewport.width(), viewport.height(), &mut rng.0);
    debug!("constellation: {} particles", field.particles().len());

    let (width, height) = pixel_size(&viewport);
    let framebuffer = Framebuffer::new(width, height, settings.background);
    let image = images.add(canvas_image(&framebuffer));
    let sprite = commands
        .spawn(Sprite {
            image: image.clone(),
            custom_size: Some(Vec2::new(viewport.width(), viewport.height())),
            ..default()
        })
        .id();

    commands.insert_resource(CanvasTarget {
        image,
        sprite,
        framebuffer,
    });
    commands.insert_resource(NetworkLayer::new(scene, config.layers.network()));
    commands.insert_resource(ParticleLayer::new(field, config.layers.particles()));
}
