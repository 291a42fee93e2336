//! Pointer, touch and window-resize input routed into the layers.

use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::network::Viewport;
use crate::scene::canvas::CanvasTarget;
use crate::scene::{NetworkLayer, ParticleLayer, SceneRng};

/// Only the latest cursor position of the frame matters.
pub fn pointer_input(
    mut cursor: EventReader<CursorMoved>,
    network: Option<ResMut<NetworkLayer>>,
    particles: Option<ResMut<ParticleLayer>>,
) {
    let Some(position) = cursor.read().last().map(|event| event.position) else {
        return;
    };
    if let Some(mut layer) = network {
        layer.scene.aim(position);
    }
    if let Some(mut layer) = particles {
        layer.field.set_pointer(Some(position));
    }
}

pub fn touch_input(
    mut touches: EventReader<TouchInput>,
    mut network: Option<ResMut<NetworkLayer>>,
    mut particles: Option<ResMut<ParticleLayer>>,
) {
    for touch in touches.read() {
        match touch.phase {
            TouchPhase::Started | TouchPhase::Moved => {
                if let Some(layer) = network.as_mut() {
                    layer.scene.aim(touch.position);
                }
                if let Some(layer) = particles.as_mut() {
                    layer.field.set_pointer(Some(touch.position));
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                if let Some(layer) = particles.as_mut() {
                    layer.field.set_pointer(None);
                }
            }
        }
    }
}

/// Applies the last primary-window resize of the frame. The node network
/// keeps its nodes; the particle field is reseeded.
#[allow(clippy::too_many_arguments)]
pub fn resize_canvas(
    mut resized: EventReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
    canvas: Option<ResMut<CanvasTarget>>,
    network: Option<ResMut<NetworkLayer>>,
    particles: Option<ResMut<ParticleLayer>>,
    mut rng: ResMut<SceneRng>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<&mut Sprite>,
) {
    let Ok(primary) = primary.get_single() else {
        resized.clear();
        return;
    };
    let Some(event) = resized.read().filter(|event| event.window == primary).last() else {
        return;
    };
    let viewport = Viewport::new(event.width, event.height);
    debug!(
        "constellation: resized to {}x{}",
        viewport.width(),
        viewport.height()
    );

    if let Some(mut canvas) = canvas {
        canvas.resize(&viewport, &mut images);
        if let Ok(mut sprite) = sprites.get_mut(canvas.sprite) {
            sprite.custom_size = Some(Vec2::new(viewport.width(), viewport.height()));
        }
    }
    if let Some(mut layer) = network {
        layer.scene.resize(viewport.width(), viewport.height());
    }
    if let Some(mut layer) = particles {
        layer
            .field
            .resize(viewport.width(), viewport.height(), &mut rng.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::network::NetworkScene;
    use crate::particles::ParticleField;
    use crate::render::Framebuffer;
    use crate::scene::canvas::canvas_image;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn touch(phase: TouchPhase, position: Vec2) -> TouchInput {
        TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id: 0,
        }
    }

    fn layered_app() -> App {
        let mut rng = StdRng::seed_from_u64(12);
        let viewport = Viewport::new(800.0, 600.0);
        let scene = NetworkScene::new(&NetworkConfig::default(), viewport, &mut rng);
        let field = ParticleField::new(800.0, 600.0, &mut rng);

        let mut app = App::new();
        app.add_event::<CursorMoved>()
            .add_event::<TouchInput>()
            .add_event::<WindowResized>()
            .insert_resource(SceneRng(rng))
            .insert_resource(Assets::<Image>::default())
            .insert_resource(NetworkLayer::new(scene, true))
            .insert_resource(ParticleLayer::new(field, true));
        app
    }

    #[test]
    fn touch_end_clears_the_particle_pointer() {
        let mut app = layered_app();
        app.add_systems(Update, touch_input);

        app.world_mut()
            .send_event(touch(TouchPhase::Started, Vec2::new(120.0, 80.0)));
        app.update();
        let pointer = app.world().resource::<ParticleLayer>().field.pointer();
        assert_eq!(pointer, Some(Vec2::new(120.0, 80.0)));
        let tilt = app.world().resource::<NetworkLayer>().scene.view().target_tilt;
        assert_ne!(tilt, Vec2::ZERO);

        app.world_mut()
            .send_event(touch(TouchPhase::Ended, Vec2::new(120.0, 80.0)));
        app.update();
        assert_eq!(app.world().resource::<ParticleLayer>().field.pointer(), None);
        let after = app.world().resource::<NetworkLayer>().scene.view().target_tilt;
        assert_eq!(after, tilt, "touch end leaves the camera aimed");
    }

    #[test]
    fn cursor_moves_aim_the_camera_and_set_the_pointer() {
        let mut app = layered_app();
        app.add_systems(Update, pointer_input);

        for x in [100.0, 400.0, 800.0] {
            app.world_mut().send_event(CursorMoved {
                window: Entity::PLACEHOLDER,
                position: Vec2::new(x, 300.0),
                delta: None,
            });
        }
        app.update();

        let world = app.world();
        assert_eq!(
            world.resource::<ParticleLayer>().field.pointer(),
            Some(Vec2::new(800.0, 300.0))
        );
        let tilt = world.resource::<NetworkLayer>().scene.view().target_tilt;
        assert_eq!(tilt, Vec2::new(crate::config::MAX_TILT.x, 0.0));
    }

    #[test]
    fn resize_updates_canvas_and_layers_but_not_nodes() {
        let mut app = layered_app();
        app.add_systems(Update, resize_canvas);
        let window = app.world_mut().spawn((Window::default(), PrimaryWindow)).id();
        let framebuffer = Framebuffer::new(800, 600, Srgba::new(0.0, 0.0, 0.0, 1.0));
        let image = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(canvas_image(&framebuffer));
        let sprite = app
            .world_mut()
            .spawn(Sprite {
                image: image.clone(),
                custom_size: Some(Vec2::new(800.0, 600.0)),
                ..default()
            })
            .id();
        app.insert_resource(CanvasTarget {
            image: image.clone(),
            sprite,
            framebuffer,
        });
        let before = {
            let scene = &app.world().resource::<NetworkLayer>().scene;
            let offsets: Vec<_> = scene.field().nodes().iter().map(|n| n.offset).collect();
            (offsets, *scene.view())
        };

        app.world_mut().send_event(WindowResized {
            window,
            width: 400.0,
            height: 300.0,
        });
        app.update();

        let world = app.world();
        let canvas = world.resource::<CanvasTarget>();
        assert_eq!((canvas.framebuffer.width(), canvas.framebuffer.height()), (400, 300));
        assert_eq!(
            world.resource::<Assets<Image>>().get(&image).map(|i| i.width()),
            Some(400)
        );
        assert_eq!(
            world.get::<Sprite>(sprite).and_then(|s| s.custom_size),
            Some(Vec2::new(400.0, 300.0))
        );

        let particles = &world.resource::<ParticleLayer>().field;
        assert_eq!(particles.bounds(), Vec2::new(400.0, 300.0));
        assert_eq!(
            particles.particles().len(),
            ParticleField::particle_count(400.0, 300.0)
        );

        let scene = &world.resource::<NetworkLayer>().scene;
        assert_eq!(scene.center(), Vec2::new(200.0, 150.0));
        let offsets: Vec<_> = scene.field().nodes().iter().map(|n| n.offset).collect();
        assert_eq!((offsets, *scene.view()), before);
    }

    #[test]
    fn resize_of_another_window_is_ignored() {
        let mut app = layered_app();
        app.add_systems(Update, resize_canvas);
        app.world_mut().spawn((Window::default(), PrimaryWindow));
        let other = app.world_mut().spawn(Window::default()).id();

        app.world_mut().send_event(WindowResized {
            window: other,
            width: 100.0,
            height: 100.0,
        });
        app.update();

        let scene = &app.world().resource::<NetworkLayer>().scene;
        assert_eq!(scene.center(), Vec2::new(400.0, 300.0));
    }
}
