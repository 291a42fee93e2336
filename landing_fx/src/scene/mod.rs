pub(crate) mod canvas;
pub(crate) mod controls;
pub(crate) mod frame;
mod input;
mod overlay;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::LandingConfig;
use crate::network::{FrameStats, NetworkScene};
use crate::particles::ParticleField;

pub use canvas::setup_canvas;
pub use controls::{control_keys, CardExport};
pub use frame::{animate_frame, frame_loop_running, FrameLoop};
pub use input::{pointer_input, resize_canvas, touch_input};
pub use overlay::{draw_link_overlay, LinkOverlay};

/// The node network plus its on/off switch and the last frame's stats.
#[derive(Resource)]
pub struct NetworkLayer {
    pub scene: NetworkScene,
    pub enabled: bool,
    pub stats: FrameStats,
}

impl NetworkLayer {
    pub fn new(scene: NetworkScene, enabled: bool) -> Self {
        let stats = scene.last_frame();
        Self {
            scene,
            enabled,
            stats,
        }
    }
}

#[derive(Resource)]
pub struct ParticleLayer {
    pub field: ParticleField,
    pub enabled: bool,
    pub links: usize,
}

impl ParticleLayer {
    pub fn new(field: ParticleField, enabled: bool) -> Self {
        Self {
            field,
            enabled,
            links: 0,
        }
    }
}

/// Shared random source for seeding and reseeding the layers.
#[derive(Resource)]
pub struct SceneRng(pub StdRng);

impl SceneRng {
    /// Seeded when a seed is given, from OS entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        Self(match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        })
    }
}

#[derive(Resource, Clone, Debug)]
pub struct SceneSettings {
    pub config: LandingConfig,
    pub background: Srgba,
}

/// Startup canvas creation, then resize, the other input and controls, and
/// the frame tick, in that order every frame. Resize goes first so pointer
/// input is normalized against the current viewport.
pub fn scene_plugin(app: &mut App) {
    app.init_resource::<FrameLoop>()
        .add_systems(Startup, setup_canvas)
        .add_systems(
            Update,
            (
                resize_canvas,
                (pointer_input, touch_input, control_keys),
                animate_frame.run_if(frame_loop_running),
            )
                .chain(),
        );
}

pub fn overlay_plugin(app: &mut App) {
    app.init_resource::<LinkOverlay>()
        .add_systems(Update, draw_link_overlay.after(animate_frame));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layers;
    use crate::network::{ViewState, Viewport};
    use bevy::input::touch::TouchInput;
    use bevy::window::{PrimaryWindow, WindowResized};

    fn scene_app() -> App {
        let mut app = App::new();
        app.add_event::<CursorMoved>()
            .add_event::<TouchInput>()
            .add_event::<WindowResized>()
            .init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(Assets::<Image>::default())
            .insert_resource(SceneRng::new(Some(7)))
            .insert_resource(SceneSettings {
                config: LandingConfig {
                    layers: Layers::Both,
                    ..LandingConfig::default()
                },
                background: Srgba::new(0.0, 0.0, 0.0, 1.0),
            })
            .add_plugins(scene_plugin);
        app
    }

    #[test]
    fn without_a_window_every_system_stays_idle() {
        let mut app = scene_app();
        app.world_mut().send_event(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(10.0, 10.0),
            delta: None,
        });

        app.update();
        app.update();

        let world = app.world();
        assert!(world.get_resource::<canvas::CanvasTarget>().is_none());
        assert!(world.get_resource::<NetworkLayer>().is_none());
        assert!(world.get_resource::<ParticleLayer>().is_none());
        assert_eq!(world.resource::<FrameLoop>().frames(), 0);
    }

    #[test]
    fn startup_builds_the_canvas_and_renders_a_frame() {
        let mut app = scene_app();
        app.world_mut().spawn((Window::default(), PrimaryWindow));

        app.update();

        let world = app.world();
        let canvas = world.resource::<canvas::CanvasTarget>();
        assert_eq!(canvas.framebuffer.width(), 1280);
        assert_eq!(canvas.framebuffer.height(), 720);
        let image = world.resource::<Assets<Image>>().get(&canvas.image);
        assert_eq!(image.map(|i| i.data.as_slice()), Some(canvas.framebuffer.bytes()));
        assert_eq!(world.resource::<NetworkLayer>().stats.frame, 1);
        assert_eq!(world.resource::<FrameLoop>().frames(), 1);
    }

    #[test]
    fn resize_lands_before_the_pointer_is_aimed() {
        let mut app = scene_app();
        let window = app.world_mut().spawn((Window::default(), PrimaryWindow)).id();
        app.update();

        app.world_mut().send_event(WindowResized {
            window,
            width: 640.0,
            height: 480.0,
        });
        app.world_mut().send_event(CursorMoved {
            window,
            position: Vec2::new(640.0, 480.0),
            delta: None,
        });
        app.update();

        let mut expected = ViewState::default();
        expected.aim_at(Vec2::new(640.0, 480.0), &Viewport::new(640.0, 480.0));
        let scene = &app.world().resource::<NetworkLayer>().scene;
        assert_eq!(scene.center(), Vec2::new(320.0, 240.0));
        assert_eq!(scene.view().target_tilt, expected.target_tilt);
    }
}
