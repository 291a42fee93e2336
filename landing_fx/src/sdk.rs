//! SDK entry points and builder for composing the animation app.

use bevy::prelude::*;

use crate::config::{self, ConfigError, LandingConfig};
use crate::contact::ContactCard;
use crate::scene::{
    overlay_plugin, scene_plugin, CardExport, FrameLoop, SceneRng, SceneSettings,
};
use crate::ui::hud_plugin;

/// Builder for constructing the landing animation app.
pub struct LandingFxBuilder {
    config: Option<LandingConfig>,
    card: Option<ContactCard>,
    warnings: Vec<String>,
    window_title: String,
    window_resolution: (f32, f32),
    background: Srgba,
    enable_hud: bool,
    enable_link_overlay: bool,
    enable_card_export: bool,
}

impl Default for LandingFxBuilder {
    fn default() -> Self {
        Self {
            config: None,
            card: None,
            warnings: Vec::new(),
            window_title: "Constellation".to_string(),
            window_resolution: (1280.0, 720.0),
            background: Srgba::rgb(0.02, 0.04, 0.08),
            enable_hud: true,
            enable_link_overlay: true,
            enable_card_export: true,
        }
    }
}

impl LandingFxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit configuration instead of reading the environment.
    pub fn config(mut self, config: LandingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the configuration from environment variables. Rejected values
    /// are logged once the app starts.
    pub fn env_config(mut self) -> Self {
        let (config, issues) = config::landing_config();
        self.warnings.extend(issue_warnings(issues));
        self.config = Some(config);
        self
    }

    /// Card written by the export key. Overrides `FX_CONTACT_CARD`.
    pub fn contact_card(mut self, card: ContactCard) -> Self {
        self.card = Some(card);
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    /// Canvas fill painted at the start of every frame.
    pub fn background(mut self, color: Srgba) -> Self {
        self.background = color;
        self
    }

    pub fn disable_hud(mut self) -> Self {
        self.enable_hud = false;
        self
    }

    pub fn disable_link_overlay(mut self) -> Self {
        self.enable_link_overlay = false;
        self
    }

    pub fn disable_card_export(mut self) -> Self {
        self.enable_card_export = false;
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    pub fn build(self) -> App {
        let mut warnings = self.warnings;
        let config = self.config.unwrap_or_else(|| {
            let (config, issues) = config::landing_config();
            warnings.extend(issue_warnings(issues));
            config
        });
        let card = self
            .card
            .unwrap_or_else(|| load_card(&config, &mut warnings));

        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(self.background.into()))
        .insert_resource(SceneRng::new(config.network.seed))
        .insert_resource(FrameLoop::new(config.max_frames))
        .insert_resource(StartupWarnings(warnings))
        .add_systems(Startup, log_startup_warnings);

        if self.enable_card_export {
            app.insert_resource(CardExport {
                card,
                dir: config.export_dir.clone(),
            });
        }
        app.insert_resource(SceneSettings {
            config,
            background: self.background,
        })
        .add_plugins(scene_plugin);

        if self.enable_link_overlay {
            app.add_plugins(overlay_plugin);
        }
        if self.enable_hud {
            app.add_plugins(hud_plugin);
        }

        app
    }
}

/// Problems found while the app was being assembled. The global log
/// subscriber only exists once `DefaultPlugins` is added, so these are held
/// until `Startup`.
#[derive(Resource, Debug, Default)]
pub struct StartupWarnings(pub Vec<String>);

fn log_startup_warnings(mut warnings: ResMut<StartupWarnings>) {
    for warning in warnings.0.drain(..) {
        warn!("constellation: {warning}");
    }
}

fn issue_warnings(issues: Vec<ConfigError>) -> impl Iterator<Item = String> {
    issues
        .into_iter()
        .map(|issue| format!("{issue}; using the default"))
}

/// Card from `FX_CONTACT_CARD`, falling back to the built-in one when the
/// file is missing or malformed.
fn load_card(config: &LandingConfig, warnings: &mut Vec<String>) -> ContactCard {
    let Some(path) = &config.contact_card else {
        return ContactCard::default();
    };
    ContactCard::load(path).unwrap_or_else(|err| {
        warnings.push(format!("{err}, using built-in card"));
        ContactCard::default()
    })
}
