//! HUD overlay: layer stats, loop state, FPS counter, key help.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::network::PairSearch;
use crate::scene::{FrameLoop, NetworkLayer, ParticleLayer};

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(EguiPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .add_systems(Update, hud_overlay_system);
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    frame_loop: Res<FrameLoop>,
    network: Option<Res<NetworkLayer>>,
    particles: Option<Res<ParticleLayer>>,
    diagnostics: Res<DiagnosticsStore>,
) {
    // No primary window means no egui context.
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    draw_hud(ctx, &frame_loop, network.as_deref(), particles.as_deref(), fps);
}

fn draw_hud(
    ctx: &egui::Context,
    frame_loop: &FrameLoop,
    network: Option<&NetworkLayer>,
    particles: Option<&ParticleLayer>,
    fps: f64,
) {
    egui::Window::new("Constellation")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(8, 14, 24, 200))
                .inner_margin(egui::Margin::same(12))
                .corner_radius(egui::CornerRadius::same(6)),
        )
        .show(ctx, |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(200, 220, 240));

            ui.label(
                egui::RichText::new(format!("Frame {}", frame_loop.frames()))
                    .size(16.0)
                    .color(egui::Color32::from_rgb(0, 201, 255)),
            );
            ui.label(if frame_loop.is_running() {
                "Running"
            } else {
                "Paused"
            });
            ui.add_space(4.0);

            match network {
                Some(layer) => {
                    ui.label(format!("Network    {}", layer_state(layer.enabled)));
                    ui.label(format!("  nodes    {}", layer.stats.nodes));
                    ui.label(format!("  links    {}", layer.stats.links));
                    ui.label(format!("  search   {}", search_label(layer.stats.search)));
                }
                None => {
                    ui.label("Network    -");
                }
            }
            match particles {
                Some(layer) => {
                    ui.label(format!("Particles  {}", layer_state(layer.enabled)));
                    ui.label(format!("  count    {}", layer.field.particles().len()));
                    ui.label(format!("  links    {}", layer.links));
                }
                None => {
                    ui.label("Particles  -");
                }
            }

            ui.separator();
            ui.label(format!("FPS  {fps:.0}"));
            ui.label(
                egui::RichText::new("P pause  N network  F particles  G links  C card")
                    .size(11.0)
                    .color(egui::Color32::from_rgb(146, 254, 157)),
            );
        });
}

fn layer_state(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn search_label(search: PairSearch) -> &'static str {
    match search {
        PairSearch::BruteForce => "all pairs",
        PairSearch::Grid => "grid",
    }
}
