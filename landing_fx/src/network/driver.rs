//! Animation driver: owns the field, camera and per-frame caches.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{NetworkConfig, GLOW_SCALE, HUB_PULSE, LINK_WIDTH};
use crate::network::field::NodeField;
use crate::network::links::{collect_links, link_alpha, Link, PairSearch, Palette, SpatialGrid};
use crate::network::projection::{project, Lens, Projection, ViewState, Viewport};
use crate::render::Surface;

const HUB_GLOW_ALPHA: f32 = 0.35;
const NODE_GLOW_ALPHA: f32 = 0.18;
const CORE_BASE_ALPHA: f32 = 0.55;

/// Summary of the last rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub nodes: usize,
    pub links: usize,
    pub search: PairSearch,
}

/// The whole node-network state. Pointer and resize input land here and are
/// picked up by the next [`NetworkScene::tick`].
#[derive(Debug)]
pub struct NetworkScene {
    field: NodeField,
    view: ViewState,
    viewport: Viewport,
    lens: Lens,
    palette: Palette,
    link_dist: f32,
    search: PairSearch,
    grid: SpatialGrid,
    projections: Vec<Projection>,
    links: Vec<Link>,
    draw_order: Vec<usize>,
    last: FrameStats,
}

impl NetworkScene {
    pub fn new(config: &NetworkConfig, viewport: Viewport, rng: &mut impl Rng) -> Self {
        Self::from_field(NodeField::new(config.node_count, rng), config, viewport)
    }

    pub fn from_field(field: NodeField, config: &NetworkConfig, viewport: Viewport) -> Self {
        let search = PairSearch::for_node_count(field.len(), config.grid_threshold);
        let count = field.len();
        Self {
            field,
            view: ViewState::default(),
            viewport,
            lens: Lens::default(),
            palette: Palette::default(),
            link_dist: config.link_dist,
            search,
            grid: SpatialGrid::new(config.link_dist),
            projections: Vec::with_capacity(count),
            links: Vec::new(),
            draw_order: Vec::with_capacity(count),
            last: FrameStats {
                nodes: count,
                search,
                ..default()
            },
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_search(mut self, search: PairSearch) -> Self {
        self.search = search;
        self
    }

    pub fn field(&self) -> &NodeField {
        &self.field
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn center(&self) -> Vec2 {
        self.viewport.center()
    }

    /// Projections computed by the last tick, indexed like the nodes.
    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Node indices in the order the last tick drew them.
    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    pub fn last_frame(&self) -> FrameStats {
        self.last
    }

    /// Points the camera's target tilt at a pointer position.
    pub fn aim(&mut self, pointer: Vec2) {
        self.view.aim_at(pointer, &self.viewport);
    }

    /// New surface dimensions. Nodes and camera are left alone.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Advances one frame and paints it onto `surface`.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        surface.clear();
        self.view.advance();
        self.field.step();

        let center = self.viewport.center();
        self.projections.clear();
        self.projections.extend(
            self.field
                .nodes()
                .iter()
                .map(|node| project(node.offset, &self.view, &self.lens, center)),
        );

        collect_links(
            &self.projections,
            self.field.nodes(),
            self.link_dist,
            &self.palette,
            self.search,
            &mut self.grid,
            &mut self.links,
        );

        // Painter's algorithm: far (small d) first. Stable, so ties keep
        // index order.
        let projections = &self.projections;
        self.draw_order.clear();
        self.draw_order.extend(0..projections.len());
        self.draw_order
            .sort_by(|&a, &b| projections[a].depth.total_cmp(&projections[b].depth));
        let links = self.paint(surface);

        self.last = FrameStats {
            frame: self.last.frame + 1,
            nodes: self.field.len(),
            links,
            search: self.search,
        };
        self.last
    }

    /// Redraws the last ticked frame, links first, without advancing it.
    /// Returns the number of links drawn.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let links = self.draw_links(surface);
        self.draw_nodes(surface);
        links
    }

    fn draw_links<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let mut drawn = 0;
        for link in &self.links {
            let (a, b) = (self.projections[link.a], self.projections[link.b]);
            let alpha = link_alpha(link.distance, self.link_dist, a.depth, b.depth);
            if alpha > 0.0 {
                surface.stroke_line(a.screen, b.screen, LINK_WIDTH, Srgba { alpha, ..link.color });
                drawn += 1;
            }
        }
        drawn
    }

    fn draw_nodes<S: Surface + ?Sized>(&self, surface: &mut S) {
        let nodes = self.field.nodes();
        for &index in &self.draw_order {
            let node = &nodes[index];
            let projection = self.projections[index];
            let mut radius = node.size * projection.depth;
            if node.hub {
                radius *= 1.0 + HUB_PULSE * node.ph.sin();
            }
            let color = self.palette.grad_color(node.ct);
            let glow_alpha = if node.hub { HUB_GLOW_ALPHA } else { NODE_GLOW_ALPHA };

            surface.fill_glow(
                projection.screen,
                radius * GLOW_SCALE,
                Srgba {
                    alpha: (glow_alpha * projection.depth).min(1.0),
                    ..color
                },
            );
            surface.fill_circle(
                projection.screen,
                radius,
                Srgba {
                    alpha: (CORE_BASE_ALPHA + (1.0 - CORE_BASE_ALPHA) * projection.depth).min(1.0),
                    ..color
                },
            );
        }
    }
}
