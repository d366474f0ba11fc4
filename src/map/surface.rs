//! Retained drawing surface: everything a host needs to paint the map.
//!
//! Coordinates are in viewbox units; [`ViewTransform`] maps them to pixels.

use crate::map::geometry::Bounds;
use crate::map::projection::ViewTransform;
use crate::map::scale::{LinearScale, Rgb};
use glam::DVec2;

/// Fill used for regions without data
pub const NO_DATA_FILL: Rgb = Rgb::from_hex(0xcccccc);
pub const STROKE_COLOR: Rgb = Rgb::WHITE;
pub const STROKE_WIDTH: f64 = 0.5;
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const HIGHLIGHT_OPACITY: f64 = 0.8;

/// Drawable layers, painted in the order kept by [`Surface::order`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Regions,
    Legend,
    TotalMarker,
    PinnedTooltips,
    Tooltip,
}

/// One projected federal state
#[derive(Clone, Debug)]
pub struct RegionPath {
    pub name: String,
    /// Rings per polygon, exterior first
    pub polygons: Vec<Vec<Vec<DVec2>>>,
    pub bounds: Bounds,
    pub centroid: DVec2,
    pub fill: Rgb,
    pub fill_opacity: f64,
}

impl RegionPath {
    /// All rings of all polygons
    pub fn rings(&self) -> impl Iterator<Item = &Vec<DVec2>> {
        self.polygons.iter().flatten()
    }
}

/// Text shown in a tooltip: a bold title followed by the value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TooltipContent {
    pub title: String,
    pub body: String,
}

impl TooltipContent {
    pub fn text(&self) -> String {
        format!("{}: {}", self.title, self.body)
    }
}

/// Which side of the tooltip box sits at its position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Box extends to the right of the position
    #[default]
    Left,
    /// Box extends to the left of the position
    Right,
}

/// The floating tooltip overlay
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    pub position: DVec2,
    pub anchor: Anchor,
    pub content: TooltipContent,
}

/// A persistent tooltip attached to a pinned region
#[derive(Clone, Debug, PartialEq)]
pub struct PinnedTooltip {
    pub region: String,
    pub position: DVec2,
    pub content: TooltipContent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Offset from the top of the bar
    pub offset: f64,
    pub label: String,
}

/// Vertical gradient legend
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    /// Top-left corner of the bar
    pub origin: DVec2,
    pub width: f64,
    pub height: f64,
    /// Gradient stops from bottom (0.0) to top (1.0)
    pub stops: Vec<(f64, Rgb)>,
    pub ticks: Vec<Tick>,
    pub title: String,
    /// Value to offset-from-top mapping of the bar
    pub scale: LinearScale,
}

impl Legend {
    pub fn domain(&self) -> [f64; 2] {
        self.scale.domain
    }

    /// Color at a vertical offset from the top of the bar
    pub fn color_at(&self, offset: f64) -> Rgb {
        let t = 1.0 - (offset / self.height).clamp(0.0, 1.0);
        self.stops
            .iter()
            .min_by(|a, b| (a.0 - t).abs().total_cmp(&(b.0 - t).abs()))
            .map_or(NO_DATA_FILL, |&(_, color)| color)
    }
}

/// Triangle on the legend marking the national total
#[derive(Clone, Debug, PartialEq)]
pub struct TotalMarker {
    pub points: [DVec2; 3],
    pub value: f64,
    pub content: TooltipContent,
}

impl TotalMarker {
    pub fn bounds(&self) -> Bounds {
        Bounds::of_rings(&[self.points.to_vec()])
    }

    /// Tip of the triangle, touching the legend bar
    pub fn tip(&self) -> DVec2 {
        self.points[2]
    }
}

/// The retained scene a [`crate::map::MapRenderer`] mutates
#[derive(Clone, Debug)]
pub struct Surface {
    pub view: ViewTransform,
    pub regions: Vec<RegionPath>,
    pub legend: Option<Legend>,
    pub total: Option<TotalMarker>,
    pub pinned: Vec<PinnedTooltip>,
    pub tooltip: Tooltip,
    order: Vec<Layer>,
}

impl Surface {
    pub fn new(view: ViewTransform, regions: Vec<RegionPath>) -> Self {
        Self {
            view,
            regions,
            legend: None,
            total: None,
            pinned: Vec::new(),
            tooltip: Tooltip::default(),
            order: vec![Layer::Regions, Layer::Tooltip],
        }
    }

    /// Layers in paint order, bottom first
    pub fn order(&self) -> &[Layer] {
        &self.order
    }

    pub fn remove(&mut self, layer: Layer) {
        self.order.retain(|&l| l != layer);
    }

    /// Put a layer on top of everything else
    pub fn append(&mut self, layer: Layer) {
        self.remove(layer);
        self.order.push(layer);
    }

    pub fn region(&self, name: &str) -> Option<&RegionPath> {
        self.regions.iter().find(|r| r.name == name)
    }
}
