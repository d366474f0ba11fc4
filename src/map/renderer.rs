use crate::i18n;
use crate::map::geometry::{self, Bounds};
use crate::map::legend::{build_legend, build_total_marker};
use crate::map::projection::{Projection, ViewTransform};
use crate::map::scale::SequentialScale;
use crate::map::spatial::FeatureGrid;
use crate::map::surface::{
    Anchor, Layer, PinnedTooltip, RegionPath, Surface, TooltipContent, DEFAULT_OPACITY,
    HIGHLIGHT_OPACITY, NO_DATA_FILL,
};
use crate::model::{DataPoint, RegionShape, RenderPayload};
use anyhow::{Context, Result};
use glam::DVec2;
use log::debug;
use std::collections::HashSet;

/// Grid cell size for region hit testing, in viewbox units
const HIT_GRID_CELL: f64 = 50.0;

/// Tooltip offset from the pointer for regions; mirrored horizontally for the total marker
const TOOLTIP_OFFSET: DVec2 = DVec2::new(10.0, -28.0);

/// Extra hit area around the small total marker
const MARKER_HIT_PADDING: f64 = 6.0;

/// Manual nudges for pinned tooltips, keeping neighbours from overlapping
const PINNED_OFFSETS: &[(&str, f64, f64)] = &[
    ("Berlin", 0.0, -22.0),
    ("Brandenburg", 18.0, 30.0),
    ("Bremen", -30.0, -12.0),
    ("Hamburg", 0.0, -22.0),
    ("Schleswig-Holstein", -10.0, -18.0),
    ("Mecklenburg-Vorpommern", 0.0, -12.0),
    ("Niedersachsen", -25.0, 18.0),
    ("Sachsen-Anhalt", -8.0, 12.0),
    ("Saarland", -28.0, 10.0),
    ("Rheinland-Pfalz", -10.0, 0.0),
];

/// Tunables for the renderer
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Number of legend axis ticks
    pub legend_ticks: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { legend_ticks: 5 }
    }
}

/// What the pointer is currently over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Region(usize),
    Total,
}

/// Choropleth renderer: owns the drawing surface and the interaction state.
/// Region outlines are projected once; everything data-driven is rebuilt on [`update`].
///
/// [`update`]: MapRenderer::update
pub struct MapRenderer {
    projection: Projection,
    surface: Surface,
    grid: FeatureGrid,
    options: RenderOptions,
    scale: Option<SequentialScale>,
    /// Tooltip content per region, bound by the latest update
    bindings: Vec<Option<TooltipContent>>,
    pinned: HashSet<String>,
    hovered: Option<Target>,
}

impl MapRenderer {
    /// Build the static scaffold for a mount area of `width` x `height` pixels
    pub fn new(regions: &[RegionShape], width: f64, height: f64, options: RenderOptions) -> Self {
        let projection = Projection::germany();

        let paths: Vec<RegionPath> = regions
            .iter()
            .map(|shape| {
                let polygons: Vec<Vec<Vec<DVec2>>> = shape
                    .polygons
                    .iter()
                    .map(|rings| {
                        rings
                            .iter()
                            .map(|ring| {
                                ring.iter()
                                    .map(|&(lon, lat)| projection.project(lon, lat))
                                    .collect()
                            })
                            .collect()
                    })
                    .collect();
                let all_rings: Vec<Vec<DVec2>> = polygons.iter().flatten().cloned().collect();

                RegionPath {
                    name: shape.name.clone(),
                    bounds: Bounds::of_rings(&all_rings),
                    centroid: geometry::centroid(&polygons),
                    polygons,
                    fill: NO_DATA_FILL,
                    fill_opacity: DEFAULT_OPACITY,
                }
            })
            .collect();

        let grid = FeatureGrid::build(paths.iter().map(|p| &p.bounds), HIT_GRID_CELL);
        let bindings = vec![None; paths.len()];

        Self {
            projection,
            surface: Surface::new(ViewTransform::fit(width, height), paths),
            grid,
            options,
            scale: None,
            bindings,
            pinned: HashSet::new(),
            hovered: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Color scale of the latest successful update
    pub fn scale(&self) -> Option<&SequentialScale> {
        self.scale.as_ref()
    }

    pub fn hovered(&self) -> Option<Target> {
        self.hovered
    }

    pub fn is_pinned(&self, region: &str) -> bool {
        self.pinned.contains(region)
    }

    /// Refit the viewbox into a new mount size
    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface.view = ViewTransform::fit(width, height);
    }

    /// Recolor the map and rebuild legend, total marker and tooltip bindings.
    ///
    /// Fails without touching the surface when the payload is empty or its
    /// parameter is missing from the configuration.
    pub fn update(&mut self, payload: &RenderPayload) -> Result<()> {
        let parameter = payload
            .active_parameter()
            .context("payload contains no data points")?;
        let config = payload
            .config
            .parameter
            .get(parameter)
            .with_context(|| format!("unknown parameter '{parameter}'"))?;

        let lang = payload.language();
        let na_label = payload
            .config
            .na_label
            .as_deref()
            .unwrap_or(i18n::default_na_label(lang));
        let total_label = payload
            .config
            .total_label
            .as_deref()
            .unwrap_or(i18n::default_total_label(lang));
        let scale = SequentialScale::for_parameter(config);

        for (region, binding) in self.surface.regions.iter_mut().zip(&mut self.bindings) {
            // First occurrence wins
            let point = payload.find(&region.name);
            region.fill = match point.and_then(|p| p.est) {
                Some(est) => scale.color(config.range.clamp(est)),
                None => NO_DATA_FILL,
            };
            *binding = Some(TooltipContent {
                title: i18n::region_name(&region.name, lang).to_string(),
                body: display_text(point, na_label),
            });
        }

        for point in payload.data.iter().filter(|p| !p.is_total()) {
            if self.surface.region(&point.region).is_none() {
                debug!("No region shape for data point '{}'", point.region);
            }
        }

        // Legend and total marker are replaced, never patched
        self.surface.remove(Layer::Legend);
        self.surface.remove(Layer::TotalMarker);
        let legend = build_legend(&scale, &config.label, self.options.legend_ticks);
        self.surface.total = payload.total().and_then(|total| {
            let content = TooltipContent {
                title: total_label.to_string(),
                body: display_text(Some(total), na_label),
            };
            build_total_marker(&legend, &config.range, total, content)
        });
        self.surface.legend = Some(legend);
        self.surface.append(Layer::Legend);
        if self.surface.total.is_some() {
            self.surface.append(Layer::TotalMarker);
        }

        self.scale = Some(scale);
        self.rebuild_pinned();
        self.refresh_hover();
        self.surface.append(Layer::Tooltip);

        debug!(
            "Updated map for parameter '{parameter}' ({} data points, {} pinned)",
            payload.data.len(),
            self.pinned.len()
        );
        Ok(())
    }

    /// Pointer moved to pixel position (x, y) within the mount area
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let point = self.surface.view.to_viewbox(DVec2::new(x, y));
        let target = self.hit_test(point);
        if target != self.hovered {
            self.leave();
            self.hovered = target;
            self.enter();
        }

        let tooltip = &mut self.surface.tooltip;
        match self.hovered {
            Some(Target::Total) => {
                tooltip.position = point + DVec2::new(-TOOLTIP_OFFSET.x, TOOLTIP_OFFSET.y);
                tooltip.anchor = Anchor::Right;
            }
            _ => {
                tooltip.position = point + TOOLTIP_OFFSET;
                tooltip.anchor = Anchor::Left;
            }
        }
    }

    /// Pointer left the mount area
    pub fn pointer_leave(&mut self) {
        self.leave();
        self.hovered = None;
    }

    /// Click at pixel position (x, y): toggles the pin of the region under it.
    /// Returns the new pin state, or `None` when nothing was toggled.
    pub fn click(&mut self, x: f64, y: f64) -> Option<bool> {
        let point = self.surface.view.to_viewbox(DVec2::new(x, y));
        match self.hit_test(point) {
            Some(Target::Region(idx)) => self.toggle_pin(idx),
            _ => None,
        }
    }

    /// Toggle the pin of a region by name
    #[cfg(test)]
    pub fn toggle_pin_named(&mut self, region: &str) -> Option<bool> {
        let idx = self.surface.regions.iter().position(|r| r.name == region)?;
        self.toggle_pin(idx)
    }

    fn toggle_pin(&mut self, idx: usize) -> Option<bool> {
        // Click handlers are bound by update
        self.bindings[idx].as_ref()?;

        let region = &mut self.surface.regions[idx];
        let pinned = if self.pinned.remove(&region.name) {
            region.fill_opacity = DEFAULT_OPACITY;
            false
        } else {
            self.pinned.insert(region.name.clone());
            region.fill_opacity = HIGHLIGHT_OPACITY;
            true
        };
        debug!("Region '{}' pinned: {pinned}", region.name);

        if self.hovered == Some(Target::Region(idx)) {
            if pinned {
                self.surface.tooltip.visible = false;
            } else {
                // Back to plain hover
                self.enter();
            }
        }
        self.rebuild_pinned();
        self.surface.append(Layer::Tooltip);
        Some(pinned)
    }

    /// Topmost element under a viewbox point: the total marker, then regions
    fn hit_test(&self, point: DVec2) -> Option<Target> {
        if let Some(total) = &self.surface.total {
            let bounds = total.bounds();
            let padded = Bounds {
                min: bounds.min - DVec2::splat(MARKER_HIT_PADDING),
                max: bounds.max + DVec2::splat(MARKER_HIT_PADDING),
            };
            if padded.contains(point) {
                return Some(Target::Total);
            }
        }

        self.grid
            .query_point(point)
            .iter()
            .rev()
            .copied()
            .find(|&idx| {
                let region = &self.surface.regions[idx];
                region.bounds.contains(point)
                    && region
                        .polygons
                        .iter()
                        .any(|rings| geometry::contains_point(rings, point))
            })
            .map(Target::Region)
    }

    fn enter(&mut self) {
        match self.hovered {
            Some(Target::Region(idx)) => {
                let region = &mut self.surface.regions[idx];
                if self.pinned.contains(&region.name) {
                    return;
                }
                region.fill_opacity = HIGHLIGHT_OPACITY;
                if let Some(content) = &self.bindings[idx] {
                    self.surface.tooltip.content = content.clone();
                    self.surface.tooltip.visible = true;
                }
            }
            Some(Target::Total) => {
                if let Some(total) = &self.surface.total {
                    self.surface.tooltip.content = total.content.clone();
                    self.surface.tooltip.visible = true;
                }
            }
            None => {}
        }
    }

    fn leave(&mut self) {
        if let Some(Target::Region(idx)) = self.hovered {
            let region = &mut self.surface.regions[idx];
            if !self.pinned.contains(&region.name) {
                region.fill_opacity = DEFAULT_OPACITY;
            }
        }
        self.surface.tooltip.visible = false;
    }

    /// Point the visible tooltip at freshly bound content after an update
    fn refresh_hover(&mut self) {
        match self.hovered {
            Some(Target::Total) if self.surface.total.is_none() => {
                self.surface.tooltip.visible = false;
                self.hovered = None;
            }
            Some(_) if self.surface.tooltip.visible => self.enter(),
            _ => {}
        }
    }

    /// Tear down and recreate the persistent tooltips of pinned regions
    fn rebuild_pinned(&mut self) {
        self.surface.pinned = self
            .surface
            .regions
            .iter()
            .zip(&self.bindings)
            .filter(|(region, _)| self.pinned.contains(&region.name))
            .filter_map(|(region, binding)| {
                let content = binding.clone()?;
                Some(PinnedTooltip {
                    region: region.name.clone(),
                    position: region.centroid + pinned_offset(&region.name),
                    content,
                })
            })
            .collect();

        self.surface.remove(Layer::PinnedTooltips);
        if !self.surface.pinned.is_empty() {
            self.surface.append(Layer::PinnedTooltips);
        }
    }
}

/// Pre-formatted estimate, or the no-data label when absent or blank
fn display_text(point: Option<&DataPoint>, na_label: &str) -> String {
    point
        .and_then(|p| p.est_print.as_deref())
        .filter(|text| !text.is_empty())
        .unwrap_or(na_label)
        .to_string()
}

fn pinned_offset(region: &str) -> DVec2 {
    PINNED_OFFSETS
        .iter()
        .find(|(name, _, _)| *name == region)
        .map_or(DVec2::ZERO, |&(_, dx, dy)| DVec2::new(dx, dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::legend::LEGEND_ORIGIN;
    use crate::map::projection::{VIEWBOX_HEIGHT, VIEWBOX_WIDTH};
    use crate::model::{Language, MapConfig, ParameterConfig, Range};
    use std::collections::HashMap;

    /// Axis-aligned lon/lat box as a single-polygon region
    fn boxed(name: &str, lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> RegionShape {
        RegionShape::new(
            name,
            vec![vec![vec![(lon0, lat0), (lon1, lat0), (lon1, lat1), (lon0, lat1)]]],
        )
    }

    fn regions() -> Vec<RegionShape> {
        vec![
            boxed("Bayern", 9.0, 47.5, 13.5, 50.5),
            boxed("Hessen", 8.0, 50.5, 10.0, 51.6),
            boxed("Berlin", 13.1, 52.3, 13.7, 52.7),
        ]
    }

    fn point(region: &str, est: Option<f64>, print: Option<&str>) -> DataPoint {
        DataPoint {
            region: region.to_string(),
            parameter: "cases".to_string(),
            est,
            est_print: print.map(str::to_string),
        }
    }

    fn payload(data: Vec<DataPoint>, reverse: bool) -> RenderPayload {
        let mut parameter = HashMap::new();
        parameter.insert(
            "cases".to_string(),
            ParameterConfig {
                range: Range { min: 0.0, max: 100.0 },
                label: "Cases".to_string(),
                reverse,
            },
        );
        RenderPayload {
            data,
            config: MapConfig {
                na_label: None,
                total_label: None,
                parameter,
            },
            lang: None,
        }
    }

    /// Renderer whose pixels coincide with viewbox units
    fn renderer() -> MapRenderer {
        MapRenderer::new(&regions(), VIEWBOX_WIDTH, VIEWBOX_HEIGHT, RenderOptions::default())
    }

    fn centroid_of(renderer: &MapRenderer, name: &str) -> DVec2 {
        renderer.surface().region(name).unwrap().centroid
    }

    fn fill_of(renderer: &MapRenderer, name: &str) -> crate::map::Rgb {
        renderer.surface().region(name).unwrap().fill
    }

    #[test]
    fn test_cases_scenario() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", Some(50.0), Some("50"))], false))
            .unwrap();

        let scale = SequentialScale::new([0.0, 100.0]);
        assert_eq!(fill_of(&renderer, "Bayern"), scale.color(50.0));
        assert_eq!(fill_of(&renderer, "Hessen"), NO_DATA_FILL);
        assert_eq!(fill_of(&renderer, "Berlin"), NO_DATA_FILL);
        let legend = renderer.surface().legend.as_ref().unwrap();
        assert_eq!(legend.domain(), [0.0, 100.0]);
        assert_eq!(legend.ticks.len(), 5);
    }

    #[test]
    fn test_reversed_scenario() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", Some(20.0), Some("20"))], true))
            .unwrap();

        let scale = SequentialScale::new([100.0, 0.0]);
        assert_eq!(renderer.scale(), Some(&scale));
        assert_eq!(fill_of(&renderer, "Bayern"), scale.color(20.0));
        assert_ne!(fill_of(&renderer, "Bayern"), SequentialScale::new([0.0, 100.0]).color(20.0));
        assert_eq!(renderer.surface().legend.as_ref().unwrap().domain(), [100.0, 0.0]);
    }

    #[test]
    fn test_estimates_are_clamped() {
        let mut renderer = renderer();
        renderer
            .update(&payload(
                vec![
                    point("Bayern", Some(250.0), Some("250")),
                    point("Hessen", Some(-40.0), Some("-40")),
                ],
                false,
            ))
            .unwrap();

        let scale = SequentialScale::new([0.0, 100.0]);
        assert_eq!(fill_of(&renderer, "Bayern"), scale.color(100.0));
        assert_eq!(fill_of(&renderer, "Hessen"), scale.color(0.0));

        // Displayed text stays unclamped
        renderer.pointer_move(centroid_of(&renderer, "Bayern").x, centroid_of(&renderer, "Bayern").y);
        assert_eq!(renderer.surface().tooltip.content.body, "250");
    }

    #[test]
    fn test_missing_estimate_is_neutral() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", None, None), point("Hessen", Some(1.0), Some(""))], false))
            .unwrap();
        assert_eq!(fill_of(&renderer, "Bayern"), NO_DATA_FILL);

        let hessen = centroid_of(&renderer, "Hessen");
        renderer.pointer_move(hessen.x, hessen.y);
        assert_eq!(renderer.surface().tooltip.content.body, "keine Angabe");
    }

    #[test]
    fn test_empty_payload_fails_without_mutation() {
        let mut renderer = renderer();
        let err = renderer.update(&payload(Vec::new(), false)).unwrap_err();
        assert!(err.to_string().contains("no data points"));
        assert!(renderer.surface().legend.is_none());
        assert_eq!(renderer.surface().order(), &[Layer::Regions, Layer::Tooltip]);
    }

    #[test]
    fn test_unknown_parameter_fails_without_mutation() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", Some(50.0), Some("50"))], false))
            .unwrap();
        let before = fill_of(&renderer, "Bayern");

        let mut unknown = payload(vec![point("Bayern", Some(90.0), Some("90"))], false);
        unknown.data[0].parameter = "deaths".to_string();
        let err = renderer.update(&unknown).unwrap_err();
        assert!(err.to_string().contains("unknown parameter 'deaths'"));
        assert_eq!(fill_of(&renderer, "Bayern"), before);
    }

    #[test]
    fn test_tooltip_translation_and_labels() {
        let mut renderer = renderer();
        let mut p = payload(vec![point("Bayern", Some(50.0), Some("50,0"))], false);
        p.lang = Some(Language::En);
        p.config.na_label = Some("n/a".to_string());
        renderer.update(&p).unwrap();

        let bayern = centroid_of(&renderer, "Bayern");
        renderer.pointer_move(bayern.x, bayern.y);
        let tooltip = &renderer.surface().tooltip;
        assert!(tooltip.visible);
        assert_eq!(tooltip.content.text(), "Bavaria: 50,0");
        assert_eq!(tooltip.position, bayern + TOOLTIP_OFFSET);
        assert_eq!(tooltip.anchor, Anchor::Left);

        let hessen = centroid_of(&renderer, "Hessen");
        renderer.pointer_move(hessen.x, hessen.y);
        assert_eq!(renderer.surface().tooltip.content.text(), "Hesse: n/a");
    }

    #[test]
    fn test_hover_adjusts_opacity_before_data() {
        let mut renderer = renderer();
        let bayern = centroid_of(&renderer, "Bayern");
        renderer.pointer_move(bayern.x, bayern.y);
        assert_eq!(renderer.hovered(), Some(Target::Region(0)));
        assert_eq!(renderer.surface().regions[0].fill_opacity, HIGHLIGHT_OPACITY);
        // No bindings yet, so no tooltip
        assert!(!renderer.surface().tooltip.visible);

        renderer.pointer_leave();
        assert_eq!(renderer.surface().regions[0].fill_opacity, DEFAULT_OPACITY);
        assert_eq!(renderer.hovered(), None);
    }

    #[test]
    fn test_pin_roundtrip() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", Some(50.0), Some("50"))], false))
            .unwrap();
        let bayern = centroid_of(&renderer, "Bayern");

        assert_eq!(renderer.click(bayern.x, bayern.y), Some(true));
        assert!(renderer.is_pinned("Bayern"));
        let pinned = &renderer.surface().pinned;
        assert_eq!(pinned.len(), 1);
        assert_eq!(pinned[0].region, "Bayern");
        assert_eq!(pinned[0].position, bayern);
        assert_eq!(pinned[0].content.text(), "Bayern: 50");
        assert!(renderer.surface().order().contains(&Layer::PinnedTooltips));
        assert_eq!(renderer.surface().order().last(), Some(&Layer::Tooltip));

        // Hover no longer changes opacity or shows the floating tooltip
        let hessen = centroid_of(&renderer, "Hessen");
        renderer.pointer_move(hessen.x, hessen.y);
        renderer.pointer_move(bayern.x, bayern.y);
        assert_eq!(renderer.surface().regions[0].fill_opacity, HIGHLIGHT_OPACITY);
        assert!(!renderer.surface().tooltip.visible);
        renderer.pointer_leave();
        assert_eq!(renderer.surface().regions[0].fill_opacity, HIGHLIGHT_OPACITY);

        assert_eq!(renderer.click(bayern.x, bayern.y), Some(false));
        assert!(!renderer.is_pinned("Bayern"));
        assert!(renderer.surface().pinned.is_empty());
        assert_eq!(renderer.surface().regions[0].fill_opacity, DEFAULT_OPACITY);
        assert!(!renderer.surface().order().contains(&Layer::PinnedTooltips));
    }

    #[test]
    fn test_unpin_under_pointer_restores_hover() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", Some(50.0), Some("50"))], false))
            .unwrap();
        let bayern = centroid_of(&renderer, "Bayern");
        renderer.pointer_move(bayern.x, bayern.y);
        assert!(renderer.surface().tooltip.visible);

        assert_eq!(renderer.click(bayern.x, bayern.y), Some(true));
        assert!(!renderer.surface().tooltip.visible);

        assert_eq!(renderer.click(bayern.x, bayern.y), Some(false));
        let tooltip = &renderer.surface().tooltip;
        assert!(tooltip.visible);
        assert_eq!(tooltip.content.text(), "Bayern: 50");
        assert_eq!(renderer.surface().regions[0].fill_opacity, HIGHLIGHT_OPACITY);

        renderer.pointer_leave();
        assert_eq!(renderer.surface().regions[0].fill_opacity, DEFAULT_OPACITY);
    }

    #[test]
    fn test_first_data_point_per_region_wins() {
        let mut renderer = renderer();
        renderer
            .update(&payload(
                vec![
                    point("Bayern", Some(10.0), Some("10")),
                    point("Bayern", Some(90.0), Some("90")),
                    point("Atlantis", Some(1.0), Some("1")),
                ],
                false,
            ))
            .unwrap();

        assert_eq!(fill_of(&renderer, "Bayern"), SequentialScale::new([0.0, 100.0]).color(10.0));
        let bayern = centroid_of(&renderer, "Bayern");
        renderer.pointer_move(bayern.x, bayern.y);
        assert_eq!(renderer.surface().tooltip.content.body, "10");
    }

    #[test]
    fn test_pinned_offsets_applied() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Berlin", Some(5.0), Some("5"))], false))
            .unwrap();
        assert_eq!(renderer.toggle_pin_named("Berlin"), Some(true));
        let berlin = centroid_of(&renderer, "Berlin");
        assert_eq!(renderer.surface().pinned[0].position, berlin + DVec2::new(0.0, -22.0));
    }

    #[test]
    fn test_pins_survive_update_with_new_text() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", Some(50.0), Some("50"))], false))
            .unwrap();
        renderer.toggle_pin_named("Bayern");
        renderer
            .update(&payload(vec![point("Bayern", Some(70.0), Some("70"))], false))
            .unwrap();

        assert!(renderer.is_pinned("Bayern"));
        assert_eq!(renderer.surface().pinned.len(), 1);
        assert_eq!(renderer.surface().pinned[0].content.body, "70");
    }

    #[test]
    fn test_pin_state_is_per_instance() {
        let mut first = renderer();
        let mut second = renderer();
        let p = payload(vec![point("Bayern", Some(50.0), Some("50"))], false);
        first.update(&p).unwrap();
        second.update(&p).unwrap();
        first.toggle_pin_named("Bayern");
        assert!(first.is_pinned("Bayern"));
        assert!(!second.is_pinned("Bayern"));
    }

    #[test]
    fn test_click_before_update_is_ignored() {
        let mut renderer = renderer();
        let bayern = centroid_of(&renderer, "Bayern");
        assert_eq!(renderer.click(bayern.x, bayern.y), None);
        assert_eq!(renderer.click(-50.0, -50.0), None);
    }

    #[test]
    fn test_total_marker_presence_and_tooltip() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Bayern", Some(50.0), Some("50"))], false))
            .unwrap();
        assert!(renderer.surface().total.is_none());
        assert!(!renderer.surface().order().contains(&Layer::TotalMarker));

        renderer
            .update(&payload(
                vec![point("Bayern", Some(50.0), Some("50")), point("total", Some(25.0), Some("25,0"))],
                false,
            ))
            .unwrap();
        let tip = renderer.surface().total.as_ref().unwrap().tip();
        assert_eq!(tip, DVec2::new(LEGEND_ORIGIN.x, LEGEND_ORIGIN.y + 300.0));

        let hover = tip + DVec2::new(-4.0, 0.0);
        renderer.pointer_move(hover.x, hover.y);
        let tooltip = &renderer.surface().tooltip;
        assert_eq!(renderer.hovered(), Some(Target::Total));
        assert_eq!(tooltip.content.text(), "Deutschland: 25,0");
        assert_eq!(tooltip.anchor, Anchor::Right);
        assert_eq!(tooltip.position, hover + DVec2::new(-10.0, -28.0));

        // Total disappears with the next payload
        renderer
            .update(&payload(vec![point("Bayern", Some(50.0), Some("50"))], false))
            .unwrap();
        assert!(renderer.surface().total.is_none());
        assert_eq!(renderer.hovered(), None);
        assert!(!renderer.surface().tooltip.visible);
    }

    #[test]
    fn test_tooltip_drawn_last_after_every_update() {
        let mut renderer = renderer();
        let p = payload(
            vec![point("Bayern", Some(50.0), Some("50")), point("total", Some(25.0), Some("25"))],
            false,
        );
        renderer.update(&p).unwrap();
        renderer.update(&p).unwrap();
        assert_eq!(
            renderer.surface().order(),
            &[Layer::Regions, Layer::Legend, Layer::TotalMarker, Layer::Tooltip]
        );
    }

    #[test]
    fn test_legend_independent_of_present_regions() {
        let mut renderer = renderer();
        renderer
            .update(&payload(vec![point("Atlantis", Some(1.0), Some("1"))], true))
            .unwrap();
        let legend = renderer.surface().legend.as_ref().unwrap();
        assert_eq!(legend.ticks.len(), 5);
        assert_eq!(legend.domain(), [100.0, 0.0]);
        assert!(renderer.surface().regions.iter().all(|r| r.fill == NO_DATA_FILL));
    }

    #[test]
    fn test_resize_refits_view() {
        let mut renderer = renderer();
        let before = centroid_of(&renderer, "Bayern");
        renderer.resize(VIEWBOX_WIDTH * 2.0, VIEWBOX_HEIGHT);
        let view = renderer.surface().view;
        assert_eq!(view.offset, DVec2::new(VIEWBOX_WIDTH / 2.0, 0.0));
        // Projection untouched, hit testing follows the new fit
        assert_eq!(centroid_of(&renderer, "Bayern"), before);
        let pixel = view.to_pixel(before);
        renderer.pointer_move(pixel.x, pixel.y);
        assert_eq!(renderer.hovered(), Some(Target::Region(0)));
    }
}
