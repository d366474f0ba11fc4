use crate::map::{svg, RenderOptions};
use crate::model::{Language, RegionShape, RenderPayload};
use crate::widget::ChoroplethWidget;
use anyhow::{Context, Result};
use glam::DVec2;
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Where `s` writes the current map
pub const SVG_EXPORT_PATH: &str = "eat_map.svg";

/// Pixel size of the map area for a terminal of `width` x `height` cells.
/// Half blocks give 1x2 resolution per character.
fn map_pixels(width: usize, height: usize) -> (f64, f64) {
    // Account for border (2 chars horizontal, 2 chars vertical plus status bar)
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width as f64, (inner_height * 2) as f64)
}

/// Application state
pub struct App {
    pub widget: ChoroplethWidget,
    payloads: Vec<RenderPayload>,
    current: usize,
    /// Language chosen with `l`, overriding the payload's own
    lang: Option<Language>,
    pub should_quit: bool,
    /// Current mouse position (terminal column/row)
    pub mouse_pos: Option<(u16, u16)>,
    /// Last message for the status bar
    pub message: Option<String>,
}

impl App {
    pub fn new(
        width: usize,
        height: usize,
        regions: &[RegionShape],
        options: RenderOptions,
        payloads: Vec<RenderPayload>,
    ) -> Self {
        let (pixel_width, pixel_height) = map_pixels(width, height);
        let mut app = Self {
            widget: ChoroplethWidget::mount(regions, pixel_width, pixel_height, options),
            payloads,
            current: 0,
            lang: None,
            should_quit: false,
            mouse_pos: None,
            message: None,
        };
        app.show_current();
        app
    }

    /// Push the selected payload to the widget, with the language override applied
    fn show_current(&mut self) {
        let Some(payload) = self.payloads.get(self.current) else {
            return;
        };
        let mut payload = payload.clone();
        if self.lang.is_some() {
            payload.lang = self.lang;
        }
        self.message = match self.widget.render(payload) {
            Ok(()) => None,
            Err(err) => {
                warn!("Render failed: {err:#}");
                Some(format!("{err:#}"))
            }
        };
    }

    pub fn payload_count(&self) -> usize {
        self.payloads.len()
    }

    /// Index of the shown payload
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next_payload(&mut self) {
        if self.payloads.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.payloads.len();
        self.show_current();
    }

    pub fn prev_payload(&mut self) {
        if self.payloads.is_empty() {
            return;
        }
        self.current = (self.current + self.payloads.len() - 1) % self.payloads.len();
        self.show_current();
    }

    /// Language of the map as currently shown
    pub fn language(&self) -> Language {
        self.lang
            .or_else(|| self.payloads.get(self.current).map(RenderPayload::language))
            .unwrap_or_default()
    }

    pub fn toggle_language(&mut self) {
        self.lang = Some(self.language().toggle());
        self.show_current();
    }

    /// Parameter label of the shown payload
    pub fn parameter_label(&self) -> Option<&str> {
        let payload = self.widget.last_payload()?;
        let id = payload.active_parameter()?;
        payload.config.parameter.get(id).map(|p| p.label.as_str())
    }

    /// Update map size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = map_pixels(width, height);
        self.widget.resize(pixel_width, pixel_height);
    }

    /// Update mouse cursor position and hover state
    pub fn mouse_move(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        match self.mouse_pixel_pos() {
            Some(p) => self.widget.pointer_move(p.x, p.y),
            None => self.widget.pointer_leave(),
        }
    }

    /// Cursor left the terminal
    pub fn mouse_leave(&mut self) {
        self.mouse_pos = None;
        self.widget.pointer_leave();
    }

    pub fn mouse_click(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        if let Some(p) = self.mouse_pixel_pos() {
            self.widget.click(p.x, p.y);
        }
    }

    /// Mouse position in map pixels, at the center of the hovered cell.
    /// None when the cursor is on the border or status bar.
    pub fn mouse_pixel_pos(&self) -> Option<DVec2> {
        let (col, row) = self.mouse_pos?;
        if col == 0 || row == 0 {
            return None;
        }
        let (width, height) = self.widget.size();
        // Account for border (1 cell offset)
        let px = (col - 1) as f64 + 0.5;
        let py = (row - 1) as f64 * 2.0 + 1.0;
        (px < width && py < height).then(|| DVec2::new(px, py))
    }

    /// Geographic position under the mouse
    pub fn mouse_coords(&self) -> Option<(f64, f64)> {
        let pixel = self.mouse_pixel_pos()?;
        let renderer = self.widget.renderer();
        let viewbox = self.widget.surface().view.to_viewbox(pixel);
        Some(renderer.projection().unproject(viewbox))
    }

    /// Write the current surface as SVG
    pub fn export_svg(&mut self, path: &Path) -> Result<()> {
        let document = svg::to_svg(self.widget.surface()).context("Could not serialise map")?;
        fs::write(path, document)
            .with_context(|| format!("Could not write {}", path.display()))?;
        info!("Exported map to {}", path.display());
        self.message = Some(format!("Saved {}", path.display()));
        Ok(())
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
