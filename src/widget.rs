use crate::map::{MapRenderer, RenderOptions, Surface};
use crate::model::{RegionShape, RenderPayload};
use anyhow::Result;
use log::debug;

/// Host-facing widget: mounts one [`MapRenderer`] and forwards the host lifecycle to it
pub struct ChoroplethWidget {
    renderer: MapRenderer,
    width: f64,
    height: f64,
    /// Most recently rendered payload, kept for re-triggering
    last: Option<RenderPayload>,
}

impl ChoroplethWidget {
    /// Size the mount area and build the renderer for it
    pub fn mount(regions: &[RegionShape], width: f64, height: f64, options: RenderOptions) -> Self {
        debug!("Mounting map widget ({width}x{height}, {} regions)", regions.len());
        Self {
            renderer: MapRenderer::new(regions, width, height, options),
            width,
            height,
            last: None,
        }
    }

    /// Push a payload. Empty payloads are ignored: hosts may push an empty
    /// state before real data arrives.
    pub fn render(&mut self, payload: RenderPayload) -> Result<()> {
        if payload.data.is_empty() {
            debug!("Ignoring render with empty data");
            return Ok(());
        }
        self.renderer.update(&payload)?;
        self.last = Some(payload);
        Ok(())
    }

    /// Re-render the retained payload, if any
    pub fn rerender(&mut self) -> Result<()> {
        match &self.last {
            Some(payload) => self.renderer.update(payload),
            None => Ok(()),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.renderer.resize(width, height);
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn last_payload(&self) -> Option<&RenderPayload> {
        self.last.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        self.renderer.surface()
    }

    pub fn renderer(&self) -> &MapRenderer {
        &self.renderer
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.renderer.pointer_move(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.renderer.pointer_leave();
    }

    pub fn click(&mut self, x: f64, y: f64) -> Option<bool> {
        self.renderer.click(x, y)
    }
}
