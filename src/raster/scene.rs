use crate::map::geometry::{fill_rings, stroke_rings};
use crate::map::surface::{Legend, STROKE_COLOR};
use crate::map::{Layer, Rgb, Surface};
use crate::raster::PixelCanvas;
use glam::DVec2;

/// Terminal background the fill opacity blends against
pub const BACKGROUND: Rgb = Rgb(0, 0, 0);

const MARKER_COLOR: Rgb = Rgb::WHITE;

/// Paint the graphical layers of a surface onto a `width` x `height` cell canvas.
/// Text (legend labels, tooltips) is left to the caller.
pub fn rasterize(surface: &Surface, width: usize, height: usize) -> PixelCanvas {
    let mut canvas = PixelCanvas::new(width, height);
    let view = &surface.view;
    let to_pixels = |rings: &[Vec<DVec2>]| -> Vec<Vec<DVec2>> {
        rings
            .iter()
            .map(|ring| ring.iter().map(|&p| view.to_pixel(p)).collect())
            .collect()
    };

    for layer in surface.order() {
        match layer {
            Layer::Regions => {
                for region in &surface.regions {
                    let rings: Vec<Vec<DVec2>> = region.rings().cloned().collect();
                    let rings = to_pixels(&rings);
                    let fill = region.fill.with_opacity(region.fill_opacity, BACKGROUND);
                    fill_rings(&mut canvas, &rings, fill);
                }
                // Outlines on top of every fill, like a shared stroke
                for region in &surface.regions {
                    let rings: Vec<Vec<DVec2>> = region.rings().cloned().collect();
                    stroke_rings(&mut canvas, &to_pixels(&rings), STROKE_COLOR);
                }
            }
            Layer::Legend => {
                if let Some(legend) = &surface.legend {
                    paint_legend(&mut canvas, legend, surface);
                }
            }
            Layer::TotalMarker => {
                if let Some(total) = &surface.total {
                    let triangle = to_pixels(&[total.points.to_vec()]);
                    fill_rings(&mut canvas, &triangle, MARKER_COLOR);
                    // Tiny at terminal scale: make sure the tip shows up
                    let tip = view.to_pixel(total.tip());
                    canvas.set_pixel_signed(tip.x.floor() as i32 - 1, tip.y.floor() as i32, MARKER_COLOR);
                }
            }
            Layer::PinnedTooltips | Layer::Tooltip => {}
        }
    }

    canvas
}

/// Gradient bar, at least one pixel wide
fn paint_legend(canvas: &mut PixelCanvas, legend: &Legend, surface: &Surface) {
    let view = &surface.view;
    let top_left = view.to_pixel(legend.origin);
    let bottom_right = view.to_pixel(legend.origin + DVec2::new(legend.width, legend.height));

    let x0 = top_left.x.floor() as i32;
    let x1 = (bottom_right.x.ceil() as i32).max(x0 + 1);
    let y0 = top_left.y.floor() as i32;
    let y1 = (bottom_right.y.ceil() as i32).max(y0 + 1);

    for y in y0..y1 {
        let offset = view.to_viewbox(DVec2::new(0.0, y as f64 + 0.5)).y - legend.origin.y;
        let color = legend.color_at(offset);
        for x in x0..x1 {
            canvas.set_pixel_signed(x, y, color);
        }
    }
}
