use crate::map::Rgb;
use crate::raster::PixelCanvas;
use glam::DVec2;
use rayon::prelude::*;

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: DVec2::splat(f64::INFINITY),
        max: DVec2::splat(f64::NEG_INFINITY),
    };

    pub fn of_rings(rings: &[Vec<DVec2>]) -> Self {
        rings
            .iter()
            .flatten()
            .fold(Self::EMPTY, |b, &p| Bounds {
                min: b.min.min(p),
                max: b.max.max(p),
            })
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }
}

/// Even-odd point-in-polygon test over any number of rings
pub fn contains_point(rings: &[Vec<DVec2>], p: DVec2) -> bool {
    let mut inside = false;
    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
    }
    inside
}

/// Signed shoelace area and area-weighted centroid of a ring
fn ring_moments(ring: &[DVec2]) -> (f64, DVec2) {
    let mut area = 0.0;
    let mut centroid = DVec2::ZERO;
    for (i, &a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        let cross = a.perp_dot(b);
        area += cross;
        centroid += (a + b) * cross;
    }
    (area / 2.0, centroid / 6.0)
}

/// Visual centroid of a region: exteriors add area, holes subtract it.
/// `polygons` holds rings per polygon with the exterior first.
/// Degenerate shapes fall back to the bounding-box center.
pub fn centroid(polygons: &[Vec<Vec<DVec2>>]) -> DVec2 {
    let mut total_area = 0.0;
    let mut weighted = DVec2::ZERO;

    for rings in polygons {
        for (idx, ring) in rings.iter().enumerate() {
            if ring.len() < 3 {
                continue;
            }
            let (area, moment) = ring_moments(ring);
            // Orientation is not trusted: normalize so exteriors count positive
            let sign = if idx == 0 { 1.0 } else { -1.0 } * area.signum();
            total_area += sign * area;
            weighted += sign * moment;
        }
    }

    if total_area.abs() < f64::EPSILON {
        let all: Vec<Vec<DVec2>> = polygons.iter().flatten().cloned().collect();
        return Bounds::of_rings(&all).center();
    }
    weighted / total_area
}

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut PixelCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Stroke every ring as a closed outline
pub fn stroke_rings(canvas: &mut PixelCanvas, rings: &[Vec<DVec2>], color: Rgb) {
    for ring in rings {
        if ring.len() < 2 {
            continue;
        }
        for (i, a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            draw_line(
                canvas,
                a.x.round() as i32,
                a.y.round() as i32,
                b.x.round() as i32,
                b.y.round() as i32,
                color,
            );
        }
    }
}

/// Scanline fill (even-odd) of rings given in pixel coordinates.
/// Rows are filled in parallel; pixel centers are sampled at +0.5.
pub fn fill_rings(canvas: &mut PixelCanvas, rings: &[Vec<DVec2>], color: Rgb) {
    let bounds = Bounds::of_rings(rings);
    if bounds.is_empty() {
        return;
    }
    let width = canvas.pixel_width();
    let first_row = bounds.min.y.floor().max(0.0) as usize;
    let last_row = (bounds.max.y.ceil().max(0.0) as usize).min(canvas.pixel_height());

    canvas
        .rows_mut()
        .enumerate()
        .skip(first_row)
        .take(last_row.saturating_sub(first_row))
        .par_bridge()
        .for_each(|(y, row)| {
            let sample_y = y as f64 + 0.5;
            let mut crossings = Vec::new();
            for ring in rings {
                if ring.len() < 3 {
                    continue;
                }
                for (i, &a) in ring.iter().enumerate() {
                    let b = ring[(i + 1) % ring.len()];
                    if (a.y > sample_y) != (b.y > sample_y) {
                        crossings.push(a.x + (sample_y - a.y) * (b.x - a.x) / (b.y - a.y));
                    }
                }
            }
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as usize;
                let end = ((span[1] - 0.5).floor() + 1.0).max(0.0) as usize;
                for pixel in row.iter_mut().take(end.min(width)).skip(start) {
                    *pixel = Some(color);
                }
            }
        });
}
