use glam::DVec2;
use std::f64::consts::FRAC_PI_4;

/// Logical size of the drawing surface
pub const VIEWBOX_WIDTH: f64 = 900.0;
pub const VIEWBOX_HEIGHT: f64 = 1000.0;

/// Mercator projection into viewbox units.
/// `scale` is in viewbox units per radian; `center` lands on `translate`.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    /// Center longitude
    pub center_lon: f64,
    /// Center latitude
    pub center_lat: f64,
    pub scale: f64,
    pub translate: DVec2,
}

impl Projection {
    pub fn mercator(center_lon: f64, center_lat: f64, scale: f64, translate: DVec2) -> Self {
        Self {
            center_lon,
            center_lat,
            scale,
            translate,
        }
    }

    /// Germany fitted into the left part of the viewbox, leaving room for the legend
    pub fn germany() -> Self {
        Self::mercator(10.45, 51.16, 4000.0, DVec2::new(400.0, VIEWBOX_HEIGHT / 2.0))
    }

    /// Raw Mercator ordinate of a latitude
    fn mercator_y(lat: f64) -> f64 {
        (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
    }

    /// Project a geographic coordinate (lon, lat) to viewbox coordinates
    pub fn project(&self, lon: f64, lat: f64) -> DVec2 {
        let x = (lon - self.center_lon).to_radians();
        let y = Self::mercator_y(lat) - Self::mercator_y(self.center_lat);
        DVec2::new(
            self.translate.x + x * self.scale,
            self.translate.y - y * self.scale,
        )
    }

    /// Unproject viewbox coordinates back to (lon, lat)
    pub fn unproject(&self, point: DVec2) -> (f64, f64) {
        let x = (point.x - self.translate.x) / self.scale;
        let y = (self.translate.y - point.y) / self.scale + Self::mercator_y(self.center_lat);
        let lon = self.center_lon + x.to_degrees();
        let lat = (2.0 * y.exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
        (lon, lat)
    }
}

/// Placement of the viewbox inside a pixel area (`xMidYMid meet`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Pixel width of the mount area
    pub width: f64,
    /// Pixel height of the mount area
    pub height: f64,
    /// Pixels per viewbox unit
    pub scale: f64,
    /// Pixel position of the viewbox origin
    pub offset: DVec2,
}

impl ViewTransform {
    /// Fit the viewbox uniformly and centered into `width` x `height` pixels
    pub fn fit(width: f64, height: f64) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let scale = (width / VIEWBOX_WIDTH).min(height / VIEWBOX_HEIGHT);
        let offset = DVec2::new(
            (width - VIEWBOX_WIDTH * scale) / 2.0,
            (height - VIEWBOX_HEIGHT * scale) / 2.0,
        );
        Self {
            width,
            height,
            scale,
            offset,
        }
    }

    pub fn to_pixel(&self, point: DVec2) -> DVec2 {
        point * self.scale + self.offset
    }

    pub fn to_viewbox(&self, pixel: DVec2) -> DVec2 {
        (pixel - self.offset) / self.scale
    }
}
