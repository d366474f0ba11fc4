pub mod geometry;
mod legend;
mod projection;
mod renderer;
mod scale;
mod spatial;
pub mod surface;
pub mod svg;

pub use legend::{LEGEND_HEIGHT, LEGEND_ORIGIN, LEGEND_WIDTH};
pub use projection::{Projection, ViewTransform, VIEWBOX_HEIGHT, VIEWBOX_WIDTH};
pub use renderer::{MapRenderer, RenderOptions, Target};
pub use scale::{viridis, LinearScale, Rgb, SequentialScale};
pub use surface::{Anchor, Layer, Surface};
