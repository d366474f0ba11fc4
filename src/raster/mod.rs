mod canvas;
mod scene;

pub use canvas::{Cell, PixelCanvas};
pub use scene::{rasterize, BACKGROUND};
