use crate::map::Rgb;

/// Half-block canvas for colored terminal graphics.
/// Each character cell represents a 1x2 pixel grid: the upper pixel is drawn
/// as the foreground of '▀', the lower one as its background.
pub struct PixelCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    pixels: Vec<Option<Rgb>>, // Row-major, width x height*2
}

/// One terminal cell worth of pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub upper: Option<Rgb>,
    pub lower: Option<Rgb>,
}

impl PixelCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width x height*2
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width * height * 2],
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width
    }

    pub fn pixel_height(&self) -> usize {
        self.height * 2
    }

    /// Set a pixel, ignoring coordinates outside the canvas
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x >= self.width || y >= self.pixel_height() {
            return;
        }
        self.pixels[y * self.width + x] = Some(color);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.pixel_height() {
            return None;
        }
        self.pixels[y * self.width + x]
    }

    /// Mutable pixel rows, for filling rows independently
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, Option<Rgb>> {
        self.pixels.chunks_exact_mut(self.width.max(1))
    }

    /// The pixel pair backing a character cell
    pub fn cell(&self, col: usize, row: usize) -> Cell {
        Cell {
            upper: self.pixel(col, row * 2),
            lower: self.pixel(col, row * 2 + 1),
        }
    }

    /// Iterate over all cells row by row as (col, row, cell)
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |col| (col, row, self.cell(col, row))))
    }
}
