use crate::map::geometry::Bounds;
use glam::DVec2;
use std::collections::HashMap;

/// Spatial index for region shapes using conservative approximation.
/// Each shape's bounding box is indexed into every cell it overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the exact point-in-polygon test afterwards).
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let x = (p.x / self.cell_size).floor() as i32;
        let y = (p.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from feature bounding boxes (each feature inserted into every
    /// cell its bbox overlaps). Empty boxes are skipped.
    pub fn build<'a>(bounds: impl Iterator<Item = &'a Bounds>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, bbox) in bounds.enumerate() {
            if bbox.is_empty() {
                continue;
            }
            let min_cell = grid.to_cell(bbox.min);
            let max_cell = grid.to_cell(bbox.max);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Candidate feature indices at a point, in insertion order
    pub fn query_point(&self, p: DVec2) -> &[usize] {
        self.cells
            .get(&self.to_cell(p))
            .map_or(&[], |indices| indices.as_slice())
    }
}
