use crate::error::{PlotError, Result};
use crate::layout::{BoundingSize, PlacedSquare};

/// Upper bound on occupancy cells (1 GiB of `u32`).
pub const MAX_CANVAS_CELLS: usize = 1 << 28;

/// A square projected onto integer cells of the scaled canvas.
///
/// Projection rule, shared by the stamping pass and the canvas sizing pass:
/// the minimum corner is `floor(v · k)` and the extent is `ceil(size · k)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub extent: usize,
}

impl CellRect {
    pub fn project(square: &PlacedSquare, scale: f64) -> Self {
        Self {
            x: floor_cells(f64::from(square.x) * scale),
            y: floor_cells(f64::from(square.y) * scale),
            extent: ceil_cells(f64::from(square.size) * scale),
        }
    }
}

fn floor_cells(v: f64) -> usize {
    v.floor().max(0.0) as usize
}

fn ceil_cells(v: f64) -> usize {
    v.ceil().max(0.0) as usize
}

/// Row-major occupancy array: each cell holds the index of the last square stamped on it.
#[derive(Debug)]
pub struct Occupancy {
    width: usize,
    height: usize,
    cells: Vec<u32>,
    /// Cells stamped by more than one square
    overwritten: usize,
}

impl Occupancy {
    pub const EMPTY: u32 = u32::MAX;

    /// Occupancy array covering `bounding` scaled by `scale`.
    ///
    /// Fails with [`PlotError::CanvasTooLarge`] instead of allocating more than
    /// [`MAX_CANVAS_CELLS`] cells.
    pub fn for_canvas(bounding: BoundingSize, scale: f64) -> Result<Self> {
        let width = ceil_cells(f64::from(bounding.width) * scale);
        let height = ceil_cells(f64::from(bounding.height) * scale);
        let cells = width
            .checked_mul(height)
            .filter(|&n| n <= MAX_CANVAS_CELLS)
            .ok_or(PlotError::CanvasTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![Self::EMPTY; cells],
            overwritten: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells that were stamped more than once. Non-zero means squares overlap.
    pub fn overwritten_cells(&self) -> usize {
        self.overwritten
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.cells.get(y * self.width + x) {
            Some(&Self::EMPTY) | None => None,
            Some(&index) => Some(index),
        }
    }

    /// Stamp `index` over every cell of `rect` inside the canvas. Later stamps win.
    pub fn stamp(&mut self, rect: CellRect, index: u32) {
        let x1 = rect.x.saturating_add(rect.extent).min(self.width);
        let y1 = rect.y.saturating_add(rect.extent).min(self.height);
        for y in rect.y.min(y1)..y1 {
            let offset = y * self.width;
            for cell in &mut self.cells[offset + rect.x.min(x1)..offset + x1] {
                if *cell != Self::EMPTY && *cell != index {
                    self.overwritten += 1;
                }
                *cell = index;
            }
        }
    }

    /// Non-empty cells in row-major order (y outer, x inner).
    pub fn scan(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().copied().filter(|&c| c != Self::EMPTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_floors_corner_and_ceils_extent() {
        let sq = PlacedSquare::new(1, 3, 1);
        assert_eq!(CellRect::project(&sq, 1.5), CellRect { x: 1, y: 4, extent: 2 });
        assert_eq!(CellRect::project(&sq, 20.0), CellRect { x: 20, y: 60, extent: 20 });
    }

    #[test]
    fn canvas_uses_same_rounding() {
        let occ = Occupancy::for_canvas(BoundingSize { width: 3, height: 2 }, 1.5).unwrap();
        assert_eq!((occ.width(), occ.height()), (5, 3));
    }

    #[test]
    fn oversized_canvas_is_refused() {
        let bounding = BoundingSize { width: 70, height: 79 };
        assert!(matches!(
            Occupancy::for_canvas(bounding, 1000.0),
            Err(PlotError::CanvasTooLarge { width: 70_000, height: 79_000 })
        ));
        // Cell count overflows usize.
        assert!(matches!(
            Occupancy::for_canvas(BoundingSize { width: 1, height: 1 }, 1e300),
            Err(PlotError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    fn stamp_clips_and_counts_overwrites() {
        let mut occ = Occupancy::for_canvas(BoundingSize { width: 3, height: 3 }, 1.0).unwrap();
        occ.stamp(CellRect { x: 0, y: 0, extent: 2 }, 0);
        occ.stamp(CellRect { x: 1, y: 1, extent: 5 }, 1);

        assert_eq!(occ.get(0, 0), Some(0));
        assert_eq!(occ.get(1, 1), Some(1));
        assert_eq!(occ.get(2, 2), Some(1));
        assert_eq!(occ.overwritten_cells(), 1);
        assert_eq!(occ.scan().count(), 7);
    }

    #[test]
    fn get_outside_canvas_is_none() {
        let mut occ = Occupancy::for_canvas(BoundingSize { width: 2, height: 2 }, 1.0).unwrap();
        occ.stamp(CellRect { x: 0, y: 1, extent: 1 }, 4);
        // (2, 0) would alias (0, 1) in the flat array.
        assert_eq!(occ.get(0, 1), Some(4));
        assert_eq!(occ.get(2, 0), None);
        assert_eq!(occ.get(0, 2), None);
    }
}
