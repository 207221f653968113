use super::{BoundingSize, PlacedSquare};

/// Row-major cell coverage for a `width × height` canvas.
struct Coverage {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Coverage {
    fn new(bounding: BoundingSize) -> Self {
        let width = bounding.width as usize;
        let height = bounding.height as usize;
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    fn is_covered(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    /// Mark a square, clipped to the canvas.
    fn mark(&mut self, x: usize, y: usize, size: usize) {
        let x1 = (x + size).min(self.width);
        let y1 = (y + size).min(self.height);
        for row in y.min(y1)..y1 {
            let offset = row * self.width;
            self.cells[offset + x.min(x1)..offset + x1].fill(true);
        }
    }

    /// Whether a `size` square at (x, y) lies inside the canvas on uncovered cells only.
    fn is_free(&self, x: usize, y: usize, size: usize) -> bool {
        if x + size > self.width || y + size > self.height {
            return false;
        }
        (y..y + size).all(|row| {
            let offset = row * self.width;
            !self.cells[offset + x..offset + x + size].iter().any(|&c| c)
        })
    }
}

/// Append filler squares over every canvas cell not covered by `squares`.
///
/// Cells are visited row-major. With `best_fit`, each filler grows to the largest
/// square of uncovered cells anchored at its top-left cell; otherwise fillers are 1×1.
/// Existing squares are copied unchanged to the front of the result.
pub fn fill(squares: &[PlacedSquare], bounding: BoundingSize, best_fit: bool) -> Vec<PlacedSquare> {
    let mut coverage = Coverage::new(bounding);
    for sq in squares {
        coverage.mark(sq.x as usize, sq.y as usize, sq.size as usize);
    }

    let mut filled = squares.to_vec();
    for y in 0..coverage.height {
        for x in 0..coverage.width {
            if coverage.is_covered(x, y) {
                continue;
            }

            let mut size = 1;
            if best_fit {
                while coverage.is_free(x, y, size + 1) {
                    size += 1;
                }
            }

            filled.push(PlacedSquare::new(x as u32, y as u32, size as u32));
            coverage.mark(x, y, size);
        }
    }

    tracing::debug!(
        original = squares.len(),
        fillers = filled.len() - squares.len(),
        best_fit,
        "filled empty canvas cells"
    );

    filled
}
