pub mod filler;
pub mod grid;
pub mod packing;

use serde::Serialize;

pub use self::filler::fill;
pub use self::packing::{
    accept_sizes, pack, target_length, AcceptedSizes, Packing, PackingEngine, RejectedItem,
};

/// A square placed on the canvas, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlacedSquare {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl PlacedSquare {
    pub fn new(x: u32, y: u32, size: u32) -> Self {
        Self { x, y, size }
    }

    pub fn right(&self) -> u32 {
        self.x + self.size
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.size
    }

    pub fn area(&self) -> u64 {
        u64::from(self.size) * u64::from(self.size)
    }

    /// Axis-aligned overlap test. Squares that only share an edge do not overlap.
    pub fn overlaps(&self, other: &PlacedSquare) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Smallest width × height enclosing every placed square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoundingSize {
    pub width: u32,
    pub height: u32,
}

impl BoundingSize {
    /// Bounding size of an arbitrary set of squares.
    pub fn of(squares: &[PlacedSquare]) -> Self {
        squares.iter().fold(Self::default(), |acc, sq| Self {
            width: acc.width.max(sq.right()),
            height: acc.height.max(sq.bottom()),
        })
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Count overlapping pairs. Quadratic; meant for diagnostics and tests.
pub fn count_overlaps(squares: &[PlacedSquare]) -> usize {
    let mut count = 0;
    for (i, a) in squares.iter().enumerate() {
        count += squares[i + 1..].iter().filter(|b| a.overlaps(b)).count();
    }
    count
}
