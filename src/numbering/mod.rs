pub mod raster;

use serde::Serialize;

use self::raster::{CellRect, Occupancy};
use crate::config::validate_scale_factor;
use crate::error::Result;
use crate::layout::{BoundingSize, PlacedSquare};

/// Square index ↔ plot number mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberMap {
    /// square index → plot number
    numbers: Vec<u32>,
    /// plot number → square index
    squares: Vec<usize>,
    /// Squares the raster scan never reached, numbered afterwards in index order
    pub patched: Vec<usize>,
    /// Occupancy cells stamped by more than one square
    pub overlapping_cells: usize,
}

impl NumberMap {
    fn from_numbers(numbers: Vec<Option<u32>>, patched: Vec<usize>, overlapping_cells: usize) -> Self {
        let numbers: Vec<u32> = numbers.into_iter().flatten().collect();
        let mut squares = vec![0; numbers.len()];
        for (index, &number) in numbers.iter().enumerate() {
            squares[number as usize] = index;
        }
        Self {
            numbers,
            squares,
            patched,
            overlapping_cells,
        }
    }

    /// Plot number of the square at `index`.
    pub fn plot_number(&self, index: usize) -> Option<u32> {
        self.numbers.get(index).copied()
    }

    /// Square index carrying plot number `number`.
    pub fn square_index(&self, number: u32) -> Option<usize> {
        self.squares.get(number as usize).copied()
    }

    /// Plot numbers in square order.
    pub fn numbers(&self) -> &[u32] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Squares numbered by the repair pass instead of the scan.
    pub fn patched_count(&self) -> usize {
        self.patched.len()
    }
}

/// Number squares in the order a row-major scan of the scaled canvas first meets them.
///
/// Each square is projected with [`CellRect::project`] and stamped, in index
/// order, onto an occupancy array sized to the scaled bounding box; later squares
/// overwrite earlier ones. The scan hands out numbers 0, 1, 2, … as new indices
/// appear. Squares that never appear (zero extent, fully overwritten) are then
/// numbered in index order so the result always stays dense.
pub fn resolve(squares: &[PlacedSquare], scale_factor: f64) -> Result<NumberMap> {
    validate_scale_factor(scale_factor)?;

    let bounding = BoundingSize::of(squares);
    let mut occupancy = Occupancy::for_canvas(bounding, scale_factor)?;
    for (index, square) in squares.iter().enumerate() {
        occupancy.stamp(CellRect::project(square, scale_factor), index as u32);
    }

    let mut numbers: Vec<Option<u32>> = vec![None; squares.len()];
    let mut next = 0u32;
    for index in occupancy.scan() {
        let slot = &mut numbers[index as usize];
        if slot.is_none() {
            *slot = Some(next);
            next += 1;
        }
    }

    let mut patched = Vec::new();
    for (index, slot) in numbers.iter_mut().enumerate() {
        if slot.is_none() {
            *slot = Some(next);
            next += 1;
            patched.push(index);
        }
    }

    let overlapping_cells = occupancy.overwritten_cells();
    if !patched.is_empty() {
        tracing::warn!(
            unassigned = patched.len(),
            first = patched[0],
            "UnassignedSquare: raster scan missed squares, numbered in repair pass"
        );
    }
    if overlapping_cells > 0 {
        tracing::warn!(overlapping_cells, "occupancy cells stamped by more than one square");
    }
    tracing::debug!(
        squares = squares.len(),
        grid_width = occupancy.width(),
        grid_height = occupancy.height(),
        scale_factor,
        "raster numbering complete"
    );

    Ok(NumberMap::from_numbers(numbers, patched, overlapping_cells))
}

/// Number squares by placement index. Always a bijection.
pub fn resolve_by_placement(squares: &[PlacedSquare]) -> NumberMap {
    let numbers = (0..squares.len() as u32).map(Some).collect();
    NumberMap::from_numbers(numbers, Vec::new(), 0)
}
