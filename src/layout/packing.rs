use serde::Serialize;

use super::grid::{FreeSlot, SlotGrid, SlotId};
use super::{BoundingSize, PlacedSquare};
use crate::config::InvalidSizePolicy;
use crate::error::{PlotError, Result};

/// An input item that was not packed because its size is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RejectedItem {
    pub index: usize,
    pub size: i64,
}

/// Output of a packing run.
#[derive(Debug, Clone, Serialize)]
pub struct Packing {
    /// Placed squares in input order (rejected items excluded)
    pub squares: Vec<PlacedSquare>,
    /// squares[i] came from input item items[i]
    pub items: Vec<usize>,
    /// Realized canvas extent
    pub bounding: BoundingSize,
    /// Initial target side length, ceil(sqrt(Σ size²))
    pub length: u32,
    /// Items skipped for having a non-positive size
    pub rejected: Vec<RejectedItem>,
    /// Placements that found no slot and fell back to (0, 0)
    pub fallback_placements: usize,
}

impl Packing {
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

/// Side length of the smallest square whose area covers Σ size².
pub fn target_length(sizes: &[u32]) -> u32 {
    let weight = sizes
        .iter()
        .fold(0u64, |acc, &s| acc.saturating_add(u64::from(s) * u64::from(s)));
    ceil_sqrt(weight)
}

fn ceil_sqrt(n: u64) -> u32 {
    let mut root = (n as f64).sqrt() as u64;
    // Correct float rounding in either direction.
    while root * root > n {
        root -= 1;
    }
    while root * root < n {
        root += 1;
    }
    u32::try_from(root).unwrap_or(u32::MAX)
}

/// Greedy row-based square packer.
///
/// Each item goes into the first free slot (row-major) that is large enough.
/// The square keeps the slot's top-left corner; the rest of the slot and any
/// neighbours it cuts through are re-expressed as square slots.
#[derive(Debug)]
pub struct PackingEngine {
    grid: SlotGrid,
    width: u32,
    height: u32,
    squares: Vec<PlacedSquare>,
    fallbacks: usize,
}

impl PackingEngine {
    /// Engine whose rows are seeded `length` cells wide.
    pub fn new(length: u32) -> Self {
        Self {
            grid: SlotGrid::new(length),
            width: 0,
            height: 0,
            squares: Vec::new(),
            fallbacks: 0,
        }
    }

    /// Engine sized for the given items. Does not place them.
    pub fn for_sizes(sizes: &[u32]) -> Self {
        Self::new(target_length(sizes))
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn squares(&self) -> &[PlacedSquare] {
        &self.squares
    }

    pub fn bounding_size(&self) -> BoundingSize {
        BoundingSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn fallback_count(&self) -> usize {
        self.fallbacks
    }

    /// Place one square of side `size` (must be > 0).
    pub fn place(&mut self, size: u32) -> PlacedSquare {
        debug_assert!(size > 0, "zero-sized squares are rejected before placement");

        let square = match self.grid.first_fit(size) {
            Some(id) => self.fill_slot(id, size),
            None => self.place_in_new_row(size),
        };

        self.width = self.width.max(square.right());
        self.height = self.height.max(square.bottom());
        self.squares.push(square);
        square
    }

    fn place_in_new_row(&mut self, size: u32) -> PlacedSquare {
        let y = self.grid.add_row();
        let seeded = self.grid.add_slot(FreeSlot {
            x: 0,
            y,
            size: self.grid.length(),
        });

        match seeded {
            Some(id) if self.grid.slot(id).size >= size => self.fill_slot(id, size),
            _ => {
                // The area estimate under-provisioned the canvas. Overlap is accepted.
                self.fallbacks += 1;
                tracing::warn!(
                    size,
                    length = self.grid.length(),
                    fallbacks = self.fallbacks,
                    "SlotNotFound: no slot fits, placing square at origin"
                );
                PlacedSquare::new(0, 0, size)
            }
        }
    }

    /// Carve a `size` square out of the top-left corner of `id` and redistribute
    /// the free space it displaces.
    fn fill_slot(&mut self, id: SlotId, size: u32) -> PlacedSquare {
        let slot = *self.grid.slot(id);
        debug_assert!(slot.size >= size);

        self.grid.remove_slot(id);

        for y in slot.y..slot.y + size {
            if self.grid.has_row(y) {
                self.trim_row(y, slot, size);
            } else {
                self.open_row(y, slot, size);
            }
        }

        self.split_slots_above(slot, size);

        PlacedSquare::new(slot.x, slot.y, size)
    }

    /// Row `y` already exists: cut every slot reaching into the new square back to
    /// its left edge, and keep the space right of the square free.
    fn trim_row(&mut self, y: u32, slot: FreeSlot, size: u32) {
        let left = slot.x;
        let right = slot.x + size;
        let length = self.grid.length();

        let mut collisions = Vec::new();
        let mut excess = 0;
        if let Some(row) = self.grid.row(y) {
            for &other in row.slots() {
                let test = self.grid.slot(other);
                // Slots touching the left edge count as collisions too.
                if test.right() >= left && test.x < right {
                    collisions.push(other);
                    excess = excess.max(test.right().saturating_sub(slot.right()));
                }
            }
        }

        if right < length && self.grid.slot_at(right, y).is_none() {
            self.grid.add_slot(FreeSlot {
                x: right,
                y,
                size: slot.size - size + excess,
            });
        }

        for other in collisions {
            let start = self.grid.slot(other).x;
            if start >= left {
                self.grid.remove_slot(other);
            } else {
                self.grid.set_slot_size(other, left - start);
            }
        }
    }

    /// Row `y` is new: everything but the square's columns is free.
    fn open_row(&mut self, y: u32, slot: FreeSlot, size: u32) {
        let opened = self.grid.add_row();
        debug_assert_eq!(opened, y, "rows are opened contiguously");

        let right = slot.x + size;
        let length = self.grid.length();
        if slot.x > 0 {
            self.grid.add_slot(FreeSlot {
                x: 0,
                y,
                size: slot.x,
            });
        }
        if right < length {
            self.grid.add_slot(FreeSlot {
                x: right,
                y,
                size: length - right,
            });
        }
    }

    /// Slots in the rows above that hang down into the new square are clipped to
    /// end at its top edge. The strip they lose on the right is re-covered with
    /// squares so the free space model stays square-only.
    fn split_slots_above(&mut self, slot: FreeSlot, size: u32) {
        let right = slot.x + size;

        for y in slot.y.saturating_sub(size)..slot.y {
            if !self.grid.has_row(y) {
                continue;
            }

            // Carved squares may land in this row; the live length is re-read each step.
            let mut i = 0;
            while let Some(other) = self.grid.row_slot(y, i) {
                i += 1;
                let test = *self.grid.slot(other);
                if test.x >= right || test.right() <= slot.x || test.bottom() < slot.y {
                    continue;
                }

                let clipped = slot.y - test.y;
                self.grid.set_slot_size(other, clipped);
                self.cover_strip(test.x + clipped, test.y, test.size - clipped, clipped);
            }
        }
    }

    /// Cover a `width` × `height` rectangle with free square slots, greedily
    /// taking the largest square along the shorter side.
    fn cover_strip(&mut self, mut x: u32, mut y: u32, mut width: u32, mut height: u32) {
        while width > 0 && height > 0 {
            if width <= height {
                self.grid.add_slot(FreeSlot { x, y, size: width });
                y += width;
                height -= width;
            } else {
                self.grid.add_slot(FreeSlot { x, y, size: height });
                x += height;
                width -= height;
            }
        }
    }

    /// Consume the engine, returning the placed squares in placement order.
    pub fn into_squares(self) -> Vec<PlacedSquare> {
        self.squares
    }
}

/// Item sizes split into packable and rejected entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedSizes {
    /// Positive sizes, in input order
    pub sizes: Vec<u32>,
    /// sizes[i] came from input item items[i]
    pub items: Vec<usize>,
    pub rejected: Vec<RejectedItem>,
}

/// Validate item sizes. Sizes that are not positive or do not fit in `u32` are
/// rejected per `policy`, with a warning logged for each skipped item.
pub fn accept_sizes(sizes: &[i64], policy: InvalidSizePolicy) -> Result<AcceptedSizes> {
    let mut accepted = AcceptedSizes {
        sizes: Vec::with_capacity(sizes.len()),
        items: Vec::with_capacity(sizes.len()),
        rejected: Vec::new(),
    };

    for (index, &size) in sizes.iter().enumerate() {
        match u32::try_from(size) {
            Ok(valid) if valid > 0 => {
                accepted.sizes.push(valid);
                accepted.items.push(index);
            }
            _ => {
                if policy == InvalidSizePolicy::Abort {
                    return Err(PlotError::InvalidItemSize { index, size });
                }
                tracing::warn!(index, size, "InvalidItemSize: item rejected");
                accepted.rejected.push(RejectedItem { index, size });
            }
        }
    }
    Ok(accepted)
}

/// Pack a sequence of item sizes.
///
/// Non-positive sizes are handled per `policy`: `Skip` records them in
/// [`Packing::rejected`] and continues, `Abort` returns
/// [`PlotError::InvalidItemSize`] for the first one.
pub fn pack(sizes: &[i64], policy: InvalidSizePolicy) -> Result<Packing> {
    let AcceptedSizes {
        sizes: accepted,
        items,
        rejected,
    } = accept_sizes(sizes, policy)?;

    let mut engine = PackingEngine::for_sizes(&accepted);
    for &size in &accepted {
        engine.place(size);
    }

    let bounding = engine.bounding_size();
    let length = engine.grid().length();
    let fallback_placements = engine.fallback_count();

    tracing::debug!(
        items = sizes.len(),
        placed = accepted.len(),
        rejected = rejected.len(),
        length,
        width = bounding.width,
        height = bounding.height,
        rows = engine.grid().row_count(),
        "packing complete"
    );

    Ok(Packing {
        squares: engine.into_squares(),
        items,
        bounding,
        length,
        rejected,
        fallback_placements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::layout::count_overlaps;

    fn squares(list: &[(u32, u32, u32)]) -> Vec<PlacedSquare> {
        list.iter().map(|&(x, y, s)| PlacedSquare::new(x, y, s)).collect()
    }

    #[test]
    fn target_length_is_ceil_sqrt_of_weight() {
        assert_eq!(target_length(&[5, 5, 4, 1]), 9);
        assert_eq!(target_length(&[3, 4]), 5);
        assert_eq!(target_length(&[1]), 1);
        assert_eq!(target_length(&[]), 0);
        assert_eq!(ceil_sqrt(10_000_000_001), 100_001);
    }

    #[test]
    fn packs_5_5_4_1() {
        let packing = pack(&[5, 5, 4, 1], InvalidSizePolicy::Skip).unwrap();
        assert_eq!(packing.length, 9);
        assert_eq!(
            packing.squares,
            squares(&[(0, 0, 5), (0, 5, 5), (5, 0, 4), (5, 4, 1)])
        );
        assert_eq!(packing.bounding, BoundingSize { width: 9, height: 10 });
        assert_eq!(count_overlaps(&packing.squares), 0);
    }

    #[test]
    fn packs_small_squares_into_gaps() {
        let packing = pack(&[2, 1, 1, 1, 1, 2], InvalidSizePolicy::Skip).unwrap();
        assert_eq!(
            packing.squares,
            squares(&[(0, 0, 2), (2, 0, 1), (3, 0, 1), (2, 1, 1), (3, 1, 1), (0, 2, 2)])
        );
        assert_eq!(packing.bounding, BoundingSize { width: 4, height: 4 });
    }

    #[test]
    fn equal_squares_tile_exactly() {
        let packing = pack(&[3, 3, 3, 3], InvalidSizePolicy::Skip).unwrap();
        assert_eq!(packing.bounding, BoundingSize { width: 6, height: 6 });
        assert_eq!(
            packing.squares,
            squares(&[(0, 0, 3), (3, 0, 3), (0, 3, 3), (3, 3, 3)])
        );
    }

    #[test]
    fn preserves_order_and_size() {
        let sizes = fixtures::sizes_282();
        let packing = pack(&sizes, InvalidSizePolicy::Skip).unwrap();
        assert_eq!(packing.len(), sizes.len());
        for (square, &size) in packing.squares.iter().zip(&sizes) {
            assert_eq!(i64::from(square.size), size);
        }
        assert_eq!(count_overlaps(&packing.squares), 0);
        assert_eq!(packing.length, 70);
        assert_eq!(packing.bounding, BoundingSize { width: 70, height: 79 });
        assert_eq!(packing.fallback_placements, 0);
    }

    #[test]
    fn skip_policy_reports_rejected_items() {
        let packing = pack(&[4, 0, 3, -2], InvalidSizePolicy::Skip).unwrap();
        assert_eq!(packing.len(), 2);
        assert_eq!(packing.items, vec![0, 2]);
        assert_eq!(
            packing.rejected,
            vec![
                RejectedItem { index: 1, size: 0 },
                RejectedItem { index: 3, size: -2 }
            ]
        );
        assert_eq!(packing.length, 5);
    }

    #[test]
    fn accept_sizes_rejects_zero_and_oversized() {
        let too_big = i64::from(u32::MAX) + 1;
        let accepted = accept_sizes(&[2, 0, too_big, 7], InvalidSizePolicy::Skip).unwrap();
        assert_eq!(accepted.sizes, vec![2, 7]);
        assert_eq!(accepted.items, vec![0, 3]);
        assert_eq!(
            accepted.rejected,
            vec![
                RejectedItem { index: 1, size: 0 },
                RejectedItem { index: 2, size: too_big }
            ]
        );
    }

    #[test]
    fn abort_policy_fails_on_first_invalid_item() {
        let err = pack(&[4, 3, 0, -1], InvalidSizePolicy::Abort).unwrap_err();
        assert_eq!(err, PlotError::InvalidItemSize { index: 2, size: 0 });
    }

    #[test]
    fn oversized_item_falls_back_to_origin() {
        let mut engine = PackingEngine::new(3);
        let square = engine.place(5);
        assert_eq!(square, PlacedSquare::new(0, 0, 5));
        assert_eq!(engine.fallback_count(), 1);
        assert_eq!(engine.bounding_size(), BoundingSize { width: 5, height: 5 });
    }

    #[test]
    fn empty_input_packs_nothing() {
        let packing = pack(&[], InvalidSizePolicy::Skip).unwrap();
        assert!(packing.is_empty());
        assert_eq!(packing.bounding, BoundingSize::default());
    }

    #[test]
    fn first_row_keeps_free_space_right_of_square() {
        let mut engine = PackingEngine::new(9);
        engine.place(5);
        let grid = engine.grid();
        assert_eq!(grid.row_count(), 5);
        for y in 0..5 {
            let id = grid.slot_at(5, y).expect("slot right of square");
            assert_eq!(grid.slot(id).size, 4);
        }
    }
}
