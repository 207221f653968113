use std::collections::HashMap;

/// Index into the slot arena. Uses u32 to match the grid coordinate width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub u32);

impl SlotId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A free square region available for future placement.
/// Stored in the row of its top edge; it claims `size` cells to the right and downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSlot {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl FreeSlot {
    pub fn right(&self) -> u32 {
        self.x + self.size
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.size
    }
}

/// One grid row: free slots ordered by x, plus an x → slot index for O(1) point lookup.
#[derive(Debug, Default)]
pub struct Row {
    pub y: u32,
    slots: Vec<SlotId>,
    by_x: HashMap<u32, SlotId>,
}

impl Row {
    fn new(y: u32) -> Self {
        Self {
            y,
            ..Self::default()
        }
    }

    /// Slot handles in left-to-right order.
    pub fn slots(&self) -> &[SlotId] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Row-indexed collection of free square slots.
///
/// Slots live in a flat arena and rows refer to them by [`SlotId`]. Removing a
/// slot unlinks it from its row; the arena entry is simply never referenced again.
/// Rows are appended top-to-bottom and never removed.
#[derive(Debug)]
pub struct SlotGrid {
    arena: Vec<FreeSlot>,
    rows: Vec<Row>,
    /// First valid row index (always 0, rows are only appended)
    row_offset: u32,
    /// Initial target side length, used to seed new rows
    length: u32,
}

impl SlotGrid {
    /// Create an empty grid whose rows are seeded `length` cells wide.
    pub fn new(length: u32) -> Self {
        Self {
            arena: Vec::new(),
            rows: Vec::new(),
            row_offset: 0,
            length,
        }
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Number of rows opened so far.
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, y: u32) -> Option<&Row> {
        let idx = y.checked_sub(self.row_offset)? as usize;
        self.rows.get(idx)
    }

    fn row_mut(&mut self, y: u32) -> Option<&mut Row> {
        let idx = y.checked_sub(self.row_offset)? as usize;
        self.rows.get_mut(idx)
    }

    pub fn has_row(&self, y: u32) -> bool {
        self.row(y).is_some()
    }

    /// Append a new empty row at the bottom. Returns its y coordinate.
    pub fn add_row(&mut self) -> u32 {
        let y = self.row_count() + self.row_offset;
        self.rows.push(Row::new(y));
        y
    }

    /// Get a slot by handle.
    pub fn slot(&self, id: SlotId) -> &FreeSlot {
        &self.arena[id.index()]
    }

    /// Shrink (or grow) a slot in place.
    pub fn set_slot_size(&mut self, id: SlotId, size: u32) {
        self.arena[id.index()].size = size;
    }

    /// Point lookup: the slot whose top-left corner is exactly `(x, y)`.
    pub fn slot_at(&self, x: u32, y: u32) -> Option<SlotId> {
        self.row(y)?.by_x.get(&x).copied()
    }

    /// The `i`-th slot of row `y`, left to right. Re-reads the row on every call,
    /// so it stays valid while slots are inserted during a scan.
    pub fn row_slot(&self, y: u32, i: usize) -> Option<SlotId> {
        self.row(y)?.slots.get(i).copied()
    }

    /// Insert a free slot.
    ///
    /// Zero-sized slots are ignored. If a slot already starts at the same point,
    /// that slot keeps the larger of the two sizes and its handle is returned.
    /// Returns `None` if the slot's row has not been opened yet.
    pub fn add_slot(&mut self, slot: FreeSlot) -> Option<SlotId> {
        if slot.size == 0 {
            return None;
        }

        if let Some(existing) = self.slot_at(slot.x, slot.y) {
            let merged = self.slot(existing).size.max(slot.size);
            self.set_slot_size(existing, merged);
            return Some(existing);
        }

        let id = SlotId(self.arena.len() as u32);
        let arena = &self.arena;
        let row = self.rows.get_mut(slot.y.checked_sub(self.row_offset)? as usize)?;
        let insert_at = row
            .slots
            .partition_point(|&other| arena[other.index()].x <= slot.x);
        row.slots.insert(insert_at, id);
        row.by_x.insert(slot.x, id);
        self.arena.push(slot);
        Some(id)
    }

    /// Unlink a slot from its row.
    pub fn remove_slot(&mut self, id: SlotId) {
        let FreeSlot { x, y, .. } = *self.slot(id);
        if let Some(row) = self.row_mut(y) {
            row.by_x.remove(&x);
            if let Some(pos) = row.slots.iter().position(|&other| other == id) {
                row.slots.remove(pos);
            }
        }
    }

    /// First slot that can hold a square of `size`, scanning rows top-to-bottom
    /// and each row left-to-right. No best-fit search.
    pub fn first_fit(&self, size: u32) -> Option<SlotId> {
        self.rows
            .iter()
            .flat_map(|row| row.slots.iter().copied())
            .find(|&id| self.slot(id).size >= size)
    }

    /// Snapshot of every live slot in row-major order.
    pub fn free_slots(&self) -> Vec<FreeSlot> {
        self.rows
            .iter()
            .flat_map(|row| row.slots.iter().map(|&id| *self.slot(id)))
            .collect()
    }
}
