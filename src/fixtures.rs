//! Historical default size sequences, kept as regression inputs.
//!
//! The 281-item sequence predates the final item being appended; the
//! 282-item sequence is the current default canvas.

/// The current default canvas (282 items).
pub const DEFAULT_SIZES: [i64; 282] = [
    5, 6, 6, 5, 6, 5, 7, 5, 5, 6, 6, 8, 5, 5, 5, 5, 6, 5, 4, 6,
    5, 5, 5, 5, 5, 6, 5, 5, 5, 5, 5, 7, 5, 7, 5, 5, 5, 5, 5, 5,
    5, 5, 5, 4, 5, 5, 5, 5, 5, 5, 5, 4, 5, 5, 4, 5, 5, 5, 5, 4,
    4, 5, 4, 6, 4, 5, 4, 5, 5, 4, 4, 4, 5, 5, 6, 5, 5, 4, 4, 6,
    5, 4, 5, 5, 5, 4, 5, 4, 5, 5, 4, 4, 4, 4, 4, 3, 4, 3, 3, 3,
    5, 5, 4, 3, 3, 3, 2, 3, 4, 3, 5, 4, 3, 3, 3, 4, 3, 4, 5, 2,
    4, 5, 5, 5, 5, 5, 4, 5, 4, 4, 4, 4, 3, 4, 3, 5, 5, 4, 5, 4,
    4, 3, 5, 4, 4, 5, 5, 5, 5, 3, 4, 5, 5, 3, 4, 4, 5, 2, 3, 5,
    4, 5, 5, 5, 5, 4, 4, 3, 4, 4, 3, 4, 4, 3, 3, 3, 4, 3, 4, 3,
    4, 4, 4, 4, 4, 3, 3, 4, 3, 4, 4, 4, 4, 4, 4, 4, 3, 4, 4, 4,
    4, 4, 3, 3, 3, 4, 4, 4, 4, 4, 3, 3, 3, 3, 4, 3, 3, 4, 3, 3,
    4, 3, 4, 1, 3, 3, 3, 4, 2, 4, 3, 4, 5, 2, 3, 4, 3, 3, 3, 4,
    3, 3, 4, 3, 2, 2, 2, 3, 3, 2, 2, 3, 3, 2, 2, 2, 4, 3, 3, 3,
    1, 3, 2, 1, 1, 1, 1, 1, 4, 2, 3, 1, 2, 1, 2, 4, 2, 2, 8, 3,
    3, 4,
];

/// Number of items in the earlier default sequence.
pub const LEGACY_LEN: usize = 281;

/// The earlier 281-item default sequence.
pub fn sizes_281() -> Vec<i64> {
    DEFAULT_SIZES[..LEGACY_LEN].to_vec()
}

/// The current 282-item default sequence.
pub fn sizes_282() -> Vec<i64> {
    DEFAULT_SIZES.to_vec()
}
