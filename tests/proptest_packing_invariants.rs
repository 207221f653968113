//! Property-based invariant tests for packing and numbering.
//!
//! For any sequence of positive sizes:
//!
//! 1. One square per item, same order, same size.
//! 2. No two placed squares overlap.
//! 3. The canvas holds the largest item and stays within 2x the target length.
//! 4. Raster numbering is deterministic.
//! 5. Numbers form exactly 0..N-1 and the verifier agrees.
//! 6. Out-of-range plot numbers never exist.
//! 7. The space filler covers the canvas exactly once.

use plotmap_rs::config::{InvalidSizePolicy, PipelineConfig};
use plotmap_rs::layout::{count_overlaps, fill, pack, BoundingSize, PlacedSquare};
use plotmap_rs::numbering::resolve;
use plotmap_rs::verify::{check_report, verify_with};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn sizes_strategy() -> impl Strategy<Value = Vec<i64>> {
    (1i64..=32).prop_flat_map(|max| prop::collection::vec(1..=max, 1..=500))
}

fn small_sizes_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..=8, 1..=60)
}

fn unit_config() -> PipelineConfig {
    PipelineConfig {
        scale_factor: 1.0,
        ..PipelineConfig::default()
    }
}

fn coverage_is_exact(squares: &[PlacedSquare], bounding: BoundingSize) -> bool {
    let w = bounding.width as usize;
    let mut counts = vec![0u8; w * bounding.height as usize];
    for sq in squares {
        for y in sq.y..sq.bottom() {
            for x in sq.x..sq.right() {
                let cell = &mut counts[y as usize * w + x as usize];
                *cell = cell.saturating_add(1);
            }
        }
    }
    counts.iter().all(|&c| c == 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn order_and_size_are_preserved(sizes in sizes_strategy()) {
        let packing = pack(&sizes, InvalidSizePolicy::Skip).unwrap();
        prop_assert_eq!(packing.squares.len(), sizes.len());
        for (i, (sq, &size)) in packing.squares.iter().zip(&sizes).enumerate() {
            prop_assert_eq!(i64::from(sq.size), size, "item {} changed size", i);
        }
        prop_assert!(packing.rejected.is_empty());
    }

    #[test]
    fn placed_squares_never_overlap(sizes in sizes_strategy()) {
        let packing = pack(&sizes, InvalidSizePolicy::Skip).unwrap();
        prop_assert_eq!(count_overlaps(&packing.squares), 0);
        prop_assert_eq!(packing.fallback_placements, 0);
    }

    #[test]
    fn bounding_size_is_bounded(sizes in sizes_strategy()) {
        let packing = pack(&sizes, InvalidSizePolicy::Skip).unwrap();
        let largest = *sizes.iter().max().unwrap() as u32;
        let b = packing.bounding;
        prop_assert!(b.width >= largest && b.height >= largest);
        prop_assert!(b.width <= 2 * packing.length, "width {} vs length {}", b.width, packing.length);
        prop_assert!(b.height <= 2 * packing.length, "height {} vs length {}", b.height, packing.length);
        prop_assert_eq!(b, BoundingSize::of(&packing.squares));
    }

    #[test]
    fn resolve_is_idempotent(sizes in sizes_strategy(), scale in prop_oneof![Just(1.0), Just(2.5), Just(4.0)]) {
        let packing = pack(&sizes, InvalidSizePolicy::Skip).unwrap();
        let first = resolve(&packing.squares, scale).unwrap();
        let second = resolve(&packing.squares, scale).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn numbering_is_a_bijection(sizes in sizes_strategy()) {
        let report = verify_with(&sizes, &unit_config()).unwrap();
        prop_assert!(report.is_correct, "{}", report.summary());
        prop_assert_eq!(report.highest_number, Some(sizes.len() as u32 - 1));
        prop_assert_eq!(report.diagnostics.unassigned_squares, 0);
        prop_assert_eq!(report.diagnostics.overlapping_cells, 0);
    }

    #[test]
    fn out_of_range_numbers_never_exist(sizes in small_sizes_strategy(), offset in 0i64..1000) {
        let report = verify_with(&sizes, &unit_config()).unwrap();
        let n = sizes.len() as i64;
        for number in [n + offset, -1 - offset] {
            let check = check_report(&report, number);
            prop_assert!(!check.in_range);
            prop_assert!(!check.exists);
        }
    }

    #[test]
    fn filler_covers_canvas_exactly_once(sizes in small_sizes_strategy(), best_fit in any::<bool>()) {
        let packing = pack(&sizes, InvalidSizePolicy::Skip).unwrap();
        let filled = fill(&packing.squares, packing.bounding, best_fit);
        prop_assert!(filled.len() >= packing.squares.len());
        prop_assert_eq!(&filled[..packing.squares.len()], &packing.squares[..]);
        prop_assert!(coverage_is_exact(&filled, packing.bounding));
    }
}
