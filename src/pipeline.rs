use serde::Serialize;

use crate::config::{NumberingKey, PipelineConfig};
use crate::error::Result;
use crate::layout::{self, BoundingSize, Packing, PlacedSquare, RejectedItem};
use crate::numbering::{self, NumberMap};

/// One packed item with its plot number and render-space placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumberedPlot {
    /// Index of the item in the input sequence
    pub item: usize,
    pub plot_number: u32,
    /// Grid-space square
    pub square: PlacedSquare,
    /// Render-space cube centre [x, height/2, z]
    pub center: [f64; 3],
    /// Render-space side length
    pub extent: f64,
}

/// Non-fatal conditions observed during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Items dropped for a non-positive size (InvalidItemSize)
    pub rejected: Vec<RejectedItem>,
    /// Placements that found no slot (SlotNotFound)
    pub slot_fallbacks: usize,
    /// Squares numbered by the repair pass (UnassignedSquare)
    pub unassigned_squares: usize,
    /// Occupancy cells claimed by more than one square
    pub overlapping_cells: usize,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
            && self.slot_fallbacks == 0
            && self.unassigned_squares == 0
            && self.overlapping_cells == 0
    }

    /// Emit the counts as structured log fields.
    pub fn log(&self) {
        if self.is_clean() {
            tracing::debug!("pipeline diagnostics clean");
        } else {
            tracing::warn!(
                rejected = self.rejected.len(),
                slot_fallbacks = self.slot_fallbacks,
                unassigned_squares = self.unassigned_squares,
                overlapping_cells = self.overlapping_cells,
                "pipeline needed defensive repair"
            );
        }
    }
}

/// Result of a full pack → number run. Collaborators read from here instead of
/// repeating the raster scan.
#[derive(Debug, Clone, Serialize)]
pub struct PlotMap {
    pub packing: Packing,
    pub numbering: NumberMap,
    /// One entry per packed item, in input order
    pub plots: Vec<NumberedPlot>,
    pub scale_factor: f64,
    pub diagnostics: Diagnostics,
}

impl PlotMap {
    pub fn bounding(&self) -> BoundingSize {
        self.packing.bounding
    }

    /// Canvas extent in render units.
    pub fn scaled_size(&self) -> (f64, f64) {
        let b = self.packing.bounding;
        (
            f64::from(b.width) * self.scale_factor,
            f64::from(b.height) * self.scale_factor,
        )
    }

    /// Look up the plot carrying `number` ("go to plot").
    pub fn find_by_number(&self, number: u32) -> Option<&NumberedPlot> {
        let index = self.numbering.square_index(number)?;
        self.plots.get(index)
    }

    /// The plot built from input item `item`, if it was packed.
    pub fn find_by_item(&self, item: usize) -> Option<&NumberedPlot> {
        let index = self.packing.items.binary_search(&item).ok()?;
        self.plots.get(index)
    }

    /// Placed squares followed by filler squares covering every empty canvas cell.
    pub fn filled(&self, best_fit: bool) -> Vec<PlacedSquare> {
        layout::fill(&self.packing.squares, self.packing.bounding, best_fit)
    }
}

/// Pack `sizes` and number the result.
pub fn run(sizes: &[i64], config: &PipelineConfig) -> Result<PlotMap> {
    config.validate()?;

    let packing = layout::pack(sizes, config.invalid_sizes)?;
    let numbering = match config.numbering {
        NumberingKey::Raster => numbering::resolve(&packing.squares, config.scale_factor)?,
        NumberingKey::Placement => numbering::resolve_by_placement(&packing.squares),
    };

    let k = config.scale_factor;
    let plots = packing
        .squares
        .iter()
        .zip(&packing.items)
        .zip(numbering.numbers())
        .map(|((&square, &item), &plot_number)| {
            let half = f64::from(square.size) / 2.0;
            NumberedPlot {
                item,
                plot_number,
                square,
                center: [
                    (f64::from(square.x) + half) * k,
                    half * k,
                    (f64::from(square.y) + half) * k,
                ],
                extent: f64::from(square.size) * k,
            }
        })
        .collect();

    let diagnostics = Diagnostics {
        rejected: packing.rejected.clone(),
        slot_fallbacks: packing.fallback_placements,
        unassigned_squares: numbering.patched_count(),
        overlapping_cells: numbering.overlapping_cells,
    };
    diagnostics.log();

    Ok(PlotMap {
        packing,
        numbering,
        plots,
        scale_factor: k,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidSizePolicy;
    use crate::error::PlotError;
    use crate::fixtures;

    #[test]
    fn plots_carry_render_space_placement() {
        let map = run(&[5, 5, 4, 1], &PipelineConfig::default()).unwrap();
        assert_eq!(map.plots.len(), 4);

        let last = map.plots[3];
        assert_eq!(last.item, 3);
        assert_eq!(last.square, PlacedSquare::new(5, 4, 1));
        assert_eq!(last.center, [110.0, 10.0, 90.0]);
        assert_eq!(last.extent, 20.0);
        assert_eq!(map.scaled_size(), (180.0, 200.0));
        assert!(map.diagnostics.is_clean());
    }

    #[test]
    fn find_by_number_inverts_numbering() {
        let map = run(&fixtures::sizes_282(), &PipelineConfig::default()).unwrap();
        for plot in &map.plots {
            let found = map.find_by_number(plot.plot_number).unwrap();
            assert_eq!(found.item, plot.item);
        }
        assert!(map.find_by_number(282).is_none());
        assert_eq!(map.find_by_number(281).unwrap().item, 278);
    }

    #[test]
    fn rejected_items_keep_original_indices() {
        let map = run(&[3, 0, 2], &PipelineConfig::default()).unwrap();
        let items: Vec<usize> = map.plots.iter().map(|p| p.item).collect();
        assert_eq!(items, vec![0, 2]);
        assert_eq!(map.find_by_item(2).unwrap().square.size, 2);
        assert!(map.find_by_item(1).is_none());
        assert_eq!(map.diagnostics.rejected.len(), 1);
        assert!(!map.diagnostics.is_clean());
    }

    #[test]
    fn strict_mode_aborts() {
        let config = PipelineConfig {
            invalid_sizes: InvalidSizePolicy::Abort,
            ..PipelineConfig::default()
        };
        assert_eq!(
            run(&[3, -1], &config).unwrap_err(),
            PlotError::InvalidItemSize { index: 1, size: -1 }
        );
    }

    #[test]
    fn oversized_scale_is_reported_as_error() {
        let config = PipelineConfig {
            scale_factor: 1e10,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            run(&[5, 5, 4, 1], &config),
            Err(PlotError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    fn placement_numbering_uses_input_order() {
        let config = PipelineConfig {
            numbering: NumberingKey::Placement,
            ..PipelineConfig::default()
        };
        let map = run(&[5, 5, 4, 1], &config).unwrap();
        let numbers: Vec<u32> = map.plots.iter().map(|p| p.plot_number).collect();
        assert_eq!(numbers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn filled_canvas_is_larger() {
        let map = run(&[5, 3, 2], &PipelineConfig::default()).unwrap();
        assert!(map.filled(true).len() > map.plots.len());
    }
}
