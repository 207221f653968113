use thiserror::Error;

/// Errors that stop a pipeline run.
///
/// Recoverable conditions (fallback placements, unassigned squares, verification
/// mismatches) are not errors; they are counted in [`crate::pipeline::Diagnostics`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    /// Item sizes must be positive. Only raised under `InvalidSizePolicy::Abort`.
    #[error("item {index} has invalid size {size} (sizes must be positive)")]
    InvalidItemSize { index: usize, size: i64 },

    #[error("scale factor must be finite and positive, got {0}")]
    InvalidScaleFactor(f64),

    /// The scaled occupancy canvas would exceed [`crate::numbering::raster::MAX_CANVAS_CELLS`].
    #[error("scaled canvas {width}x{height} is too large for raster numbering")]
    CanvasTooLarge { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, PlotError>;
