use serde::Serialize;

use crate::error::{PlotError, Result};

/// Grid units → render units. Matches the scene builder's cube scale.
pub const DEFAULT_SCALE_FACTOR: f64 = 20.0;

/// What to do with a non-positive item size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum InvalidSizePolicy {
    /// Reject the item, keep packing the rest, and report it in diagnostics.
    #[default]
    Skip,
    /// Fail the whole batch on the first invalid item.
    Abort,
}

/// How plot numbers are derived from the packed squares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum NumberingKey {
    /// First cell touched in a row-major scan of the scaled canvas.
    #[default]
    Raster,
    /// Plot number equals placement index.
    Placement,
}

/// Configuration for a pack → number run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineConfig {
    /// Multiplier applied to grid positions and sizes before rasterization
    pub scale_factor: f64,
    /// Handling of non-positive item sizes
    pub invalid_sizes: InvalidSizePolicy,
    /// Numbering order
    pub numbering: NumberingKey,
    /// Space filler grows each filler square as large as possible
    pub best_fit: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            invalid_sizes: InvalidSizePolicy::Skip,
            numbering: NumberingKey::Raster,
            best_fit: true,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        validate_scale_factor(self.scale_factor)
    }
}

pub(crate) fn validate_scale_factor(scale_factor: f64) -> Result<()> {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        Ok(())
    } else {
        Err(PlotError::InvalidScaleFactor(scale_factor))
    }
}
