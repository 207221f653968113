use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{self, Diagnostics};

/// Outcome of a numbering self-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Squares that ended up with a plot number
    pub total_placed_and_numbered: usize,
    /// Length of the input sequence
    pub expected_count: usize,
    pub is_correct: bool,
    /// Numbers in 0..expected_count that no square carries, ascending
    pub missing_numbers: Vec<u32>,
    /// Numbers carried by more than one square, ascending
    pub duplicate_numbers: Vec<u32>,
    pub highest_number: Option<u32>,
    pub diagnostics: Diagnostics,
}

impl VerificationReport {
    /// One-line summary for operators.
    pub fn summary(&self) -> String {
        if self.is_correct {
            format!(
                "all {} plots numbered 0-{}",
                self.expected_count,
                self.expected_count.saturating_sub(1)
            )
        } else {
            format!(
                "VerificationMismatch: {} of {} numbered, {} missing, {} duplicated",
                self.total_placed_and_numbered,
                self.expected_count,
                self.missing_numbers.len(),
                self.duplicate_numbers.len()
            )
        }
    }
}

/// Result of looking up a single plot number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberCheck {
    pub exists: bool,
    pub in_range: bool,
    pub total_placed_and_numbered: usize,
    pub expected_count: usize,
    pub highest_number: Option<u32>,
    pub message: String,
}

/// Verify with the default configuration.
pub fn verify(sizes: &[i64]) -> VerificationReport {
    // The default config is valid and skips invalid sizes, so the run cannot fail.
    verify_with(sizes, &PipelineConfig::default()).unwrap_or_else(|err| {
        tracing::error!(%err, "verification run failed");
        mismatch_without_plots(sizes.len())
    })
}

/// Re-run pack → number from scratch and check that plot numbers are exactly 0..N-1.
pub fn verify_with(sizes: &[i64], config: &PipelineConfig) -> Result<VerificationReport> {
    let map = pipeline::run(sizes, config)?;
    let expected_count = sizes.len();

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for plot in &map.plots {
        *counts.entry(plot.plot_number).or_default() += 1;
    }

    let missing_numbers: Vec<u32> = (0..expected_count as u32)
        .filter(|n| !counts.contains_key(n))
        .collect();
    let duplicate_numbers: Vec<u32> = counts
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(&n, _)| n)
        .collect();
    let total_placed_and_numbered = map.plots.len();
    let is_correct = total_placed_and_numbered == expected_count
        && missing_numbers.is_empty()
        && duplicate_numbers.is_empty();

    let report = VerificationReport {
        total_placed_and_numbered,
        expected_count,
        is_correct,
        missing_numbers,
        duplicate_numbers,
        highest_number: counts.keys().next_back().copied(),
        diagnostics: map.diagnostics,
    };

    if !report.is_correct {
        tracing::warn!(
            missing = report.missing_numbers.len(),
            duplicates = report.duplicate_numbers.len(),
            numbered = report.total_placed_and_numbered,
            expected = report.expected_count,
            "VerificationMismatch"
        );
    }

    Ok(report)
}

fn mismatch_without_plots(expected_count: usize) -> VerificationReport {
    VerificationReport {
        total_placed_and_numbered: 0,
        expected_count,
        is_correct: expected_count == 0,
        missing_numbers: (0..expected_count as u32).collect(),
        duplicate_numbers: Vec::new(),
        highest_number: None,
        diagnostics: Diagnostics::default(),
    }
}

/// Check a single plot number with the default configuration.
pub fn check_number(sizes: &[i64], number: i64) -> NumberCheck {
    check_report(&verify(sizes), number)
}

/// Check a single plot number against a verification report.
pub fn check_report(report: &VerificationReport, number: i64) -> NumberCheck {
    let in_range = usize::try_from(number).is_ok_and(|n| n < report.expected_count);
    let exists =
        in_range && u32::try_from(number).is_ok_and(|n| !report.missing_numbers.contains(&n));

    let message = if exists {
        format!("Plot #{number} exists in the map.")
    } else if in_range {
        format!("Plot #{number} should exist but is missing from the map.")
    } else if report.expected_count == 0 {
        format!("Plot #{number} is out of range. The map is empty.")
    } else {
        format!(
            "Plot #{number} is out of range. Valid plot numbers are 0-{}.",
            report.expected_count - 1
        )
    };

    NumberCheck {
        exists,
        in_range,
        total_placed_and_numbered: report.total_placed_and_numbered,
        expected_count: report.expected_count,
        highest_number: report.highest_number,
        message,
    }
}

/// Verify many independent inputs in parallel. Each run owns its grid and occupancy array.
pub fn verify_batch(inputs: &[Vec<i64>], config: &PipelineConfig) -> Vec<Result<VerificationReport>> {
    inputs
        .par_iter()
        .map(|sizes| verify_with(sizes, config))
        .collect()
}
