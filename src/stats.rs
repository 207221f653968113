use std::collections::BTreeMap;

use serde::Serialize;

use crate::layout::BoundingSize;

/// Summary numbers shown next to the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SizeStats {
    pub total_blocks: usize,
    /// Σ size²
    pub total_area: u64,
    /// Mean size, rounded to two decimals
    pub average_size: f64,
    pub min_size: u32,
    pub max_size: u32,
    /// size → number of items with that size
    pub size_distribution: BTreeMap<u32, usize>,
    pub dimensions: BoundingSize,
}

impl SizeStats {
    /// Compute statistics over the positive sizes in `sizes`.
    pub fn from_sizes(sizes: &[i64], dimensions: BoundingSize) -> Self {
        let valid: Vec<u32> = sizes
            .iter()
            .filter_map(|&s| u32::try_from(s).ok())
            .filter(|&s| s > 0)
            .collect();

        if valid.is_empty() {
            return Self {
                dimensions,
                ..Self::default()
            };
        }

        let mut size_distribution = BTreeMap::new();
        for &s in &valid {
            *size_distribution.entry(s).or_insert(0) += 1;
        }

        let sum: u64 = valid.iter().map(|&s| u64::from(s)).sum();
        let average = sum as f64 / valid.len() as f64;

        Self {
            total_blocks: valid.len(),
            total_area: valid.iter().map(|&s| u64::from(s) * u64::from(s)).sum(),
            average_size: (average * 100.0).round() / 100.0,
            min_size: valid.iter().copied().min().unwrap_or(0),
            max_size: valid.iter().copied().max().unwrap_or(0),
            size_distribution,
            dimensions,
        }
    }

    /// Share of the canvas area covered by items, in percent.
    pub fn fill_ratio(&self) -> f64 {
        let canvas = self.dimensions.area();
        if canvas == 0 {
            0.0
        } else {
            self.total_area as f64 / canvas as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_for_small_input() {
        let dims = BoundingSize { width: 9, height: 10 };
        let stats = SizeStats::from_sizes(&[5, 5, 4, 1], dims);
        assert_eq!(stats.total_blocks, 4);
        assert_eq!(stats.total_area, 67);
        assert_eq!(stats.average_size, 3.75);
        assert_eq!((stats.min_size, stats.max_size), (1, 5));
        assert_eq!(stats.size_distribution.get(&5), Some(&2));
        assert_eq!(stats.size_distribution.len(), 3);
        assert!((stats.fill_ratio() - 67.0 / 90.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let stats = SizeStats::from_sizes(&[1, 1, 2], BoundingSize::default());
        assert_eq!(stats.average_size, 1.33);
    }

    #[test]
    fn empty_and_invalid_inputs_give_zero_stats() {
        let stats = SizeStats::from_sizes(&[0, -3], BoundingSize::default());
        assert_eq!(stats, SizeStats::default());
        assert_eq!(stats.fill_ratio(), 0.0);
    }
}
