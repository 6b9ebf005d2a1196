//! Gridded fields and their summary statistics.

use crate::error::{PrepError, Result};
use ndarray::ArrayD;

/// One physical field at one instant, dimensions ordered `[layer, row, column]`
/// (or `[row, column]` for surface fields).
pub type Grid = ArrayD<f64>;

/// Check that every grid has the shape of the first one.
///
/// Called before any elementwise combination so that a mismatch is reported
/// without computing a single cell.
pub fn ensure_same_shape(quantity: &str, grids: &[Grid]) -> Result<()> {
    let Some(first) = grids.first() else {
        return Ok(());
    };
    for grid in &grids[1..] {
        if grid.shape() != first.shape() {
            return Err(PrepError::shape_mismatch(quantity, first.shape(), grid.shape()));
        }
    }
    Ok(())
}

/// Summary statistics over the finite cells of a grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStats {
    /// Minimum and maximum values.
    pub min_max: Option<(f64, f64)>,
    /// Mean value.
    pub mean: Option<f64>,
    /// Sample standard deviation.
    pub std: Option<f64>,
    /// Count of valid (finite) values.
    pub valid_count: usize,
}

impl GridStats {
    /// Compute statistics, skipping NaN and infinite cells.
    pub fn of(grid: &Grid) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for &v in grid.iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        let mean = (count > 0).then(|| sum / count as f64);
        let std = match mean {
            Some(m) if count > 1 => {
                let ssd: f64 = grid
                    .iter()
                    .filter(|v| v.is_finite())
                    .map(|&v| (v - m) * (v - m))
                    .sum();
                Some((ssd / (count - 1) as f64).sqrt())
            },
            _ => None,
        };

        Self {
            min_max: (count > 0).then_some((min, max)),
            mean,
            std,
            valid_count: count,
        }
    }
}
