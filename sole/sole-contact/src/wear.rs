//! Cumulative wear accumulator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Field, SoleGrid};

/// Per-cell wear accumulated across walking steps.
///
/// Strictly additive: there is no decay and no upper bound. Only an explicit
/// [`WearField::reset`] clears it.
///
/// # Example
///
/// ```
/// use sole_contact::{SoleGrid, WearField};
///
/// let grid = SoleGrid::default();
/// let mut wear = WearField::new(&grid);
/// let pressure = grid.field_from_fn(|x, _| x);
///
/// wear.accumulate(&pressure, 0.01);
/// wear.accumulate(&pressure, 0.01);
/// assert!((wear.peak() - 27.0 * 0.02).abs() < 1e-12);
///
/// wear.reset();
/// assert_eq!(wear.total(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WearField {
    field: Field,
}

impl WearField {
    /// A zero wear field on `grid`.
    #[must_use]
    pub fn new(grid: &SoleGrid) -> Self {
        Self { field: grid.zeros() }
    }

    /// Add `pressure · factor` into the accumulator.
    ///
    /// # Panics
    ///
    /// Panics if `pressure` has a different shape from the accumulator.
    pub fn accumulate(&mut self, pressure: &Field, factor: f64) {
        assert_eq!(
            pressure.shape(),
            self.field.shape(),
            "wear accumulation shape mismatch"
        );
        self.field += pressure * factor;
    }

    /// Zero every cell.
    pub fn reset(&mut self) {
        self.field.fill(0.0);
    }

    /// Sum of wear over all cells.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.field.sum()
    }

    /// Highest per-cell wear.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.field.iter().copied().fold(0.0, f64::max)
    }

    /// Underlying wear matrix.
    #[must_use]
    pub const fn as_matrix(&self) -> &Field {
        &self.field
    }
}
