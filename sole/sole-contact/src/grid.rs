//! Rectangular cell lattice covering the sole footprint.
//!
//! Every per-cell field is a [`Field`] with `ny` rows (width axis) and `nx`
//! columns (length axis, heel at column 0). Spatial weightings are expressed
//! in cell-index units.

// Grid sizes come from physical extents; truncation to whole cells is intended.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use nalgebra::DMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SoleError, SoleResult};

/// Per-cell scalar field, `ny` rows by `nx` columns.
pub type Field = DMatrix<f64>;

/// Fixed rectangular lattice of `nx × ny` cells.
///
/// # Example
///
/// ```
/// use sole_contact::SoleGrid;
///
/// let grid = SoleGrid::new(28.0, 10.0, 1.0).unwrap();
/// assert_eq!(grid.shape(), (28, 10));
/// assert!((grid.cell_area() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridShape"))]
pub struct SoleGrid {
    nx: usize,
    ny: usize,
    dx: f64,
}

impl Default for SoleGrid {
    /// A 28 × 10 footprint at unit resolution.
    fn default() -> Self {
        Self {
            nx: 28,
            ny: 10,
            dx: 1.0,
        }
    }
}

/// Unchecked wire form of [`SoleGrid`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GridShape {
    nx: usize,
    ny: usize,
    dx: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<GridShape> for SoleGrid {
    type Error = SoleError;

    fn try_from(shape: GridShape) -> SoleResult<Self> {
        Self::from_cells(shape.nx, shape.ny, shape.dx)
    }
}

impl SoleGrid {
    /// Build a grid from physical length, width and cell resolution.
    ///
    /// Cell counts are `floor(length / resolution)` and
    /// `floor(width / resolution)`.
    ///
    /// # Errors
    ///
    /// Returns [`SoleError::InvalidGrid`] if any input is non-finite or
    /// non-positive, or if either axis would have zero cells.
    pub fn new(length: f64, width: f64, resolution: f64) -> SoleResult<Self> {
        for (name, value) in [
            ("length", length),
            ("width", width),
            ("resolution", resolution),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SoleError::invalid_grid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        let nx = (length / resolution) as usize;
        let ny = (width / resolution) as usize;
        if nx == 0 || ny == 0 {
            return Err(SoleError::invalid_grid(format!(
                "{length} x {width} at resolution {resolution} yields no cells"
            )));
        }

        Ok(Self {
            nx,
            ny,
            dx: resolution,
        })
    }

    /// Build a grid directly from cell counts and cell edge length.
    ///
    /// # Errors
    ///
    /// Returns [`SoleError::InvalidGrid`] if either count is zero or `dx` is
    /// non-finite or non-positive.
    pub fn from_cells(nx: usize, ny: usize, dx: f64) -> SoleResult<Self> {
        if !dx.is_finite() || dx <= 0.0 {
            return Err(SoleError::invalid_grid(format!(
                "resolution must be positive and finite, got {dx}"
            )));
        }
        if nx == 0 || ny == 0 {
            return Err(SoleError::invalid_grid(format!(
                "{nx} x {ny} cells is an empty grid"
            )));
        }
        Ok(Self { nx, ny, dx })
    }

    /// Number of cells along the length axis.
    #[must_use]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// Number of cells along the width axis.
    #[must_use]
    pub const fn ny(&self) -> usize {
        self.ny
    }

    /// Cell edge length.
    #[must_use]
    pub const fn dx(&self) -> f64 {
        self.dx
    }

    /// Grid shape as `(nx, ny)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Area of one cell (`dx²`).
    #[must_use]
    pub fn cell_area(&self) -> f64 {
        self.dx * self.dx
    }

    /// Covered length (`nx · dx`).
    #[must_use]
    pub fn length(&self) -> f64 {
        self.nx as f64 * self.dx
    }

    /// Covered width (`ny · dx`).
    #[must_use]
    pub fn width(&self) -> f64 {
        self.ny as f64 * self.dx
    }

    /// A zero field conforming to this grid.
    #[must_use]
    pub fn zeros(&self) -> Field {
        Field::zeros(self.ny, self.nx)
    }

    /// Build a field by evaluating `f(x, y)` at every cell index.
    pub fn field_from_fn(&self, mut f: impl FnMut(f64, f64) -> f64) -> Field {
        Field::from_fn(self.ny, self.nx, |row, col| f(col as f64, row as f64))
    }

    /// Whether `field` has this grid's shape.
    #[must_use]
    pub fn conforms(&self, field: &Field) -> bool {
        field.nrows() == self.ny && field.ncols() == self.nx
    }

    /// Panic if `field` does not have this grid's shape.
    ///
    /// A mismatch means an internal invariant is broken, not bad input.
    pub(crate) fn assert_conforms(&self, field: &Field, name: &str) {
        assert!(
            self.conforms(field),
            "{name} is {}x{} but grid is {}x{}",
            field.ncols(),
            field.nrows(),
            self.nx,
            self.ny
        );
    }

    /// Area integral of a per-unit-area field (`Σ field · dx²`).
    #[must_use]
    pub fn integrate(&self, field: &Field) -> f64 {
        field.sum() * self.cell_area()
    }

    /// Field-weighted centroid in cell-index units, `(x, y)`.
    ///
    /// Returns `None` when the field sums to zero.
    #[must_use]
    pub fn centroid(&self, field: &Field) -> Option<(f64, f64)> {
        self.assert_conforms(field, "field");
        field_centroid(field)
    }
}

/// Weighted centroid `(x, y)` of a non-negative field, in cell-index units.
pub(crate) fn field_centroid(field: &Field) -> Option<(f64, f64)> {
    let total = field.sum();
    if total <= 0.0 {
        return None;
    }
    let mut sx = 0.0;
    let mut sy = 0.0;
    for col in 0..field.ncols() {
        for row in 0..field.nrows() {
            let w = field[(row, col)];
            sx += w * col as f64;
            sy += w * row as f64;
        }
    }
    Some((sx / total, sy / total))
}

/// Isotropic Gaussian blob `exp(-((x-cx)² + (y-cy)²) / spread)`.
pub(crate) fn gaussian(x: f64, y: f64, cx: f64, cy: f64, spread: f64) -> f64 {
    let dx = x - cx;
    let dy = y - cy;
    (-(dx * dx + dy * dy) / spread).exp()
}

/// One-dimensional Gaussian ridge `exp(-(v-c)² / spread)`.
pub(crate) fn ridge(v: f64, c: f64, spread: f64) -> f64 {
    let d = v - c;
    (-(d * d) / spread).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_footprint() {
        let grid = SoleGrid::new(28.0, 10.0, 1.0).unwrap();
        assert_eq!(grid.shape(), (28, 10));
        assert_eq!(grid.cell_count(), 280);
        assert_eq!(grid, SoleGrid::default());
    }

    #[test]
    fn test_resolution_truncates() {
        let grid = SoleGrid::new(28.0, 10.0, 3.0).unwrap();
        assert_eq!(grid.shape(), (9, 3));
        assert_relative_eq!(grid.cell_area(), 9.0);
        assert_relative_eq!(grid.length(), 27.0);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(SoleGrid::new(0.0, 10.0, 1.0).is_err());
        assert!(SoleGrid::new(28.0, -1.0, 1.0).is_err());
        assert!(SoleGrid::new(28.0, 10.0, 0.0).is_err());
        assert!(SoleGrid::new(28.0, 10.0, f64::NAN).is_err());
        assert!(SoleGrid::new(0.5, 10.0, 1.0).is_err());
    }

    #[test]
    fn test_from_cells() {
        let grid = SoleGrid::from_cells(28, 10, 1.0).unwrap();
        assert_eq!(grid, SoleGrid::default());
        assert!(SoleGrid::from_cells(0, 10, 1.0).is_err());
        assert!(SoleGrid::from_cells(28, 0, 1.0).is_err());
        assert!(SoleGrid::from_cells(28, 10, 0.0).is_err());
        assert!(SoleGrid::from_cells(28, 10, f64::INFINITY).is_err());
    }

    #[test]
    fn test_field_orientation() {
        let grid = SoleGrid::new(4.0, 2.0, 1.0).unwrap();
        let field = grid.field_from_fn(|x, y| x + 10.0 * y);
        assert_eq!(field.nrows(), 2);
        assert_eq!(field.ncols(), 4);
        assert_relative_eq!(field[(1, 3)], 13.0);
        assert!(grid.conforms(&field));
        assert!(!grid.conforms(&field.transpose()));
    }

    #[test]
    fn test_integrate_scales_by_cell_area() {
        let grid = SoleGrid::new(4.0, 2.0, 0.5).unwrap();
        let field = Field::from_element(grid.ny(), grid.nx(), 2.0);
        assert_relative_eq!(grid.integrate(&field), 2.0 * 32.0 * 0.25);
    }

    #[test]
    fn test_centroid() {
        let grid = SoleGrid::new(5.0, 3.0, 1.0).unwrap();
        let mut field = grid.zeros();
        assert!(grid.centroid(&field).is_none());

        field[(2, 4)] = 1.0;
        field[(0, 0)] = 1.0;
        let (cx, cy) = grid.centroid(&field).unwrap();
        assert_relative_eq!(cx, 2.0);
        assert_relative_eq!(cy, 1.0);
    }

    #[test]
    #[should_panic(expected = "grid is")]
    fn test_assert_conforms_panics_on_mismatch() {
        let grid = SoleGrid::default();
        grid.assert_conforms(&Field::zeros(3, 3), "pressure");
    }

    #[test]
    fn test_gaussian_peak() {
        assert_relative_eq!(gaussian(5.0, 5.0, 5.0, 5.0, 20.0), 1.0);
        assert_relative_eq!(ridge(3.0, 5.0, 4.0), (-1.0f64).exp());
    }
}
