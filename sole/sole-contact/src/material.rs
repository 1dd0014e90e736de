//! Geometry and material model: thickness, groove mask, and stiffness fields.
//!
//! Stiffness follows a Winkler foundation: each cell reacts independently
//! with a coefficient inversely proportional to its local stack height.

// Band edges are whole columns derived from fractional positions.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use std::ops::Range;

use tracing::debug;

use crate::error::SoleResult;
use crate::grid::{Field, SoleGrid};
use crate::params::{DesignParams, TreadPattern};

/// Added to thickness before division so zero stack height stays finite.
pub const THICKNESS_EPSILON: f64 = 1e-5;

/// Arch band centre as a fraction of the length axis.
pub const ARCH_BAND_CENTER: f64 = 0.4;

/// Arch band half-width as a fraction of the length axis.
pub const ARCH_BAND_HALF_WIDTH: f64 = 0.15;

/// Thickness and stiffness fields for one design.
///
/// Both fields are rebuilt from scratch by [`MaterialModel::build`]; the
/// model never carries state between designs.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialModel {
    thickness: Field,
    stiffness: Field,
}

impl MaterialModel {
    /// Build thickness and stiffness fields for `params` on `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SoleError::InvalidParams`] if the design fails
    /// validation.
    pub fn build(grid: &SoleGrid, params: &DesignParams) -> SoleResult<Self> {
        params.validate()?;

        let thickness = thickness_field(grid, params.heel_mm, params.fore_mm);
        let stiffness = stiffness_field(grid, &thickness, params);

        debug!(
            heel_mm = params.heel_mm,
            fore_mm = params.fore_mm,
            arch_factor = params.arch_factor,
            modulus = params.modulus,
            tread = %params.tread,
            "Rebuilt material fields"
        );

        Ok(Self {
            thickness,
            stiffness,
        })
    }

    /// Stack height per cell, in the units of the design (mm).
    #[must_use]
    pub const fn thickness(&self) -> &Field {
        &self.thickness
    }

    /// Foundation stiffness per cell.
    #[must_use]
    pub const fn stiffness(&self) -> &Field {
        &self.stiffness
    }
}

/// Linear stack-height gradient from heel (column 0) to forefoot (last column).
#[must_use]
pub fn thickness_field(grid: &SoleGrid, heel: f64, fore: f64) -> Field {
    let last = grid.nx().saturating_sub(1);
    let step = if last == 0 {
        0.0
    } else {
        (fore - heel) / last as f64
    };
    let profile: Vec<f64> = (0..grid.nx())
        .map(|col| {
            if col == last && last > 0 {
                fore
            } else {
                heel + step * col as f64
            }
        })
        .collect();
    Field::from_fn(grid.ny(), grid.nx(), |_, col| profile[col])
}

/// Columns receiving the arch stiffness multiplier.
///
/// Spans `floor(0.4·nx) ± floor(0.15·nx)`, roughly 25% to 55% of the length.
#[must_use]
pub fn arch_band(grid: &SoleGrid) -> Range<usize> {
    let nx = grid.nx() as f64;
    let centre = (nx * ARCH_BAND_CENTER) as usize;
    let half = (nx * ARCH_BAND_HALF_WIDTH) as usize;
    let start = centre.saturating_sub(half);
    let end = (centre + half).min(grid.nx());
    start..end
}

/// Per-cell stiffness attenuation for a tread pattern.
///
/// Grid grooves are applied column-wise first and then row-wise, so cells
/// on both take the row value.
#[must_use]
pub fn groove_mask(grid: &SoleGrid, tread: TreadPattern) -> Field {
    let mut mask = Field::from_element(grid.ny(), grid.nx(), 1.0);
    let cut = tread.attenuation();

    match tread {
        TreadPattern::None => {}
        TreadPattern::HorizontalSipes => {
            for col in (0..grid.nx()).step_by(3) {
                mask.column_mut(col).fill(cut);
            }
        }
        TreadPattern::GridPattern => {
            for col in (0..grid.nx()).step_by(4) {
                mask.column_mut(col).fill(cut);
            }
            for row in (0..grid.ny()).step_by(4) {
                mask.row_mut(row).fill(cut);
            }
        }
        TreadPattern::Honeycomb => {
            for col in 0..grid.nx() {
                for row in 0..grid.ny() {
                    if (col + row) % 5 == 0 {
                        mask[(row, col)] = cut;
                    }
                }
            }
        }
    }
    mask
}

/// Stiffness `modulus / (thickness + ε)` with arch band and grooves applied.
#[must_use]
pub fn stiffness_field(grid: &SoleGrid, thickness: &Field, params: &DesignParams) -> Field {
    grid.assert_conforms(thickness, "thickness");

    let mut stiffness = thickness.map(|t| params.modulus / (t + THICKNESS_EPSILON));
    for col in arch_band(grid) {
        stiffness.column_mut(col).scale_mut(params.arch_factor);
    }
    stiffness.component_mul_assign(&groove_mask(grid, params.tread));
    stiffness
}
