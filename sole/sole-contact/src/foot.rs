//! Foot-load shape generator.
//!
//! The shape is a dimensionless weight in `[0, 1]` built from heel, ball and
//! toe blobs, minus an arch cutout, plus an optional lateral bias. All
//! positions are in cell-index units.

use crate::grid::{gaussian, ridge, Field, SoleGrid};
use crate::params::GaitProfile;

const HEEL_CENTER: f64 = 5.0;
const HEEL_SPREAD: f64 = 20.0;
const BALL_CENTER: f64 = 20.0;
const BALL_SPREAD: f64 = 30.0;
const TOE_CENTER: f64 = 25.0;
const TOE_SPREAD: f64 = 15.0;
const TOE_WEIGHT: f64 = 0.6;

/// Arch cutout centre as a fraction of the length axis.
const ARCH_CENTER: f64 = 0.4;
const LATERAL_BIAS_DEPTH: f64 = 0.25;
const LATERAL_BIAS_SPREAD: f64 = 40.0;

/// Gait-dependent arch relief and load bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchProfile {
    /// Depth of the negative arch Gaussian.
    pub arch_depth: f64,
    /// Spread of the arch Gaussian.
    pub arch_spread: f64,
    /// Width-axis centre of the lateral bias, if any.
    pub bias_center: Option<f64>,
}

impl ArchProfile {
    /// Arch and bias terms for `gait` on a grid `ny` cells wide.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn for_gait(gait: GaitProfile, ny: usize) -> Self {
        let ny = ny as f64;
        match gait {
            GaitProfile::Neutral => Self {
                arch_depth: 0.5,
                arch_spread: 20.0,
                bias_center: None,
            },
            GaitProfile::Overpronator => Self {
                arch_depth: 0.1,
                arch_spread: 20.0,
                bias_center: Some(ny / 3.0),
            },
            GaitProfile::Supinator => Self {
                arch_depth: 0.9,
                arch_spread: 15.0,
                bias_center: Some(ny * 0.8),
            },
        }
    }
}

/// Foot-load weighting for `gait`, clipped to `[0, 1]`.
///
/// # Example
///
/// ```
/// use sole_contact::{foot_shape, GaitProfile, SoleGrid};
///
/// let grid = SoleGrid::default();
/// let shape = foot_shape(&grid, GaitProfile::Neutral);
/// assert!(shape.iter().all(|w| (0.0..=1.0).contains(w)));
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn foot_shape(grid: &SoleGrid, gait: GaitProfile) -> Field {
    let profile = ArchProfile::for_gait(gait, grid.ny());
    let mid_y = grid.ny() as f64 / 2.0;
    let arch_x = grid.nx() as f64 * ARCH_CENTER;
    let arch_y = grid.ny() as f64 / 1.5;

    grid.field_from_fn(|x, y| {
        let heel = gaussian(x, y, HEEL_CENTER, mid_y, HEEL_SPREAD);
        let ball = gaussian(x, y, BALL_CENTER, mid_y, BALL_SPREAD);
        let toes = TOE_WEIGHT * gaussian(x, y, TOE_CENTER, mid_y, TOE_SPREAD);
        let arch_cut = profile.arch_depth * gaussian(x, y, arch_x, arch_y, profile.arch_spread);
        let bias = profile.bias_center.map_or(0.0, |cy| {
            LATERAL_BIAS_DEPTH * ridge(y, cy, LATERAL_BIAS_SPREAD)
        });
        (heel + ball + toes - arch_cut + bias).clamp(0.0, 1.0)
    })
}
