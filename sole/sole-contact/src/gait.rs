//! Dynamic gait stepper.
//!
//! Each walking step re-solves the static contact, localises it under a
//! Gaussian focus that rolls from heel strike to toe-off, and rescales the
//! localised field to the amplified dynamic load.

// Phase sample counts are small; index-to-float conversion is exact.
#![allow(clippy::cast_precision_loss)]

use tracing::debug;

use crate::error::{SoleError, SoleResult};
use crate::grid::{ridge, Field, SoleGrid};
use crate::params::SolverConfig;
use crate::result::{StaticSolution, WalkingStep};
use crate::solver::ContactProblem;
use crate::wear::WearField;

/// Length-axis centre of the contact focus at `phase`.
#[must_use]
pub fn focus_center(config: &SolverConfig, phase: f64) -> f64 {
    config.focus_start + phase * config.focus_travel
}

/// Focus weighting over the grid; constant across the width axis.
#[must_use]
pub fn focus_weights(grid: &SoleGrid, config: &SolverConfig, phase: f64) -> Field {
    let center = focus_center(config, phase);
    grid.field_from_fn(|x, _| ridge(x, center, config.focus_spread))
}

/// `steps` phase fractions spaced evenly over `[0, 1]`, both ends included.
///
/// A single sample sits at phase 0.
///
/// # Errors
///
/// Returns [`SoleError::InvalidParams`] when `steps` is zero.
pub fn phase_samples(steps: usize) -> SoleResult<Vec<f64>> {
    match steps {
        0 => Err(SoleError::invalid_params("walk cycle needs at least one step")),
        1 => Ok(vec![0.0]),
        _ => {
            let last = (steps - 1) as f64;
            Ok((0..steps)
                .map(|i| if i == steps - 1 { 1.0 } else { i as f64 / last })
                .collect())
        }
    }
}

/// Reject phases outside `[0, 1]`, including NaN.
pub(crate) fn check_phase(phase: f64) -> SoleResult<()> {
    if (0.0..=1.0).contains(&phase) {
        Ok(())
    } else {
        Err(SoleError::invalid_params(format!(
            "gait phase must lie in [0, 1], got {phase}"
        )))
    }
}

/// Solve one walking step and accumulate its wear.
///
/// The static field is recomputed on every call. If the focus misses the
/// contact region the dynamic field stays zero and the applied load is zero;
/// wear is still accumulated (adding nothing).
///
/// # Errors
///
/// Returns [`SoleError::InvalidParams`] for a phase outside `[0, 1]` or an
/// invalid body weight.
pub fn solve_walking_step(
    problem: &ContactProblem<'_>,
    weight_kg: f64,
    phase: f64,
    wear: &mut WearField,
    wear_factor: f64,
) -> SoleResult<WalkingStep> {
    check_phase(phase)?;
    let base = problem.solve(weight_kg)?;
    Ok(localize_step(problem, &base, weight_kg, phase, wear, wear_factor))
}

/// Localise a solved static field at `phase`, rescale it to the dynamic
/// load, and add its wear.
pub(crate) fn localize_step(
    problem: &ContactProblem<'_>,
    base: &StaticSolution,
    weight_kg: f64,
    phase: f64,
    wear: &mut WearField,
    wear_factor: f64,
) -> WalkingStep {
    let grid = problem.grid();
    let config = problem.config();

    let mut pressure = base
        .pressure
        .component_mul(&focus_weights(grid, config, phase));

    let localized = pressure.sum();
    let applied_load = if localized > 0.0 {
        let target = config.dynamic_target_force(weight_kg);
        pressure *= target / (localized * grid.cell_area());
        target
    } else {
        0.0
    };

    wear.accumulate(&pressure, wear_factor);

    let center = focus_center(config, phase);
    debug!(
        phase,
        focus_center = center,
        applied_load,
        "Walking step solved"
    );

    WalkingStep {
        phase,
        focus_center: center,
        pressure,
        applied_load,
        static_converged: base.converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foot::foot_shape;
    use crate::material::MaterialModel;
    use crate::params::{DesignParams, GaitProfile};
    use approx::assert_relative_eq;

    #[test]
    fn test_focus_travel() {
        let config = SolverConfig::default();
        assert_relative_eq!(focus_center(&config, 0.0), 5.0);
        assert_relative_eq!(focus_center(&config, 0.5), 15.0);
        assert_relative_eq!(focus_center(&config, 1.0), 25.0);
    }

    #[test]
    fn test_focus_weights_peak_at_center() {
        let grid = SoleGrid::default();
        let weights = focus_weights(&grid, &SolverConfig::default(), 0.0);
        assert_relative_eq!(weights[(0, 5)], 1.0);
        assert_relative_eq!(weights[(9, 5)], 1.0);
        assert!(weights[(0, 4)] < 1.0);
        assert_relative_eq!(weights[(0, 4)], weights[(0, 6)]);
    }

    #[test]
    fn test_phase_samples() {
        assert!(phase_samples(0).is_err());
        assert_eq!(phase_samples(1).unwrap(), vec![0.0]);
        assert_eq!(phase_samples(3).unwrap(), vec![0.0, 0.5, 1.0]);
        let twenty = phase_samples(20).unwrap();
        assert_eq!(twenty.len(), 20);
        assert_relative_eq!(twenty[1], 1.0 / 19.0);
        assert_relative_eq!(twenty[19], 1.0);
    }

    #[test]
    fn test_walking_step_rescales_to_dynamic_load() {
        let grid = SoleGrid::default();
        let material = MaterialModel::build(&grid, &DesignParams::default()).unwrap();
        let shape = foot_shape(&grid, GaitProfile::Neutral);
        let config = SolverConfig::default();
        let problem = ContactProblem::new(&grid, material.stiffness(), &shape, &config);
        let mut wear = WearField::new(&grid);

        let step = solve_walking_step(&problem, 75.0, 0.5, &mut wear, 0.01).unwrap();
        assert_relative_eq!(step.applied_load, 75.0 * 9.81 * 1.2, epsilon = 1e-9);
        assert_relative_eq!(grid.integrate(&step.pressure), step.applied_load, epsilon = 1e-6);
        assert_relative_eq!(wear.total(), step.pressure.sum() * 0.01, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_weight_is_degenerate() {
        let grid = SoleGrid::default();
        let material = MaterialModel::build(&grid, &DesignParams::default()).unwrap();
        let shape = foot_shape(&grid, GaitProfile::Neutral);
        let config = SolverConfig::default();
        let problem = ContactProblem::new(&grid, material.stiffness(), &shape, &config);
        let mut wear = WearField::new(&grid);

        let step = solve_walking_step(&problem, 0.0, 0.3, &mut wear, 0.01).unwrap();
        assert!(step.is_degenerate());
        assert_eq!(step.pressure, grid.zeros());
        assert_relative_eq!(wear.total(), 0.0);
    }

    #[test]
    fn test_rejects_phase_out_of_range() {
        let grid = SoleGrid::default();
        let material = MaterialModel::build(&grid, &DesignParams::default()).unwrap();
        let shape = foot_shape(&grid, GaitProfile::Neutral);
        let config = SolverConfig::default();
        let problem = ContactProblem::new(&grid, material.stiffness(), &shape, &config);
        let mut wear = WearField::new(&grid);

        assert!(solve_walking_step(&problem, 75.0, 1.5, &mut wear, 0.01).is_err());
        assert!(solve_walking_step(&problem, 75.0, -0.1, &mut wear, 0.01).is_err());
        assert!(solve_walking_step(&problem, 75.0, f64::NAN, &mut wear, 0.01).is_err());
    }
}
