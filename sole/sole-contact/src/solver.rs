//! Static contact solver.
//!
//! Finds the foundation penetration whose elastic reaction balances the
//! applied body weight. The search is a fixed-step linear scan: penetration
//! grows by `penetration_step` from zero until the total reaction force
//! meets the target or the iteration cap is reached. The first step that
//! meets the target is accepted as-is, overshoot included.
//!
//! Reaction force is non-decreasing in penetration for fixed fields, so the
//! scan always terminates with a usable field; the only failure mode is
//! truncation at the cap, reported through [`StaticSolution::converged`].

use tracing::{debug, warn};

use crate::error::{SoleError, SoleResult};
use crate::grid::{Field, SoleGrid};
use crate::params::SolverConfig;
use crate::result::StaticSolution;

/// Borrowed view of everything the static search reads.
///
/// # Example
///
/// ```
/// use sole_contact::{foot_shape, ContactProblem, DesignParams, GaitProfile, MaterialModel,
///     SoleGrid, SolverConfig};
///
/// let grid = SoleGrid::default();
/// let material = MaterialModel::build(&grid, &DesignParams::default()).unwrap();
/// let shape = foot_shape(&grid, GaitProfile::Neutral);
/// let config = SolverConfig::default();
///
/// let problem = ContactProblem::new(&grid, material.stiffness(), &shape, &config);
/// let solution = problem.solve(75.0).unwrap();
/// assert!(solution.converged);
/// assert!(solution.total_force >= 735.75);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ContactProblem<'a> {
    grid: &'a SoleGrid,
    stiffness: &'a Field,
    foot_shape: &'a Field,
    config: &'a SolverConfig,
}

impl<'a> ContactProblem<'a> {
    /// Bundle the fields of one contact problem.
    ///
    /// # Panics
    ///
    /// Panics if either field does not conform to `grid`.
    #[must_use]
    pub fn new(
        grid: &'a SoleGrid,
        stiffness: &'a Field,
        foot_shape: &'a Field,
        config: &'a SolverConfig,
    ) -> Self {
        grid.assert_conforms(stiffness, "stiffness");
        grid.assert_conforms(foot_shape, "foot shape");
        Self {
            grid,
            stiffness,
            foot_shape,
            config,
        }
    }

    /// Grid the problem lives on.
    #[must_use]
    pub const fn grid(&self) -> &'a SoleGrid {
        self.grid
    }

    /// Solver constants in use.
    #[must_use]
    pub const fn config(&self) -> &'a SolverConfig {
        self.config
    }

    /// Cells where the foot bears load (`shape > contact_threshold`).
    #[must_use]
    pub fn contact_mask(&self) -> Field {
        let threshold = self.config.contact_threshold;
        self.foot_shape
            .map(|s| if s > threshold { 1.0 } else { 0.0 })
    }

    /// Reaction pressure at penetration `depth`.
    ///
    /// `stiffness · max(shape·scale − (scale − depth), 0)` inside the contact
    /// mask, zero outside it.
    #[must_use]
    pub fn reaction_field(&self, depth: f64) -> Field {
        let scale = self.config.depth_scale;
        let threshold = self.config.contact_threshold;
        self.stiffness.zip_map(self.foot_shape, |k, s| {
            if s > threshold {
                k * (s * scale - (scale - depth)).max(0.0)
            } else {
                0.0
            }
        })
    }

    /// Total reaction force at penetration `depth`.
    #[must_use]
    pub fn total_force(&self, depth: f64) -> f64 {
        self.grid.integrate(&self.reaction_field(depth))
    }

    /// Force added by the last penetration step ending at `depth`.
    ///
    /// This is the granularity of the search: a converged solution exceeds
    /// its target by at most this amount.
    #[must_use]
    pub fn force_increment(&self, depth: f64) -> f64 {
        let previous = (depth - self.config.penetration_step).max(0.0);
        self.total_force(depth) - self.total_force(previous)
    }

    /// Run the penetration search for `weight_kg`.
    ///
    /// # Errors
    ///
    /// Returns [`SoleError::InvalidParams`] if the weight is negative or not
    /// finite. Hitting the iteration cap is not an error.
    pub fn solve(&self, weight_kg: f64) -> SoleResult<StaticSolution> {
        check_body_weight(weight_kg)?;

        let target = self.config.target_force(weight_kg);
        let step = self.config.penetration_step;

        let mut depth = 0.0;
        let mut last_depth = 0.0;
        let mut pressure = self.grid.zeros();
        let mut force = 0.0;

        for iteration in 0..self.config.max_iterations {
            pressure = self.reaction_field(depth);
            force = self.grid.integrate(&pressure);
            last_depth = depth;

            if force >= target {
                debug!(
                    weight_kg,
                    penetration = depth,
                    iterations = iteration + 1,
                    total_force = force,
                    "Static solve converged"
                );
                return Ok(StaticSolution {
                    pressure,
                    penetration: depth,
                    iterations: iteration + 1,
                    converged: true,
                    total_force: force,
                    target_force: target,
                    cell_area: self.grid.cell_area(),
                });
            }
            depth += step;
        }

        warn!(
            weight_kg,
            penetration = last_depth,
            max_penetration = self.config.max_penetration(),
            total_force = force,
            target_force = target,
            "Static solve hit iteration cap before reaching target force"
        );

        Ok(StaticSolution {
            pressure,
            penetration: last_depth,
            iterations: self.config.max_iterations,
            converged: false,
            total_force: force,
            target_force: target,
            cell_area: self.grid.cell_area(),
        })
    }
}

/// Reject a body weight that is negative or not finite.
///
/// # Errors
///
/// Returns [`SoleError::InvalidParams`] for such a weight.
pub fn check_body_weight(weight_kg: f64) -> SoleResult<()> {
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(SoleError::invalid_params(format!(
            "body weight must be non-negative and finite, got {weight_kg}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foot::foot_shape;
    use crate::material::MaterialModel;
    use crate::params::{DesignParams, GaitProfile};
    use approx::assert_relative_eq;

    struct Fixture {
        grid: SoleGrid,
        material: MaterialModel,
        shape: Field,
        config: SolverConfig,
    }

    impl Fixture {
        fn reference() -> Self {
            let grid = SoleGrid::default();
            Self {
                material: MaterialModel::build(&grid, &DesignParams::default()).unwrap(),
                shape: foot_shape(&grid, GaitProfile::Neutral),
                config: SolverConfig::default(),
                grid,
            }
        }

        fn problem(&self) -> ContactProblem<'_> {
            ContactProblem::new(&self.grid, self.material.stiffness(), &self.shape, &self.config)
        }
    }

    #[test]
    fn test_zero_penetration_zero_force_off_peak() {
        let fx = Fixture::reference();
        let field = fx.problem().reaction_field(0.0);
        // Only saturated cells (shape == 1) touch at zero depth, and they
        // compress by exactly zero.
        assert!(field.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_force_is_monotone_in_depth() {
        let fx = Fixture::reference();
        let problem = fx.problem();
        let mut previous = 0.0;
        for i in 0..100 {
            let force = problem.total_force(f64::from(i) * 0.1);
            assert!(force >= previous);
            previous = force;
        }
    }

    #[test]
    fn test_reference_solve_converges_within_one_step() {
        let fx = Fixture::reference();
        let problem = fx.problem();
        let solution = problem.solve(75.0).unwrap();

        assert!(solution.converged);
        assert_relative_eq!(solution.target_force, 735.75);
        assert!(solution.total_force >= 735.75);
        let overshoot = solution.total_force - solution.target_force;
        assert!(overshoot <= problem.force_increment(solution.penetration));
        assert_relative_eq!(
            solution.total_force,
            fx.grid.integrate(&solution.pressure),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_pressure_zero_outside_contact() {
        let fx = Fixture::reference();
        let problem = fx.problem();
        let solution = problem.solve(75.0).unwrap();
        let mask = problem.contact_mask();
        for (p, m) in solution.pressure.iter().zip(mask.iter()) {
            assert!(*p >= 0.0);
            if *m == 0.0 {
                assert_eq!(*p, 0.0);
            }
        }
    }

    #[test]
    fn test_zero_weight_is_immediate() {
        let fx = Fixture::reference();
        let solution = fx.problem().solve(0.0).unwrap();
        assert!(solution.converged);
        assert_eq!(solution.iterations, 1);
        assert_relative_eq!(solution.penetration, 0.0);
        assert_relative_eq!(solution.peak_pressure(), 0.0);
    }

    #[test]
    fn test_iteration_cap_is_silent() {
        let fx = Fixture::reference();
        let solution = fx.problem().solve(5_000.0).unwrap();
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 500);
        assert!(solution.total_force < solution.target_force);
        assert!(solution.total_force > 0.0);
        assert_relative_eq!(solution.penetration, 49.9, epsilon = 1e-6);
        assert_relative_eq!(solution.penetration, fx.config.max_penetration(), epsilon = 1e-6);
    }

    #[test]
    fn test_short_cap_returns_last_iteration() {
        let mut fx = Fixture::reference();
        fx.config = fx.config.with_max_iterations(3);
        let problem = fx.problem();
        let solution = problem.solve(75.0).unwrap();
        assert!(!solution.converged);
        assert_relative_eq!(solution.penetration, 0.2, epsilon = 1e-12);
        assert_relative_eq!(fx.config.max_penetration(), 0.2, epsilon = 1e-12);
        assert_eq!(solution.pressure, problem.reaction_field(0.1 + 0.1));
    }

    #[test]
    fn test_rejects_bad_weight() {
        let fx = Fixture::reference();
        assert!(fx.problem().solve(-1.0).is_err());
        assert!(fx.problem().solve(f64::INFINITY).is_err());
        assert!(check_body_weight(f64::NAN).is_err());
        assert!(check_body_weight(0.0).is_ok());
    }
}
