//! The simulation instance owning every per-cell field.

use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::SoleResult;
use crate::foot::foot_shape;
use crate::gait::{check_phase, localize_step, phase_samples};
use crate::grid::{Field, SoleGrid};
use crate::material::MaterialModel;
use crate::params::{DesignParams, GaitProfile, SolverConfig};
use crate::result::{StaticSolution, WalkCycleReport, WalkLogEntry, WalkingStep};
use crate::solver::ContactProblem;
use crate::wear::WearField;

/// Sole under simulation: grid, design, gait, and every derived field.
///
/// All fields conform to one grid for the instance's lifetime. Mutating
/// operations take `&mut self`; run parallel what-if evaluations on
/// independent instances (the type is `Clone`). With the `serde` feature
/// the instance serializes as a snapshot; it is rebuilt through the
/// constructors, never deserialized.
///
/// # Example
///
/// ```
/// use sole_contact::{DesignParams, GaitProfile, SoleSimulation, TreadPattern};
///
/// let mut sim = SoleSimulation::new(28.0, 10.0, 1.0).unwrap();
/// sim.update_design(&DesignParams::new(25.0, 15.0, 1.5, 55.0, TreadPattern::None, 0.01))
///     .unwrap();
/// sim.set_gait_profile(GaitProfile::Neutral);
///
/// let solution = sim.solve_static(75.0).unwrap();
/// assert!(solution.converged);
///
/// sim.reset_wear();
/// let step = sim.solve_walking_step(75.0, 0.0).unwrap();
/// assert!((step.applied_load - 75.0 * 9.81 * 1.2).abs() < 1e-9);
/// assert!(sim.wear().total() > 0.0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SoleSimulation {
    grid: SoleGrid,
    config: SolverConfig,
    design: DesignParams,
    gait: GaitProfile,
    thickness: Field,
    stiffness: Field,
    foot_shape: Field,
    pressure: Field,
    wear: WearField,
}

impl Default for SoleSimulation {
    /// The 28 × 10 reference footprint with the reference design.
    fn default() -> Self {
        let grid = SoleGrid::default();
        let design = DesignParams::default();
        let material = reference_material(&grid, &design);
        Self::assemble(grid, SolverConfig::default(), design, material)
    }
}

impl SoleSimulation {
    /// Create a simulation for a sole `length × width` at `resolution`.
    ///
    /// Starts with [`DesignParams::default`], [`GaitProfile::Neutral`], a
    /// zero pressure field and zero wear.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SoleError::InvalidGrid`] for unusable dimensions.
    pub fn new(length: f64, width: f64, resolution: f64) -> SoleResult<Self> {
        Self::with_config(SoleGrid::new(length, width, resolution)?, SolverConfig::default())
    }

    /// Create a simulation on `grid` with explicit solver constants.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SoleError::InvalidParams`] if `config` fails
    /// validation.
    pub fn with_config(grid: SoleGrid, config: SolverConfig) -> SoleResult<Self> {
        config.validate()?;
        let design = DesignParams::default();
        let material = MaterialModel::build(&grid, &design)?;
        Ok(Self::assemble(grid, config, design, material))
    }

    fn assemble(
        grid: SoleGrid,
        config: SolverConfig,
        design: DesignParams,
        material: MaterialModel,
    ) -> Self {
        let gait = GaitProfile::default();
        Self {
            foot_shape: foot_shape(&grid, gait),
            pressure: grid.zeros(),
            wear: WearField::new(&grid),
            thickness: material.thickness().clone(),
            stiffness: material.stiffness().clone(),
            grid,
            config,
            design,
            gait,
        }
    }

    /// Replace the design and rebuild thickness and stiffness.
    ///
    /// Idempotent: repeating the call with the same parameters yields
    /// identical fields. On error nothing is changed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SoleError::InvalidParams`] if the design fails
    /// validation.
    pub fn update_design(&mut self, params: &DesignParams) -> SoleResult<()> {
        let material = MaterialModel::build(&self.grid, params)?;
        self.thickness = material.thickness().clone();
        self.stiffness = material.stiffness().clone();
        self.design = *params;
        Ok(())
    }

    /// Switch gait profile and regenerate the foot-load shape.
    pub fn set_gait_profile(&mut self, gait: GaitProfile) {
        debug!(gait = %gait, "Regenerating foot shape");
        self.gait = gait;
        self.foot_shape = foot_shape(&self.grid, gait);
    }

    /// Solve the static contact for `weight_kg` and store its pressure field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SoleError::InvalidParams`] for a negative or
    /// non-finite weight.
    pub fn solve_static(&mut self, weight_kg: f64) -> SoleResult<StaticSolution> {
        let solution = self.problem().solve(weight_kg)?;
        self.pressure.copy_from(&solution.pressure);
        Ok(solution)
    }

    /// Solve one walking step at `phase` and accumulate its wear.
    ///
    /// Also overwrites the stored static pressure field with this step's
    /// inner static solution.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SoleError::InvalidParams`] for a phase outside
    /// `[0, 1]` or an invalid weight.
    pub fn solve_walking_step(&mut self, weight_kg: f64, phase: f64) -> SoleResult<WalkingStep> {
        check_phase(phase)?;
        let problem = ContactProblem::new(
            &self.grid,
            &self.stiffness,
            &self.foot_shape,
            &self.config,
        );
        let base = problem.solve(weight_kg)?;
        let step = localize_step(
            &problem,
            &base,
            weight_kg,
            phase,
            &mut self.wear,
            self.design.wear_factor,
        );
        self.pressure = base.pressure;
        Ok(step)
    }

    /// Sweep a full stride: reset wear, then solve `steps` evenly spaced
    /// phases from heel strike to toe-off.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SoleError::InvalidParams`] for zero steps or an
    /// invalid weight.
    pub fn walk_cycle(&mut self, weight_kg: f64, steps: usize) -> SoleResult<WalkCycleReport> {
        let phases = phase_samples(steps)?;
        self.reset_wear();

        let mut log = Vec::with_capacity(phases.len());
        let mut unconverged_steps = 0;
        for phase in phases {
            let step = self.solve_walking_step(weight_kg, phase)?;
            if !step.static_converged {
                unconverged_steps += 1;
            }
            log.push(WalkLogEntry {
                phase,
                peak_pressure: step.peak_pressure(),
                applied_load: step.applied_load,
            });
        }

        info!(
            weight_kg,
            steps,
            total_wear = self.wear.total(),
            unconverged_steps,
            "Walk cycle complete"
        );

        Ok(WalkCycleReport {
            weight_kg,
            log,
            wear: self.wear.as_matrix().clone(),
            unconverged_steps,
        })
    }

    /// Zero the wear accumulator before a new walk sequence.
    pub fn reset_wear(&mut self) {
        self.wear.reset();
    }

    /// Borrowed contact problem over the current fields.
    #[must_use]
    pub fn problem(&self) -> ContactProblem<'_> {
        ContactProblem::new(&self.grid, &self.stiffness, &self.foot_shape, &self.config)
    }

    /// Grid shared by every field.
    #[must_use]
    pub const fn grid(&self) -> &SoleGrid {
        &self.grid
    }

    /// Solver constants.
    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Current design.
    #[must_use]
    pub const fn design(&self) -> &DesignParams {
        &self.design
    }

    /// Current gait profile.
    #[must_use]
    pub const fn gait_profile(&self) -> GaitProfile {
        self.gait
    }

    /// Stack height per cell (mm).
    #[must_use]
    pub const fn thickness(&self) -> &Field {
        &self.thickness
    }

    /// Foundation stiffness per cell.
    #[must_use]
    pub const fn stiffness(&self) -> &Field {
        &self.stiffness
    }

    /// Foot-load weighting per cell.
    #[must_use]
    pub const fn foot_shape(&self) -> &Field {
        &self.foot_shape
    }

    /// Last static pressure field.
    #[must_use]
    pub const fn pressure(&self) -> &Field {
        &self.pressure
    }

    /// Accumulated wear.
    #[must_use]
    pub const fn wear(&self) -> &WearField {
        &self.wear
    }
}

/// Material fields for the built-in default design, which always validates.
fn reference_material(grid: &SoleGrid, design: &DesignParams) -> MaterialModel {
    match MaterialModel::build(grid, design) {
        Ok(material) => material,
        Err(err) => unreachable!("reference design is valid: {err}"),
    }
}
