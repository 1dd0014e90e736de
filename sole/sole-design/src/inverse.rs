//! Inverse design: find a sole design for a target comfort score.
//!
//! # Algorithm
//!
//! 1. Sample random designs and score each with a static solve at a random
//!    body weight.
//! 2. Fit a [`SurrogateModel`] from `(score, weight)` to design parameters.
//! 3. Query it at the target score and the user's weight, clipping and
//!    rounding to the sampling grid.
//! 4. Re-simulate the predicted design to report the score it really
//!    achieves.
//!
//! Sampling runs on a private copy of the caller's simulation, so the
//! caller's fields and wear are left untouched.

use std::fmt;

use rand::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sole_contact::{check_body_weight, DesignParams, SoleSimulation, TreadPattern};

use crate::error::{DesignError, DesignResult};
use crate::metrics::comfort_score;
use crate::surrogate::{DesignEstimate, SurrogateModel, SurrogateSample};

/// Closed sampling interval `(min, max)`.
pub type SampleRange = (f64, f64);

/// Parameters for the inverse-design search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InverseDesignConfig {
    /// Number of simulated training designs. Default: 50.
    pub samples: usize,
    /// Heel stack range (mm, whole numbers). Default: 5–50.
    pub heel_range_mm: SampleRange,
    /// Forefoot stack range (mm, whole numbers). Default: 5–50.
    pub fore_range_mm: SampleRange,
    /// Arch factor range (one decimal). Default: 0.5–5.0.
    pub arch_range: SampleRange,
    /// Modulus range (whole numbers). Default: 10–100.
    pub modulus_range: SampleRange,
    /// Training body-weight range (kg, whole numbers). Default: 40–120.
    pub weight_range_kg: SampleRange,
    /// Neighbours averaged per prediction. Default: 5.
    pub neighbours: usize,
    /// Optional seed for reproducible results.
    pub seed: Option<u64>,
}

impl Default for InverseDesignConfig {
    fn default() -> Self {
        Self {
            samples: 50,
            heel_range_mm: (5.0, 50.0),
            fore_range_mm: (5.0, 50.0),
            arch_range: (0.5, 5.0),
            modulus_range: (10.0, 100.0),
            weight_range_kg: (40.0, 120.0),
            neighbours: 5,
            seed: None,
        }
    }
}

impl InverseDesignConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of training samples.
    #[must_use]
    pub const fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set the neighbour count.
    #[must_use]
    pub const fn with_neighbours(mut self, neighbours: usize) -> Self {
        self.neighbours = neighbours;
        self
    }

    /// Set a random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check counts and ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidConfig`] for a zero count or an empty,
    /// non-finite, or physically invalid range.
    pub fn validate(&self) -> DesignResult<()> {
        if self.samples == 0 {
            return Err(DesignError::invalid_config("samples must be at least 1"));
        }
        if self.neighbours == 0 {
            return Err(DesignError::invalid_config("neighbours must be at least 1"));
        }
        check_range("heel_range_mm", self.heel_range_mm, 0.0)?;
        check_range("fore_range_mm", self.fore_range_mm, 0.0)?;
        check_range("arch_range", self.arch_range, f64::MIN_POSITIVE)?;
        check_range("modulus_range", self.modulus_range, f64::MIN_POSITIVE)?;
        check_range("weight_range_kg", self.weight_range_kg, 0.0)?;
        Ok(())
    }
}

fn check_range(name: &str, (lo, hi): SampleRange, floor: f64) -> DesignResult<()> {
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(DesignError::invalid_config(format!(
            "{name} must be a finite interval, got ({lo}, {hi})"
        )));
    }
    if lo < floor {
        return Err(DesignError::invalid_config(format!(
            "{name} lower bound {lo} is below {floor}"
        )));
    }
    Ok(())
}

/// Result of an inverse-design run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InverseDesignOutcome {
    /// Recommended design, with no tread.
    pub design: DesignParams,
    /// Comfort score the recommended design achieves when re-simulated.
    pub predicted_score: f64,
    /// Score that was asked for.
    pub target_score: f64,
    /// Body weight the design was validated at (kg).
    pub weight_kg: f64,
    /// Training samples the surrogate was fitted to.
    pub samples: Vec<SurrogateSample>,
}

impl InverseDesignOutcome {
    /// Realised minus requested score.
    #[must_use]
    pub fn score_error(&self) -> f64 {
        self.predicted_score - self.target_score
    }
}

impl fmt::Display for InverseDesignOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inverse Design ({} samples):", self.samples.len())?;
        writeln!(
            f,
            "  Heel: {}mm | Fore: {}mm | Arch: {:.1}x | Modulus: {}",
            self.design.heel_mm, self.design.fore_mm, self.design.arch_factor, self.design.modulus
        )?;
        writeln!(
            f,
            "  Score: {:.1} (target {:.1}, error {:+.1}, {} kg)",
            self.predicted_score,
            self.target_score,
            self.score_error(),
            self.weight_kg
        )?;
        Ok(())
    }
}

/// Surrogate-driven inverse designer.
///
/// # Example
///
/// ```
/// use sole_contact::SoleSimulation;
/// use sole_design::{InverseDesignConfig, InverseDesigner};
///
/// let designer = InverseDesigner::new(InverseDesignConfig::new().with_samples(10).with_seed(7));
/// let sim = SoleSimulation::default();
///
/// let outcome = designer.run(&sim, 80.0, 75.0).unwrap();
/// assert!((5.0..=50.0).contains(&outcome.design.heel_mm));
/// assert!((0.0..=100.0).contains(&outcome.predicted_score));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InverseDesigner {
    config: InverseDesignConfig,
}

impl InverseDesigner {
    /// Create a designer with `config`.
    #[must_use]
    pub const fn new(config: InverseDesignConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &InverseDesignConfig {
        &self.config
    }

    /// Simulate random designs on a copy of `sim`.
    ///
    /// The copy keeps the caller's grid, solver constants, and gait. Each
    /// sample uses no tread and the caller's wear factor.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidConfig`] for a bad configuration, or
    /// [`DesignError::Solver`] if a sampled design is rejected.
    pub fn sample(&self, sim: &SoleSimulation) -> DesignResult<Vec<SurrogateSample>> {
        self.config.validate()?;
        let mut scratch = sim.clone();
        let wear_factor = sim.design().wear_factor;
        let cfg = &self.config;

        let mut rng: Box<dyn RngCore> = if let Some(seed) = cfg.seed {
            Box::new(StdRng::seed_from_u64(seed))
        } else {
            Box::new(thread_rng())
        };

        let mut samples = Vec::with_capacity(cfg.samples);
        for _ in 0..cfg.samples {
            let design = DesignParams::new(
                draw(&mut rng, cfg.heel_range_mm).trunc(),
                draw(&mut rng, cfg.fore_range_mm).trunc(),
                round_tenth(draw(&mut rng, cfg.arch_range)),
                draw(&mut rng, cfg.modulus_range).trunc(),
                TreadPattern::None,
                wear_factor,
            );
            let weight_kg = draw(&mut rng, cfg.weight_range_kg).trunc();

            scratch.update_design(&design)?;
            let solution = scratch.solve_static(weight_kg)?;
            let score = comfort_score(solution.peak_pressure());
            debug!(score, weight_kg, heel = design.heel_mm, fore = design.fore_mm, "Sampled design");

            samples.push(SurrogateSample {
                score,
                weight_kg,
                design,
            });
        }
        Ok(samples)
    }

    /// Clip and round a raw estimate onto the sampling grid.
    #[must_use]
    pub fn snap(&self, estimate: &DesignEstimate, wear_factor: f64) -> DesignParams {
        let cfg = &self.config;
        DesignParams::new(
            clip(estimate.heel_mm, cfg.heel_range_mm).trunc(),
            clip(estimate.fore_mm, cfg.fore_range_mm).trunc(),
            round_tenth(clip(estimate.arch_factor, cfg.arch_range)),
            clip(estimate.modulus, cfg.modulus_range).trunc(),
            TreadPattern::None,
            wear_factor,
        )
    }

    /// Run the full sample, fit, predict, validate loop.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidConfig`] for a target score outside
    /// `[0, 100]` or a bad configuration, and [`DesignError::Solver`] if the
    /// contact model rejects the weight or a design. Both inputs are checked
    /// before any sample is simulated.
    pub fn run(
        &self,
        sim: &SoleSimulation,
        target_score: f64,
        weight_kg: f64,
    ) -> DesignResult<InverseDesignOutcome> {
        if !(0.0..=100.0).contains(&target_score) {
            return Err(DesignError::invalid_config(format!(
                "target score must lie in [0, 100], got {target_score}"
            )));
        }
        check_body_weight(weight_kg)?;

        let samples = self.sample(sim)?;
        let model = SurrogateModel::fit(&samples, self.config.neighbours)?;
        let estimate = model.predict(target_score, weight_kg);
        let design = self.snap(&estimate, sim.design().wear_factor);

        let mut scratch = sim.clone();
        scratch.update_design(&design)?;
        let solution = scratch.solve_static(weight_kg)?;
        let predicted_score = comfort_score(solution.peak_pressure());

        let outcome = InverseDesignOutcome {
            design,
            predicted_score,
            target_score,
            weight_kg,
            samples,
        };
        info!(
            target_score,
            predicted_score,
            score_error = outcome.score_error(),
            weight_kg,
            heel = design.heel_mm,
            fore = design.fore_mm,
            arch = design.arch_factor,
            modulus = design.modulus,
            "Inverse design complete"
        );
        Ok(outcome)
    }
}

fn draw(rng: &mut impl Rng, (lo, hi): SampleRange) -> f64 {
    rng.gen_range(lo..=hi)
}

fn clip(value: f64, (lo, hi): SampleRange) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
