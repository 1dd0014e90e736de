//! Result types for static solves, walking steps, and walk cycles.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{field_centroid, Field};

/// Outcome of one static penetration search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaticSolution {
    /// Reaction pressure per cell (force per unit area).
    pub pressure: Field,
    /// Penetration depth of the returned field.
    pub penetration: f64,
    /// Search iterations performed.
    pub iterations: usize,
    /// Whether the target force was reached before the iteration cap.
    pub converged: bool,
    /// Integrated reaction force of `pressure` (N).
    pub total_force: f64,
    /// Force the search aimed for (N).
    pub target_force: f64,
    /// Cell area used to integrate `pressure`.
    pub cell_area: f64,
}

impl StaticSolution {
    /// Highest cell pressure.
    #[must_use]
    pub fn peak_pressure(&self) -> f64 {
        peak(&self.pressure)
    }

    /// Number of cells carrying load.
    #[must_use]
    pub fn loaded_cells(&self) -> usize {
        self.pressure.iter().filter(|&&p| p > 0.0).count()
    }

    /// Force above target; negative when the search was truncated.
    #[must_use]
    pub fn overshoot(&self) -> f64 {
        self.total_force - self.target_force
    }

    /// Pressure-weighted centroid `(x, y)` in cell units.
    #[must_use]
    pub fn centroid(&self) -> Option<(f64, f64)> {
        field_centroid(&self.pressure)
    }
}

impl fmt::Display for StaticSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Static Contact Solution:")?;
        writeln!(
            f,
            "  Converged: {} ({} iterations)",
            if self.converged { "yes" } else { "no" },
            self.iterations
        )?;
        writeln!(f, "  Penetration: {:.2}", self.penetration)?;
        writeln!(f, "  Target force: {:.2} N", self.target_force)?;
        writeln!(f, "  Total force: {:.2} N", self.total_force)?;
        writeln!(f, "  Peak pressure: {:.2}", self.peak_pressure())?;
        writeln!(f, "  Loaded cells: {}", self.loaded_cells())?;
        Ok(())
    }
}

/// Outcome of one quasi-static walking step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WalkingStep {
    /// Gait phase fraction in `[0, 1]`.
    pub phase: f64,
    /// Length-axis centre of the rolling contact focus (cells).
    pub focus_center: f64,
    /// Rescaled dynamic pressure per cell.
    pub pressure: Field,
    /// Load the field was rescaled to (N); zero for a degenerate step.
    pub applied_load: f64,
    /// Whether the inner static solve converged.
    pub static_converged: bool,
}

impl WalkingStep {
    /// Whether the focus missed the contact region entirely.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.applied_load == 0.0
    }

    /// Highest cell pressure.
    #[must_use]
    pub fn peak_pressure(&self) -> f64 {
        peak(&self.pressure)
    }

    /// Pressure-weighted centroid `(x, y)` in cell units.
    #[must_use]
    pub fn centroid(&self) -> Option<(f64, f64)> {
        field_centroid(&self.pressure)
    }
}

/// One row of the walk-cycle data log.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WalkLogEntry {
    /// Gait phase fraction.
    pub phase: f64,
    /// Peak dynamic pressure.
    pub peak_pressure: f64,
    /// Applied dynamic load (N).
    pub applied_load: f64,
}

impl WalkLogEntry {
    /// Phase as a whole percentage, truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn phase_percent(&self) -> u32 {
        (self.phase * 100.0).clamp(0.0, 100.0) as u32
    }
}

/// Summary of a full walk-cycle sweep.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WalkCycleReport {
    /// Body weight used for every step (kg).
    pub weight_kg: f64,
    /// Per-phase log rows, in sweep order.
    pub log: Vec<WalkLogEntry>,
    /// Wear accumulated over the sweep.
    pub wear: Field,
    /// Steps whose inner static solve hit the iteration cap.
    pub unconverged_steps: usize,
}

impl WalkCycleReport {
    /// Peak pressure of every step, in sweep order.
    #[must_use]
    pub fn peak_history(&self) -> Vec<f64> {
        self.log.iter().map(|e| e.peak_pressure).collect()
    }

    /// Highest peak pressure across the sweep.
    #[must_use]
    pub fn max_peak_pressure(&self) -> f64 {
        self.log
            .iter()
            .map(|e| e.peak_pressure)
            .fold(0.0, f64::max)
    }

    /// Total accumulated wear.
    #[must_use]
    pub fn total_wear(&self) -> f64 {
        self.wear.sum()
    }

    /// Most worn cell value.
    #[must_use]
    pub fn peak_wear(&self) -> f64 {
        peak(&self.wear)
    }
}

impl fmt::Display for WalkCycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Walk Cycle ({} kg, {} steps):", self.weight_kg, self.log.len())?;
        writeln!(f, "  {:>9}  {:>13}  {:>16}", "Phase (%)", "Peak Pressure", "Applied Load (N)")?;
        for entry in &self.log {
            writeln!(
                f,
                "  {:>9}  {:>13.2}  {:>16.2}",
                entry.phase_percent(),
                entry.peak_pressure,
                entry.applied_load
            )?;
        }
        writeln!(f, "  Max peak pressure: {:.2}", self.max_peak_pressure())?;
        writeln!(f, "  Total wear: {:.4}", self.total_wear())?;
        writeln!(f, "  Peak wear: {:.4}", self.peak_wear())?;
        if self.unconverged_steps > 0 {
            writeln!(f, "  ({} steps truncated at iteration cap)", self.unconverged_steps)?;
        }
        Ok(())
    }
}

fn peak(field: &Field) -> f64 {
    field.iter().copied().fold(0.0, f64::max)
}
