//! Product metrics derived from a design and its material.
//!
//! These are catalogue-level estimates for comparing designs, not
//! manufacturing figures. The footprint is taken as a fixed 250 cm² outsole.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use sole_contact::{DesignParams, Field, SoleGrid};

use crate::materials::SoleMaterial;

/// Peak pressure at which the material is considered at its yield limit.
pub const CRITICAL_PEAK_PRESSURE: f64 = 250.0;

/// Nominal outsole footprint area (cm²).
pub const FOOTPRINT_AREA_CM2: f64 = 250.0;

/// Manufacturing overhead applied to raw material cost.
const COST_MARKUP: f64 = 1.5;
/// Service life (km) of a compound with the reference wear factor.
const REFERENCE_LIFE_KM: f64 = 500.0;
const REFERENCE_WEAR_FACTOR: f64 = 0.01;
/// Embodied carbon per gram of compound (g CO₂e).
const CARBON_PER_GRAM: f64 = 0.02;

const HIGH_LIFE_KM: f64 = 600.0;
const LIGHT_MASS_G: f64 = 300.0;

/// Comfort index in `[0, 100]` for a peak pressure.
#[must_use]
pub fn comfort_score(peak_pressure: f64) -> f64 {
    (100.0 - 2.5 * peak_pressure).max(0.0)
}

/// Whether `peak_pressure` exceeds [`CRITICAL_PEAK_PRESSURE`].
#[must_use]
pub fn is_critical(peak_pressure: f64) -> bool {
    peak_pressure > CRITICAL_PEAK_PRESSURE
}

/// Comfort verdict for one static solve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComfortAssessment {
    /// Peak contact pressure.
    pub peak_pressure: f64,
    /// Comfort index in `[0, 100]`.
    pub score: f64,
    /// Peak exceeds the material yield limit.
    pub critical: bool,
}

impl ComfortAssessment {
    /// Assess a peak pressure, warning when it is critical.
    #[must_use]
    pub fn from_peak(peak_pressure: f64) -> Self {
        let critical = is_critical(peak_pressure);
        if critical {
            warn!(
                peak_pressure,
                limit = CRITICAL_PEAK_PRESSURE,
                "Critical peak pressure: material yield limit reached"
            );
        }
        Self {
            peak_pressure,
            score: comfort_score(peak_pressure),
            critical,
        }
    }
}

impl fmt::Display for ComfortAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comfort index: {:.0}/100", self.score)?;
        if self.critical {
            write!(f, " (CRITICAL: peak {:.2} > {CRITICAL_PEAK_PRESSURE})", self.peak_pressure)?;
        }
        Ok(())
    }
}

/// Estimated life, mass, cost and carbon of a sole.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignMetrics {
    /// Mean stack height (mm).
    pub average_thickness_mm: f64,
    /// Compound volume (cm³).
    pub volume_cm3: f64,
    /// Compound mass (g).
    pub mass_g: f64,
    /// Manufacturing cost (INR).
    pub cost_inr: f64,
    /// Expected service life (km); infinite for a non-wearing compound.
    pub life_km: f64,
    /// Embodied carbon (kg CO₂e).
    pub carbon_kg: f64,
}

impl DesignMetrics {
    /// Estimate metrics from the heel and forefoot stack heights.
    ///
    /// # Example
    ///
    /// ```
    /// use sole_contact::DesignParams;
    /// use sole_design::{DesignMetrics, MaterialPreset};
    ///
    /// let material = MaterialPreset::PuFoam.material();
    /// let metrics = DesignMetrics::estimate(&material.apply(&DesignParams::default()), &material);
    ///
    /// assert!((metrics.volume_cm3 - 500.0).abs() < 1e-9);
    /// assert!((metrics.mass_g - 225.0).abs() < 1e-9);
    /// assert_eq!(metrics.mass_label(), "Light");
    /// ```
    #[must_use]
    pub fn estimate(params: &DesignParams, material: &SoleMaterial) -> Self {
        let average_thickness_mm = params.average_thickness_mm();
        let volume_cm3 = average_thickness_mm / 10.0 * FOOTPRINT_AREA_CM2;
        Self::from_volume(average_thickness_mm, volume_cm3, params.wear_factor, material)
    }

    /// Estimate metrics by integrating a thickness field over `grid`.
    ///
    /// Thickness is in millimetres and cell area in cm². Life uses the
    /// material's wear factor.
    ///
    /// # Panics
    ///
    /// Panics if `thickness` does not conform to `grid`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_fields(grid: &SoleGrid, thickness: &Field, material: &SoleMaterial) -> Self {
        assert!(
            grid.conforms(thickness),
            "thickness field does not match the grid"
        );
        let volume_cm3 = grid.integrate(&(thickness / 10.0));
        let average_thickness_mm = thickness.sum() / grid.cell_count() as f64;
        Self::from_volume(
            average_thickness_mm,
            volume_cm3,
            material.wear_factor,
            material,
        )
    }

    fn from_volume(
        average_thickness_mm: f64,
        volume_cm3: f64,
        wear_factor: f64,
        material: &SoleMaterial,
    ) -> Self {
        let mass_g = volume_cm3 * material.density;
        let life_km = if wear_factor > 0.0 {
            REFERENCE_LIFE_KM * (REFERENCE_WEAR_FACTOR / wear_factor)
        } else {
            f64::INFINITY
        };
        Self {
            average_thickness_mm,
            volume_cm3,
            mass_g,
            cost_inr: mass_g * material.cost_per_gram * COST_MARKUP,
            life_km,
            carbon_kg: mass_g * CARBON_PER_GRAM / 1000.0,
        }
    }

    /// "High" for a life above 600 km, otherwise "Avg".
    #[must_use]
    pub fn life_label(&self) -> &'static str {
        if self.life_km > HIGH_LIFE_KM {
            "High"
        } else {
            "Avg"
        }
    }

    /// "Light" below 300 g, otherwise "Heavy".
    #[must_use]
    pub fn mass_label(&self) -> &'static str {
        if self.mass_g < LIGHT_MASS_G {
            "Light"
        } else {
            "Heavy"
        }
    }
}

impl fmt::Display for DesignMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Product Metrics:")?;
        if self.life_km.is_finite() {
            writeln!(f, "  Est. life cycle: {:.0} km ({})", self.life_km.trunc(), self.life_label())?;
        } else {
            writeln!(f, "  Est. life cycle: unlimited ({})", self.life_label())?;
        }
        writeln!(f, "  Mass: {:.0} g ({})", self.mass_g.trunc(), self.mass_label())?;
        writeln!(f, "  Mfg. cost: INR {:.2}", self.cost_inr)?;
        writeln!(f, "  Carbon footprint: {:.4} kg CO2e", self.carbon_kg)?;
        Ok(())
    }
}
