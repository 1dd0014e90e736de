//! Design, gait, and solver parameters.
//!
//! Every parameter set is a plain value with a reference default, builder
//! methods, and a `validate()` check. Nothing here is global: a simulation
//! receives its parameters explicitly.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{SoleError, SoleResult};

/// Tread pattern cut into the outsole.
///
/// Grooves remove material and attenuate local stiffness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TreadPattern {
    /// Solid outsole.
    #[default]
    None,
    /// Sipes across the sole on every third column.
    HorizontalSipes,
    /// Grooves on every fourth column and every fourth row.
    GridPattern,
    /// Diagonal cells where `(col + row) % 5 == 0`.
    Honeycomb,
}

impl TreadPattern {
    /// All tread patterns, in catalogue order.
    pub const ALL: [Self; 4] = [
        Self::None,
        Self::HorizontalSipes,
        Self::GridPattern,
        Self::Honeycomb,
    ];

    /// Stiffness multiplier applied to grooved cells.
    #[must_use]
    pub const fn attenuation(self) -> f64 {
        match self {
            Self::None => 1.0,
            Self::HorizontalSipes | Self::GridPattern => 0.2,
            Self::Honeycomb => 0.1,
        }
    }

    /// Human-readable catalogue label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::HorizontalSipes => "Horizontal Sipes",
            Self::GridPattern => "Grid Pattern",
            Self::Honeycomb => "Honeycomb",
        }
    }
}

impl fmt::Display for TreadPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TreadPattern {
    type Err = SoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "none" | "solid" => Ok(Self::None),
            "horizontalsipes" | "sipes" => Ok(Self::HorizontalSipes),
            "gridpattern" | "grid" => Ok(Self::GridPattern),
            "honeycomb" => Ok(Self::Honeycomb),
            _ => Err(SoleError::invalid_params(format!(
                "unknown tread pattern '{s}'"
            ))),
        }
    }
}

/// Gait profile shaping the foot-load field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GaitProfile {
    /// Neutral arch.
    #[default]
    Neutral,
    /// Flat foot: shallow arch relief, load shifted medially.
    Overpronator,
    /// High arch: deep arch relief, load shifted laterally.
    Supinator,
}

impl GaitProfile {
    /// All gait profiles, in catalogue order.
    pub const ALL: [Self; 3] = [Self::Neutral, Self::Overpronator, Self::Supinator];

    /// Human-readable catalogue label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Neutral => "Neutral",
            Self::Overpronator => "Overpronator (Flat Foot)",
            Self::Supinator => "Supinator (High Arch)",
        }
    }
}

impl fmt::Display for GaitProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GaitProfile {
    type Err = SoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_label(s);
        if key == "neutral" {
            Ok(Self::Neutral)
        } else if key.starts_with("overpronat") || key == "flatfoot" {
            Ok(Self::Overpronator)
        } else if key.starts_with("supinat") || key == "higharch" {
            Ok(Self::Supinator)
        } else {
            Err(SoleError::invalid_params(format!(
                "unknown gait profile '{s}'"
            )))
        }
    }
}

/// Lowercase and drop everything but ASCII letters and digits.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Geometry and material of one sole design.
///
/// # Example
///
/// ```
/// use sole_contact::{DesignParams, TreadPattern};
///
/// let params = DesignParams::default()
///     .with_stack(30.0, 20.0)
///     .with_tread(TreadPattern::GridPattern);
/// assert!(params.validate().is_ok());
///
/// let bad = DesignParams::default().with_modulus(0.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DesignParams {
    /// Heel stack height (mm).
    pub heel_mm: f64,
    /// Forefoot stack height (mm).
    pub fore_mm: f64,
    /// Stiffness multiplier in the arch band (<1 softens, >1 stiffens).
    pub arch_factor: f64,
    /// Material stiffness scale.
    pub modulus: f64,
    /// Outsole tread pattern.
    pub tread: TreadPattern,
    /// Wear accumulated per unit pressure per walking step.
    pub wear_factor: f64,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            heel_mm: 25.0,
            fore_mm: 15.0,
            arch_factor: 1.5,
            modulus: 55.0,
            tread: TreadPattern::None,
            wear_factor: 0.01,
        }
    }
}

impl DesignParams {
    /// Create a fully specified design.
    #[must_use]
    pub const fn new(
        heel_mm: f64,
        fore_mm: f64,
        arch_factor: f64,
        modulus: f64,
        tread: TreadPattern,
        wear_factor: f64,
    ) -> Self {
        Self {
            heel_mm,
            fore_mm,
            arch_factor,
            modulus,
            tread,
            wear_factor,
        }
    }

    /// Set heel and forefoot stack heights (mm).
    #[must_use]
    pub const fn with_stack(mut self, heel_mm: f64, fore_mm: f64) -> Self {
        self.heel_mm = heel_mm;
        self.fore_mm = fore_mm;
        self
    }

    /// Set the arch stiffness multiplier.
    #[must_use]
    pub const fn with_arch_factor(mut self, arch_factor: f64) -> Self {
        self.arch_factor = arch_factor;
        self
    }

    /// Set the material modulus.
    #[must_use]
    pub const fn with_modulus(mut self, modulus: f64) -> Self {
        self.modulus = modulus;
        self
    }

    /// Set the tread pattern.
    #[must_use]
    pub const fn with_tread(mut self, tread: TreadPattern) -> Self {
        self.tread = tread;
        self
    }

    /// Set the wear factor.
    #[must_use]
    pub const fn with_wear_factor(mut self, wear_factor: f64) -> Self {
        self.wear_factor = wear_factor;
        self
    }

    /// Mean of heel and forefoot stack heights (mm).
    #[must_use]
    pub fn average_thickness_mm(&self) -> f64 {
        (self.heel_mm + self.fore_mm) / 2.0
    }

    /// Check the design is physically usable.
    ///
    /// Thickness may be zero; modulus and arch factor must be positive.
    ///
    /// # Errors
    ///
    /// Returns [`SoleError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> SoleResult<()> {
        check_non_negative("heel_mm", self.heel_mm)?;
        check_non_negative("fore_mm", self.fore_mm)?;
        check_positive("arch_factor", self.arch_factor)?;
        check_positive("modulus", self.modulus)?;
        check_non_negative("wear_factor", self.wear_factor)?;
        Ok(())
    }
}

/// Constants of the penetration search and the gait sweep.
///
/// The defaults reproduce the reference model; several accuracy guarantees
/// are stated in units of `penetration_step`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Penetration increment per iteration.
    pub penetration_step: f64,
    /// Hard cap on search iterations.
    pub max_iterations: usize,
    /// Foot-shape weight above which a cell is in contact.
    pub contact_threshold: f64,
    /// Depth corresponding to a unit foot-shape weight.
    pub depth_scale: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Impact amplification of the dynamic load over body weight.
    pub dynamic_factor: f64,
    /// Focus centre at heel strike (cells).
    pub focus_start: f64,
    /// Focus travel from heel strike to toe-off (cells).
    pub focus_travel: f64,
    /// Focus Gaussian spread (cells²).
    pub focus_spread: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            penetration_step: 0.1,
            max_iterations: 500,
            contact_threshold: 0.1,
            depth_scale: 10.0,
            gravity: 9.81,
            dynamic_factor: 1.2,
            focus_start: 5.0,
            focus_travel: 20.0,
            focus_spread: 15.0,
        }
    }
}

impl SolverConfig {
    /// Set the penetration step.
    #[must_use]
    pub const fn with_penetration_step(mut self, step: f64) -> Self {
        self.penetration_step = step;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the dynamic amplification factor.
    #[must_use]
    pub const fn with_dynamic_factor(mut self, factor: f64) -> Self {
        self.dynamic_factor = factor;
        self
    }

    /// Static target force for a body weight (N).
    #[must_use]
    pub fn target_force(&self, weight_kg: f64) -> f64 {
        weight_kg * self.gravity
    }

    /// Dynamic target force for a body weight (N).
    #[must_use]
    pub fn dynamic_target_force(&self, weight_kg: f64) -> f64 {
        self.target_force(weight_kg) * self.dynamic_factor
    }

    /// Largest penetration the search can reach.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn max_penetration(&self) -> f64 {
        self.penetration_step * self.max_iterations.saturating_sub(1) as f64
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SoleError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> SoleResult<()> {
        check_positive("penetration_step", self.penetration_step)?;
        if self.max_iterations == 0 {
            return Err(SoleError::invalid_params("max_iterations must be at least 1"));
        }
        check_non_negative("contact_threshold", self.contact_threshold)?;
        check_positive("depth_scale", self.depth_scale)?;
        check_positive("gravity", self.gravity)?;
        check_positive("dynamic_factor", self.dynamic_factor)?;
        check_finite("focus_start", self.focus_start)?;
        check_finite("focus_travel", self.focus_travel)?;
        check_positive("focus_spread", self.focus_spread)?;
        Ok(())
    }
}

fn check_finite(name: &str, value: f64) -> SoleResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SoleError::invalid_params(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

pub(crate) fn check_positive(name: &str, value: f64) -> SoleResult<()> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SoleError::invalid_params(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

pub(crate) fn check_non_negative(name: &str, value: f64) -> SoleResult<()> {
    check_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SoleError::invalid_params(format!(
            "{name} cannot be negative, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_design() {
        let params = DesignParams::default();
        assert_relative_eq!(params.heel_mm, 25.0);
        assert_relative_eq!(params.fore_mm, 15.0);
        assert_relative_eq!(params.arch_factor, 1.5);
        assert_relative_eq!(params.modulus, 55.0);
        assert_eq!(params.tread, TreadPattern::None);
        assert_relative_eq!(params.wear_factor, 0.01);
        assert_relative_eq!(params.average_thickness_mm(), 20.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_design_builder() {
        let params = DesignParams::default()
            .with_stack(40.0, 10.0)
            .with_arch_factor(3.0)
            .with_modulus(90.0)
            .with_tread(TreadPattern::Honeycomb)
            .with_wear_factor(0.005);
        assert_eq!(
            params,
            DesignParams::new(40.0, 10.0, 3.0, 90.0, TreadPattern::Honeycomb, 0.005)
        );
    }

    #[test]
    fn test_design_validation() {
        assert!(DesignParams::default().with_stack(0.0, 0.0).validate().is_ok());
        assert!(DesignParams::default().with_stack(-1.0, 10.0).validate().is_err());
        assert!(DesignParams::default().with_modulus(-5.0).validate().is_err());
        assert!(DesignParams::default().with_arch_factor(0.0).validate().is_err());
        assert!(DesignParams::default().with_wear_factor(f64::NAN).validate().is_err());
        assert!(DesignParams::default().with_wear_factor(0.0).validate().is_ok());

        let err = DesignParams::default().with_modulus(0.0).validate().unwrap_err();
        assert!(format!("{err}").contains("modulus"));
    }

    #[test]
    fn test_tread_labels_round_trip() {
        for tread in TreadPattern::ALL {
            assert_eq!(tread.to_string().parse::<TreadPattern>().unwrap(), tread);
        }
        assert_eq!("grid".parse::<TreadPattern>().unwrap(), TreadPattern::GridPattern);
        assert_eq!(
            "horizontal_sipes".parse::<TreadPattern>().unwrap(),
            TreadPattern::HorizontalSipes
        );
        assert!("zigzag".parse::<TreadPattern>().is_err());
    }

    #[test]
    fn test_tread_attenuation() {
        assert_relative_eq!(TreadPattern::None.attenuation(), 1.0);
        assert_relative_eq!(TreadPattern::GridPattern.attenuation(), 0.2);
        assert_relative_eq!(TreadPattern::Honeycomb.attenuation(), 0.1);
    }

    #[test]
    fn test_gait_labels() {
        for gait in GaitProfile::ALL {
            assert_eq!(gait.to_string().parse::<GaitProfile>().unwrap(), gait);
        }
        assert_eq!(
            "Overpronator (Flat Foot)".parse::<GaitProfile>().unwrap(),
            GaitProfile::Overpronator
        );
        assert_eq!("high-arch".parse::<GaitProfile>().unwrap(), GaitProfile::Supinator);
        assert!("hopping".parse::<GaitProfile>().is_err());
    }

    #[test]
    fn test_solver_config_defaults() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.target_force(75.0), 735.75);
        assert_relative_eq!(config.dynamic_target_force(75.0), 882.9, epsilon = 1e-9);
        assert_relative_eq!(config.max_penetration(), 49.9, epsilon = 1e-9);
    }

    #[test]
    fn test_solver_config_validation() {
        assert!(SolverConfig::default().with_max_iterations(0).validate().is_err());
        assert!(SolverConfig::default().with_penetration_step(0.0).validate().is_err());
        assert!(SolverConfig::default().with_dynamic_factor(-1.0).validate().is_err());
    }
}
