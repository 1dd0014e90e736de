//! Sole material presets.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use sole_contact::DesignParams;

use crate::error::DesignError;

/// Bulk properties of a midsole compound.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoleMaterial {
    /// Display name.
    pub name: String,
    /// Foundation modulus fed to the stiffness model.
    pub modulus: f64,
    /// Density (g/cm³).
    pub density: f64,
    /// Wear per unit pressure per walking step.
    pub wear_factor: f64,
    /// Raw material cost (INR per gram).
    pub cost_per_gram: f64,
}

impl SoleMaterial {
    /// Create a material from its properties.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        modulus: f64,
        density: f64,
        wear_factor: f64,
        cost_per_gram: f64,
    ) -> Self {
        Self {
            name: name.into(),
            modulus,
            density,
            wear_factor,
            cost_per_gram,
        }
    }

    /// Copy this material's modulus and wear factor into `params`.
    #[must_use]
    pub fn apply(&self, params: &DesignParams) -> DesignParams {
        params
            .with_modulus(self.modulus)
            .with_wear_factor(self.wear_factor)
    }
}

impl Default for SoleMaterial {
    fn default() -> Self {
        MaterialPreset::default().material()
    }
}

/// Built-in compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaterialPreset {
    /// Budget EVA foam.
    EvaFoam,
    /// Standard polyurethane foam.
    #[default]
    PuFoam,
    /// Heavy-duty rubber.
    Rubber,
    /// Premium thermoplastic polyurethane.
    Tpu,
    /// Baseline for hand-tuned or generated designs.
    Custom,
}

impl MaterialPreset {
    /// Every preset, in catalogue order.
    pub const ALL: [Self; 5] = [
        Self::EvaFoam,
        Self::PuFoam,
        Self::Rubber,
        Self::Tpu,
        Self::Custom,
    ];

    /// Catalogue name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EvaFoam => "EVA Foam (Budget)",
            Self::PuFoam => "PU Foam (Standard)",
            Self::Rubber => "Rubber (Heavy Duty)",
            Self::Tpu => "TPU (Premium)",
            Self::Custom => "Custom",
        }
    }

    /// Material properties of this preset.
    #[must_use]
    pub fn material(self) -> SoleMaterial {
        let (modulus, density, wear_factor, cost_per_gram) = match self {
            Self::EvaFoam => (25.0, 0.25, 0.020, 0.40),
            Self::PuFoam => (55.0, 0.45, 0.010, 0.90),
            Self::Rubber => (90.0, 1.10, 0.005, 0.70),
            Self::Tpu => (70.0, 1.20, 0.008, 2.10),
            Self::Custom => (30.0, 0.30, 0.015, 0.50),
        };
        SoleMaterial::new(self.label(), modulus, density, wear_factor, cost_per_gram)
    }
}

impl fmt::Display for MaterialPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MaterialPreset {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .take_while(|c| *c != '(')
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "eva" | "evafoam" => Ok(Self::EvaFoam),
            "pu" | "pufoam" | "polyurethane" => Ok(Self::PuFoam),
            "rubber" => Ok(Self::Rubber),
            "tpu" => Ok(Self::Tpu),
            "custom" => Ok(Self::Custom),
            _ => Err(DesignError::UnknownMaterial(s.to_string())),
        }
    }
}
