//! Design tooling for footwear soles.
//!
//! Builds on [`sole_contact`] with the pieces a product designer needs
//! around the contact model:
//!
//! - **Materials**: catalogue presets for common midsole compounds.
//! - **Metrics**: comfort index, service life, mass, cost and carbon.
//! - **Inverse design**: a nearest-neighbour surrogate trained on simulated
//!   designs that proposes stack heights, arch factor and modulus for a
//!   target comfort score.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **no UI or engine dependencies**.
//!
//! # Example
//!
//! ```
//! use sole_contact::{DesignParams, SoleSimulation};
//! use sole_design::{ComfortAssessment, DesignMetrics, MaterialPreset};
//!
//! let material = MaterialPreset::EvaFoam.material();
//! let params = material.apply(&DesignParams::default());
//!
//! let mut sim = SoleSimulation::default();
//! sim.update_design(&params).unwrap();
//! let solution = sim.solve_static(75.0).unwrap();
//!
//! println!("{}", ComfortAssessment::from_peak(solution.peak_pressure()));
//! println!("{}", DesignMetrics::estimate(&params, &material));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)
)]

mod error;
mod inverse;
mod materials;
mod metrics;
mod surrogate;

// Re-export main types and functions
pub use error::{DesignError, DesignResult};
pub use inverse::{InverseDesignConfig, InverseDesignOutcome, InverseDesigner, SampleRange};
pub use materials::{MaterialPreset, SoleMaterial};
pub use metrics::{
    comfort_score, is_critical, ComfortAssessment, DesignMetrics, CRITICAL_PEAK_PRESSURE,
    FOOTPRINT_AREA_CM2,
};
pub use surrogate::{DesignEstimate, SurrogateModel, SurrogateSample};
