//! Elastic-foundation contact pressure for footwear soles.
//!
//! This crate models a shoe sole as a grid of independent vertical springs
//! (a Winkler foundation) and computes the pressure the foot exerts on it,
//! both standing still and through a walking stride. Cumulative wear is
//! tracked across walking steps.
//!
//! # Model
//!
//! - **Geometry & material**: stack height falls linearly from heel to
//!   forefoot; stiffness is `modulus / thickness`, amplified under the arch
//!   and attenuated along tread grooves.
//! - **Foot-load shape**: a normalised weighting of heel, ball and toe
//!   contact with an arch cutout that depends on the gait profile.
//! - **Static contact**: a rigid foot is pushed down in fixed increments
//!   until the spring reactions carry the body weight.
//! - **Dynamic gait**: the static field is localised under a focus that
//!   rolls from heel to toe and rescaled to an amplified dynamic load.
//! - **Wear**: each walking step adds `pressure · wear_factor` per cell.
//!
//! All fields are [`Field`] matrices with one row per width cell and one
//! column per length cell, heel at column 0.
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **no UI or engine dependencies**. It can be
//! used in:
//! - CLI tools
//! - Design optimisation loops
//! - Servers
//!
//! # Example
//!
//! ```
//! use sole_contact::{GaitProfile, SoleSimulation};
//!
//! let mut sim = SoleSimulation::default();
//! sim.set_gait_profile(GaitProfile::Supinator);
//!
//! let solution = sim.solve_static(70.0).unwrap();
//! println!("Peak pressure: {:.2}", solution.peak_pressure());
//!
//! let report = sim.walk_cycle(70.0, 10).unwrap();
//! println!("Total wear: {:.4}", report.total_wear());
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for parameters, grids, fields and
//!   results. Grids are validated on the way in; [`SoleSimulation`] is
//!   serialize-only.

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
mod foot;
mod gait;
mod grid;
mod material;
mod params;
mod result;
mod simulation;
mod solver;
mod wear;

// Re-export main types and functions
pub use error::{SoleError, SoleResult};
pub use foot::{foot_shape, ArchProfile};
pub use gait::{focus_center, focus_weights, phase_samples, solve_walking_step};
pub use grid::{Field, SoleGrid};
pub use material::{
    arch_band, groove_mask, stiffness_field, thickness_field, MaterialModel, THICKNESS_EPSILON,
};
pub use params::{DesignParams, GaitProfile, SolverConfig, TreadPattern};
pub use result::{StaticSolution, WalkCycleReport, WalkLogEntry, WalkingStep};
pub use simulation::SoleSimulation;
pub use solver::{check_body_weight, ContactProblem};
pub use wear::WearField;
