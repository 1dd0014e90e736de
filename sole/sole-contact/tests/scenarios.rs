//! End-to-end scenarios on the reference 28 × 10 footprint.
//!
//! Run with: cargo test -p sole-contact --test scenarios

use approx::assert_relative_eq;
use sole_contact::{DesignParams, GaitProfile, SoleSimulation, TreadPattern};

fn reference_sim() -> SoleSimulation {
    let mut sim = SoleSimulation::new(28.0, 10.0, 1.0).unwrap();
    sim.update_design(&DesignParams::new(
        25.0,
        15.0,
        1.5,
        55.0,
        TreadPattern::None,
        0.01,
    ))
    .unwrap();
    sim.set_gait_profile(GaitProfile::Neutral);
    sim
}

// =============================================================================
// Static contact
// =============================================================================

#[test]
fn static_solve_balances_body_weight_within_one_step() {
    let mut sim = reference_sim();
    let solution = sim.solve_static(75.0).unwrap();
    let problem = sim.problem();
    let step = problem.config().penetration_step;

    assert!(solution.converged);
    assert_relative_eq!(solution.target_force, 735.75, epsilon = 1e-9);
    assert!(solution.total_force >= 735.75);
    assert!(problem.total_force(solution.penetration - step) < 735.75);
    assert!(solution.overshoot() <= problem.force_increment(solution.penetration) + 1e-9);
}

#[test]
fn static_pressure_vanishes_outside_contact() {
    let mut sim = reference_sim();
    let solution = sim.solve_static(75.0).unwrap();

    for (p, s) in solution.pressure.iter().zip(sim.foot_shape().iter()) {
        assert!(*p >= 0.0);
        if *s <= 0.1 {
            assert_eq!(*p, 0.0);
        }
    }
    assert!(solution.loaded_cells() > 0);
}

#[test]
fn impossible_load_reports_truncation() {
    let mut sim = reference_sim();
    let solution = sim.solve_static(5000.0).unwrap();

    assert!(!solution.converged);
    assert_eq!(solution.iterations, 500);
    assert!(solution.total_force < solution.target_force);
    assert!(solution.peak_pressure() > 0.0);
}

// =============================================================================
// Gait sweep
// =============================================================================

#[test]
fn contact_rolls_from_heel_to_toe() {
    let mut sim = reference_sim();
    let heel = sim.solve_walking_step(75.0, 0.0).unwrap();
    let toe = sim.solve_walking_step(75.0, 1.0).unwrap();

    let (heel_x, _) = heel.centroid().unwrap();
    let (toe_x, _) = toe.centroid().unwrap();
    assert!((heel_x - 5.0).abs() < 1.5, "heel-strike centroid at {heel_x}");
    assert!((toe_x - 25.0).abs() < 2.5, "toe-off centroid at {toe_x}");
}

#[test]
fn walking_step_carries_amplified_load() {
    let mut sim = reference_sim();
    for phase in [0.0, 0.3, 0.7, 1.0] {
        let step = sim.solve_walking_step(75.0, phase).unwrap();
        assert_relative_eq!(step.applied_load, 75.0 * 9.81 * 1.2, epsilon = 1e-9);
        assert_relative_eq!(
            sim.grid().integrate(&step.pressure),
            75.0 * 9.81 * 1.2,
            epsilon = 1e-6
        );
    }
}

#[test]
fn weightless_step_is_degenerate() {
    let mut sim = reference_sim();
    let step = sim.solve_walking_step(0.0, 0.5).unwrap();

    assert!(step.is_degenerate());
    assert_relative_eq!(step.applied_load, 0.0);
    assert!(step.pressure.iter().all(|&p| p == 0.0));
    assert_relative_eq!(sim.wear().total(), 0.0);
}

#[test]
fn wear_never_decreases_over_a_stride() {
    let mut sim = reference_sim();
    sim.reset_wear();
    let mut previous = sim.wear().as_matrix().clone();

    for i in 0..=10_u8 {
        sim.solve_walking_step(75.0, f64::from(i) / 10.0).unwrap();
        let current = sim.wear().as_matrix();
        for (now, before) in current.iter().zip(previous.iter()) {
            assert!(now >= before);
        }
        previous = current.clone();
    }
    assert!(sim.wear().total() > 0.0);
}

#[test]
fn walk_cycle_report_matches_step_count() {
    let mut sim = reference_sim();
    let report = sim.walk_cycle(75.0, 20).unwrap();

    assert_eq!(report.log.len(), 20);
    assert_relative_eq!(report.log[0].phase, 0.0);
    assert_relative_eq!(report.log[19].phase, 1.0);
    assert_eq!(report.unconverged_steps, 0);
    assert_relative_eq!(report.total_wear(), sim.wear().total(), epsilon = 1e-9);
    assert!(report.max_peak_pressure() > 0.0);
}

// =============================================================================
// Design and gait inputs
// =============================================================================

#[test]
fn grid_tread_attenuates_grooved_rows_and_columns() {
    let mut plain = reference_sim();
    let mut grooved = reference_sim();
    grooved
        .update_design(&DesignParams::default().with_tread(TreadPattern::GridPattern))
        .unwrap();

    let base = plain.stiffness().clone();
    let k = grooved.stiffness();
    for row in 0..10 {
        assert_relative_eq!(k[(row, 4)], 0.2 * base[(row, 4)], epsilon = 1e-12);
    }
    for col in 0..28 {
        assert_relative_eq!(k[(4, col)], 0.2 * base[(4, col)], epsilon = 1e-12);
    }
    for row in [1, 2, 3, 5, 6, 7, 9] {
        assert_relative_eq!(k[(row, 1)], base[(row, 1)], epsilon = 1e-12);
    }

    // Softer tread spreads the same load deeper.
    let plain_solution = plain.solve_static(75.0).unwrap();
    let grooved_solution = grooved.solve_static(75.0).unwrap();
    assert!(grooved_solution.penetration >= plain_solution.penetration);
}

#[test]
fn repeated_design_update_is_idempotent() {
    let mut sim = reference_sim();
    let params = DesignParams::default()
        .with_stack(35.0, 12.0)
        .with_arch_factor(3.0)
        .with_tread(TreadPattern::HorizontalSipes);

    sim.update_design(&params).unwrap();
    let thickness = sim.thickness().clone();
    let stiffness = sim.stiffness().clone();
    sim.update_design(&params).unwrap();

    assert_eq!(sim.thickness(), &thickness);
    assert_eq!(sim.stiffness(), &stiffness);
}

#[test]
fn every_gait_and_tread_converges_at_reference_weight() {
    let mut sim = reference_sim();
    for gait in GaitProfile::ALL {
        for tread in TreadPattern::ALL {
            sim.set_gait_profile(gait);
            sim.update_design(&DesignParams::default().with_tread(tread))
                .unwrap();
            let solution = sim.solve_static(75.0).unwrap();
            assert!(solution.converged, "{gait} / {tread} did not converge");
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn walk_report_serializes_to_json() {
    let mut sim = reference_sim();
    let report = sim.walk_cycle(70.0, 3).unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let parsed: sole_contact::WalkCycleReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.log.len(), 3);
    assert_relative_eq!(parsed.total_wear(), report.total_wear(), epsilon = 1e-9);

    let params: DesignParams = serde_json::from_str(r#"{"heel_mm": 30.0, "tread": "honeycomb"}"#)
        .unwrap();
    assert_relative_eq!(params.heel_mm, 30.0);
    assert_eq!(params.tread, TreadPattern::Honeycomb);
    assert_relative_eq!(params.fore_mm, 15.0);
}

#[cfg(feature = "serde")]
#[test]
fn grid_json_is_validated() {
    let grid: sole_contact::SoleGrid =
        serde_json::from_str(r#"{"nx": 28, "ny": 10, "dx": 1.0}"#).unwrap();
    assert_eq!(grid, sole_contact::SoleGrid::default());

    let snapshot = serde_json::to_value(SoleSimulation::default()).unwrap();
    let round: sole_contact::SoleGrid = serde_json::from_value(snapshot["grid"].clone()).unwrap();
    assert_eq!(round.shape(), (28, 10));

    for bad in [
        r#"{"nx": 0, "ny": 10, "dx": 1.0}"#,
        r#"{"nx": 28, "ny": 0, "dx": 1.0}"#,
        r#"{"nx": 28, "ny": 10, "dx": 0.0}"#,
        r#"{"nx": 28, "ny": 10, "dx": -2.0}"#,
        r#"{"nx": 28, "ny": 10, "dx": 1.0, "cells": 5}"#,
    ] {
        let err = serde_json::from_str::<sole_contact::SoleGrid>(bad)
            .unwrap_err()
            .to_string();
        assert!(
            err.contains("invalid grid") || err.contains("unknown field"),
            "{bad}: {err}"
        );
    }
}
