//! Subcommand implementations.
//!
//! Each command resolves its scenario, runs the model, and prints either a
//! text summary or a pretty JSON document on stdout.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::info;

use sole_contact::{DesignParams, GaitProfile, StaticSolution, WalkCycleReport};
use sole_design::{
    ComfortAssessment, DesignMetrics, InverseDesignConfig, InverseDesignOutcome, InverseDesigner,
    SoleMaterial,
};

use crate::args::SimArgs;

#[derive(Serialize)]
struct StaticReport {
    material: String,
    design: DesignParams,
    gait: GaitProfile,
    weight_kg: f64,
    comfort: ComfortAssessment,
    solution: StaticSolution,
}

#[derive(Serialize)]
struct WalkReport {
    design: DesignParams,
    gait: GaitProfile,
    cycle: WalkCycleReport,
}

#[derive(Serialize)]
struct MetricsReport {
    material: SoleMaterial,
    design: DesignParams,
    metrics: DesignMetrics,
}

fn emit_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{text}");
    Ok(())
}

fn print_header(title: &str, design: &DesignParams, gait: GaitProfile) {
    println!("{}", title.bold());
    println!(
        "  Heel {}mm | Fore {}mm | Arch {}x | Modulus {} | Tread {} | Gait {}",
        design.heel_mm, design.fore_mm, design.arch_factor, design.modulus, design.tread, gait
    );
    println!();
}

/// One static solve with comfort index.
pub fn run_static(args: &SimArgs, json: bool) -> Result<()> {
    let scenario = args.resolve()?;
    let mut sim = scenario.simulation()?;
    let solution = sim
        .solve_static(scenario.weight_kg)
        .context("Static solve failed")?;
    let comfort = ComfortAssessment::from_peak(solution.peak_pressure());

    if json {
        return emit_json(&StaticReport {
            material: scenario.material.name,
            design: scenario.design,
            gait: scenario.gait,
            weight_kg: scenario.weight_kg,
            comfort,
            solution,
        });
    }

    print_header("STATIC LOAD ANALYSIS", &scenario.design, scenario.gait);
    print!("{solution}");
    if comfort.critical {
        println!("{}", comfort.red().bold());
    } else {
        println!("{}", comfort.green());
    }
    Ok(())
}

/// Walk-cycle sweep with data log and wear summary.
pub fn run_walk(args: &SimArgs, steps: usize, json: bool) -> Result<()> {
    let scenario = args.resolve()?;
    let mut sim = scenario.simulation()?;
    let cycle = sim
        .walk_cycle(scenario.weight_kg, steps)
        .context("Walk cycle failed")?;

    if json {
        return emit_json(&WalkReport {
            design: scenario.design,
            gait: scenario.gait,
            cycle,
        });
    }

    print_header("DYNAMIC GAIT SWEEP", &scenario.design, scenario.gait);
    print!("{cycle}");
    if cycle.unconverged_steps > 0 {
        println!(
            "{}",
            "Some steps hit the solver iteration cap; peaks are understated.".yellow()
        );
    }
    Ok(())
}

/// Product metrics for the resolved material and design.
pub fn run_metrics(args: &SimArgs, json: bool) -> Result<()> {
    let scenario = args.resolve()?;
    scenario
        .design
        .validate()
        .context("Invalid sole design")?;
    let metrics = DesignMetrics::estimate(&scenario.design, &scenario.material);

    if json {
        return emit_json(&MetricsReport {
            material: scenario.material,
            design: scenario.design,
            metrics,
        });
    }

    println!("{} {}", "MATERIAL".bold(), scenario.material.name);
    print!("{metrics}");
    Ok(())
}

/// Inverse design for a target comfort score.
pub fn run_design(
    args: &SimArgs,
    target_score: f64,
    samples: usize,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let scenario = args.resolve()?;
    let sim = scenario.simulation()?;

    let mut config = InverseDesignConfig::new().with_samples(samples);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    info!(samples, target_score, weight_kg = scenario.weight_kg, "Training surrogate");

    let outcome: InverseDesignOutcome = InverseDesigner::new(config)
        .run(&sim, target_score, scenario.weight_kg)
        .context("Inverse design failed")?;

    if json {
        return emit_json(&outcome);
    }

    println!("{}", "OPTIMIZATION RESULT".bold());
    print!("{outcome}");
    Ok(())
}
