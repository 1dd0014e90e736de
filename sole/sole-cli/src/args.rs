//! Shared simulation flags and JSON scenario files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use sole_contact::{DesignParams, GaitProfile, SoleGrid, SoleSimulation, SolverConfig, TreadPattern};
use sole_design::{MaterialPreset, SoleMaterial};

/// Body weight used when neither a flag nor the scenario file gives one.
const DEFAULT_WEIGHT_KG: f64 = 75.0;

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SimArgs {
    /// Material preset: eva, pu, rubber, tpu or custom
    #[arg(long)]
    pub material: Option<MaterialPreset>,

    /// Heel stack height (mm)
    #[arg(long)]
    pub heel: Option<f64>,

    /// Forefoot stack height (mm)
    #[arg(long)]
    pub fore: Option<f64>,

    /// Arch stiffness multiplier
    #[arg(long)]
    pub arch: Option<f64>,

    /// Foundation modulus (overrides the material's)
    #[arg(long)]
    pub modulus: Option<f64>,

    /// Tread pattern: none, sipes, grid or honeycomb
    #[arg(long)]
    pub tread: Option<TreadPattern>,

    /// Gait profile: neutral, overpronator or supinator
    #[arg(long)]
    pub gait: Option<GaitProfile>,

    /// Body weight (kg) [default: 75]
    #[arg(long)]
    pub weight: Option<f64>,

    /// JSON scenario file; flags override its values
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,
}

/// Sole footprint in a scenario file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSpec {
    pub length: f64,
    pub width: f64,
    pub resolution: f64,
}

/// Contents of a `--config` scenario file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioFile {
    pub material: Option<MaterialPreset>,
    pub design: Option<DesignParams>,
    pub gait: Option<GaitProfile>,
    pub weight_kg: Option<f64>,
    pub grid: Option<GridSpec>,
    pub solver: Option<SolverConfig>,
}

impl ScenarioFile {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scenario file {}", path.display()))
    }
}

/// Fully resolved inputs of one run.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub grid: SoleGrid,
    pub solver: SolverConfig,
    pub material: SoleMaterial,
    pub design: DesignParams,
    pub gait: GaitProfile,
    pub weight_kg: f64,
}

impl SimArgs {
    /// Resolve flags against the scenario file named by `--config`, if any.
    pub fn resolve(&self) -> Result<Scenario> {
        let file = match &self.config {
            Some(path) => ScenarioFile::load(path)?,
            None => ScenarioFile::default(),
        };
        self.resolve_with(file)
    }

    /// Resolve flags over `file`.
    ///
    /// The design starts from the file (or the reference design). An
    /// explicitly chosen material then sets modulus and wear factor, and
    /// individual flags override last.
    pub fn resolve_with(&self, file: ScenarioFile) -> Result<Scenario> {
        let grid = match file.grid {
            Some(spec) => SoleGrid::new(spec.length, spec.width, spec.resolution)
                .context("Invalid grid in scenario file")?,
            None => SoleGrid::default(),
        };

        let chosen = self.material.or(file.material);
        let material = chosen.unwrap_or_default().material();

        let mut design = file.design.unwrap_or_default();
        if chosen.is_some() {
            design = material.apply(&design);
        }
        if self.heel.is_some() || self.fore.is_some() {
            design = design.with_stack(
                self.heel.unwrap_or(design.heel_mm),
                self.fore.unwrap_or(design.fore_mm),
            );
        }
        if let Some(arch) = self.arch {
            design = design.with_arch_factor(arch);
        }
        if let Some(modulus) = self.modulus {
            design = design.with_modulus(modulus);
        }
        if let Some(tread) = self.tread {
            design = design.with_tread(tread);
        }

        Ok(Scenario {
            grid,
            solver: file.solver.unwrap_or_default(),
            material,
            design,
            gait: self.gait.or(file.gait).unwrap_or_default(),
            weight_kg: self.weight.or(file.weight_kg).unwrap_or(DEFAULT_WEIGHT_KG),
        })
    }
}

impl Scenario {
    /// Build a simulation configured for this scenario.
    pub fn simulation(&self) -> Result<SoleSimulation> {
        let mut sim = SoleSimulation::with_config(self.grid, self.solver)
            .context("Invalid solver configuration")?;
        sim.update_design(&self.design)
            .context("Invalid sole design")?;
        sim.set_gait_profile(self.gait);
        Ok(sim)
    }
}
