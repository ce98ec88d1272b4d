//! CLI configuration loading
//!
//! Settings are layered (later sources override earlier):
//! 1. Built-in defaults
//! 2. The TOML file given by `--config` (optional)
//! 3. Environment variables prefixed with `MERTON__`, e.g.
//!    `MERTON__SOLVER__MAX_ITERATIONS=200`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use adapter_loader::DebtAlignment;
use merton_core::math::solvers::SolverConfig;
use merton_core::types::FirmId;
use merton_risk::engine::{EngineConfig, DEFAULT_MATURITY};
use merton_risk::parallel::{ParallelConfig, DEFAULT_BATCH_SIZE, DEFAULT_PARALLEL_THRESHOLD};
use merton_risk::variant::{ModelVariant, SharesOutstanding};
use serde::Deserialize;

use crate::{CliError, Result};

/// Application settings.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Model settings
    #[serde(default)]
    pub model: ModelSettings,
    /// Solver settings
    #[serde(default)]
    pub solver: SolverSettings,
    /// Batch engine settings
    #[serde(default)]
    pub engine: EngineSettings,
    /// Input and output locations
    #[serde(default)]
    pub data: DataSettings,
    /// Shares outstanding per firm, in millions
    #[serde(default = "default_shares_outstanding")]
    pub shares_outstanding: BTreeMap<String, f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            solver: SolverSettings::default(),
            engine: EngineSettings::default(),
            data: DataSettings::default(),
            shares_outstanding: default_shares_outstanding(),
        }
    }
}

/// Model settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelSettings {
    /// Debt maturity horizon in years
    #[serde(default = "default_maturity_years")]
    pub maturity_years: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            maturity_years: default_maturity_years(),
        }
    }
}

/// Newton solver settings.
#[derive(Debug, Deserialize, Clone)]
pub struct SolverSettings {
    /// Relative step tolerance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Residual norm required once the step vanishes
    #[serde(default = "default_residual_tolerance")]
    pub residual_tolerance: f64,
    /// Iteration cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            residual_tolerance: default_residual_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Batch engine settings.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    /// Rayon thread pool size
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Minimum batch length before running in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Minimum observations per rayon task
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            parallel_threshold: default_parallel_threshold(),
            batch_size: default_batch_size(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    /// Directory holding the four input CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory receiving result files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Debt alignment for every variant; unset means per-variant default
    #[serde(default)]
    pub debt_alignment: Option<DebtAlignment>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            debt_alignment: None,
        }
    }
}

fn default_maturity_years() -> f64 {
    DEFAULT_MATURITY
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_residual_tolerance() -> f64 {
    1e-8
}

fn default_max_iterations() -> usize {
    100
}

fn default_threads() -> usize {
    num_cpus::get()
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/real")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_shares_outstanding() -> BTreeMap<String, f64> {
    SharesOutstanding::reference()
        .iter()
        .map(|(firm, shares)| (firm.as_str().to_string(), shares))
        .collect()
}

impl Settings {
    /// Loads settings from `path` (if it exists) and the environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix("MERTON").separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.model.maturity_years.is_finite() && self.model.maturity_years > 0.0) {
            return Err(invalid("model.maturity_years", self.model.maturity_years));
        }
        if !(self.solver.tolerance.is_finite() && self.solver.tolerance > 0.0) {
            return Err(invalid("solver.tolerance", self.solver.tolerance));
        }
        if !(self.solver.residual_tolerance.is_finite() && self.solver.residual_tolerance > 0.0) {
            return Err(invalid(
                "solver.residual_tolerance",
                self.solver.residual_tolerance,
            ));
        }
        if self.solver.max_iterations == 0 {
            return Err(CliError::InvalidArgument(
                "solver.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.engine.threads == 0 {
            return Err(CliError::InvalidArgument(
                "engine.threads must be at least 1".to_string(),
            ));
        }
        for (firm, shares) in &self.shares_outstanding {
            if !(shares.is_finite() && *shares > 0.0) {
                return Err(invalid(&format!("shares_outstanding.{}", firm), *shares));
            }
        }
        Ok(())
    }

    /// Solver configuration.
    pub fn solver_config(&self) -> SolverConfig<f64> {
        SolverConfig {
            tolerance: self.solver.tolerance,
            residual_tolerance: self.solver.residual_tolerance,
            max_iterations: self.solver.max_iterations,
            ..SolverConfig::default()
        }
    }

    /// Engine configuration for a batch run.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            maturity: self.model.maturity_years,
            solver: self.solver_config(),
            parallel: ParallelConfig::new(self.engine.batch_size, self.engine.parallel_threshold),
        }
    }

    /// Shares outstanding table.
    ///
    /// Keys are upper-cased since the configuration layer may fold them to
    /// lower case.
    pub fn shares(&self) -> SharesOutstanding {
        self.shares_outstanding
            .iter()
            .map(|(firm, shares)| (FirmId::new(firm.to_uppercase()), *shares))
            .collect()
    }

    /// Debt alignment used for `variant`.
    pub fn debt_alignment(&self, variant: ModelVariant) -> DebtAlignment {
        self.data.debt_alignment.unwrap_or(match variant {
            ModelVariant::Naive => DebtAlignment::ForwardFill,
            ModelVariant::Improved => DebtAlignment::FiscalYear,
        })
    }
}

fn invalid(key: &str, value: f64) -> CliError {
    CliError::InvalidArgument(format!("{} = {} must be finite and positive", key, value))
}
