//! Batch credit risk engine.
//!
//! For every aligned observation the engine:
//!
//! 1. forms the equity value with the variant's [`EquityTransform`]
//! 2. calibrates (V, σ_V)
//! 3. computes distance-to-default and default probability
//! 4. emits a [`ResultRecord`]
//!
//! An observation that fails any step is dropped and counted in
//! [`RunStats`]; the batch itself never fails. Output order equals input
//! order whether or not the batch runs in parallel.

use std::collections::BTreeSet;

use merton_core::math::solvers::SolverConfig;
use merton_core::types::{AlignedObservation, FailureKind, FirmId, MarketObservation};
use merton_models::calibration::AssetCalibrator;
use merton_models::risk::RiskMeasures;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::parallel::{map_with_config, ParallelConfig};
use crate::record::ResultRecord;
use crate::variant::{EquityTransform, ModelVariant};

/// Default debt maturity horizon in years.
pub const DEFAULT_MATURITY: f64 = 1.0;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Debt maturity T applied to every observation.
    pub maturity: f64,
    /// Newton solver settings.
    pub solver: SolverConfig<f64>,
    /// Parallel execution settings.
    pub parallel: ParallelConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            maturity: DEFAULT_MATURITY,
            solver: SolverConfig::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

/// Why an observation produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The equity transform could not form an equity value.
    MissingEquityValue,
    /// Calibration failed.
    Calibration(FailureKind),
}

/// Counts of processed, emitted and dropped observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Observations seen.
    pub processed: usize,
    /// Records emitted.
    pub emitted: usize,
    /// Dropped: no equity value (e.g. unknown shares outstanding).
    pub missing_equity_value: usize,
    /// Dropped: inputs rejected before solving.
    pub invalid_input: usize,
    /// Dropped: solver failed or converged to an infeasible point.
    pub non_convergent: usize,
}

impl RunStats {
    /// Total dropped observations.
    pub fn dropped(&self) -> usize {
        self.missing_equity_value + self.invalid_input + self.non_convergent
    }

    fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingEquityValue => self.missing_equity_value += 1,
            SkipReason::Calibration(FailureKind::InvalidInput) => self.invalid_input += 1,
            SkipReason::Calibration(FailureKind::NonConvergent) => self.non_convergent += 1,
        }
    }
}

/// Records and statistics from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Variant that produced the records.
    pub variant: ModelVariant,
    /// Emitted records, in input order.
    pub records: Vec<ResultRecord>,
    /// Run statistics.
    pub stats: RunStats,
}

/// Runs one model variant over a batch of aligned observations.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use merton_core::types::{AlignedObservation, FirmId};
/// use merton_risk::engine::{CreditRiskEngine, EngineConfig};
/// use merton_risk::variant::SharePrice;
///
/// let obs = AlignedObservation {
///     firm_id: FirmId::new("ACME"),
///     date: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
///     share_price: 150_000.0,
///     equity_vol: 0.35,
///     debt: 20_000.0,
///     risk_free_rate: 0.03,
/// };
///
/// let engine = CreditRiskEngine::new(SharePrice, EngineConfig::default());
/// let output = engine.run(&[obs]);
///
/// assert_eq!(output.stats.emitted, 1);
/// assert!(output.records[0].default_probability < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct CreditRiskEngine<E: EquityTransform> {
    transform: E,
    calibrator: AssetCalibrator,
    config: EngineConfig,
}

impl<E: EquityTransform> CreditRiskEngine<E> {
    /// Creates an engine for the given transform.
    pub fn new(transform: E, config: EngineConfig) -> Self {
        Self {
            transform,
            calibrator: AssetCalibrator::new(config.solver),
            config,
        }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the variant implemented by the transform.
    pub fn variant(&self) -> ModelVariant {
        self.transform.variant()
    }

    /// Processes a single observation.
    pub fn process(&self, obs: &AlignedObservation) -> Result<ResultRecord, SkipReason> {
        let equity = self
            .transform
            .equity_value(obs)
            .ok_or(SkipReason::MissingEquityValue)?;

        let input = MarketObservation::from_aligned(obs, equity.value, self.config.maturity);
        let params = self
            .calibrator
            .calibrate_observation(&input)
            .map_err(|err| {
                debug!(
                    firm = %obs.firm_id,
                    date = %obs.date,
                    error = %err,
                    "Dropping observation"
                );
                SkipReason::Calibration(err.kind())
            })?;

        let measures =
            RiskMeasures::from_parameters(&params, input.debt, input.maturity, input.risk_free_rate);

        Ok(ResultRecord::new(obs.firm_id.clone(), obs.date, params, measures)
            .with_passthrough(equity.share_price, equity.market_cap))
    }

    /// Processes a batch, in parallel when it reaches the configured
    /// threshold.
    pub fn run(&self, observations: &[AlignedObservation]) -> RunOutput {
        let variant = self.variant();
        let parallel = self.config.parallel.should_parallelize(observations.len());
        info!(
            variant = %variant,
            observations = observations.len(),
            parallel,
            "Starting credit risk run"
        );

        let outcomes = map_with_config(observations, &self.config.parallel, |obs| {
            self.process(obs)
        });

        let mut stats = RunStats::default();
        let mut records = Vec::with_capacity(outcomes.len());
        let mut warned: BTreeSet<&FirmId> = BTreeSet::new();

        for (obs, outcome) in observations.iter().zip(outcomes) {
            stats.processed += 1;
            match outcome {
                Ok(record) => {
                    stats.emitted += 1;
                    records.push(record);
                }
                Err(reason) => {
                    if reason == SkipReason::MissingEquityValue && warned.insert(&obs.firm_id) {
                        warn!(
                            variant = %variant,
                            firm = %obs.firm_id,
                            "No equity value for firm; its observations are skipped"
                        );
                    }
                    stats.count_skip(reason);
                }
            }
        }

        info!(
            variant = %variant,
            processed = stats.processed,
            emitted = stats.emitted,
            missing_equity_value = stats.missing_equity_value,
            invalid_input = stats.invalid_input,
            non_convergent = stats.non_convergent,
            "Credit risk run complete"
        );

        RunOutput {
            variant,
            records,
            stats,
        }
    }
}
