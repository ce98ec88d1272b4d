//! Calibrate command implementation
//!
//! Solves for asset value and volatility of a single observation and
//! reports the implied risk measures.

use merton_models::calibration::AssetCalibrator;
use merton_models::risk::compute_risk_measures;
use serde::Serialize;
use tracing::info;

use crate::config::Settings;
use crate::{CliError, Result};

/// Inputs of a single-point calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointInput {
    /// Equity value E
    pub equity_value: f64,
    /// Equity volatility σ_E
    pub equity_vol: f64,
    /// Face value of debt D
    pub debt: f64,
    /// Maturity T in years
    pub maturity: f64,
    /// Risk-free rate r
    pub rate: f64,
}

/// Calibration result for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointResult {
    /// Asset value V
    #[serde(rename = "V")]
    pub asset_value: f64,
    /// Asset volatility σ_V
    #[serde(rename = "sigma_V")]
    pub asset_vol: f64,
    /// Distance-to-default
    #[serde(rename = "DD")]
    pub distance_to_default: f64,
    /// Default probability
    #[serde(rename = "PD")]
    pub default_probability: f64,
}

/// Calibrates one observation with the configured solver.
pub fn calibrate_point(settings: &Settings, input: &PointInput) -> Result<PointResult> {
    let params = AssetCalibrator::new(settings.solver_config()).calibrate(
        input.equity_value,
        input.equity_vol,
        input.debt,
        input.maturity,
        input.rate,
    )?;
    let measures = compute_risk_measures(
        params.asset_value,
        input.debt,
        input.maturity,
        input.rate,
        params.asset_vol,
    );

    Ok(PointResult {
        asset_value: params.asset_value,
        asset_vol: params.asset_vol,
        distance_to_default: measures.distance_to_default,
        default_probability: measures.default_probability,
    })
}

/// Run the calibrate command
pub fn run(settings: &Settings, input: &PointInput, format: &str) -> Result<()> {
    info!("Starting calibration...");
    info!("  Equity value: {}", input.equity_value);
    info!("  Equity volatility: {}", input.equity_vol);
    info!("  Debt: {}", input.debt);
    info!("  Maturity: {}", input.maturity);
    info!("  Risk-free rate: {}", input.rate);

    let result = calibrate_point(settings, input)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.serialize(result)?;
            writer.flush()?;
        }
        "table" => {
            println!("\n┌────────────┬──────────────────┐");
            println!("│ Measure    │ Value            │");
            println!("├────────────┼──────────────────┤");
            println!("│ V          │ {:>16.4} │", result.asset_value);
            println!("│ sigma_V    │ {:>16.6} │", result.asset_vol);
            println!("│ DD         │ {:>16.6} │", result.distance_to_default);
            println!("│ PD         │ {:>16.6e} │", result.default_probability);
            println!("└────────────┴──────────────────┘");
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            )));
        }
    }

    info!("Calibration complete");
    Ok(())
}
