//! Per-observation output record.

use chrono::NaiveDate;
use merton_core::types::FirmId;
use merton_models::calibration::AssetParameters;
use merton_models::risk::RiskMeasures;
use serde::{Deserialize, Serialize};

/// Calibrated parameters and risk measures for one firm and date.
///
/// Exists only for observations whose calibration converged to strictly
/// positive (V, σ_V). Serialises to the CSV columns `date, firm_id,
/// share_price, market_cap, V, sigma_V, DD, PD`; the two passthrough columns
/// are empty for the naive variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Observation date
    pub date: NaiveDate,
    /// Firm identifier
    pub firm_id: FirmId,
    /// Share price (improved variant only)
    #[serde(default)]
    pub share_price: Option<f64>,
    /// Market capitalisation used as E (improved variant only)
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Asset value V
    #[serde(rename = "V")]
    pub asset_value: f64,
    /// Asset volatility σ_V
    #[serde(rename = "sigma_V")]
    pub asset_vol: f64,
    /// Distance-to-default, possibly ±∞
    #[serde(rename = "DD")]
    pub distance_to_default: f64,
    /// Default probability
    #[serde(rename = "PD")]
    pub default_probability: f64,
}

impl ResultRecord {
    /// Assembles a record from its parts.
    pub fn new(
        firm_id: FirmId,
        date: NaiveDate,
        params: AssetParameters,
        measures: RiskMeasures,
    ) -> Self {
        Self {
            date,
            firm_id,
            share_price: None,
            market_cap: None,
            asset_value: params.asset_value,
            asset_vol: params.asset_vol,
            distance_to_default: measures.distance_to_default,
            default_probability: measures.default_probability,
        }
    }

    /// Sets the variant passthrough columns.
    pub fn with_passthrough(mut self, share_price: Option<f64>, market_cap: Option<f64>) -> Self {
        self.share_price = share_price;
        self.market_cap = market_cap;
        self
    }
}
