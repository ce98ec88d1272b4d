//! Typed rows of the four input series.
//!
//! Numeric cells that are empty or unparsable load as `None`; alignment drops
//! the affected observations.

use chrono::NaiveDate;
use merton_core::types::FirmId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A row type with a fixed set of required columns.
pub trait CsvRow: DeserializeOwned {
    /// Conventional file name of the series.
    const FILE_NAME: &'static str;
    /// Columns that must be present in the header.
    const COLUMNS: &'static [&'static str];
}

/// Daily closing share price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPriceRow {
    /// Trading date
    pub date: NaiveDate,
    /// Firm identifier
    pub firm_id: FirmId,
    /// Closing share price
    #[serde(deserialize_with = "csv::invalid_option")]
    pub equity_price: Option<f64>,
}

impl CsvRow for EquityPriceRow {
    const FILE_NAME: &'static str = "equity_prices.csv";
    const COLUMNS: &'static [&'static str] = &["date", "firm_id", "equity_price"];
}

/// Annualised equity volatility estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityVolRow {
    /// Trading date
    pub date: NaiveDate,
    /// Firm identifier
    pub firm_id: FirmId,
    /// Annualised equity volatility
    #[serde(deserialize_with = "csv::invalid_option")]
    pub equity_vol: Option<f64>,
}

impl CsvRow for EquityVolRow {
    const FILE_NAME: &'static str = "equity_vol.csv";
    const COLUMNS: &'static [&'static str] = &["date", "firm_id", "equity_vol"];
}

/// Reported face value of debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRow {
    /// Report date
    pub date: NaiveDate,
    /// Firm identifier
    pub firm_id: FirmId,
    /// Face value of debt
    #[serde(deserialize_with = "csv::invalid_option")]
    pub debt: Option<f64>,
}

impl CsvRow for DebtRow {
    const FILE_NAME: &'static str = "debt_quarterly.csv";
    const COLUMNS: &'static [&'static str] = &["date", "firm_id", "debt"];
}

/// Annualised risk-free rate, common to all firms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFreeRow {
    /// Observation date
    pub date: NaiveDate,
    /// Annualised risk-free rate
    #[serde(deserialize_with = "csv::invalid_option")]
    pub risk_free_rate: Option<f64>,
}

impl CsvRow for RiskFreeRow {
    const FILE_NAME: &'static str = "risk_free.csv";
    const COLUMNS: &'static [&'static str] = &["date", "risk_free_rate"];
}
