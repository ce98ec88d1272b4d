//! Observation value types.
//!
//! - [`FirmId`]: strongly-typed firm identifier
//! - [`AlignedObservation`]: one firm-date row after multi-source alignment
//! - [`MarketObservation`]: the calibration input, with the equity value
//!   already chosen by the model variant

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a firm (typically its ticker).
///
/// # Examples
///
/// ```
/// use merton_core::types::FirmId;
///
/// let id = FirmId::new("AAPL");
/// assert_eq!(id.as_str(), "AAPL");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirmId(String);

impl FirmId {
    /// Creates a new firm ID.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for FirmId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FirmId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A firm-date row with every input series present.
///
/// Produced by the alignment layer; the equity value used for calibration is
/// derived from it by a model variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignedObservation {
    /// Firm identifier
    pub firm_id: FirmId,
    /// Observation date
    pub date: NaiveDate,
    /// Closing share price
    pub share_price: f64,
    /// Annualised equity volatility
    pub equity_vol: f64,
    /// Face value of debt in force at `date`
    pub debt: f64,
    /// Annualised risk-free rate
    pub risk_free_rate: f64,
}

/// Calibration input for one firm and date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketObservation {
    /// Firm identifier
    pub firm_id: FirmId,
    /// Observation date
    pub date: NaiveDate,
    /// Equity value E (share price or market capitalisation)
    pub equity_value: f64,
    /// Annualised equity volatility σ_E
    pub equity_vol: f64,
    /// Debt face value D
    pub debt: f64,
    /// Time to maturity T in years
    pub maturity: f64,
    /// Annualised risk-free rate r
    pub risk_free_rate: f64,
}

impl MarketObservation {
    /// Builds a calibration input from an aligned row.
    ///
    /// # Arguments
    ///
    /// * `aligned` - The aligned firm-date row
    /// * `equity_value` - Equity value chosen by the model variant
    /// * `maturity` - Debt maturity horizon in years
    pub fn from_aligned(aligned: &AlignedObservation, equity_value: f64, maturity: f64) -> Self {
        Self {
            firm_id: aligned.firm_id.clone(),
            date: aligned.date,
            equity_value,
            equity_vol: aligned.equity_vol,
            debt: aligned.debt,
            maturity,
            risk_free_rate: aligned.risk_free_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aligned() -> AlignedObservation {
        AlignedObservation {
            firm_id: FirmId::new("XOM"),
            date: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
            share_price: 110.0,
            equity_vol: 0.28,
            debt: 41_000.0,
            risk_free_rate: 0.045,
        }
    }

    #[test]
    fn test_firm_id_conversions() {
        let a: FirmId = "JPM".into();
        let b: FirmId = String::from("JPM").into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "JPM");
    }

    #[test]
    fn test_firm_id_ordering() {
        let mut ids = vec![FirmId::new("TSLA"), FirmId::new("AAPL"), FirmId::new("F")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "AAPL");
        assert_eq!(ids[2].as_str(), "TSLA");
    }

    #[test]
    fn test_firm_id_serialises_transparently() {
        let json = serde_json::to_string(&FirmId::new("F")).unwrap();
        assert_eq!(json, "\"F\"");
    }

    #[test]
    fn test_market_observation_from_aligned() {
        let row = aligned();
        let obs = MarketObservation::from_aligned(&row, 469_700.0, 1.0);
        assert_eq!(obs.firm_id, row.firm_id);
        assert_eq!(obs.date, row.date);
        assert_eq!(obs.equity_value, 469_700.0);
        assert_eq!(obs.equity_vol, 0.28);
        assert_eq!(obs.debt, 41_000.0);
        assert_eq!(obs.maturity, 1.0);
        assert_eq!(obs.risk_free_rate, 0.045);
    }
}
