//! Distance-to-default and risk-neutral default probability.
//!
//! ## Formulas
//!
//! ```text
//! μ  = V·e^(rT)                         expected asset value at T
//! s  = μ·√(e^(σ²T) − 1)                 standard deviation of V_T
//! DD = (μ − D) / s
//! PD = N(−d₂),  d₂ = [ln(V/D) + (r − σ²/2)T] / (σ√T)
//! ```
//!
//! DD is the distance in standard deviations of the lognormal terminal asset
//! value; it saturates to ±∞ when that standard deviation vanishes.

use merton_core::math::distributions::norm_cdf;
use serde::{Deserialize, Serialize};

use crate::analytical::d2;
use crate::calibration::AssetParameters;

/// Below this terminal standard deviation DD is reported as ±∞.
pub const DD_SPREAD_FLOOR: f64 = 1e-8;

/// Default risk measures for one calibrated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMeasures {
    /// Distance-to-default, possibly ±∞.
    pub distance_to_default: f64,
    /// Risk-neutral default probability in [0, 1].
    pub default_probability: f64,
}

impl RiskMeasures {
    /// Computes risk measures from calibrated asset parameters.
    pub fn from_parameters(params: &AssetParameters, debt: f64, maturity: f64, rate: f64) -> Self {
        compute_risk_measures(params.asset_value, debt, maturity, rate, params.asset_vol)
    }
}

/// Distance-to-default.
///
/// # Examples
/// ```
/// use merton_models::risk::distance_to_default;
///
/// let dd = distance_to_default(169_409.0, 20_000.0, 1.0, 0.03, 0.31);
/// assert!(dd > 2.7 && dd < 2.9);
///
/// // No asset volatility: solvent firms sit infinitely far from default
/// assert_eq!(distance_to_default(169_409.0, 20_000.0, 1.0, 0.03, 0.0), f64::INFINITY);
/// ```
pub fn distance_to_default(
    asset_value: f64,
    debt: f64,
    maturity: f64,
    rate: f64,
    asset_vol: f64,
) -> f64 {
    let mu = asset_value * (rate * maturity).exp();
    let spread = mu * (asset_vol * asset_vol * maturity).exp_m1().sqrt();

    if spread < DD_SPREAD_FLOOR {
        if mu > debt {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    } else {
        (mu - debt) / spread
    }
}

/// Risk-neutral probability that assets end below debt at maturity, N(−d₂).
///
/// Inputs are expected to come from a successful calibration; there is no
/// guard.
pub fn default_probability(
    asset_value: f64,
    debt: f64,
    maturity: f64,
    rate: f64,
    asset_vol: f64,
) -> f64 {
    norm_cdf(-d2(asset_value, debt, maturity, rate, asset_vol))
}

/// Computes both measures.
///
/// # Examples
/// ```
/// use merton_models::risk::compute_risk_measures;
///
/// let m = compute_risk_measures(169_409.0, 20_000.0, 1.0, 0.03, 0.31);
/// assert!(m.default_probability < 0.01);
/// assert!(m.distance_to_default > 0.0);
/// ```
pub fn compute_risk_measures(
    asset_value: f64,
    debt: f64,
    maturity: f64,
    rate: f64,
    asset_vol: f64,
) -> RiskMeasures {
    RiskMeasures {
        distance_to_default: distance_to_default(asset_value, debt, maturity, rate, asset_vol),
        default_probability: default_probability(asset_value, debt, maturity, rate, asset_vol),
    }
}
