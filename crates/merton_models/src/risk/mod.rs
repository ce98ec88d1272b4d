//! Default risk measures derived from calibrated asset parameters.
//!
//! - [`distance_to_default`]: standard deviations between expected terminal
//!   assets and debt
//! - [`default_probability`]: risk-neutral probability N(−d₂)
//! - [`compute_risk_measures`]: both, as a [`RiskMeasures`] value

mod measures;

pub use measures::{
    compute_risk_measures, default_probability, distance_to_default, RiskMeasures,
    DD_SPREAD_FLOOR,
};
