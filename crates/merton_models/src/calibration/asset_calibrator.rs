//! Asset value and asset volatility calibration.
//!
//! Equity is a European call on the firm's assets struck at the face value of
//! debt. Given observed equity value E and equity volatility σ_E, the unknown
//! asset value V and asset volatility σ_V solve:
//!
//! ```text
//! C(V, D, T, r, σ_V) = E
//! N(d₁) · σ_V · V / E = σ_E
//! ```
//!
//! The first equation is evaluated divided by E. That leaves the roots
//! unchanged and makes both residuals dimensionless, so the fixed residual
//! returned outside the feasible region dominates for any firm size.

use merton_core::math::distributions::{norm_cdf, norm_pdf};
use merton_core::math::solvers::{NewtonSystemSolver, SolverConfig};
use merton_core::types::{CalibrationFailure, MarketObservation};
use serde::{Deserialize, Serialize};

use crate::analytical::{call_delta, call_value, call_vega, d1};

/// Residual reported for both equations when V or σ_V leaves the feasible
/// region.
pub const INFEASIBLE_RESIDUAL: f64 = 1e6;

/// Calibrated asset parameters.
///
/// Only constructed by a successful calibration: both fields are finite and
/// strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetParameters {
    /// Market value of the firm's assets V.
    pub asset_value: f64,
    /// Annualised asset volatility σ_V.
    pub asset_vol: f64,
}

/// The two-equation system linking asset parameters to equity observables.
///
/// Unknowns are ordered `[V, σ_V]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MertonSystem {
    /// Observed equity value E.
    pub equity_value: f64,
    /// Observed equity volatility σ_E.
    pub equity_vol: f64,
    /// Face value of debt D.
    pub debt: f64,
    /// Debt maturity T in years.
    pub maturity: f64,
    /// Risk-free rate r.
    pub rate: f64,
}

impl MertonSystem {
    /// Starting point `[E + D, σ_E · E / (E + D)]`.
    pub fn initial_guess(&self) -> Vec<f64> {
        let e = self.equity_value;
        let total = e + self.debt;
        let vol = if total > 0.0 {
            self.equity_vol * e / total
        } else {
            self.equity_vol
        };
        vec![total, vol]
    }

    /// Residuals `[(C − E)/E, N(d₁)·σ_V·V/E − σ_E]`.
    ///
    /// Returns `[INFEASIBLE_RESIDUAL; 2]` when V or σ_V is non-positive or
    /// non-finite.
    pub fn residuals(&self, x: &[f64]) -> Vec<f64> {
        let (v, sigma) = (x[0], x[1]);
        if !is_feasible(v, sigma) {
            return vec![INFEASIBLE_RESIDUAL, INFEASIBLE_RESIDUAL];
        }

        let e = self.equity_value;
        let (d, t, r) = (self.debt, self.maturity, self.rate);

        let value_gap = (call_value(v, d, t, r, sigma) - e) / e;
        let vol_gap = call_delta(v, d, t, r, sigma) * sigma * v / e - self.equity_vol;
        vec![value_gap, vol_gap]
    }

    /// Analytic Jacobian of [`residuals`](Self::residuals), rows per equation.
    ///
    /// ```text
    /// ∂f₁/∂V = N(d₁)/E                 ∂f₁/∂σ = vega/E = V·φ(d₁)·√T/E
    /// ∂f₂/∂V = σ/E·[N(d₁) + φ(d₁)/(σ√T)]   ∂f₂/∂σ = V/E·[N(d₁) − φ(d₁)·d₂]
    /// ```
    pub fn jacobian(&self, x: &[f64]) -> Vec<Vec<f64>> {
        let (v, sigma) = (x[0], x[1]);
        let e = self.equity_value;
        let (d, t, r) = (self.debt, self.maturity, self.rate);

        let sqrt_t = t.sqrt();
        let d1 = d1(v, d, t, r, sigma);
        let d2 = d1 - sigma * sqrt_t;
        let n_d1 = norm_cdf(d1);
        let pdf_d1 = norm_pdf(d1);

        vec![
            vec![n_d1 / e, call_vega(v, d, t, r, sigma) / e],
            vec![
                sigma / e * (n_d1 + pdf_d1 / (sigma * sqrt_t)),
                v / e * (n_d1 - pdf_d1 * d2),
            ],
        ]
    }
}

/// Calibrates asset parameters from equity observables.
///
/// # Example
///
/// ```
/// use merton_models::calibration::AssetCalibrator;
///
/// let calibrator = AssetCalibrator::with_defaults();
/// let params = calibrator.calibrate(150_000.0, 0.35, 20_000.0, 1.0, 0.03).unwrap();
///
/// assert!(params.asset_value > 150_000.0);
/// assert!(params.asset_vol < 0.35);
/// ```
#[derive(Debug, Clone)]
pub struct AssetCalibrator {
    solver: NewtonSystemSolver,
}

impl Default for AssetCalibrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl AssetCalibrator {
    /// Creates a calibrator with the given solver configuration.
    pub fn new(config: SolverConfig<f64>) -> Self {
        Self {
            solver: NewtonSystemSolver::new(config),
        }
    }

    /// Creates a calibrator with tolerance 1e-6 and 100 iterations.
    pub fn with_defaults() -> Self {
        Self {
            solver: NewtonSystemSolver::with_defaults(),
        }
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig<f64> {
        self.solver.config()
    }

    /// Solves for asset value and asset volatility.
    ///
    /// # Arguments
    ///
    /// * `equity_value` - Observed equity value E
    /// * `equity_vol` - Annualised equity volatility σ_E
    /// * `debt` - Face value of debt D
    /// * `maturity` - Debt maturity T in years
    /// * `rate` - Risk-free rate r
    ///
    /// # Errors
    ///
    /// * `CalibrationFailure::InvalidInput` - E, σ_E, D or T is not finite and
    ///   strictly positive, or r is not finite; the solver is not invoked
    /// * `CalibrationFailure::NonConvergent` - the solver exhausted its budget,
    ///   stalled, met a singular Jacobian, or ended at a non-positive pair
    pub fn calibrate(
        &self,
        equity_value: f64,
        equity_vol: f64,
        debt: f64,
        maturity: f64,
        rate: f64,
    ) -> Result<AssetParameters, CalibrationFailure> {
        require_positive("equity_value", equity_value)?;
        require_positive("equity_vol", equity_vol)?;
        require_positive("debt", debt)?;
        require_positive("maturity", maturity)?;
        if !rate.is_finite() {
            return Err(CalibrationFailure::invalid_input("risk_free_rate", rate));
        }

        let system = MertonSystem {
            equity_value,
            equity_vol,
            debt,
            maturity,
            rate,
        };

        let solution = self.solver.solve(
            |x| system.residuals(x),
            |x| system.jacobian(x),
            system.initial_guess(),
        )?;

        if !solution.converged {
            return Err(CalibrationFailure::non_convergent(
                solution.termination.to_string(),
                solution.iterations,
            ));
        }

        let (asset_value, asset_vol) = (solution.x[0], solution.x[1]);
        if !is_feasible(asset_value, asset_vol) {
            return Err(CalibrationFailure::non_convergent(
                format!("converged to infeasible point V = {asset_value}, σ_V = {asset_vol}"),
                solution.iterations,
            ));
        }

        Ok(AssetParameters {
            asset_value,
            asset_vol,
        })
    }

    /// Calibrates a [`MarketObservation`].
    pub fn calibrate_observation(
        &self,
        obs: &MarketObservation,
    ) -> Result<AssetParameters, CalibrationFailure> {
        self.calibrate(
            obs.equity_value,
            obs.equity_vol,
            obs.debt,
            obs.maturity,
            obs.risk_free_rate,
        )
    }
}

/// Calibrates with the default solver configuration.
///
/// See [`AssetCalibrator::calibrate`].
pub fn calibrate(
    equity_value: f64,
    equity_vol: f64,
    debt: f64,
    maturity: f64,
    rate: f64,
) -> Result<AssetParameters, CalibrationFailure> {
    AssetCalibrator::with_defaults().calibrate(equity_value, equity_vol, debt, maturity, rate)
}

#[inline]
fn is_feasible(v: f64, sigma: f64) -> bool {
    v.is_finite() && sigma.is_finite() && v > 0.0 && sigma > 0.0
}

#[inline]
fn require_positive(field: &'static str, value: f64) -> Result<(), CalibrationFailure> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalibrationFailure::invalid_input(field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use merton_core::types::FailureKind;

    fn scenario() -> MertonSystem {
        MertonSystem {
            equity_value: 150_000.0,
            equity_vol: 0.35,
            debt: 20_000.0,
            maturity: 1.0,
            rate: 0.03,
        }
    }

    #[test]
    fn test_initial_guess() {
        let x0 = scenario().initial_guess();
        assert_eq!(x0[0], 170_000.0);
        assert_relative_eq!(x0[1], 0.35 * 150_000.0 / 170_000.0, epsilon = 1e-15);
    }

    #[test]
    fn test_residuals_penalise_infeasible_points() {
        let system = scenario();
        for x in [
            [0.0, 0.3],
            [-1.0, 0.3],
            [170_000.0, 0.0],
            [170_000.0, -0.1],
            [f64::NAN, 0.3],
            [f64::INFINITY, 0.3],
        ] {
            assert_eq!(
                system.residuals(&x),
                vec![INFEASIBLE_RESIDUAL, INFEASIBLE_RESIDUAL]
            );
        }
    }

    #[test]
    fn test_jacobian_matches_finite_differences() {
        // Leveraged firm so that both N(d1) and φ(d1) are far from their limits
        let system = MertonSystem {
            equity_value: 50.0,
            equity_vol: 0.6,
            debt: 100.0,
            maturity: 1.0,
            rate: 0.03,
        };
        let x = [140.0, 0.25];
        let jac = system.jacobian(&x);

        let hv = 1e-4;
        let hs = 1e-6;
        let fv_up = system.residuals(&[x[0] + hv, x[1]]);
        let fv_dn = system.residuals(&[x[0] - hv, x[1]]);
        let fs_up = system.residuals(&[x[0], x[1] + hs]);
        let fs_dn = system.residuals(&[x[0], x[1] - hs]);

        for i in 0..2 {
            let dv = (fv_up[i] - fv_dn[i]) / (2.0 * hv);
            let ds = (fs_up[i] - fs_dn[i]) / (2.0 * hs);
            assert_relative_eq!(jac[i][0], dv, max_relative = 1e-3);
            assert_relative_eq!(jac[i][1], ds, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_scenario_calibration() {
        let params = calibrate(150_000.0, 0.35, 20_000.0, 1.0, 0.03).unwrap();
        assert!(params.asset_value >= 168_000.0 && params.asset_value <= 172_000.0);
        assert!(params.asset_vol >= 0.30 && params.asset_vol <= 0.33);

        let residuals = scenario().residuals(&[params.asset_value, params.asset_vol]);
        let norm = residuals.iter().map(|r| r * r).sum::<f64>().sqrt();
        assert!(norm <= AssetCalibrator::with_defaults().config().residual_tolerance);
    }

    #[test]
    fn test_jacobian_vega_column_is_call_vega_over_equity() {
        let system = scenario();
        let x = [169_409.0, 0.31];
        let jac = system.jacobian(&x);
        assert_eq!(jac[0][1], call_vega(x[0], 20_000.0, 1.0, 0.03, x[1]) / 150_000.0);
    }

    #[test]
    fn test_tiny_equity_with_huge_debt_is_non_convergent() {
        // E/D around 3e-17: residuals cannot be driven to zero in double
        // precision, and steps shrink to nothing before they are
        let err = calibrate(3.587e-12, 7.8765, 120_000.0, 1.0, 0.03).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NonConvergent);
    }

    #[test]
    fn test_observation_entry_point_matches_free_function() {
        use chrono::NaiveDate;
        use merton_core::types::FirmId;

        let obs = MarketObservation {
            firm_id: FirmId::new("TSLA"),
            date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
            equity_value: 150_000.0,
            equity_vol: 0.35,
            debt: 20_000.0,
            maturity: 1.0,
            risk_free_rate: 0.03,
        };
        let calibrator = AssetCalibrator::default();
        assert_eq!(
            calibrator.calibrate_observation(&obs).unwrap(),
            calibrate(150_000.0, 0.35, 20_000.0, 1.0, 0.03).unwrap()
        );
    }

    #[test]
    fn test_invalid_inputs_name_the_field() {
        let cases = [
            (calibrate(0.0, 0.35, 20_000.0, 1.0, 0.03), "equity_value"),
            (calibrate(150_000.0, -0.1, 20_000.0, 1.0, 0.03), "equity_vol"),
            (calibrate(150_000.0, 0.35, 0.0, 1.0, 0.03), "debt"),
            (calibrate(150_000.0, 0.35, 20_000.0, 0.0, 0.03), "maturity"),
            (calibrate(150_000.0, 0.35, 20_000.0, 1.0, f64::NAN), "risk_free_rate"),
            (calibrate(f64::INFINITY, 0.35, 20_000.0, 1.0, 0.03), "equity_value"),
        ];
        for (result, expected) in cases {
            match result {
                Err(CalibrationFailure::InvalidInput { field, .. }) => assert_eq!(field, expected),
                other => panic!("Expected InvalidInput for {expected}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_negative_rate_is_accepted() {
        let params = calibrate(150_000.0, 0.35, 20_000.0, 1.0, -0.005).unwrap();
        assert!(params.asset_value > 150_000.0);
    }

    #[test]
    fn test_iteration_cap_yields_non_convergent() {
        let calibrator = AssetCalibrator::new(SolverConfig::new(1e-14, 1));
        let err = calibrator
            .calibrate(150_000.0, 0.35, 20_000.0, 1.0, 0.03)
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::NonConvergent);
    }

    #[test]
    fn test_default_config() {
        let calibrator = AssetCalibrator::with_defaults();
        assert_eq!(calibrator.config().tolerance, 1e-6);
        assert_eq!(calibrator.config().max_iterations, 100);
    }
}
