//! Black-Scholes European call primitives.
//!
//! In the structural credit model the firm's equity is a European call on its
//! assets, struck at the face value of debt. These functions price that call
//! and its sensitivities.
//!
//! ## Mathematical Formulas
//!
//! **Call Value**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Delta**: ∂C/∂S = N(d₁)
//! **Vega**: ∂C/∂σ = S·φ(d₁)·√T
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! The functions are pure and unguarded: callers are responsible for
//! passing S, K, T, σ > 0.

use merton_core::math::distributions::{norm_cdf, norm_pdf};
use num_traits::Float;

/// Computes d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T).
#[inline]
pub fn d1<T: Float>(spot: T, strike: T, expiry: T, rate: T, volatility: T) -> T {
    let half = T::from(0.5).unwrap();
    let vol_sqrt_t = volatility * expiry.sqrt();
    let log_moneyness = (spot / strike).ln();
    let drift = (rate + half * volatility * volatility) * expiry;
    (log_moneyness + drift) / vol_sqrt_t
}

/// Computes d₂ = d₁ - σ√T.
#[inline]
pub fn d2<T: Float>(spot: T, strike: T, expiry: T, rate: T, volatility: T) -> T {
    d1(spot, strike, expiry, rate, volatility) - volatility * expiry.sqrt()
}

/// European call value C = S·N(d₁) - K·e^(-rT)·N(d₂).
///
/// # Arguments
/// * `spot` - Underlying value S (asset value V in the credit model)
/// * `strike` - Strike K (face value of debt D)
/// * `expiry` - Time to expiry T in years
/// * `rate` - Continuously compounded risk-free rate r
/// * `volatility` - Volatility σ of the underlying
///
/// # Examples
/// ```
/// use merton_models::analytical::call_value;
///
/// let c = call_value(100.0_f64, 100.0, 1.0, 0.05, 0.2);
/// assert!((c - 10.4506).abs() < 1e-3);
/// ```
#[inline]
pub fn call_value<T: Float>(spot: T, strike: T, expiry: T, rate: T, volatility: T) -> T {
    let d1 = d1(spot, strike, expiry, rate, volatility);
    let d2 = d1 - volatility * expiry.sqrt();
    let discount = (-rate * expiry).exp();
    spot * norm_cdf(d1) - strike * discount * norm_cdf(d2)
}

/// Call delta ∂C/∂S = N(d₁).
///
/// # Examples
/// ```
/// use merton_models::analytical::call_delta;
///
/// let delta = call_delta(100.0_f64, 100.0, 1.0, 0.05, 0.2);
/// assert!(delta > 0.5 && delta < 1.0);
/// ```
#[inline]
pub fn call_delta<T: Float>(spot: T, strike: T, expiry: T, rate: T, volatility: T) -> T {
    norm_cdf(d1(spot, strike, expiry, rate, volatility))
}

/// Call vega ∂C/∂σ = S·φ(d₁)·√T.
#[inline]
pub fn call_vega<T: Float>(spot: T, strike: T, expiry: T, rate: T, volatility: T) -> T {
    spot * norm_pdf(d1(spot, strike, expiry, rate, volatility)) * expiry.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // ==========================================================
    // Reference Values
    // ==========================================================

    #[test]
    fn test_call_value_reference() {
        // Hull, Options Futures and Other Derivatives: S=K=100, r=5%, σ=20%, T=1
        let c = call_value(100.0_f64, 100.0, 1.0, 0.05, 0.2);
        assert_relative_eq!(c, 10.450_583_572_185_565, epsilon = 1e-4);
    }

    #[test]
    fn test_d1_d2_reference() {
        let d1 = d1(100.0_f64, 100.0, 1.0, 0.05, 0.2);
        let d2 = d2(100.0_f64, 100.0, 1.0, 0.05, 0.2);
        assert_relative_eq!(d1, 0.35, epsilon = 1e-12);
        assert_relative_eq!(d2, 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_call_delta_reference() {
        let delta = call_delta(100.0_f64, 100.0, 1.0, 0.05, 0.2);
        assert_relative_eq!(delta, 0.636_830_651, epsilon = 1e-6);
    }

    #[test]
    fn test_call_vega_reference() {
        let vega = call_vega(100.0_f64, 100.0, 1.0, 0.05, 0.2);
        assert_relative_eq!(vega, 37.524_034_7, epsilon = 1e-4);
    }

    // ==========================================================
    // Limiting Behaviour
    // ==========================================================

    #[test]
    fn test_deep_in_the_money_is_forward_intrinsic() {
        // Assets far above debt: C ≈ S - K·e^(-rT), delta ≈ 1
        let (s, k, t, r, sigma) = (1_000_000.0_f64, 100.0, 1.0, 0.03, 0.3);
        let c = call_value(s, k, t, r, sigma);
        assert_relative_eq!(c, s - k * (-r * t).exp(), max_relative = 1e-9);
        assert_relative_eq!(call_delta(s, k, t, r, sigma), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_deep_out_of_the_money_is_worthless() {
        let c = call_value(1.0_f64, 1_000.0, 1.0, 0.03, 0.2);
        assert!(c.abs() < 1e-10);
        assert!(call_delta(1.0_f64, 1_000.0, 1.0, 0.03, 0.2) < 1e-7);
    }

    #[test]
    fn test_f32_support() {
        let c = call_value(100.0_f32, 100.0, 1.0, 0.05, 0.2);
        assert!((c - 10.4506).abs() < 1e-3);
    }

    // ==========================================================
    // Property-Based Tests
    // ==========================================================

    proptest! {
        #[test]
        fn prop_call_within_no_arbitrage_bounds(
            s in 1.0f64..1e6,
            k in 1.0f64..1e6,
            t in 0.1f64..5.0,
            r in 0.0f64..0.1,
            sigma in 0.05f64..1.0,
        ) {
            let c = call_value(s, k, t, r, sigma);
            let lower = (s - k * (-r * t).exp()).max(0.0);
            prop_assert!(c >= lower - 1e-6 * s);
            prop_assert!(c <= s * (1.0 + 1e-9));
        }

        #[test]
        fn prop_delta_in_unit_interval(
            s in 1.0f64..1e6,
            k in 1.0f64..1e6,
            t in 0.1f64..5.0,
            r in 0.0f64..0.1,
            sigma in 0.05f64..1.0,
        ) {
            let delta = call_delta(s, k, t, r, sigma);
            prop_assert!((0.0..=1.0).contains(&delta));
        }

        #[test]
        fn prop_vega_matches_finite_difference(
            s in 50.0f64..200.0,
            k in 50.0f64..200.0,
            sigma in 0.1f64..0.6,
        ) {
            let h = 1e-4;
            let fd = (call_value(s, k, 1.0, 0.03, sigma + h)
                - call_value(s, k, 1.0, 0.03, sigma - h))
                / (2.0 * h);
            let vega = call_vega(s, k, 1.0, 0.03, sigma);
            prop_assert!((fd - vega).abs() < 1e-2 * (1.0 + vega.abs()));
        }
    }
}
