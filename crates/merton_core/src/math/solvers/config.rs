//! Solver configuration types.

use num_traits::Float;

/// Configuration for the Newton system solver.
///
/// Holds the step and residual tolerances, the iteration cap, and the number
/// of step halvings the line search may try before declaring a stall.
///
/// # Type Parameters
///
/// * `T` - Floating-point type for tolerance (e.g., `f64`)
///
/// # Example
///
/// ```
/// use merton_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!((config.tolerance - 1e-6).abs() < 1e-18);
/// assert_eq!(config.max_iterations, 100);
///
/// let custom = SolverConfig::new(1e-10, 200);
/// assert_eq!(custom.max_iterations, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Relative step tolerance.
    ///
    /// The solver stops when every component of the Newton step satisfies
    /// `|δᵢ| <= tolerance * (|xᵢ| + tolerance)`.
    pub tolerance: T,

    /// Residual norm a vanishing step must also reach to count as converged.
    pub residual_tolerance: T,

    /// Maximum number of Newton iterations before giving up.
    pub max_iterations: usize,

    /// Maximum number of step halvings per iteration in the line search.
    pub max_backtracks: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 1e-6
    /// - `residual_tolerance`: 1e-8
    /// - `max_iterations`: 100
    /// - `max_backtracks`: 40
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-6).unwrap(),
            residual_tolerance: T::from(1e-8).unwrap(),
            max_iterations: 100,
            max_backtracks: 40,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with the default line-search depth.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert!((config.tolerance - 1e-6).abs() < 1e-18);
        assert!((config.residual_tolerance - 1e-8).abs() < 1e-20);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.max_backtracks, 40);
    }

    #[test]
    fn test_new_config() {
        let config: SolverConfig<f64> = SolverConfig::new(1e-12, 200);
        assert!((config.tolerance - 1e-12).abs() < 1e-17);
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.max_backtracks, 40);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_config_zero_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(0.0, 100);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_new_config_zero_iterations_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(1e-10, 0);
    }
}
