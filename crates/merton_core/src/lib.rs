//! # merton_core: Numerical Foundation for Structural Credit Calibration
//!
//! ## Layer 1 (Foundation) Role
//!
//! merton_core is the bottom layer of the workspace, providing:
//! - Standard normal distribution functions (`math::distributions`)
//! - Multivariate Newton root-finding with bounded iterations (`math::solvers`)
//! - Error taxonomy: `SolverError`, `CalibrationFailure` (`types::error`)
//! - Observation value types: `FirmId`, `AlignedObservation`, `MarketObservation`
//!   (`types::observation`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other merton_* crates, with minimal external
//! dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Observation dates
//! - serde: Serialisation of identifiers and observations
//! - thiserror: Error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use merton_core::math::distributions::norm_cdf;
//! use merton_core::math::solvers::{NewtonSystemSolver, SolverConfig};
//!
//! // Φ(0) = 0.5
//! assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-7);
//!
//! // Solve x² + y² = 2, x - y = 0
//! let solver = NewtonSystemSolver::new(SolverConfig::new(1e-10, 50));
//! let f = |p: &[f64]| vec![p[0] * p[0] + p[1] * p[1] - 2.0, p[0] - p[1]];
//! let jac = |p: &[f64]| vec![vec![2.0 * p[0], 2.0 * p[1]], vec![1.0, -1.0]];
//! let solution = solver.solve(f, jac, vec![2.0, 0.5]).unwrap();
//! assert!(solution.converged);
//! assert!((solution.x[0] - 1.0).abs() < 1e-8);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
