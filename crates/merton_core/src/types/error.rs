//! Error types for structural credit calibration.
//!
//! This module provides:
//! - `SolverError`: Errors from the Newton system solver
//! - `CalibrationFailure`: Why an observation yielded no asset parameters
//! - `FailureKind`: The coarse failure category used for run statistics

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Solver errors.
///
/// Structural problems that prevent the Newton iteration from running.
/// Budget exhaustion is not an error: it is reported through the solution's
/// convergence flag.
///
/// # Examples
/// ```
/// use merton_core::types::SolverError;
///
/// let err = SolverError::SingularJacobian { iteration: 3 };
/// assert!(format!("{}", err).contains("iteration 3"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Jacobian could not be factorised.
    #[error("Singular Jacobian at iteration {iteration}")]
    SingularJacobian {
        /// Iteration at which factorisation failed
        iteration: usize,
    },

    /// Residual function returned the wrong number of equations.
    #[error("Dimension mismatch: {unknowns} unknowns but {equations} equations")]
    DimensionMismatch {
        /// Number of unknowns
        unknowns: usize,
        /// Number of residuals returned
        equations: usize,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

/// Coarse category of a calibration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Non-positive or non-finite inputs, rejected before solving.
    InvalidInput,
    /// Solver did not converge, or converged to a non-positive pair.
    NonConvergent,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidInput => write!(f, "invalid input"),
            FailureKind::NonConvergent => write!(f, "non-convergent"),
        }
    }
}

/// Calibration failure.
///
/// Returned in place of asset parameters; there is no sentinel numeric value.
///
/// # Examples
/// ```
/// use merton_core::types::{CalibrationFailure, FailureKind};
///
/// let err = CalibrationFailure::invalid_input("equity_value", 0.0);
/// assert_eq!(err.kind(), FailureKind::InvalidInput);
/// assert!(format!("{}", err).contains("equity_value"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationFailure {
    /// An input was outside its domain (non-positive or non-finite).
    #[error("Invalid input: {field} = {value}")]
    InvalidInput {
        /// Name of the offending input
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// The solver did not produce a usable root.
    #[error("Calibration did not converge after {iterations} iterations: {reason}")]
    NonConvergent {
        /// Description of the failure
        reason: String,
        /// Iterations performed before giving up
        iterations: usize,
    },
}

impl CalibrationFailure {
    /// Creates an invalid input failure.
    pub fn invalid_input(field: &'static str, value: f64) -> Self {
        CalibrationFailure::InvalidInput { field, value }
    }

    /// Creates a non-convergence failure.
    pub fn non_convergent(reason: impl Into<String>, iterations: usize) -> Self {
        CalibrationFailure::NonConvergent {
            reason: reason.into(),
            iterations,
        }
    }

    /// Returns the failure category.
    pub fn kind(&self) -> FailureKind {
        match self {
            CalibrationFailure::InvalidInput { .. } => FailureKind::InvalidInput,
            CalibrationFailure::NonConvergent { .. } => FailureKind::NonConvergent,
        }
    }
}

impl From<SolverError> for CalibrationFailure {
    fn from(err: SolverError) -> Self {
        let iterations = match err {
            SolverError::SingularJacobian { iteration } => iteration,
            _ => 0,
        };
        CalibrationFailure::non_convergent(err.to_string(), iterations)
    }
}
