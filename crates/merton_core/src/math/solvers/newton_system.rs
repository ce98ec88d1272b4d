//! Damped Newton solver for square nonlinear systems.
//!
//! # Algorithm
//!
//! ```text
//! J(x_n) δ = -F(x_n)
//! x_{n+1} = x_n + λ δ,   λ ∈ {1, 1/2, 1/4, ...}
//! ```
//!
//! The step length λ is halved until the residual norm strictly decreases,
//! which keeps iterates away from regions where `F` reports a large penalty.
//! Every operation is deterministic: identical inputs produce bit-identical
//! outputs.

use super::SolverConfig;
use crate::types::SolverError;

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The Newton step fell below the relative tolerance with the residual
    /// norm within the residual tolerance.
    StepTolerance,
    /// The residual vector evaluated to exactly zero.
    ExactRoot,
    /// The iteration cap was reached.
    MaxIterations,
    /// No step length decreased the residual norm.
    LineSearchStalled,
    /// The Newton step vanished while the residual norm stayed above the
    /// residual tolerance.
    ResidualAboveTolerance,
}

impl Termination {
    /// Returns `true` for the terminations that count as convergence.
    #[inline]
    pub fn is_converged(self) -> bool {
        matches!(self, Termination::StepTolerance | Termination::ExactRoot)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Termination::StepTolerance => "step tolerance reached",
            Termination::ExactRoot => "exact root",
            Termination::MaxIterations => "iteration cap reached",
            Termination::LineSearchStalled => "line search stalled",
            Termination::ResidualAboveTolerance => "step vanished with residual above tolerance",
        };
        f.write_str(text)
    }
}

/// Result of a Newton system solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSolution {
    /// Final iterate.
    pub x: Vec<f64>,
    /// Residuals at the final iterate.
    pub residuals: Vec<f64>,
    /// Euclidean norm of `residuals`.
    pub residual_norm: f64,
    /// Number of Newton iterations performed.
    pub iterations: usize,
    /// Whether the solver's convergence criterion was met.
    pub converged: bool,
    /// Reason the iteration stopped.
    pub termination: Termination,
}

/// Multivariate Newton root finder with backtracking line search.
///
/// Solves `F(x) = 0` for `F: ℝⁿ → ℝⁿ` given an explicit Jacobian.
///
/// # Example
///
/// ```
/// use merton_core::math::solvers::{NewtonSystemSolver, SolverConfig};
///
/// let solver = NewtonSystemSolver::new(SolverConfig::new(1e-12, 50));
///
/// // x + y = 3, x * y = 2 (root at x = 1, y = 2 from this start)
/// let f = |p: &[f64]| vec![p[0] + p[1] - 3.0, p[0] * p[1] - 2.0];
/// let jac = |p: &[f64]| vec![vec![1.0, 1.0], vec![p[1], p[0]]];
///
/// let solution = solver.solve(f, jac, vec![0.5, 2.5]).unwrap();
/// assert!(solution.converged);
/// assert!((solution.x[0] - 1.0).abs() < 1e-10);
/// assert!((solution.x[1] - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonSystemSolver {
    config: SolverConfig<f64>,
}

impl NewtonSystemSolver {
    /// Create a new solver with the given configuration.
    pub fn new(config: SolverConfig<f64>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<f64> {
        &self.config
    }

    /// Solve `f(x) = 0` starting from `x0`.
    ///
    /// # Arguments
    ///
    /// * `f` - Residual function, returning one value per unknown
    /// * `jacobian` - Row-major Jacobian `J[i][j] = ∂fᵢ/∂xⱼ`
    /// * `x0` - Initial guess
    ///
    /// # Returns
    ///
    /// * `Ok(SystemSolution)` - Final iterate with its convergence flag; a
    ///   non-converged solution is still `Ok`
    /// * `Err(SolverError)` - The problem is malformed, the starting residual
    ///   is non-finite, or the Jacobian is singular
    pub fn solve<F, J>(&self, f: F, jacobian: J, x0: Vec<f64>) -> Result<SystemSolution, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
        J: Fn(&[f64]) -> Vec<Vec<f64>>,
    {
        let n = x0.len();
        if n == 0 {
            return Err(SolverError::NumericalInstability(
                "Empty parameter vector".to_string(),
            ));
        }

        let mut x = x0;
        let mut r = f(&x);
        if r.len() != n {
            return Err(SolverError::DimensionMismatch {
                unknowns: n,
                equations: r.len(),
            });
        }

        let mut norm = euclidean_norm(&r);
        if !norm.is_finite() {
            return Err(SolverError::NumericalInstability(
                "Initial residual is not finite".to_string(),
            ));
        }

        let tol = self.config.tolerance;

        for iteration in 0..self.config.max_iterations {
            if norm == 0.0 {
                return Ok(solution(x, r, norm, iteration, Termination::ExactRoot));
            }

            let jac = jacobian(&x);
            let neg_r: Vec<f64> = r.iter().map(|v| -v).collect();
            let delta = solve_linear(&jac, &neg_r)
                .ok_or(SolverError::SingularJacobian { iteration })?;

            let step_is_small = delta
                .iter()
                .zip(&x)
                .all(|(d, xi)| d.abs() <= tol * (xi.abs() + tol));

            let mut lambda = 1.0;
            let mut accepted = None;
            for _ in 0..=self.config.max_backtracks {
                let trial: Vec<f64> = x.iter().zip(&delta).map(|(xi, d)| xi + lambda * d).collect();
                let trial_r = f(&trial);
                let trial_norm = euclidean_norm(&trial_r);
                if trial_norm.is_finite() && trial_norm < norm {
                    accepted = Some((trial, trial_r, trial_norm));
                    break;
                }
                if step_is_small {
                    // Already within tolerance; no need to shrink further.
                    break;
                }
                lambda *= 0.5;
            }

            let moved = accepted.is_some();
            if let Some((trial, trial_r, trial_norm)) = accepted {
                x = trial;
                r = trial_r;
                norm = trial_norm;
            } else if !step_is_small {
                return Ok(solution(
                    x,
                    r,
                    norm,
                    iteration + 1,
                    Termination::LineSearchStalled,
                ));
            }

            if step_is_small {
                if norm <= self.config.residual_tolerance {
                    return Ok(solution(
                        x,
                        r,
                        norm,
                        iteration + 1,
                        Termination::StepTolerance,
                    ));
                }
                if !moved {
                    return Ok(solution(
                        x,
                        r,
                        norm,
                        iteration + 1,
                        Termination::ResidualAboveTolerance,
                    ));
                }
            }
        }

        Ok(solution(
            x,
            r,
            norm,
            self.config.max_iterations,
            Termination::MaxIterations,
        ))
    }
}

fn solution(
    x: Vec<f64>,
    residuals: Vec<f64>,
    residual_norm: f64,
    iterations: usize,
    termination: Termination,
) -> SystemSolution {
    SystemSolution {
        x,
        residuals,
        residual_norm,
        iterations,
        converged: termination.is_converged(),
        termination,
    }
}

#[inline]
fn euclidean_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when `A` is not square, contains non-finite entries, or is
/// numerically singular.
fn solve_linear(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    let mut m: Vec<Vec<f64>> = a.to_vec();
    let mut rhs = b.to_vec();

    let scale = m
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if !scale.is_finite() || scale == 0.0 {
        return None;
    }
    let pivot_floor = f64::EPSILON * scale;

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot_row][col].abs() <= pivot_floor {
            return None;
        }
        m.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = m[row][col] / m[col][col];
            for k in col..n {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= m[i][j] * x[j];
        }
        x[i] = sum / m[i][i];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
