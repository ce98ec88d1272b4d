//! Root-finding solvers for numerical computation.
//!
//! ## Available Solvers
//!
//! - [`NewtonSystemSolver`]: damped Newton iteration for square systems
//!   `F(x) = 0` with an explicit Jacobian and backtracking line search
//!
//! ## Configuration
//!
//! [`SolverConfig`] sets:
//! - `tolerance`: relative step tolerance (default: 1e-6)
//! - `residual_tolerance`: residual norm a vanishing step must reach (default: 1e-8)
//! - `max_iterations`: iteration cap (default: 100)
//! - `max_backtracks`: step halvings per iteration (default: 40)
//!
//! A solve that exhausts its budget returns a [`SystemSolution`] with
//! `converged == false` rather than looping; callers decide the policy.

mod config;
mod newton_system;

pub use config::SolverConfig;
pub use newton_system::{NewtonSystemSolver, SystemSolution, Termination};
