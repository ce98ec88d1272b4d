//! Asset parameter calibration.
//!
//! This module provides:
//! - [`AssetCalibrator`]: Solves the two-equation Merton system for (V, σ_V)
//! - [`calibrate`]: The same with the default solver configuration
//! - [`MertonSystem`]: Residuals, analytic Jacobian and starting point
//! - [`AssetParameters`]: The calibrated pair
//!
//! # Architecture
//!
//! ```text
//! (E, σ_E, D, T, r) ─► input guard ─► MertonSystem ─► NewtonSystemSolver ─► post-check
//!                         │                                                  │
//!                         ▼                                                  ▼
//!                 InvalidInput                            AssetParameters | NonConvergent
//! ```

mod asset_calibrator;

pub use asset_calibrator::{
    calibrate, AssetCalibrator, AssetParameters, MertonSystem, INFEASIBLE_RESIDUAL,
};
