//! Core value and error types.
//!
//! This module provides:
//! - `observation`: Firm identifiers and per-date observation records
//! - `error`: Structured error types for the solver and calibration
//!
//! # Re-exports
//!
//! - [`FirmId`], [`AlignedObservation`], [`MarketObservation`] from `observation`
//! - [`SolverError`], [`CalibrationFailure`], [`FailureKind`] from `error`

pub mod error;
pub mod observation;

pub use error::{CalibrationFailure, FailureKind, SolverError};
pub use observation::{AlignedObservation, FirmId, MarketObservation};
