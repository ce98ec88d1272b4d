//! # Merton Models (L2: Business Logic)
//!
//! The Merton (1974) structural credit model.
//!
//! This crate provides:
//! - European call primitives valuing equity as a call on firm assets
//!   (`analytical`)
//! - Calibration of asset value and asset volatility from equity observables
//!   (`calibration`)
//! - Distance-to-default and default probability (`risk`)
//!
//! ## Design Principles
//!
//! - **Explicit failure**: calibration returns `Result<AssetParameters,
//!   CalibrationFailure>`; no sentinel values leave this crate
//! - **Deterministic**: identical inputs give bit-identical outputs
//! - **No I/O**: every function is pure; orchestration lives in `merton_risk`
//!
//! ## Usage Examples
//!
//! ```rust
//! use merton_models::calibration::calibrate;
//! use merton_models::risk::compute_risk_measures;
//!
//! let (e, sigma_e, d, t, r) = (150_000.0, 0.35, 20_000.0, 1.0, 0.03);
//! let params = calibrate(e, sigma_e, d, t, r).unwrap();
//! let measures = compute_risk_measures(params.asset_value, d, t, r, params.asset_vol);
//!
//! assert!(params.asset_value > 168_000.0 && params.asset_value < 172_000.0);
//! assert!(measures.default_probability < 0.01);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod calibration;
pub mod risk;
