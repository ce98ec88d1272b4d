//! Analytical option primitives for the structural model.
//!
//! This module provides closed-form European call formulas used to value
//! equity as a call on firm assets:
//! - `call_value`, `call_delta`, `call_vega` and the `d1`/`d2` terms
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`**: Supports both `f64` and `f32`
//! - **Tail Accuracy**: Uses the erfc-based CDF from `merton_core`, whose
//!   error is relative, so deep out-of-the-money values stay meaningful

pub mod black_scholes;

// Re-export main types at module level
pub use black_scholes::{call_delta, call_value, call_vega, d1, d2};
