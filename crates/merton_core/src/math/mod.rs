//! Mathematical building blocks.
//!
//! - [`distributions`]: standard normal CDF and PDF
//! - [`solvers`]: multivariate Newton root-finding for square nonlinear systems

pub mod distributions;
pub mod solvers;
