//! # adapter_loader
//!
//! Flat file loaders and result persistence for the Merton workspace.
//!
//! This crate loads the four CSV input series (equity prices, equity
//! volatilities, quarterly debt and the risk-free rate), aligns them into
//! firm-date observations, and writes result tables back to CSV.
//!
//! ## Architecture Position
//!
//! Part of the **A**dapter layer. Depends only on `merton_core` (for types).
//!
//! ## Example
//!
//! ```rust,ignore
//! use adapter_loader::{align, DebtAlignment, MarketData};
//!
//! let data = MarketData::load_dir("data")?;
//! let observations = align(&data, DebtAlignment::ForwardFill);
//! ```

mod alignment;
mod csv_loader;
mod error;
mod rows;
mod writer;

pub use alignment::{align, DebtAlignment};
pub use csv_loader::{CsvLoader, MarketData};
pub use error::LoaderError;
pub use rows::{CsvRow, DebtRow, EquityPriceRow, EquityVolRow, RiskFreeRow};
pub use writer::{read_records, write_records};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{align, CsvLoader, DebtAlignment, LoaderError, MarketData};
}
