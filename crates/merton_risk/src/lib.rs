//! # Merton Risk (L4: Application)
//!
//! Batch structural credit risk over firm time series.
//!
//! This crate provides:
//! - Model variants and their equity-value transforms (`variant`)
//! - The per-observation policy and batch engine with run statistics (`engine`)
//! - Output records (`record`)
//! - Naive vs improved comparison (`comparison`)
//! - Rayon utilities (`parallel`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            merton_risk (L4)             │
//! ├─────────────────────────────────────────┤
//! │  variant/    - SharePrice, MarketCap    │
//! │  engine/     - CreditRiskEngine, stats  │
//! │  record/     - ResultRecord             │
//! │  comparison/ - stability, ranking       │
//! │  parallel/   - Rayon utilities          │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           merton_models (L2)            │
//! │  calibration, risk measures             │
//! └─────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod comparison;
pub mod engine;
pub mod parallel;
pub mod record;
pub mod variant;

pub use comparison::{compare, ComparisonReport};
pub use engine::{CreditRiskEngine, EngineConfig, RunOutput, RunStats};
pub use record::ResultRecord;
pub use variant::{EquityTransform, MarketCapitalisation, ModelVariant, SharePrice, SharesOutstanding};
