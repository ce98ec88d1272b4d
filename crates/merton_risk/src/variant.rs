//! Model variants and their equity-value transforms.
//!
//! Both variants share the calibration and risk core; they differ only in
//! which number is used as the equity value E:
//!
//! | Variant    | E                                   | Passthrough columns        |
//! |------------|-------------------------------------|----------------------------|
//! | `naive`    | share price                         | none                       |
//! | `improved` | share price × shares outstanding    | `share_price`, `market_cap` |

use merton_core::types::{AlignedObservation, FirmId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which equity-value convention a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    /// Equity value is the raw share price.
    Naive,
    /// Equity value is market capitalisation.
    Improved,
}

impl ModelVariant {
    /// All variants, in reporting order.
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Naive, ModelVariant::Improved];

    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            ModelVariant::Naive => "naive",
            ModelVariant::Improved => "improved",
        }
    }

    /// Conventional file name for this variant's result records.
    pub fn results_file_name(&self) -> &'static str {
        match self {
            ModelVariant::Naive => "baseline_results.csv",
            ModelVariant::Improved => "improved_results.csv",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Equity value chosen for one observation, plus the fields the variant
/// passes through to the result record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityValue {
    /// Value used as E in calibration.
    pub value: f64,
    /// Share price column of the result record.
    pub share_price: Option<f64>,
    /// Market capitalisation column of the result record.
    pub market_cap: Option<f64>,
}

/// Maps an aligned observation to the equity value used for calibration.
///
/// Returning `None` means the equity value cannot be formed for this
/// observation; the engine skips it.
pub trait EquityTransform: Send + Sync {
    /// The variant this transform implements.
    fn variant(&self) -> ModelVariant;

    /// Equity value for `obs`.
    fn equity_value(&self, obs: &AlignedObservation) -> Option<EquityValue>;
}

/// Naive transform: E is the share price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SharePrice;

impl EquityTransform for SharePrice {
    fn variant(&self) -> ModelVariant {
        ModelVariant::Naive
    }

    fn equity_value(&self, obs: &AlignedObservation) -> Option<EquityValue> {
        Some(EquityValue {
            value: obs.share_price,
            share_price: None,
            market_cap: None,
        })
    }
}

/// Improved transform: E is share price × shares outstanding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketCapitalisation {
    shares: SharesOutstanding,
}

impl MarketCapitalisation {
    /// Creates the transform from shares-outstanding reference data.
    pub fn new(shares: SharesOutstanding) -> Self {
        Self { shares }
    }

    /// Returns the reference data.
    pub fn shares(&self) -> &SharesOutstanding {
        &self.shares
    }
}

impl EquityTransform for MarketCapitalisation {
    fn variant(&self) -> ModelVariant {
        ModelVariant::Improved
    }

    fn equity_value(&self, obs: &AlignedObservation) -> Option<EquityValue> {
        let shares = self.shares.get(&obs.firm_id)?;
        let market_cap = obs.share_price * shares;
        Some(EquityValue {
            value: market_cap,
            share_price: Some(obs.share_price),
            market_cap: Some(market_cap),
        })
    }
}

/// Shares outstanding per firm, in millions.
///
/// Reference data supplied by configuration; the core never hard-codes it.
///
/// # Examples
///
/// ```
/// use merton_core::types::FirmId;
/// use merton_risk::variant::SharesOutstanding;
///
/// let shares: SharesOutstanding = [(FirmId::new("ACME"), 125.0)].into_iter().collect();
/// assert_eq!(shares.get(&FirmId::new("ACME")), Some(125.0));
/// assert_eq!(shares.get(&FirmId::new("OTHER")), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharesOutstanding(BTreeMap<FirmId, f64>);

impl SharesOutstanding {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference set shipped with the default configuration.
    pub fn reference() -> Self {
        [
            ("AAPL", 17_350.0),
            ("JPM", 3_050.0),
            ("TSLA", 960.0),
            ("XOM", 4_270.0),
            ("F", 3_970.0),
        ]
        .into_iter()
        .map(|(firm, shares)| (FirmId::new(firm), shares))
        .collect()
    }

    /// Shares outstanding for `firm_id`.
    #[inline]
    pub fn get(&self, firm_id: &FirmId) -> Option<f64> {
        self.0.get(firm_id).copied()
    }

    /// Sets the share count for a firm, returning the previous value.
    pub fn insert(&mut self, firm_id: FirmId, shares: f64) -> Option<f64> {
        self.0.insert(firm_id, shares)
    }

    /// Number of firms covered.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no firm is covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates firms in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&FirmId, f64)> {
        self.0.iter().map(|(id, shares)| (id, *shares))
    }
}

impl FromIterator<(FirmId, f64)> for SharesOutstanding {
    fn from_iter<I: IntoIterator<Item = (FirmId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
