//! Comparison of naive and improved variant results.
//!
//! Two views are produced per variant:
//! - **Time-series stability**: per-firm sample standard deviation of PD,
//!   averaged across firms (lower is more stable)
//! - **Cross-sectional ranking**: firms ordered by mean PD, highest first

use std::cmp::Ordering;
use std::collections::BTreeMap;

use merton_core::types::FirmId;
use serde::{Deserialize, Serialize};

use crate::record::ResultRecord;
use crate::variant::ModelVariant;

/// Summary statistics of one firm's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmStatistics {
    /// Firm identifier
    pub firm_id: FirmId,
    /// Number of records
    pub observations: usize,
    /// Mean default probability
    pub mean_pd: f64,
    /// Sample standard deviation of PD; `None` with fewer than two records
    pub pd_std: Option<f64>,
    /// Mean of the finite distance-to-default values; `None` if there are none
    pub mean_dd: Option<f64>,
}

/// Per-firm statistics, in firm identifier order.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use merton_core::types::FirmId;
/// use merton_risk::comparison::firm_statistics;
/// use merton_risk::record::ResultRecord;
///
/// let record = |day, pd| ResultRecord {
///     date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
///     firm_id: FirmId::new("ACME"),
///     share_price: None,
///     market_cap: None,
///     asset_value: 100.0,
///     asset_vol: 0.2,
///     distance_to_default: 3.0,
///     default_probability: pd,
/// };
///
/// let stats = firm_statistics(&[record(2, 0.1), record(3, 0.3)]);
/// assert_eq!(stats.len(), 1);
/// assert!((stats[0].mean_pd - 0.2).abs() < 1e-12);
/// ```
pub fn firm_statistics(records: &[ResultRecord]) -> Vec<FirmStatistics> {
    let mut by_firm: BTreeMap<&FirmId, Vec<&ResultRecord>> = BTreeMap::new();
    for record in records {
        by_firm.entry(&record.firm_id).or_default().push(record);
    }

    by_firm
        .into_iter()
        .map(|(firm_id, rows)| {
            let pds: Vec<f64> = rows.iter().map(|r| r.default_probability).collect();
            let finite_dds: Vec<f64> = rows
                .iter()
                .map(|r| r.distance_to_default)
                .filter(|dd| dd.is_finite())
                .collect();

            FirmStatistics {
                firm_id: firm_id.clone(),
                observations: rows.len(),
                mean_pd: mean(&pds).unwrap_or(f64::NAN),
                pd_std: sample_std(&pds),
                mean_dd: mean(&finite_dds),
            }
        })
        .collect()
}

/// One variant's side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSummary {
    /// The variant summarised
    pub variant: ModelVariant,
    /// Total records
    pub records: usize,
    /// Per-firm statistics, in firm identifier order
    pub firms: Vec<FirmStatistics>,
    /// Mean of the per-firm PD standard deviations that are defined
    pub average_pd_std: Option<f64>,
    /// Firms by mean PD, highest first
    pub ranking: Vec<(FirmId, f64)>,
}

impl VariantSummary {
    /// Summarises one variant's records.
    pub fn from_records(variant: ModelVariant, records: &[ResultRecord]) -> Self {
        let firms = firm_statistics(records);

        let stds: Vec<f64> = firms.iter().filter_map(|f| f.pd_std).collect();

        let mut ranking: Vec<(FirmId, f64)> = firms
            .iter()
            .map(|f| (f.firm_id.clone(), f.mean_pd))
            .collect();
        ranking.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });

        Self {
            variant,
            records: records.len(),
            average_pd_std: mean(&stds),
            firms,
            ranking,
        }
    }

    /// Statistics for one firm.
    pub fn firm(&self, firm_id: &FirmId) -> Option<&FirmStatistics> {
        self.firms.iter().find(|f| &f.firm_id == firm_id)
    }
}

/// One firm's statistics under both variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmComparison {
    /// Firm identifier
    pub firm_id: FirmId,
    /// Naive record count
    pub naive_observations: usize,
    /// Improved record count
    pub improved_observations: usize,
    /// Naive mean PD
    pub naive_mean_pd: Option<f64>,
    /// Improved mean PD
    pub improved_mean_pd: Option<f64>,
    /// Naive PD standard deviation
    pub naive_pd_std: Option<f64>,
    /// Improved PD standard deviation
    pub improved_pd_std: Option<f64>,
}

/// Side-by-side report of the two variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Naive variant summary
    pub naive: VariantSummary,
    /// Improved variant summary
    pub improved: VariantSummary,
}

impl ComparisonReport {
    /// Per-firm rows over the union of firms, in firm identifier order.
    pub fn firm_rows(&self) -> Vec<FirmComparison> {
        let mut firms: Vec<&FirmId> = self
            .naive
            .firms
            .iter()
            .chain(&self.improved.firms)
            .map(|f| &f.firm_id)
            .collect();
        firms.sort();
        firms.dedup();

        firms
            .into_iter()
            .map(|firm_id| {
                let naive = self.naive.firm(firm_id);
                let improved = self.improved.firm(firm_id);
                FirmComparison {
                    firm_id: firm_id.clone(),
                    naive_observations: naive.map_or(0, |f| f.observations),
                    improved_observations: improved.map_or(0, |f| f.observations),
                    naive_mean_pd: naive.map(|f| f.mean_pd),
                    improved_mean_pd: improved.map(|f| f.mean_pd),
                    naive_pd_std: naive.and_then(|f| f.pd_std),
                    improved_pd_std: improved.and_then(|f| f.pd_std),
                }
            })
            .collect()
    }
}

/// Compares naive and improved results.
pub fn compare(naive: &[ResultRecord], improved: &[ResultRecord]) -> ComparisonReport {
    ComparisonReport {
        naive: VariantSummary::from_records(ModelVariant::Naive, naive),
        improved: VariantSummary::from_records(ModelVariant::Improved, improved),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation with n − 1 in the denominator.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}
