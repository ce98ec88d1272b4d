//! Multi-source alignment of the input series.
//!
//! ```text
//! prices ⋈ vols          inner join on (date, firm)
//!        ⟕ risk-free     left join on date
//!        ⟕ debt          per firm, by DebtAlignment
//!        → drop rows with any missing field
//!        → sort by (firm, date)
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use merton_core::types::{AlignedObservation, FirmId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::csv_loader::MarketData;

/// How a debt report is matched to an observation date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DebtAlignment {
    /// Latest report dated on or before the observation date.
    #[default]
    ForwardFill,
    /// Last report in the observation's calendar year.
    ///
    /// Looks ahead: a report filed later in the year is used for every
    /// earlier date of that year.
    FiscalYear,
}

/// Per-firm debt reports keyed by date.
struct DebtSchedule {
    by_firm: HashMap<FirmId, BTreeMap<NaiveDate, f64>>,
}

impl DebtSchedule {
    fn new(data: &MarketData) -> Self {
        let mut by_firm: HashMap<FirmId, BTreeMap<NaiveDate, f64>> = HashMap::new();
        for row in &data.debts {
            if let Some(debt) = row.debt {
                by_firm
                    .entry(row.firm_id.clone())
                    .or_default()
                    .insert(row.date, debt);
            }
        }
        Self { by_firm }
    }

    fn lookup(&self, firm_id: &FirmId, date: NaiveDate, alignment: DebtAlignment) -> Option<f64> {
        let reports = self.by_firm.get(firm_id)?;
        match alignment {
            DebtAlignment::ForwardFill => reports.range(..=date).next_back().map(|(_, d)| *d),
            DebtAlignment::FiscalYear => {
                let year = date.year();
                let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
                reports.range(start..=end).next_back().map(|(_, d)| *d)
            }
        }
    }
}

/// Aligns the four series into complete firm-date observations.
///
/// Rows lacking any of price, volatility, debt or risk-free rate are dropped.
/// Output is sorted by firm, then date.
pub fn align(data: &MarketData, alignment: DebtAlignment) -> Vec<AlignedObservation> {
    let vols: HashMap<(&FirmId, NaiveDate), Option<f64>> = data
        .equity_vols
        .iter()
        .map(|row| ((&row.firm_id, row.date), row.equity_vol))
        .collect();

    let rates: HashMap<NaiveDate, Option<f64>> = data
        .risk_free
        .iter()
        .map(|row| (row.date, row.risk_free_rate))
        .collect();

    let debts = DebtSchedule::new(data);

    let mut aligned: Vec<AlignedObservation> = data
        .equity_prices
        .iter()
        .filter_map(|price| {
            let equity_vol = (*vols.get(&(&price.firm_id, price.date))?)?;
            let share_price = price.equity_price?;
            let risk_free_rate = (*rates.get(&price.date)?)?;
            let debt = debts.lookup(&price.firm_id, price.date, alignment)?;

            Some(AlignedObservation {
                firm_id: price.firm_id.clone(),
                date: price.date,
                share_price,
                equity_vol,
                debt,
                risk_free_rate,
            })
        })
        .collect();

    aligned.sort_by(|a, b| a.firm_id.cmp(&b.firm_id).then(a.date.cmp(&b.date)));

    debug!(
        price_rows = data.equity_prices.len(),
        aligned = aligned.len(),
        ?alignment,
        "Aligned market data"
    );

    aligned
}
