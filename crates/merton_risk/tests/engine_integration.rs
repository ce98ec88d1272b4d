//! Integration tests for the batch engine.
//!
//! Covers the omission invariant, order preservation under parallelism and
//! equivalence of the two variants when every firm has one share.

use chrono::{Duration, NaiveDate};
use merton_core::types::{AlignedObservation, FirmId};
use merton_risk::engine::{CreditRiskEngine, EngineConfig};
use merton_risk::parallel::ParallelConfig;
use merton_risk::variant::{MarketCapitalisation, ModelVariant, SharePrice, SharesOutstanding};
use merton_risk::compare;

const FIRMS: [&str; 5] = ["AAPL", "F", "JPM", "TSLA", "XOM"];

/// Synthetic panel with a sprinkling of unusable rows.
fn panel(n: usize) -> Vec<AlignedObservation> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    (0..n)
        .map(|i| {
            let firm = FIRMS[i % FIRMS.len()];
            let share_price = match i % 37 {
                0 => 0.0,
                1 => f64::NAN,
                _ => 20.0 + (i % 53) as f64 * 3.5,
            };
            AlignedObservation {
                firm_id: FirmId::new(firm),
                date: start + Duration::days((i / FIRMS.len()) as i64),
                share_price,
                equity_vol: 0.2 + (i % 11) as f64 * 0.04,
                debt: 5_000.0 + (i % 17) as f64 * 9_000.0,
                risk_free_rate: 0.01 + (i % 5) as f64 * 0.01,
            }
        })
        .collect()
}

fn config(parallel: ParallelConfig) -> EngineConfig {
    EngineConfig {
        parallel,
        ..EngineConfig::default()
    }
}

#[test]
fn test_emitted_records_are_finite_and_positive() {
    let engine = CreditRiskEngine::new(
        MarketCapitalisation::new(SharesOutstanding::reference()),
        EngineConfig::default(),
    );
    let output = engine.run(&panel(400));

    assert!(output.stats.emitted > 0);
    assert_eq!(output.stats.processed, 400);
    assert_eq!(
        output.stats.emitted + output.stats.dropped(),
        output.stats.processed
    );
    assert_eq!(output.records.len(), output.stats.emitted);

    for record in &output.records {
        assert!(record.asset_value.is_finite() && record.asset_value > 0.0);
        assert!(record.asset_vol.is_finite() && record.asset_vol > 0.0);
        assert!(!record.distance_to_default.is_nan());
        assert!((0.0..=1.0).contains(&record.default_probability));
        assert!(record.market_cap.is_some());
    }
}

#[test]
fn test_parallel_run_matches_sequential_run() {
    let observations = panel(600);

    let parallel = CreditRiskEngine::new(SharePrice, config(ParallelConfig::new(8, 10)));
    let sequential = CreditRiskEngine::new(SharePrice, config(ParallelConfig::sequential()));

    let par = parallel.run(&observations);
    let seq = sequential.run(&observations);

    assert_eq!(par.stats, seq.stats);
    assert_eq!(par.records, seq.records);
}

#[test]
fn test_output_preserves_input_order() {
    let observations = panel(300);
    let engine = CreditRiskEngine::new(SharePrice, config(ParallelConfig::new(4, 1)));
    let output = engine.run(&observations);

    let mut cursor = observations.iter();
    for record in &output.records {
        let found = cursor.any(|o| o.firm_id == record.firm_id && o.date == record.date);
        assert!(found, "record {} {} out of order", record.firm_id, record.date);
    }
}

#[test]
fn test_variants_agree_with_unit_shares() {
    let observations = panel(120);
    let unit_shares: SharesOutstanding = FIRMS
        .iter()
        .map(|firm| (FirmId::new(*firm), 1.0))
        .collect();

    let naive = CreditRiskEngine::new(SharePrice, EngineConfig::default()).run(&observations);
    let improved = CreditRiskEngine::new(
        MarketCapitalisation::new(unit_shares),
        EngineConfig::default(),
    )
    .run(&observations);

    assert_eq!(naive.variant, ModelVariant::Naive);
    assert_eq!(improved.variant, ModelVariant::Improved);
    assert_eq!(naive.stats, improved.stats);
    assert_eq!(naive.records.len(), improved.records.len());

    for (a, b) in naive.records.iter().zip(&improved.records) {
        assert_eq!(a.asset_value.to_bits(), b.asset_value.to_bits());
        assert_eq!(a.asset_vol.to_bits(), b.asset_vol.to_bits());
        assert_eq!(a.default_probability.to_bits(), b.default_probability.to_bits());
        assert_eq!(b.market_cap, b.share_price);
    }
}

#[test]
fn test_missing_shares_are_counted() {
    let observations = panel(50);
    let partial: SharesOutstanding = [(FirmId::new("AAPL"), 17_350.0)].into_iter().collect();
    let output =
        CreditRiskEngine::new(MarketCapitalisation::new(partial), EngineConfig::default())
            .run(&observations);

    assert_eq!(output.stats.missing_equity_value, 40);
    assert!(output.records.iter().all(|r| r.firm_id.as_str() == "AAPL"));
}

#[test]
fn test_comparison_over_engine_output() {
    let observations = panel(250);
    let naive = CreditRiskEngine::new(SharePrice, EngineConfig::default()).run(&observations);
    let improved = CreditRiskEngine::new(
        MarketCapitalisation::new(SharesOutstanding::reference()),
        EngineConfig::default(),
    )
    .run(&observations);

    let report = compare(&naive.records, &improved.records);
    assert_eq!(report.naive.records, naive.records.len());
    assert_eq!(report.improved.records, improved.records.len());
    assert_eq!(report.firm_rows().len(), FIRMS.len());
    assert_eq!(report.improved.ranking.len(), report.improved.firms.len());
    assert!(report.improved.average_pd_std.is_some());

    for pair in report.improved.ranking.windows(2) {
        assert!(pair[0].1 >= pair[1].1);
    }
}
