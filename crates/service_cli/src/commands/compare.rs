//! Compare command implementation
//!
//! Reads the naive and improved result files and reports time-series
//! stability and cross-sectional ranking for each variant.

use std::path::{Path, PathBuf};

use adapter_loader::{read_records, write_records};
use merton_risk::comparison::{compare, ComparisonReport, VariantSummary};
use merton_risk::record::ResultRecord;
use merton_risk::variant::ModelVariant;
use tracing::info;

use super::cell;
use super::run::results_path;
use crate::config::Settings;
use crate::Result;

/// Builds the comparison report from the result files in `output_dir`.
pub fn load_report(output_dir: &Path) -> Result<ComparisonReport> {
    let naive: Vec<ResultRecord> = read_records(results_path(output_dir, ModelVariant::Naive))?;
    let improved: Vec<ResultRecord> =
        read_records(results_path(output_dir, ModelVariant::Improved))?;
    Ok(compare(&naive, &improved))
}

/// Run the compare command
pub fn run(settings: &Settings, output_dir: Option<&str>, write: Option<&str>) -> Result<()> {
    let output_dir = output_dir.map_or_else(|| settings.data.output_dir.clone(), PathBuf::from);
    info!("Comparing results in {}", output_dir.display());

    let report = load_report(&output_dir)?;

    print_stability(&report);
    print_ranking(&report.naive);
    print_ranking(&report.improved);

    if let Some(path) = write {
        write_records(path, &report.firm_rows())?;
        info!("Per-firm comparison written to {}", path);
    }

    info!("Comparison complete");
    Ok(())
}

fn print_stability(report: &ComparisonReport) {
    println!("\nTime-series stability (sample std of PD)");
    println!("┌──────────┬──────────────┬──────────────┬──────────────┬──────────────┐");
    println!("│ Firm     │ Naive mean   │ Naive std    │ Improved mean│ Improved std │");
    println!("├──────────┼──────────────┼──────────────┼──────────────┼──────────────┤");
    for row in report.firm_rows() {
        println!(
            "│ {:<8} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │",
            row.firm_id,
            cell(row.naive_mean_pd),
            cell(row.naive_pd_std),
            cell(row.improved_mean_pd),
            cell(row.improved_pd_std)
        );
    }
    println!("├──────────┼──────────────┼──────────────┼──────────────┼──────────────┤");
    println!(
        "│ Average  │ {:>12} │ {:>12} │ {:>12} │ {:>12} │",
        "",
        cell(report.naive.average_pd_std),
        "",
        cell(report.improved.average_pd_std)
    );
    println!("└──────────┴──────────────┴──────────────┴──────────────┴──────────────┘");
}

fn print_ranking(summary: &VariantSummary) {
    println!("\nCross-sectional ranking by mean PD ({})", summary.variant);
    for (rank, (firm_id, mean_pd)) in summary.ranking.iter().enumerate() {
        println!("  {:>2}. {:<8} {:.6e}", rank + 1, firm_id, mean_pd);
    }
}
