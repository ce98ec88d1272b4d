//! Run command implementation
//!
//! Loads the four input series, aligns them, runs each requested variant
//! through the batch engine and writes one result file per variant.

use std::path::{Path, PathBuf};

use adapter_loader::{align, write_records, DebtAlignment, MarketData};
use merton_risk::engine::{CreditRiskEngine, RunOutput, RunStats};
use merton_risk::variant::{MarketCapitalisation, ModelVariant, SharePrice};
use tracing::info;

use crate::config::Settings;
use crate::{CliError, Result};

/// Parses the `--variant` argument.
pub fn parse_variants(variant: &str) -> Result<Vec<ModelVariant>> {
    match variant {
        "naive" => Ok(vec![ModelVariant::Naive]),
        "improved" => Ok(vec![ModelVariant::Improved]),
        "both" => Ok(ModelVariant::ALL.to_vec()),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown variant: {}. Supported: naive, improved, both",
            other
        ))),
    }
}

/// Parses the `--debt-alignment` argument.
pub fn parse_alignment(alignment: &str) -> Result<DebtAlignment> {
    match alignment {
        "forward-fill" => Ok(DebtAlignment::ForwardFill),
        "fiscal-year" => Ok(DebtAlignment::FiscalYear),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown debt alignment: {}. Supported: forward-fill, fiscal-year",
            other
        ))),
    }
}

/// Runs one variant over already-loaded data.
pub fn run_variant(
    settings: &Settings,
    data: &MarketData,
    variant: ModelVariant,
    alignment: DebtAlignment,
) -> RunOutput {
    let observations = align(data, alignment);
    info!(
        variant = %variant,
        ?alignment,
        observations = observations.len(),
        "Aligned observations"
    );

    let config = settings.engine_config();
    match variant {
        ModelVariant::Naive => CreditRiskEngine::new(SharePrice, config).run(&observations),
        ModelVariant::Improved => {
            CreditRiskEngine::new(MarketCapitalisation::new(settings.shares()), config)
                .run(&observations)
        }
    }
}

/// Run the run command
pub fn run(
    settings: &Settings,
    variant: &str,
    data_dir: Option<&str>,
    output_dir: Option<&str>,
    debt_alignment: Option<&str>,
) -> Result<()> {
    let variants = parse_variants(variant)?;
    let alignment_override = debt_alignment.map(parse_alignment).transpose()?;
    let data_dir = data_dir.map_or_else(|| settings.data.data_dir.clone(), PathBuf::from);
    let output_dir = output_dir.map_or_else(|| settings.data.output_dir.clone(), PathBuf::from);

    info!("Starting run...");
    info!("  Data directory: {}", data_dir.display());
    info!("  Output directory: {}", output_dir.display());

    let data = MarketData::load_dir(&data_dir)?;

    let mut summary = Vec::with_capacity(variants.len());
    for variant in variants {
        let alignment = alignment_override.unwrap_or_else(|| settings.debt_alignment(variant));
        let output = run_variant(settings, &data, variant, alignment);

        let path = results_path(&output_dir, variant);
        write_records(&path, &output.records)?;
        info!("  {} results written to {}", variant, path.display());

        summary.push((variant, output.stats));
    }

    print_summary(&summary);
    info!("Run complete");
    Ok(())
}

/// Location of a variant's result file.
pub fn results_path(output_dir: &Path, variant: ModelVariant) -> PathBuf {
    output_dir.join(variant.results_file_name())
}

fn print_summary(summary: &[(ModelVariant, RunStats)]) {
    println!("\n┌──────────┬───────────┬─────────┬─────────┬─────────┬──────────────┐");
    println!("│ Variant  │ Processed │ Emitted │ Missing │ Invalid │ Nonconvergent│");
    println!("├──────────┼───────────┼─────────┼─────────┼─────────┼──────────────┤");
    for (variant, stats) in summary {
        println!(
            "│ {:<8} │ {:>9} │ {:>7} │ {:>7} │ {:>7} │ {:>12} │",
            variant.name(),
            stats.processed,
            stats.emitted,
            stats.missing_equity_value,
            stats.invalid_input,
            stats.non_convergent
        );
    }
    println!("└──────────┴───────────┴─────────┴─────────┴─────────┴──────────────┘");
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter_loader::read_records;
    use merton_risk::record::ResultRecord;

    fn fixtures() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("adapter_loader")
            .join("tests")
            .join("fixtures")
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse_variants("naive").unwrap(), vec![ModelVariant::Naive]);
        assert_eq!(parse_variants("both").unwrap().len(), 2);
        assert!(matches!(
            parse_variants("hybrid"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_alignment() {
        assert_eq!(
            parse_alignment("fiscal-year").unwrap(),
            DebtAlignment::FiscalYear
        );
        assert!(parse_alignment("quarterly").is_err());
    }

    #[test]
    fn test_run_writes_both_result_files() {
        let out = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        let data_dir = fixtures();

        run(
            &settings,
            "both",
            data_dir.to_str(),
            out.path().to_str(),
            None,
        )
        .unwrap();

        let improved: Vec<ResultRecord> =
            read_records(results_path(out.path(), ModelVariant::Improved)).unwrap();
        assert!(!improved.is_empty());
        assert!(improved.iter().all(|r| r.market_cap.is_some()));
        assert!(improved
            .iter()
            .all(|r| r.default_probability >= 0.0 && r.default_probability <= 1.0));

        let naive: Vec<ResultRecord> =
            read_records(results_path(out.path(), ModelVariant::Naive)).unwrap();
        assert!(naive.iter().all(|r| r.market_cap.is_none()));
    }

    #[test]
    fn test_run_variant_counts_aligned_rows() {
        let data = MarketData::load_dir(fixtures()).unwrap();
        let settings = Settings::default();

        let naive = run_variant(&settings, &data, ModelVariant::Naive, DebtAlignment::ForwardFill);
        assert_eq!(naive.stats.processed, 6);

        let improved =
            run_variant(&settings, &data, ModelVariant::Improved, DebtAlignment::FiscalYear);
        assert_eq!(improved.stats.processed, 5);
        assert_eq!(improved.stats.missing_equity_value, 0);
    }

    #[test]
    fn test_missing_data_dir_is_reported() {
        let out = tempfile::tempdir().unwrap();
        let result = run(
            &Settings::default(),
            "naive",
            Some("no/such/dir"),
            out.path().to_str(),
            None,
        );
        assert!(matches!(result, Err(CliError::Loader(_))));
    }
}
