//! CSV file loader.

use crate::error::LoaderError;
use crate::rows::{CsvRow, DebtRow, EquityPriceRow, EquityVolRow, RiskFreeRow};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// CSV file loader for the market data series.
pub struct CsvLoader;

impl CsvLoader {
    /// Load typed rows from a CSV file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    ///
    /// # Returns
    ///
    /// A vector of parsed rows, or an error if the file is missing, lacks a
    /// required column, or contains a malformed row.
    pub fn load_typed<T: CsvRow, P: AsRef<Path>>(path: P) -> Result<Vec<T>, LoaderError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }

        let rows = Self::from_reader(File::open(path)?)?;
        debug!(path = %path.display(), rows = rows.len(), "Loaded CSV");
        Ok(rows)
    }

    /// Load typed rows from any reader producing CSV text with a header.
    pub fn from_reader<T: CsvRow, R: Read>(reader: R) -> Result<Vec<T>, LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in T::COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                return Err(LoaderError::MissingColumn((*column).to_string()));
            }
        }

        reader
            .deserialize::<T>()
            .enumerate()
            .map(|(idx, result)| {
                result.map_err(|e| LoaderError::InvalidFormat {
                    row: idx + 1,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

/// The four input series of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketData {
    /// Daily share prices
    pub equity_prices: Vec<EquityPriceRow>,
    /// Daily equity volatilities
    pub equity_vols: Vec<EquityVolRow>,
    /// Debt reports
    pub debts: Vec<DebtRow>,
    /// Daily risk-free rates
    pub risk_free: Vec<RiskFreeRow>,
}

impl MarketData {
    /// Loads every series from its conventional file name under `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, LoaderError> {
        let dir = dir.as_ref();
        Ok(Self {
            equity_prices: CsvLoader::load_typed(dir.join(EquityPriceRow::FILE_NAME))?,
            equity_vols: CsvLoader::load_typed(dir.join(EquityVolRow::FILE_NAME))?,
            debts: CsvLoader::load_typed(dir.join(DebtRow::FILE_NAME))?,
            risk_free: CsvLoader::load_typed(dir.join(RiskFreeRow::FILE_NAME))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found() {
        let result = CsvLoader::load_typed::<DebtRow, _>("nonexistent.csv");
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }

    #[test]
    fn test_from_reader_parses_rows() {
        let text = "date,firm_id,equity_price\n2023-01-03,AAPL,125.07\n2023-01-04, F ,12.31\n";
        let rows: Vec<EquityPriceRow> = CsvLoader::from_reader(text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].firm_id.as_str(), "AAPL");
        assert_eq!(rows[0].equity_price, Some(125.07));
        assert_eq!(rows[1].firm_id.as_str(), "F");
    }

    #[test]
    fn test_empty_numeric_cell_is_none() {
        let text = "date,risk_free_rate\n2023-01-03,\n2023-01-04,n/a\n2023-01-05,0.047\n";
        let rows: Vec<RiskFreeRow> = CsvLoader::from_reader(text.as_bytes()).unwrap();
        assert_eq!(rows[0].risk_free_rate, None);
        assert_eq!(rows[1].risk_free_rate, None);
        assert_eq!(rows[2].risk_free_rate, Some(0.047));
    }

    #[test]
    fn test_missing_column() {
        let text = "date,firm_id,value\n2023-01-03,AAPL,1.0\n";
        let result = CsvLoader::from_reader::<DebtRow, _>(text.as_bytes());
        match result {
            Err(LoaderError::MissingColumn(column)) => assert_eq!(column, "debt"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_date_reports_row() {
        let text = "date,firm_id,debt\n2023-01-03,AAPL,1.0\n03/01/2023,AAPL,2.0\n";
        let result = CsvLoader::from_reader::<DebtRow, _>(text.as_bytes());
        match result {
            Err(LoaderError::InvalidFormat { row, .. }) => assert_eq!(row, 2),
            other => panic!("Expected InvalidFormat, got {:?}", other),
        }
    }
}
