//! Result persistence.

use std::fs::{self, File};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::LoaderError;

/// Writes records as CSV with a header row, creating parent directories.
///
/// An empty slice still produces a file; it holds no header since the
/// columns come from the first record.
pub fn write_records<T: Serialize, P: AsRef<Path>>(
    path: P,
    records: &[T],
) -> Result<(), LoaderError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "Wrote results");
    Ok(())
}

/// Reads records previously written by [`write_records`].
pub fn read_records<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(File::open(path)?);

    let rows = reader
        .deserialize::<T>()
        .enumerate()
        .map(|(idx, result)| {
            result.map_err(|e| LoaderError::InvalidFormat {
                row: idx + 1,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<T>, _>>()?;

    debug!(path = %path.display(), rows = rows.len(), "Read results");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        firm_id: String,
        #[serde(rename = "PD")]
        pd: f64,
        note: Option<String>,
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let rows = vec![
            Row {
                firm_id: "AAPL".to_string(),
                pd: 1.5e-9,
                note: None,
            },
            Row {
                firm_id: "F".to_string(),
                pd: 0.0123,
                note: Some("levered".to_string()),
            },
        ];

        write_records(&path, &rows).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("firm_id,PD,note\n"));

        let back: Vec<Row> = read_records(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_records::<Row, _>("does/not/exist.csv");
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }
}
