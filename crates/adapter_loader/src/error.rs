//! Loader errors.

use thiserror::Error;

/// Errors that can occur during file loading and writing.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Missing required column
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Invalid data format
    #[error("Invalid data format in row {row}: {message}")]
    InvalidFormat {
        /// Data row number (1-indexed, header excluded)
        row: usize,
        /// Parser message
        message: String,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            LoaderError::MissingColumn("debt".to_string()).to_string(),
            "Missing required column: debt"
        );
        assert_eq!(
            LoaderError::InvalidFormat {
                row: 3,
                message: "bad date".to_string()
            }
            .to_string(),
            "Invalid data format in row 3: bad date"
        );
    }

    #[test]
    fn test_from_io_error() {
        let err: LoaderError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, LoaderError::IoError(_)));
    }
}
