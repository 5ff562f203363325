use std::path::PathBuf;

/// Errors that can occur while reading a feature export
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// Export file does not exist or is not a file
    #[error("Feature export not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error reading the export
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Required column absent from the export
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn {
        /// Export that was inspected
        table: String,
        /// Column header that was expected
        column: String,
    },

    /// A required cell could not be parsed
    #[error("Invalid value '{value}' for column '{column}' in {table}, row {row}")]
    InvalidValue {
        /// Export that was inspected
        table: String,
        /// 1-based data row (header excluded)
        row: usize,
        /// Column header
        column: String,
        /// Raw cell content
        value: String,
    },
}
