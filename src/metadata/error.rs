use std::path::PathBuf;

/// Errors that can occur while reading or projecting the sample sheet
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Sample sheet does not exist or is not a file
    #[error("Sample sheet not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error reading the sample sheet
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Spreadsheet parsing error
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    /// Required column absent from the sample sheet
    #[error("Missing required column '{column}' in {table}")]
    MissingColumn {
        /// Table (file and sheet) that was inspected
        table: String,
        /// Column header that was expected
        column: String,
    },

    /// Workbook has no sheet with the requested name
    #[error("Sheet '{sheet}' not found in {}", .path.display())]
    MissingSheet {
        /// Workbook path
        path: PathBuf,
        /// Requested sheet name
        sheet: String,
    },

    /// File extension not recognized as a sample sheet format
    #[error("Unsupported sample sheet format: {0}")]
    UnsupportedFormat(String),

    /// Metadata block has no entry for an injection column of the dataset
    #[error("Metadata block has no column for injection order {0}")]
    BlockMismatch(usize),
}
