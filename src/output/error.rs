/// Errors that can occur while writing the combined workbook
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// I/O error creating or replacing the output file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the spreadsheet writer
    #[error("Spreadsheet writer error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    /// A cell position exceeds the worksheet limits
    #[error("Cell position exceeds worksheet limits: row {row}, column {col}")]
    OutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
    },

    /// The metadata block and the dataset would overwrite each other
    #[error("Layout places the metadata block over the dataset: {0}")]
    Overlap(String),
}
