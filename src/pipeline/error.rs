use std::fmt;
use std::path::PathBuf;

use crate::align::AlignError;
use crate::features::FeatureError;
use crate::merge::MergeError;
use crate::metadata::MetadataError;
use crate::output::OutputError;

/// Errors that can occur during a conversion run
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// An input file does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Error reading the sample sheet or aligning the metadata block
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),

    /// Error reading a feature export
    #[error("Feature export error: {0}")]
    FeatureError(#[from] FeatureError),

    /// Error aligning one polarity
    #[error("Alignment error: {0}")]
    AlignError(#[from] AlignError),

    /// Error merging the two polarities
    #[error("Merge error: {0}")]
    MergeError(#[from] MergeError),

    /// Error writing the workbook
    #[error("Output error: {0}")]
    OutputError(#[from] OutputError),

    /// Error serializing the run summary
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error writing the run summary
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification of a failed run, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input file is missing
    InputNotFound,
    /// An expected column or worksheet is absent
    SchemaMismatch,
    /// Sample sheet rows and exported injections cannot be paired
    ShapeMismatch,
    /// No feature matches a polarity's charge sign
    EmptyPolarity,
    /// A cell, injection name or table relation is invalid
    InvalidInput,
    /// Reading or writing failed below the table level
    Io,
}

impl ConvertError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InputNotFound(_)
            | ConvertError::MetadataError(MetadataError::NotFound(_))
            | ConvertError::FeatureError(FeatureError::NotFound(_)) => ErrorKind::InputNotFound,

            ConvertError::MetadataError(MetadataError::MissingColumn { .. })
            | ConvertError::MetadataError(MetadataError::MissingSheet { .. })
            | ConvertError::FeatureError(FeatureError::MissingColumn { .. }) => {
                ErrorKind::SchemaMismatch
            }

            ConvertError::AlignError(AlignError::ShapeMismatch { .. }) => ErrorKind::ShapeMismatch,
            ConvertError::AlignError(AlignError::EmptyPolarity(_)) => ErrorKind::EmptyPolarity,

            ConvertError::AlignError(_)
            | ConvertError::MergeError(_)
            | ConvertError::MetadataError(MetadataError::BlockMismatch(_))
            | ConvertError::MetadataError(MetadataError::UnsupportedFormat(_))
            | ConvertError::FeatureError(FeatureError::InvalidValue { .. })
            | ConvertError::OutputError(OutputError::Overlap(_))
            | ConvertError::OutputError(OutputError::OutOfBounds { .. }) => ErrorKind::InvalidInput,

            _ => ErrorKind::Io,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InputNotFound => write!(f, "input not found"),
            ErrorKind::SchemaMismatch => write!(f, "schema mismatch"),
            ErrorKind::ShapeMismatch => write!(f, "shape mismatch"),
            ErrorKind::EmptyPolarity => write!(f, "empty polarity"),
            ErrorKind::InvalidInput => write!(f, "invalid input"),
            ErrorKind::Io => write!(f, "I/O"),
        }
    }
}
