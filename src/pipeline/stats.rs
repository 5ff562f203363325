use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::ConvertError;
use crate::align::Alignment;
use crate::polarity::Polarity;

/// Per-polarity counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolarityStats {
    /// Unique features (descriptor rows)
    pub features: usize,
    /// Injections kept as area columns
    pub retained_injections: usize,
    /// Injections dropped because their role was not retained
    pub excluded_injections: usize,
}

impl From<&Alignment> for PolarityStats {
    fn from(alignment: &Alignment) -> Self {
        Self {
            features: alignment.descriptors.len(),
            retained_injections: alignment.matrix.n_columns(),
            excluded_injections: alignment.excluded_injections.len(),
        }
    }
}

/// Summary of a completed conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    /// Positive mode counts
    pub positive: PolarityStats,
    /// Negative mode counts
    pub negative: PolarityStats,
    /// Rows in the combined dataset
    pub combined_rows: usize,
    /// Rows dropped by cross-polarity deduplication
    pub duplicates_removed: usize,
    /// Written workbook, `None` for in-memory conversions
    pub output: Option<PathBuf>,
    /// Wall time in seconds
    pub elapsed_secs: f64,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl ConversionStats {
    /// Counts for one polarity
    pub fn polarity(&self, polarity: Polarity) -> &PolarityStats {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        }
    }

    /// Write the summary as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConvertError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Combined {} rows ({} positive, {} negative features, {} duplicates removed), \
             {} + {} injection columns in {:.2}s",
            self.combined_rows,
            self.positive.features,
            self.negative.features,
            self.duplicates_removed,
            self.positive.retained_injections,
            self.negative.retained_injections,
            self.elapsed_secs
        )
    }
}
