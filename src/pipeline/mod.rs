//! Conversion pipeline
//!
//! Loads the sample sheet and both feature exports, aligns each polarity,
//! merges them and writes the combined workbook.
//!
//! ```rust,no_run
//! use mzalign::pipeline::{ConversionConfig, ConversionInputs, Converter};
//!
//! let inputs = ConversionInputs::new("samples.xlsx", "pos.tsv", "neg.tsv");
//! let stats = Converter::new(ConversionConfig::default()).run(&inputs)?;
//! println!("{}", stats);
//! # Ok::<(), mzalign::pipeline::ConvertError>(())
//! ```

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod error;
mod stats;

#[cfg(test)]
mod tests;

pub use error::{ConvertError, ErrorKind};
pub use stats::{ConversionStats, PolarityStats};

use crate::align::{Alignment, FeatureAligner, InjectionBinding};
use crate::features::{FeatureExport, RawFeatureRecord};
use crate::merge::{CombinedDataset, DatasetMerger, UnmatchedCell};
use crate::metadata::{
    MetadataBlock, MetadataProjector, RetainedRoles, SampleMetadataRecord, SampleSheet,
    SheetOptions,
};
use crate::output::{LayoutConfig, WorkbookWriter};
use crate::polarity::Polarity;

/// Default workbook location, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "output/comb_data.xlsx";

/// Configuration for a conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Sample roles kept in both the area matrix and the metadata block
    pub retained_roles: RetainedRoles,

    /// How injections are joined to sample sheet rows
    pub binding: InjectionBinding,

    /// Rendering of cells with no counterpart in the other polarity
    pub unmatched: UnmatchedCell,

    /// Sample sheet options (worksheet, injection-name column)
    pub sheet: SheetOptions,

    /// Feature export delimiter; `None` picks by file extension
    pub delimiter: Option<u8>,

    /// Worksheet layout
    pub layout: LayoutConfig,

    /// Workbook path
    pub output: PathBuf,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            retained_roles: RetainedRoles::default(),
            binding: InjectionBinding::default(),
            unmatched: UnmatchedCell::default(),
            sheet: SheetOptions::default(),
            delimiter: None,
            layout: LayoutConfig::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// The three input files of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionInputs {
    /// Sample sheet
    pub metadata: PathBuf,
    /// Positive mode feature export
    pub positive: PathBuf,
    /// Negative mode feature export
    pub negative: PathBuf,
}

impl ConversionInputs {
    /// Group the three input paths
    pub fn new<M, P, N>(metadata: M, positive: P, negative: N) -> Self
    where
        M: Into<PathBuf>,
        P: Into<PathBuf>,
        N: Into<PathBuf>,
    {
        Self {
            metadata: metadata.into(),
            positive: positive.into(),
            negative: negative.into(),
        }
    }

    /// Fail on the first input that does not exist
    pub fn check(&self) -> Result<(), ConvertError> {
        for path in [&self.metadata, &self.positive, &self.negative] {
            if !path.is_file() {
                return Err(ConvertError::InputNotFound(path.clone()));
            }
        }
        Ok(())
    }
}

/// Loaded input tables
#[derive(Debug, Clone, Default)]
pub struct LoadedInputs {
    /// Parsed sample sheet
    pub sheet: SampleSheet,
    /// Positive mode export
    pub positive: FeatureExport,
    /// Negative mode export
    pub negative: FeatureExport,
}

/// In-memory result of a conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Positive mode alignment
    pub positive: Alignment,
    /// Negative mode alignment
    pub negative: Alignment,
    /// Merged table
    pub dataset: CombinedDataset,
    /// Metadata block ordered like the dataset's injection columns
    pub block: MetadataBlock,
}

impl Conversion {
    /// Summarize the conversion
    pub fn stats(&self, output: Option<&Path>, elapsed: Duration) -> ConversionStats {
        ConversionStats {
            positive: PolarityStats::from(&self.positive),
            negative: PolarityStats::from(&self.negative),
            combined_rows: self.dataset.len(),
            duplicates_removed: self.dataset.duplicates_removed,
            output: output.map(Path::to_path_buf),
            elapsed_secs: elapsed.as_secs_f64(),
            finished_at: chrono::Utc::now(),
        }
    }
}

/// Runs the conversion end to end
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConversionConfig,
}

impl Converter {
    /// Create a converter with the given configuration
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Read the three inputs. Missing files are reported before any parsing.
    pub fn load(&self, inputs: &ConversionInputs) -> Result<LoadedInputs, ConvertError> {
        inputs.check()?;
        Ok(LoadedInputs {
            sheet: SampleSheet::from_path(&inputs.metadata, &self.config.sheet)?,
            positive: FeatureExport::from_path(&inputs.positive, self.config.delimiter)?,
            negative: FeatureExport::from_path(&inputs.negative, self.config.delimiter)?,
        })
    }

    /// Load, convert and write the workbook to the configured output path
    pub fn run(&self, inputs: &ConversionInputs) -> Result<ConversionStats, ConvertError> {
        let started = Instant::now();
        info!("Sample sheet: {}", inputs.metadata.display());
        info!("Positive export: {}", inputs.positive.display());
        info!("Negative export: {}", inputs.negative.display());

        let loaded = self.load(inputs)?;
        if self.config.binding != InjectionBinding::Positional && !loaded.sheet.has_injection_names {
            warn!(
                "Sample sheet names no injections in '{}'; injections are matched by position",
                self.config.sheet.injection_name_column
            );
        }

        let conversion = self.convert_tables(
            &loaded.sheet.records,
            &loaded.positive.records,
            &loaded.negative.records,
        )?;

        WorkbookWriter::new(self.config.layout.clone()).write(
            &self.config.output,
            &conversion.block,
            &conversion.dataset,
        )?;

        let stats = conversion.stats(Some(&self.config.output), started.elapsed());
        info!("{}", stats);
        Ok(stats)
    }

    /// Align, merge and project already-loaded tables without touching disk
    pub fn convert_tables(
        &self,
        metadata: &[SampleMetadataRecord],
        positive: &[RawFeatureRecord],
        negative: &[RawFeatureRecord],
    ) -> Result<Conversion, ConvertError> {
        let aligner = FeatureAligner::new(self.config.retained_roles.clone(), self.config.binding);
        let (pos, neg) = align_both(&aligner, metadata, positive, negative)?;

        let dataset = DatasetMerger::new(self.config.unmatched).merge(
            &pos.descriptors,
            &pos.matrix,
            &neg.descriptors,
            &neg.matrix,
        )?;
        if dataset.duplicates_removed > 0 {
            info!(
                "Dropped {} rows sharing average m/z and cross collisional section",
                dataset.duplicates_removed
            );
        }

        let block = MetadataProjector::new(self.config.retained_roles.clone())
            .project(metadata)
            .aligned_to(&dataset.injection_orders())?;

        Ok(Conversion {
            positive: pos,
            negative: neg,
            dataset,
            block,
        })
    }
}

#[cfg(not(feature = "parallel"))]
fn align_both(
    aligner: &FeatureAligner,
    metadata: &[SampleMetadataRecord],
    positive: &[RawFeatureRecord],
    negative: &[RawFeatureRecord],
) -> Result<(Alignment, Alignment), ConvertError> {
    let pos = aligner.align(positive, metadata, Polarity::Positive, 0)?;
    let offset = pos.descriptors.len() as u64;
    let neg = aligner.align(negative, metadata, Polarity::Negative, offset)?;
    Ok((pos, neg))
}

/// Both polarities on separate threads. The negative offset is the positive
/// feature count, computed up front.
#[cfg(feature = "parallel")]
fn align_both(
    aligner: &FeatureAligner,
    metadata: &[SampleMetadataRecord],
    positive: &[RawFeatureRecord],
    negative: &[RawFeatureRecord],
) -> Result<(Alignment, Alignment), ConvertError> {
    let offset = crate::align::deduplicate_features(
        positive.iter().filter(|r| r.is_polarity(Polarity::Positive)),
    )
    .len() as u64;

    let (pos, neg) = rayon::join(
        || aligner.align(positive, metadata, Polarity::Positive, 0),
        || aligner.align(negative, metadata, Polarity::Negative, offset),
    );
    Ok((pos?, neg?))
}
