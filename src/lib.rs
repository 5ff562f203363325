//! # mzAlign - Polarity Alignment for LC-IM-MS Feature Exports
//!
//! `mzalign` combines the positive and negative mode feature exports of an
//! LC-IM-MS experiment into a single worksheet laid out for the notame
//! preprocessing workflow.
//!
//! ## Key Features
//!
//! - **Per-polarity alignment**: features are deduplicated on
//!   (molecule name, precursor m/z) and numbered with contiguous alignment IDs;
//!   negative IDs continue after the positive ones.
//!
//! - **Explicit injection binding**: exported injections are joined to sample
//!   sheet rows by name when the sheet carries an injection-name column, and
//!   by position (with a shape check) otherwise.
//!
//! - **Role filtering**: only injections whose sample role is retained (QC,
//!   SAMPLE and BLANK by default) become area columns, and the same policy
//!   drives the metadata block.
//!
//! - **Combined output**: both polarities are stacked, outer-joined on
//!   alignment ID and deduplicated on (average m/z, cross collisional section).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mzalign::prelude::*;
//!
//! let config = ConversionConfig {
//!     retained_roles: RetainedRoles::qc_and_sample(),
//!     ..Default::default()
//! };
//! let inputs = ConversionInputs::new("samples.xlsx", "positive.tsv", "negative.tsv");
//!
//! let stats = Converter::new(config).run(&inputs)?;
//! println!("{}", stats);
//! # Ok::<(), mzalign::pipeline::ConvertError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`features`]: feature export reader and raw records
//! - [`metadata`]: sample sheet reader, sample roles, metadata block projection
//! - [`align`]: per-polarity alignment into a descriptor table and area matrix
//! - [`merge`]: cross-polarity stacking, outer join and deduplication
//! - [`output`]: workbook layout and writer
//! - [`pipeline`]: end-to-end conversion and run statistics
//! - [`polarity`]: ionization polarity
//!
//! ## Output Layout
//!
//! | Rows | Columns | Content |
//! |------|---------|---------|
//! | 0-3 | 5 | `Injection_order`, `QC`, `Group`, `Replicate` labels |
//! | 0-3 | 6.. | One metadata column per retained injection |
//! | 4 | 0.. | Dataset header |
//! | 5.. | 0.. | One row per aligned feature |

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod align;
pub mod features;
pub mod merge;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod polarity;

mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::align::{
        AlignError, AlignedFeature, Alignment, AreaMatrix, DescriptorTable, FeatureAligner,
        InjectionBinding, InjectionColumn,
    };
    pub use crate::features::{FeatureError, FeatureExport, RawFeatureRecord};
    pub use crate::merge::{CombinedDataset, CombinedRow, DatasetMerger, MergeError, UnmatchedCell};
    pub use crate::metadata::{
        MetadataBlock, MetadataError, MetadataProjector, RetainedRoles, SampleMetadataRecord,
        SampleRole, SampleSheet, SampleValue, SheetOptions,
    };
    pub use crate::output::{HeaderStyle, LayoutConfig, OutputError, WorkbookWriter};
    pub use crate::pipeline::{
        Conversion, ConversionConfig, ConversionInputs, ConversionStats, ConvertError, Converter,
        ErrorKind,
    };
    pub use crate::polarity::Polarity;
}
