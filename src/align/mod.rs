//! # Feature Alignment
//!
//! Per-polarity alignment of an instrument export against the sample sheet:
//!
//! 1. keep the export rows whose charge sign matches the polarity
//! 2. deduplicate features on (molecule name, precursor m/z), first occurrence wins
//! 3. number features contiguously from an ID offset
//! 4. bind every distinct injection to a sample sheet row ([`InjectionBinding`])
//! 5. build the feature-by-injection [`AreaMatrix`], filling undetected cells
//!    with zero ([`fill_not_detected`])
//! 6. drop injection columns whose sample role is not retained
//!
//! ```rust
//! use mzalign::align::FeatureAligner;
//! use mzalign::features::RawFeatureRecord;
//! use mzalign::metadata::{SampleMetadataRecord, SampleRole};
//! use mzalign::polarity::Polarity;
//!
//! let features = vec![
//!     RawFeatureRecord::new("Glucose", 203.05, 1, "QC_01").with_area(1200.0),
//!     RawFeatureRecord::new("Glucose", 203.05, 1, "S_01").with_area(800.0),
//! ];
//! let metadata = vec![
//!     SampleMetadataRecord::new("Positive", SampleRole::Qc, 1),
//!     SampleMetadataRecord::new("Positive", SampleRole::Sample, 2),
//! ];
//!
//! let alignment = FeatureAligner::default().align(&features, &metadata, Polarity::Positive, 0)?;
//! assert_eq!(alignment.descriptors.len(), 1);
//! assert_eq!(alignment.matrix.row(0), &[1200.0, 800.0]);
//! # Ok::<(), mzalign::align::AlignError>(())
//! ```

mod aligner;
mod binding;
mod error;
mod types;


pub use aligner::{deduplicate_features, distinct_injections, fill_not_detected, Alignment, FeatureAligner};
pub use binding::InjectionBinding;
pub use error::AlignError;
pub use types::{AlignedFeature, AreaMatrix, DescriptorTable, InjectionColumn, COLUMN_LABEL};
