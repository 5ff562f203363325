//! # Sample Metadata
//!
//! This module reads the sample sheet that describes every injection of a
//! run and projects it into the transposed metadata block written above the
//! combined dataset.
//!
//! ## Sample Sheet Layout
//!
//! | Column | Required | Description |
//! |--------|----------|-------------|
//! | Sequence | Yes | `Positive` or `Negative` |
//! | Sample_Type | Yes | `QC`, `SAMPLE`, `BLANK` or any other role |
//! | Description | Yes | Free-text group |
//! | Replicate_Number | Yes | Replicate number |
//! | Replicate_Name | No | Injection name as it appears in the feature export |
//!
//! The row position in the sheet is the injection order. When
//! `Replicate_Name` is present, injections are joined to exports by name;
//! otherwise they are paired by position within a polarity.

mod error;
mod projector;
mod sample;
mod sheet;


pub use error::MetadataError;
pub use projector::{BlockColumn, MetadataBlock, MetadataProjector, BLOCK_ROW_LABELS};
pub use sample::{RetainedRoles, SampleMetadataRecord, SampleRole, SampleValue};
pub use sheet::{columns, SampleSheet, SheetOptions};
