//! # Polarity Merge
//!
//! Combines the positive and negative alignments into one table: descriptors
//! are stacked (positive first), both area matrices are outer-joined on
//! alignment ID, and rows that repeat an (average m/z, cross collisional
//! section) pair are dropped, keeping the first.

mod error;
mod merger;

pub use error::MergeError;
pub use merger::{
    CombinedDataset, CombinedRow, DatasetMerger, UnmatchedCell, DESCRIPTOR_HEADERS,
};
