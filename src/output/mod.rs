//! # Workbook Output
//!
//! Writes the combined dataset and the transposed metadata block side by side
//! on a single worksheet:
//!
//! ```text
//!      A     B  ...  F                G          H
//! 0                  Injection_order  1          2
//! 1                  QC               QC         SAMPLE
//! 2                  Group            pool       control
//! 3                  Replicate        1          1
//! 4    Alignment ID  ...  Ion Mode    QC_01      S_01
//! 5    0             ...  POS         1200       800
//! ```
//!
//! Formatting is part of [`LayoutConfig`] and passed explicitly to the
//! writer.

mod error;
mod layout;
mod writer;


pub use error::OutputError;
pub use layout::{HeaderStyle, LayoutConfig};
pub use writer::WorkbookWriter;
