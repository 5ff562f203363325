//! Feature exports: one delimited table per polarity, one row per
//! (feature, injection) measurement.

mod error;
mod reader;
mod record;

pub use error::FeatureError;
pub use reader::{columns, FeatureExport};
pub use record::{FeatureKey, RawFeatureRecord};
