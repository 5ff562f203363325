use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Styling of header cells (dataset header row and block row labels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// Unformatted cells
    #[default]
    Plain,
    /// Bold text
    Bold,
}

impl fmt::Display for HeaderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderStyle::Plain => write!(f, "plain"),
            HeaderStyle::Bold => write!(f, "bold"),
        }
    }
}

impl FromStr for HeaderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "none" => Ok(HeaderStyle::Plain),
            "bold" => Ok(HeaderStyle::Bold),
            _ => Err(format!(
                "Unknown header style '{}'. Valid options: plain, bold",
                s
            )),
        }
    }
}

/// Placement and formatting of the output worksheet.
///
/// The defaults reproduce the layout notame reads: the metadata block's row
/// labels in column 5 from row 0, with injection columns starting at column
/// 6 directly above the dataset's injection columns; the dataset header on
/// row 4 starting at column 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Worksheet name
    pub sheet_name: String,
    /// Row of the first metadata block row
    pub block_start_row: u32,
    /// Column of the metadata block row labels
    pub block_start_col: u16,
    /// Row of the dataset header
    pub table_start_row: u32,
    /// Column of the first dataset column
    pub table_start_col: u16,
    /// Header cell styling
    pub header_style: HeaderStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            block_start_row: 0,
            block_start_col: 5,
            table_start_row: 4,
            table_start_col: 0,
            header_style: HeaderStyle::Plain,
        }
    }
}
