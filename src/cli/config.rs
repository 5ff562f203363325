//! TOML configuration file support.
//!
//! Every setting is optional; CLI flags override file values:
//!
//! ```toml
//! # mzalign.toml
//! [conversion]
//! retained_roles = ["QC", "SAMPLE", "BLANK"]
//! injection_name_column = "Replicate_Name"
//! injection_binding = "auto"
//! unmatched_cells = "blank"
//!
//! [input]
//! sample_sheet = "samples"
//! delimiter = "\t"
//!
//! [output]
//! path = "output/comb_data.xlsx"
//! sheet_name = "Sheet1"
//! header_style = "bold"
//! block_start_col = 5
//! table_start_row = 4
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use mzalign::align::InjectionBinding;
use mzalign::merge::UnmatchedCell;
use mzalign::metadata::{RetainedRoles, SampleRole};
use mzalign::output::HeaderStyle;
use mzalign::pipeline::ConversionConfig;

/// Root configuration structure for mzalign.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Alignment and merge settings.
    #[serde(default)]
    pub conversion: ConversionSettings,

    /// Input parsing settings.
    #[serde(default)]
    pub input: InputSettings,

    /// Workbook settings.
    #[serde(default)]
    pub output: OutputSettings,
}

/// `[conversion]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionSettings {
    /// Sample roles kept in the output.
    pub retained_roles: Option<Vec<String>>,

    /// Sample sheet column naming each injection.
    pub injection_name_column: Option<String>,

    /// Injection binding strategy (auto, by-name, positional).
    pub injection_binding: Option<InjectionBinding>,

    /// Rendering of cells without a counterpart (blank, zero).
    pub unmatched_cells: Option<UnmatchedCell>,
}

/// `[input]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSettings {
    /// Worksheet of the sample sheet workbook.
    pub sample_sheet: Option<String>,

    /// Feature export delimiter, a single character or `tab`.
    pub delimiter: Option<String>,
}

/// `[output]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    /// Workbook path.
    pub path: Option<PathBuf>,

    /// Worksheet name.
    pub sheet_name: Option<String>,

    /// Header cell styling (plain, bold).
    pub header_style: Option<HeaderStyle>,

    /// Column of the metadata block row labels.
    pub block_start_col: Option<u16>,

    /// Row of the dataset header.
    pub table_start_row: Option<u32>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Overlay the file settings on the default conversion configuration.
    pub fn to_conversion_config(&self) -> Result<ConversionConfig> {
        let mut config = ConversionConfig::default();

        if let Some(roles) = &self.conversion.retained_roles {
            if roles.is_empty() {
                bail!("retained_roles must name at least one role");
            }
            config.retained_roles = RetainedRoles::new(roles.iter().map(|r| SampleRole::parse(r)));
        }
        if let Some(column) = &self.conversion.injection_name_column {
            config.sheet.injection_name_column = column.clone();
        }
        if let Some(binding) = self.conversion.injection_binding {
            config.binding = binding;
        }
        if let Some(unmatched) = self.conversion.unmatched_cells {
            config.unmatched = unmatched;
        }

        if let Some(sheet) = &self.input.sample_sheet {
            config.sheet.sheet_name = sheet.clone();
        }
        if let Some(delimiter) = &self.input.delimiter {
            config.delimiter = Some(parse_delimiter(delimiter)?);
        }

        if let Some(path) = &self.output.path {
            config.output = path.clone();
        }
        if let Some(name) = &self.output.sheet_name {
            config.layout.sheet_name = name.clone();
        }
        if let Some(style) = self.output.header_style {
            config.layout.header_style = style;
        }
        if let Some(col) = self.output.block_start_col {
            config.layout.block_start_col = col;
        }
        if let Some(row) = self.output.table_start_row {
            config.layout.table_start_row = row;
        }

        Ok(config)
    }
}

/// Parse a delimiter setting: one ASCII character, or `tab`/`\t`.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        other => bail!("Delimiter must be a single ASCII character, got '{}'", other),
    }
}
