use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{MetadataError, SampleMetadataRecord, SampleRole, SampleValue};
use crate::polarity::Polarity;
use crate::table;

/// Column headers of the sample sheet
pub mod columns {
    /// Sequence (polarity) label
    pub const SEQUENCE: &str = "Sequence";
    /// Sample role
    pub const SAMPLE_TYPE: &str = "Sample_Type";
    /// Free-text group
    pub const DESCRIPTION: &str = "Description";
    /// Replicate number
    pub const REPLICATE_NUMBER: &str = "Replicate_Number";
    /// Default header of the optional injection-name column
    pub const REPLICATE_NAME: &str = "Replicate_Name";
}

/// Options controlling how the sample sheet is located and parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetOptions {
    /// Worksheet name inside a workbook
    pub sheet_name: String,

    /// Header of the optional column naming each injection
    pub injection_name_column: String,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            sheet_name: "samples".to_string(),
            injection_name_column: columns::REPLICATE_NAME.to_string(),
        }
    }
}

/// The parsed sample sheet, one record per injection
#[derive(Debug, Clone, Default)]
pub struct SampleSheet {
    /// Records in sheet order
    pub records: Vec<SampleMetadataRecord>,

    /// Whether any row names its injection
    pub has_injection_names: bool,
}

impl SampleSheet {
    /// Create a sheet from already-built records
    pub fn from_records(records: Vec<SampleMetadataRecord>) -> Self {
        let has_injection_names = records.iter().any(|r| r.injection_name.is_some());
        Self {
            records,
            has_injection_names,
        }
    }

    /// Load the sample sheet, dispatching on the file extension.
    ///
    /// Supported formats:
    /// * `.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods` – read from `options.sheet_name`
    /// * `.tsv`, `.txt` – tab separated
    /// * `.csv` – comma separated
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: &SheetOptions,
    ) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MetadataError::NotFound(path.to_path_buf()));
        }

        let sheet = match table::extension(path).as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_workbook(path, options)?,
            "tsv" | "txt" | "csv" => {
                let reader = BufReader::new(File::open(path)?);
                Self::from_delimited_reader(
                    reader,
                    table::delimiter_for(path),
                    &table::table_label(path),
                    options,
                )?
            }
            other => return Err(MetadataError::UnsupportedFormat(format!(".{other}"))),
        };

        info!(
            "Loaded {} sample sheet rows from {}",
            sheet.records.len(),
            path.display()
        );
        Ok(sheet)
    }

    fn from_workbook(path: &Path, options: &SheetOptions) -> Result<Self, MetadataError> {
        let mut workbook = open_workbook_auto(path)?;
        if !workbook
            .sheet_names()
            .iter()
            .any(|name| name == &options.sheet_name)
        {
            return Err(MetadataError::MissingSheet {
                path: path.to_path_buf(),
                sheet: options.sheet_name.clone(),
            });
        }
        let range = workbook.worksheet_range(&options.sheet_name)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
            None => Vec::new(),
        };
        let cells = rows.map(|row| row.iter().map(cell_value).collect::<Vec<_>>());

        let label = format!("{} [{}]", table::table_label(path), options.sheet_name);
        Self::from_rows(&label, &headers, cells, options)
    }

    /// Parse a delimited sample sheet from a reader
    pub fn from_delimited_reader<R: Read>(
        reader: R,
        delimiter: u8,
        table_label: &str,
        options: &SheetOptions,
    ) -> Result<Self, MetadataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(text_cell).collect::<Vec<_>>());
        }

        Self::from_rows(table_label, &headers, rows.into_iter(), options)
    }

    fn from_rows<I>(
        table_label: &str,
        headers: &[String],
        rows: I,
        options: &SheetOptions,
    ) -> Result<Self, MetadataError>
    where
        I: Iterator<Item = Vec<SampleValue>>,
    {
        let require = |column: &str| {
            table::column_index(headers, column).ok_or_else(|| MetadataError::MissingColumn {
                table: table_label.to_string(),
                column: column.to_string(),
            })
        };

        let sequence_idx = require(columns::SEQUENCE)?;
        let role_idx = require(columns::SAMPLE_TYPE)?;
        let description_idx = require(columns::DESCRIPTION)?;
        let replicate_idx = require(columns::REPLICATE_NUMBER)?;
        let name_idx = table::column_index(headers, &options.injection_name_column);

        if name_idx.is_none() {
            debug!(
                "{}: no '{}' column, injections will be bound by position",
                table_label, options.injection_name_column
            );
        }

        let mut records = Vec::new();
        for row in rows {
            if row.iter().all(SampleValue::is_empty) {
                continue;
            }
            let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
            let injection_order = records.len() + 1;

            records.push(SampleMetadataRecord {
                sequence: cell(sequence_idx).to_string(),
                role: SampleRole::parse(&cell(role_idx).to_string()),
                description: cell(description_idx).normalized(),
                injection_order,
                replicate_number: cell(replicate_idx).normalized(),
                injection_name: name_idx
                    .map(cell)
                    .filter(|v| !v.is_empty())
                    .map(|v| v.to_string()),
            });
        }

        Ok(Self::from_records(records))
    }

    /// Records belonging to one polarity, in sheet order
    pub fn for_polarity(&self, polarity: Polarity) -> Vec<&SampleMetadataRecord> {
        self.records
            .iter()
            .filter(|r| r.is_polarity(polarity))
            .collect()
    }
}

fn text_cell(value: &str) -> SampleValue {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        SampleValue::Empty
    } else {
        SampleValue::Text(trimmed.to_string())
    }
}

fn cell_value(cell: &Data) -> SampleValue {
    match cell {
        Data::Empty => SampleValue::Empty,
        Data::Int(i) => SampleValue::Number(*i as f64),
        Data::Float(f) => SampleValue::Number(*f),
        Data::String(s) => text_cell(s),
        Data::Error(_) => SampleValue::Empty,
        other => SampleValue::Text(other.to_string()),
    }
}
