use log::{debug, info};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::{HeaderStyle, LayoutConfig, OutputError};
use crate::merge::CombinedDataset;
use crate::metadata::{MetadataBlock, SampleValue, BLOCK_ROW_LABELS};

/// Excel worksheet limits
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Writes the metadata block and the combined dataset to one worksheet
#[derive(Debug, Clone, Default)]
pub struct WorkbookWriter {
    layout: LayoutConfig,
}

impl WorkbookWriter {
    /// Create a writer with the given layout
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Write the workbook to `path`.
    ///
    /// The workbook is assembled in memory and saved to a temporary file next
    /// to `path`, which then replaces the target. A failed write leaves no
    /// file at `path`.
    pub fn write<P: AsRef<Path>>(
        &self,
        path: P,
        block: &MetadataBlock,
        dataset: &CombinedDataset,
    ) -> Result<(), OutputError> {
        let path = path.as_ref();
        let buffer = self.to_buffer(block, dataset)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".mzalign-")
            .suffix(".xlsx")
            .tempfile_in(dir)?;
        tmp.write_all(&buffer)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| OutputError::IoError(e.error))?;

        info!(
            "Wrote {} rows x {} injection columns to {} ({} bytes)",
            dataset.len(),
            dataset.injection_columns.len(),
            path.display(),
            buffer.len()
        );
        Ok(())
    }

    /// Assemble the workbook and return the `.xlsx` bytes
    pub fn to_buffer(
        &self,
        block: &MetadataBlock,
        dataset: &CombinedDataset,
    ) -> Result<Vec<u8>, OutputError> {
        self.check_overlap(block, dataset)?;

        let mut workbook = Workbook::new();
        let header_format = match self.layout.header_style {
            HeaderStyle::Plain => None,
            HeaderStyle::Bold => Some(Format::new().set_bold()),
        };

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.layout.sheet_name)?;
        self.write_block(worksheet, block, header_format.as_ref())?;
        self.write_dataset(worksheet, dataset, header_format.as_ref())?;

        Ok(workbook.save_to_buffer()?)
    }

    fn write_block(
        &self,
        worksheet: &mut Worksheet,
        block: &MetadataBlock,
        header_format: Option<&Format>,
    ) -> Result<(), OutputError> {
        let row0 = self.layout.block_start_row as usize;
        let col0 = self.layout.block_start_col as usize;

        for (r, label) in BLOCK_ROW_LABELS.iter().enumerate() {
            let (row, col) = cell(row0 + r, col0)?;
            write_text(worksheet, row, col, label, header_format)?;

            for (c, value) in block.row(r).iter().enumerate() {
                let (row, col) = cell(row0 + r, col0 + 1 + c)?;
                match value {
                    SampleValue::Empty => {}
                    SampleValue::Number(n) => {
                        worksheet.write_number(row, col, *n)?;
                    }
                    SampleValue::Text(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                }
            }
        }

        debug!("Metadata block: {} injection columns", block.width());
        Ok(())
    }

    fn write_dataset(
        &self,
        worksheet: &mut Worksheet,
        dataset: &CombinedDataset,
        header_format: Option<&Format>,
    ) -> Result<(), OutputError> {
        let row0 = self.layout.table_start_row as usize;
        let col0 = self.layout.table_start_col as usize;

        for (c, header) in dataset.headers().iter().enumerate() {
            let (row, col) = cell(row0, col0 + c)?;
            write_text(worksheet, row, col, header, header_format)?;
        }

        for (i, combined) in dataset.rows.iter().enumerate() {
            let r = row0 + 1 + i;
            let feature = &combined.feature;

            let (row, col) = cell(r, col0)?;
            worksheet.write_number(row, col, feature.alignment_id as f64)?;
            worksheet.write_string(row, col + 1, &feature.molecule_name)?;
            if let Some(ccs) = feature.cross_collisional_section.filter(|c| c.is_finite()) {
                worksheet.write_number(row, col + 2, ccs)?;
            }
            worksheet.write_number(row, col + 3, feature.average_mz)?;
            worksheet.write_string(row, col + 4, feature.column())?;
            worksheet.write_string(row, col + 5, feature.ion_mode())?;

            for (a, area) in combined.areas.iter().enumerate() {
                if let Some(value) = area {
                    let (row, col) = cell(r, col0 + 6 + a)?;
                    worksheet.write_number(row, col, *value)?;
                }
            }
        }

        Ok(())
    }

    fn check_overlap(
        &self,
        block: &MetadataBlock,
        dataset: &CombinedDataset,
    ) -> Result<(), OutputError> {
        let block_rows = self.layout.block_start_row as usize
            ..self.layout.block_start_row as usize + BLOCK_ROW_LABELS.len();
        let block_cols = self.layout.block_start_col as usize
            ..self.layout.block_start_col as usize + 1 + block.width();
        let table_rows = self.layout.table_start_row as usize
            ..self.layout.table_start_row as usize + 1 + dataset.len();
        let table_cols = self.layout.table_start_col as usize
            ..self.layout.table_start_col as usize + dataset.headers().len();

        let rows_overlap = block_rows.start < table_rows.end && table_rows.start < block_rows.end;
        let cols_overlap = block_cols.start < table_cols.end && table_cols.start < block_cols.end;
        if rows_overlap && cols_overlap {
            return Err(OutputError::Overlap(format!(
                "block rows {:?}, columns {:?}; dataset rows {:?}, columns {:?}",
                block_rows, block_cols, table_rows, table_cols
            )));
        }
        Ok(())
    }
}

fn cell(row: usize, col: usize) -> Result<(u32, u16), OutputError> {
    if row >= MAX_ROWS || col >= MAX_COLS {
        return Err(OutputError::OutOfBounds { row, col });
    }
    Ok((row as u32, col as u16))
}

fn write_text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    format: Option<&Format>,
) -> Result<(), OutputError> {
    match format {
        Some(format) => {
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        None => {
            worksheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}
