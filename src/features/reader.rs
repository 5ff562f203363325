use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{FeatureError, RawFeatureRecord};
use crate::table;

/// Column headers of a feature export
pub mod columns {
    /// Molecule name
    pub const MOLECULE_NAME: &str = "Molecule Name";
    /// Precursor m/z
    pub const PRECURSOR_MZ: &str = "Precursor Mz";
    /// Precursor charge
    pub const PRECURSOR_CHARGE: &str = "Precursor Charge";
    /// Collisional cross section
    pub const COLLISIONAL_CROSS_SECTION: &str = "Collisional Cross Section";
    /// Replicate (injection) name
    pub const REPLICATE_NAME: &str = "Replicate Name";
    /// Peak area
    pub const AREA: &str = "Area";
}

/// A parsed feature export: all rows of one delimited table
#[derive(Debug, Clone, Default)]
pub struct FeatureExport {
    /// Label of the source table, used in messages
    pub table: String,

    /// Rows in file order
    pub records: Vec<RawFeatureRecord>,
}

struct ColumnMap {
    molecule_name: usize,
    precursor_mz: usize,
    precursor_charge: usize,
    ccs: usize,
    replicate_name: usize,
    area: usize,
}

impl FeatureExport {
    /// Read an export from disk.
    ///
    /// The delimiter defaults to comma for `.csv` files and tab otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: Option<u8>) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FeatureError::NotFound(path.to_path_buf()));
        }

        let delimiter = delimiter.unwrap_or_else(|| table::delimiter_for(path));
        let reader = BufReader::new(File::open(path)?);
        let export = Self::from_reader(reader, delimiter, &table::table_label(path))?;

        info!(
            "Loaded {} feature rows from {}",
            export.records.len(),
            path.display()
        );
        Ok(export)
    }

    /// Parse an export from any reader
    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: u8,
        table_label: &str,
    ) -> Result<Self, FeatureError> {
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
        let map = ColumnMap::resolve(&headers, table_label)?;

        let mut records = Vec::new();
        for (i, row) in csv_reader.records().enumerate() {
            let row = row?;
            let line = i + 1;
            let field = |idx: usize| row.get(idx).unwrap_or("").trim();

            if row.iter().all(|f| f.trim().is_empty()) {
                debug!("{}: skipping empty row {}", table_label, line);
                continue;
            }

            let invalid = |column: &str, value: &str| FeatureError::InvalidValue {
                table: table_label.to_string(),
                row: line,
                column: column.to_string(),
                value: value.to_string(),
            };

            let mz_raw = field(map.precursor_mz);
            let precursor_mz = mz_raw
                .parse::<f64>()
                .ok()
                .filter(|mz| mz.is_finite())
                .ok_or_else(|| invalid(columns::PRECURSOR_MZ, mz_raw))?;

            let charge_raw = field(map.precursor_charge);
            let precursor_charge =
                parse_charge(charge_raw).ok_or_else(|| invalid(columns::PRECURSOR_CHARGE, charge_raw))?;

            let ccs_raw = field(map.ccs);
            let collisional_cross_section = parse_optional(ccs_raw)
                .map_err(|_| invalid(columns::COLLISIONAL_CROSS_SECTION, ccs_raw))?;

            let area_raw = field(map.area);
            let area =
                parse_optional(area_raw).map_err(|_| invalid(columns::AREA, area_raw))?;

            records.push(RawFeatureRecord {
                molecule_name: field(map.molecule_name).to_string(),
                precursor_mz,
                precursor_charge,
                collisional_cross_section,
                replicate_name: field(map.replicate_name).to_string(),
                area,
            });
        }

        Ok(Self {
            table: table_label.to_string(),
            records,
        })
    }
}

impl ColumnMap {
    fn resolve(headers: &[String], table_label: &str) -> Result<Self, FeatureError> {
        let require = |column: &str| {
            table::column_index(headers, column).ok_or_else(|| FeatureError::MissingColumn {
                table: table_label.to_string(),
                column: column.to_string(),
            })
        };

        Ok(Self {
            molecule_name: require(columns::MOLECULE_NAME)?,
            precursor_mz: require(columns::PRECURSOR_MZ)?,
            precursor_charge: require(columns::PRECURSOR_CHARGE)?,
            ccs: require(columns::COLLISIONAL_CROSS_SECTION)?,
            replicate_name: require(columns::REPLICATE_NAME)?,
            area: require(columns::AREA)?,
        })
    }
}

/// Charges may be exported as `1`, `-1`, `+1` or `1.0`.
fn parse_charge(value: &str) -> Option<i32> {
    let value = value.trim_start_matches('+');
    if let Ok(charge) = value.parse::<i32>() {
        return Some(charge);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|c| c.fract() == 0.0 && c.abs() <= i32::MAX as f64)
        .map(|c| c as i32)
}

/// Missing tokens, `NaN` included, map to `None`.
fn parse_optional(value: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    if table::is_missing(value) {
        return Ok(None);
    }
    value.parse::<f64>().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "Molecule Name\tPrecursor Mz\tPrecursor Charge\tCollisional Cross Section\tReplicate Name\tArea\tRetention Time
Glucose\t203.0526\t1\t145.2\tQC_01\t1500.5\t3.2
Glucose\t203.0526\t1\t145.2\tS_01\t#N/A\t3.2
Citrate\t191.0197\t-1\t\tQC_01\t800\t2.1";

    #[test]
    fn test_parse_export() {
        let export = FeatureExport::from_reader(EXPORT.as_bytes(), b'\t', "pos.tsv").unwrap();

        assert_eq!(export.table, "pos.tsv");
        assert_eq!(export.records.len(), 3);

        let first = &export.records[0];
        assert_eq!(first.molecule_name, "Glucose");
        assert_eq!(first.precursor_mz, 203.0526);
        assert_eq!(first.precursor_charge, 1);
        assert_eq!(first.collisional_cross_section, Some(145.2));
        assert_eq!(first.replicate_name, "QC_01");
        assert_eq!(first.area, Some(1500.5));

        assert_eq!(export.records[1].area, None);
        assert_eq!(export.records[2].precursor_charge, -1);
        assert_eq!(export.records[2].collisional_cross_section, None);
    }

    #[test]
    fn test_missing_column() {
        let content = "Molecule Name\tPrecursor Mz\tPrecursor Charge\tReplicate Name\tArea\nA\t1\t1\tQC\t1";
        let err = FeatureExport::from_reader(content.as_bytes(), b'\t', "neg.tsv").unwrap_err();
        match err {
            FeatureError::MissingColumn { table, column } => {
                assert_eq!(table, "neg.tsv");
                assert_eq!(column, "Collisional Cross Section");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_mz() {
        let content = "Molecule Name\tPrecursor Mz\tPrecursor Charge\tCollisional Cross Section\tReplicate Name\tArea
A\tabc\t1\t\tQC\t1";
        let err = FeatureExport::from_reader(content.as_bytes(), b'\t', "pos.tsv").unwrap_err();
        match err {
            FeatureError::InvalidValue { row, column, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Precursor Mz");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_comma_delimited() {
        let content = "Molecule Name,Precursor Mz,Precursor Charge,Collisional Cross Section,Replicate Name,Area
A,100.5,+1,120,QC,NaN";
        let export = FeatureExport::from_reader(content.as_bytes(), b',', "pos.csv").unwrap();
        assert_eq!(export.records[0].precursor_charge, 1);
        assert_eq!(export.records[0].area, None);
    }

    #[test]
    fn test_parse_charge() {
        assert_eq!(parse_charge("1"), Some(1));
        assert_eq!(parse_charge("+1"), Some(1));
        assert_eq!(parse_charge("-1"), Some(-1));
        assert_eq!(parse_charge("2.0"), Some(2));
        assert_eq!(parse_charge("1.5"), None);
        assert_eq!(parse_charge(""), None);
    }
}
