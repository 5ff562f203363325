use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use super::MergeError;
use crate::align::{AlignedFeature, AreaMatrix, DescriptorTable, InjectionColumn};

/// Descriptor column headers, in output order
pub const DESCRIPTOR_HEADERS: [&str; 6] = [
    "Alignment ID",
    "Molecule Name",
    "Cross Collisional Section",
    "Average Mz",
    "Column",
    "Ion Mode",
];

/// Rendering of cells a feature has no matrix value for
/// (for example a positive feature in a negative injection column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedCell {
    /// Leave the cell empty
    #[default]
    Blank,
    /// Write zero
    Zero,
}

impl fmt::Display for UnmatchedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedCell::Blank => write!(f, "blank"),
            UnmatchedCell::Zero => write!(f, "zero"),
        }
    }
}

impl FromStr for UnmatchedCell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blank" | "empty" => Ok(UnmatchedCell::Blank),
            "zero" | "0" => Ok(UnmatchedCell::Zero),
            _ => Err(format!(
                "Unknown unmatched-cell mode '{}'. Valid options: blank, zero",
                s
            )),
        }
    }
}

/// One row of the combined table
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    /// Feature descriptors
    pub feature: AlignedFeature,
    /// Areas parallel to [`CombinedDataset::injection_columns`]; `None` is unmatched
    pub areas: Vec<Option<f64>>,
}

/// Both polarities in one aligned table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedDataset {
    /// Positive injection columns followed by negative ones
    pub injection_columns: Vec<InjectionColumn>,
    /// Rows ordered by alignment ID
    pub rows: Vec<CombinedRow>,
    /// Rows dropped as (average m/z, cross collisional section) duplicates
    pub duplicates_removed: usize,
}

impl CombinedDataset {
    /// Column headers: descriptors, then injection names
    pub fn headers(&self) -> Vec<String> {
        DESCRIPTOR_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.injection_columns.iter().map(|c| c.name.clone()))
            .collect()
    }

    /// Sample sheet injection order of each injection column
    pub fn injection_orders(&self) -> Vec<usize> {
        self.injection_columns
            .iter()
            .map(|c| c.sample.injection_order)
            .collect()
    }

    /// Alignment IDs in row order
    pub fn alignment_ids(&self) -> Vec<u64> {
        self.rows.iter().map(|r| r.feature.alignment_id).collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Stacks and joins the two polarity alignments
#[derive(Debug, Clone, Default)]
pub struct DatasetMerger {
    unmatched: UnmatchedCell,
}

impl DatasetMerger {
    /// Create a merger using the given unmatched-cell rendering
    pub fn new(unmatched: UnmatchedCell) -> Self {
        Self { unmatched }
    }

    /// Merge the positive and negative alignments
    pub fn merge(
        &self,
        pos_descriptor: &DescriptorTable,
        pos_matrix: &AreaMatrix,
        neg_descriptor: &DescriptorTable,
        neg_matrix: &AreaMatrix,
    ) -> Result<CombinedDataset, MergeError> {
        let injection_columns = join_columns(pos_matrix, neg_matrix)?;
        let width = injection_columns.len();

        let mut rows: Vec<CombinedRow> = Vec::with_capacity(pos_descriptor.len() + neg_descriptor.len());
        let mut row_by_id: HashMap<u64, usize> = HashMap::with_capacity(rows.capacity());
        for feature in pos_descriptor.features.iter().chain(&neg_descriptor.features) {
            if row_by_id.insert(feature.alignment_id, rows.len()).is_some() {
                return Err(MergeError::DuplicateAlignmentId(feature.alignment_id));
            }
            rows.push(CombinedRow {
                feature: feature.clone(),
                areas: vec![None; width],
            });
        }

        outer_join(&mut rows, &row_by_id, pos_matrix, 0)?;
        outer_join(&mut rows, &row_by_id, neg_matrix, pos_matrix.n_columns())?;

        if self.unmatched == UnmatchedCell::Zero {
            for row in &mut rows {
                for cell in &mut row.areas {
                    cell.get_or_insert(0.0);
                }
            }
        }

        rows.sort_by_key(|r| r.feature.alignment_id);

        let before = rows.len();
        let rows = drop_duplicate_features(rows);
        let duplicates_removed = before - rows.len();

        info!(
            "Merged {} features across {} injection columns ({} duplicates removed)",
            rows.len(),
            width,
            duplicates_removed
        );

        Ok(CombinedDataset {
            injection_columns,
            rows,
            duplicates_removed,
        })
    }
}

/// Positive columns then negative ones. An injection name used by both
/// polarities gets the ion mode appended (`QC_01_POS`, `QC_01_NEG`).
fn join_columns(
    pos_matrix: &AreaMatrix,
    neg_matrix: &AreaMatrix,
) -> Result<Vec<InjectionColumn>, MergeError> {
    for matrix in [pos_matrix, neg_matrix] {
        let mut names = HashSet::with_capacity(matrix.n_columns());
        for column in &matrix.columns {
            if !names.insert(column.name.as_str()) {
                return Err(MergeError::DuplicateInjectionColumn(column.name.clone()));
            }
        }
    }

    let pos_names: HashSet<&str> = pos_matrix.columns.iter().map(|c| c.name.as_str()).collect();
    let shared: HashSet<&str> = neg_matrix
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| pos_names.contains(name))
        .collect();

    let width = pos_matrix.n_columns() + neg_matrix.n_columns();
    let mut names = HashSet::with_capacity(width);
    let mut columns = Vec::with_capacity(width);
    for matrix in [pos_matrix, neg_matrix] {
        for column in &matrix.columns {
            let mut column = column.clone();
            if shared.contains(column.name.as_str()) {
                let renamed = format!("{}_{}", column.name, matrix.polarity.ion_mode());
                debug!("Injection '{}' is in both polarities, writing it as '{}'", column.name, renamed);
                column.name = renamed;
            }
            if !names.insert(column.name.clone()) {
                return Err(MergeError::DuplicateInjectionColumn(column.name));
            }
            columns.push(column);
        }
    }
    Ok(columns)
}

fn outer_join(
    rows: &mut [CombinedRow],
    row_by_id: &HashMap<u64, usize>,
    matrix: &AreaMatrix,
    column_offset: usize,
) -> Result<(), MergeError> {
    for (r, alignment_id) in matrix.alignment_ids.iter().enumerate() {
        let &row = row_by_id
            .get(alignment_id)
            .ok_or(MergeError::OrphanMatrixRow(*alignment_id))?;
        for (c, value) in matrix.row(r).iter().enumerate() {
            rows[row].areas[column_offset + c] = Some(*value);
        }
    }
    Ok(())
}

/// Keep the first row of every (average m/z, cross collisional section) pair.
/// Absent cross sections compare equal to each other.
fn drop_duplicate_features(rows: Vec<CombinedRow>) -> Vec<CombinedRow> {
    let mut seen: HashSet<(u64, Option<u64>)> = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| {
            let ccs = row
                .feature
                .cross_collisional_section
                .filter(|c| !c.is_nan())
                .map(f64::to_bits);
            let keep = seen.insert((row.feature.average_mz.to_bits(), ccs));
            if !keep {
                debug!(
                    "Dropping duplicate feature {} '{}' ({})",
                    row.feature.alignment_id,
                    row.feature.molecule_name,
                    row.feature.ion_mode()
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::FeatureAligner;
    use crate::features::RawFeatureRecord;
    use crate::metadata::{SampleMetadataRecord, SampleRole};
    use crate::polarity::Polarity;

    fn record(name: &str, mz: f64, ccs: f64, charge: i32, injection: &str, area: f64) -> RawFeatureRecord {
        RawFeatureRecord::new(name, mz, charge, injection)
            .with_ccs(ccs)
            .with_area(area)
    }

    fn metadata() -> Vec<SampleMetadataRecord> {
        vec![
            SampleMetadataRecord::new("Positive", SampleRole::Qc, 1),
            SampleMetadataRecord::new("Positive", SampleRole::Sample, 2),
            SampleMetadataRecord::new("Negative", SampleRole::Qc, 3),
        ]
    }

    fn merge(features: &[RawFeatureRecord], merger: &DatasetMerger) -> CombinedDataset {
        let aligner = FeatureAligner::default();
        let meta = metadata();
        let pos = aligner.align(features, &meta, Polarity::Positive, 0).unwrap();
        let offset = pos.descriptors.next_id().unwrap_or(0);
        let neg = aligner.align(features, &meta, Polarity::Negative, offset).unwrap();
        merger
            .merge(&pos.descriptors, &pos.matrix, &neg.descriptors, &neg.matrix)
            .unwrap()
    }

    fn sample_features() -> Vec<RawFeatureRecord> {
        vec![
            record("Alanine", 90.055, 130.1, 1, "P_QC", 10.0),
            record("Alanine", 90.055, 130.1, 1, "P_S", 11.0),
            record("Valine", 118.086, 140.2, 1, "P_QC", 20.0),
            record("Citrate", 191.019, 150.3, -1, "N_QC", 30.0),
        ]
    }

    #[test]
    fn test_merge_stacks_and_joins() {
        let combined = merge(&sample_features(), &DatasetMerger::default());

        assert_eq!(combined.alignment_ids(), vec![0, 1, 2]);
        assert_eq!(
            combined.headers(),
            vec![
                "Alignment ID",
                "Molecule Name",
                "Cross Collisional Section",
                "Average Mz",
                "Column",
                "Ion Mode",
                "P_QC",
                "P_S",
                "N_QC"
            ]
        );
        assert_eq!(combined.rows[0].areas, vec![Some(10.0), Some(11.0), None]);
        assert_eq!(combined.rows[1].areas, vec![Some(20.0), Some(0.0), None]);
        assert_eq!(combined.rows[2].areas, vec![None, None, Some(30.0)]);
        assert_eq!(combined.rows[2].feature.ion_mode(), "NEG");
        assert_eq!(combined.injection_orders(), vec![1, 2, 3]);
        assert_eq!(combined.duplicates_removed, 0);
    }

    #[test]
    fn test_unmatched_zero() {
        let combined = merge(&sample_features(), &DatasetMerger::new(UnmatchedCell::Zero));
        assert_eq!(combined.rows[0].areas, vec![Some(10.0), Some(11.0), Some(0.0)]);
        assert_eq!(combined.rows[2].areas, vec![Some(0.0), Some(0.0), Some(30.0)]);
    }

    #[test]
    fn test_cross_polarity_duplicates_collapse() {
        let mut features = sample_features();
        // Same m/z and cross section recorded under negative charge.
        features.push(record("Alanine (neg)", 90.055, 130.1, -1, "N_QC", 5.0));

        let combined = merge(&features, &DatasetMerger::default());

        assert_eq!(combined.len(), 3);
        assert_eq!(combined.duplicates_removed, 1);
        assert_eq!(combined.alignment_ids(), vec![0, 1, 2]);
        assert_eq!(combined.rows[0].feature.molecule_name, "Alanine");
        assert_eq!(combined.rows[0].feature.ion_mode(), "POS");
    }

    #[test]
    fn test_missing_ccs_compare_equal() {
        let features = vec![
            RawFeatureRecord::new("A", 100.0, 1, "P_QC").with_area(1.0),
            RawFeatureRecord::new("A2", 100.0, 1, "P_QC").with_area(2.0),
            RawFeatureRecord::new("B", 100.0, -1, "N_QC").with_area(3.0),
        ];
        let metadata = vec![
            SampleMetadataRecord::new("Positive", SampleRole::Qc, 1),
            SampleMetadataRecord::new("Negative", SampleRole::Qc, 2),
        ];
        let aligner = FeatureAligner::default();
        let pos = aligner.align(&features, &metadata, Polarity::Positive, 0).unwrap();
        let neg = aligner.align(&features, &metadata, Polarity::Negative, 2).unwrap();
        let combined = DatasetMerger::default()
            .merge(&pos.descriptors, &pos.matrix, &neg.descriptors, &neg.matrix)
            .unwrap();

        assert_eq!(combined.len(), 1);
        assert_eq!(combined.duplicates_removed, 2);
    }

    #[test]
    fn test_shared_injection_name_gets_ion_mode_suffix() {
        let features = vec![
            record("A", 100.0, 1.0, 1, "QC", 1.0),
            record("B", 200.0, 2.0, -1, "QC", 2.0),
            record("B", 200.0, 2.0, -1, "N_S", 3.0),
        ];
        let metadata = vec![
            SampleMetadataRecord::new("Positive", SampleRole::Qc, 1),
            SampleMetadataRecord::new("Negative", SampleRole::Qc, 2),
            SampleMetadataRecord::new("Negative", SampleRole::Sample, 3),
        ];
        let aligner = FeatureAligner::default();
        let pos = aligner.align(&features, &metadata, Polarity::Positive, 0).unwrap();
        let neg = aligner.align(&features, &metadata, Polarity::Negative, 1).unwrap();
        let combined = DatasetMerger::default()
            .merge(&pos.descriptors, &pos.matrix, &neg.descriptors, &neg.matrix)
            .unwrap();

        assert_eq!(combined.headers()[6..].to_vec(), vec!["QC_POS", "QC_NEG", "N_S"]);
        assert_eq!(combined.rows[0].areas, vec![Some(1.0), None, None]);
        assert_eq!(combined.rows[1].areas, vec![None, Some(2.0), Some(3.0)]);
        assert_eq!(combined.injection_orders(), vec![1, 2, 3]);
    }

    #[test]
    fn test_duplicate_column_within_polarity() {
        let features = sample_features();
        let meta = metadata();
        let aligner = FeatureAligner::default();
        let pos = aligner.align(&features, &meta, Polarity::Positive, 0).unwrap();
        let neg = aligner.align(&features, &meta, Polarity::Negative, 2).unwrap();

        let column = neg.matrix.columns[0].clone();
        let doubled = AreaMatrix::new(
            Polarity::Negative,
            neg.matrix.alignment_ids.clone(),
            vec![column.clone(), column],
            vec![30.0, 30.0],
        );
        let err = DatasetMerger::default()
            .merge(&pos.descriptors, &pos.matrix, &neg.descriptors, &doubled)
            .unwrap_err();
        assert!(matches!(err, MergeError::DuplicateInjectionColumn(name) if name == "N_QC"));
    }

    #[test]
    fn test_overlapping_ids_rejected() {
        let features = sample_features();
        let meta = metadata();
        let aligner = FeatureAligner::default();
        let pos = aligner.align(&features, &meta, Polarity::Positive, 0).unwrap();
        // Negative block numbered from zero instead of after the positive block.
        let neg = aligner.align(&features, &meta, Polarity::Negative, 0).unwrap();
        let err = DatasetMerger::default()
            .merge(&pos.descriptors, &pos.matrix, &neg.descriptors, &neg.matrix)
            .unwrap_err();
        assert!(matches!(err, MergeError::DuplicateAlignmentId(0)));
    }

    #[test]
    fn test_orphan_matrix_row() {
        let features = sample_features();
        let meta = metadata();
        let aligner = FeatureAligner::default();
        let pos = aligner.align(&features, &meta, Polarity::Positive, 0).unwrap();
        let neg = aligner.align(&features, &meta, Polarity::Negative, 2).unwrap();
        let truncated = DescriptorTable {
            polarity: Polarity::Positive,
            features: pos.descriptors.features[..1].to_vec(),
        };
        let err = DatasetMerger::default()
            .merge(&truncated, &pos.matrix, &neg.descriptors, &neg.matrix)
            .unwrap_err();
        assert!(matches!(err, MergeError::OrphanMatrixRow(1)));
    }
}
