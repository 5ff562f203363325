use crate::metadata::SampleMetadataRecord;
use crate::polarity::Polarity;

/// Value of the fixed `Column` descriptor (ion-mobility separation).
pub const COLUMN_LABEL: &str = "IM";

/// A deduplicated feature with its alignment identifier
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFeature {
    /// Alignment ID, unique across both polarities
    pub alignment_id: u64,
    /// Molecule name
    pub molecule_name: String,
    /// Collisional cross section of the first occurrence
    pub cross_collisional_section: Option<f64>,
    /// Precursor m/z of the feature
    pub average_mz: f64,
    /// Polarity the feature was detected in
    pub polarity: Polarity,
}

impl AlignedFeature {
    /// `Column` descriptor
    pub fn column(&self) -> &'static str {
        COLUMN_LABEL
    }

    /// `Ion Mode` descriptor
    pub fn ion_mode(&self) -> &'static str {
        self.polarity.ion_mode()
    }
}

/// Feature descriptors of one polarity, in alignment ID order
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorTable {
    /// Polarity the table describes
    pub polarity: Polarity,
    /// One row per feature
    pub features: Vec<AlignedFeature>,
}

impl DescriptorTable {
    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the table has no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Alignment IDs in row order
    pub fn alignment_ids(&self) -> Vec<u64> {
        self.features.iter().map(|f| f.alignment_id).collect()
    }

    /// First ID after this table, the offset for the next polarity
    pub fn next_id(&self) -> Option<u64> {
        self.features.last().map(|f| f.alignment_id + 1)
    }
}

/// A retained injection column and the sample sheet row bound to it
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionColumn {
    /// Injection name from the export
    pub name: String,
    /// Sample sheet row describing the injection
    pub sample: SampleMetadataRecord,
}

/// Feature-by-injection area matrix of one polarity.
///
/// Rows are keyed by alignment ID, columns are the retained injections in
/// export order. Cells are finite and non-negative; features not detected in
/// an injection hold `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaMatrix {
    /// Polarity the matrix covers
    pub polarity: Polarity,
    /// Row keys
    pub alignment_ids: Vec<u64>,
    /// Retained injection columns
    pub columns: Vec<InjectionColumn>,
    /// Row-major values, `alignment_ids.len() * columns.len()`
    values: Vec<f64>,
}

impl AreaMatrix {
    pub(crate) fn new(
        polarity: Polarity,
        alignment_ids: Vec<u64>,
        columns: Vec<InjectionColumn>,
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(values.len(), alignment_ids.len() * columns.len());
        Self {
            polarity,
            alignment_ids,
            columns,
            values,
        }
    }

    /// Number of feature rows
    pub fn n_rows(&self) -> usize {
        self.alignment_ids.len()
    }

    /// Number of retained injection columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Areas of row `row`, in column order
    pub fn row(&self, row: usize) -> &[f64] {
        let width = self.columns.len();
        &self.values[row * width..(row + 1) * width]
    }

    /// Area of feature `alignment_id` in the injection named `injection`
    pub fn get(&self, alignment_id: u64, injection: &str) -> Option<f64> {
        let row = self.alignment_ids.iter().position(|id| *id == alignment_id)?;
        let col = self.columns.iter().position(|c| c.name == injection)?;
        Some(self.values[row * self.columns.len() + col])
    }

    /// Injection names in column order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// All cells, row-major
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
