use crate::polarity::Polarity;

/// One row of an instrument feature export
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeatureRecord {
    /// Molecule name
    pub molecule_name: String,

    /// Precursor m/z
    pub precursor_mz: f64,

    /// Signed precursor charge
    pub precursor_charge: i32,

    /// Collisional cross section (Å²), if reported
    pub collisional_cross_section: Option<f64>,

    /// Replicate (injection) name
    pub replicate_name: String,

    /// Measured area; `None` or NaN means not detected
    pub area: Option<f64>,
}

impl RawFeatureRecord {
    /// Create a record for `molecule_name` at `precursor_mz` in injection `replicate_name`
    pub fn new(
        molecule_name: &str,
        precursor_mz: f64,
        precursor_charge: i32,
        replicate_name: &str,
    ) -> Self {
        Self {
            molecule_name: molecule_name.to_string(),
            precursor_mz,
            precursor_charge,
            collisional_cross_section: None,
            replicate_name: replicate_name.to_string(),
            area: None,
        }
    }

    /// Set the collisional cross section
    pub fn with_ccs(mut self, ccs: f64) -> Self {
        self.collisional_cross_section = Some(ccs);
        self
    }

    /// Set the measured area
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    /// Identity of the feature this record measures
    pub fn key(&self) -> FeatureKey<'_> {
        FeatureKey {
            molecule_name: &self.molecule_name,
            precursor_mz_bits: self.precursor_mz.to_bits(),
        }
    }

    /// Whether the record was acquired in the given polarity
    pub fn is_polarity(&self, polarity: Polarity) -> bool {
        polarity.matches_charge(self.precursor_charge)
    }
}

/// Feature identity within one polarity: (molecule name, precursor m/z).
///
/// m/z values compare by bit pattern, so only identical exported values match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureKey<'a> {
    molecule_name: &'a str,
    precursor_mz_bits: u64,
}
