use log::{debug, info};
use std::collections::{HashMap, HashSet};

use super::{AlignError, AlignedFeature, AreaMatrix, DescriptorTable, InjectionBinding, InjectionColumn};
use crate::features::{FeatureKey, RawFeatureRecord};
use crate::metadata::{RetainedRoles, SampleMetadataRecord};
use crate::polarity::Polarity;

/// Missing-area policy: an absent or NaN area means "not detected" and is
/// recorded as zero intensity. Infinite areas never reach this point; the
/// aligner rejects them with [`AlignError::InvalidArea`].
///
/// This conflates "not detected" with "detected at zero"; the downstream
/// statistics treat both the same way.
pub fn fill_not_detected(area: Option<f64>) -> f64 {
    match area {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Keep the first record of every (molecule name, precursor m/z) pair, in input order.
pub fn deduplicate_features<'a, I>(records: I) -> Vec<&'a RawFeatureRecord>
where
    I: IntoIterator<Item = &'a RawFeatureRecord>,
{
    let mut seen: HashSet<FeatureKey<'a>> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.key()))
        .collect()
}

/// Distinct injection names in order of first appearance.
pub fn distinct_injections<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a RawFeatureRecord>,
{
    let mut seen: HashSet<&'a str> = HashSet::new();
    records
        .into_iter()
        .map(|record| record.replicate_name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Result of aligning one polarity
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Feature descriptors, one row per alignment ID
    pub descriptors: DescriptorTable,
    /// Area matrix restricted to retained injections
    pub matrix: AreaMatrix,
    /// Injections dropped because their sample role is not retained
    pub excluded_injections: Vec<String>,
}

/// Aligns the features of one polarity against the sample sheet.
///
/// Each call is pure given its inputs, so both polarities can be aligned
/// independently (and concurrently).
#[derive(Debug, Clone, Default)]
pub struct FeatureAligner {
    roles: RetainedRoles,
    binding: InjectionBinding,
}

impl FeatureAligner {
    /// Create an aligner with the given retained roles and binding strategy
    pub fn new(roles: RetainedRoles, binding: InjectionBinding) -> Self {
        Self { roles, binding }
    }

    /// Align `polarity`, numbering features from `id_offset`.
    ///
    /// `features` may contain rows of either polarity; only rows whose charge
    /// sign matches are used. `metadata` is the full sample sheet.
    pub fn align(
        &self,
        features: &[RawFeatureRecord],
        metadata: &[SampleMetadataRecord],
        polarity: Polarity,
        id_offset: u64,
    ) -> Result<Alignment, AlignError> {
        let samples: Vec<&SampleMetadataRecord> =
            metadata.iter().filter(|m| m.is_polarity(polarity)).collect();

        let selected: Vec<&RawFeatureRecord> =
            features.iter().filter(|r| r.is_polarity(polarity)).collect();
        if selected.is_empty() {
            return Err(AlignError::EmptyPolarity(polarity));
        }
        if selected.len() < features.len() {
            debug!(
                "Ignoring {} rows without {} charge",
                features.len() - selected.len(),
                polarity
            );
        }

        let unique = deduplicate_features(selected.iter().copied());
        let injections = distinct_injections(selected.iter().copied());
        let bound = self.binding.bind(polarity, &injections, &samples)?;

        let descriptors = DescriptorTable {
            polarity,
            features: unique
                .iter()
                .zip(id_offset..)
                .map(|(record, alignment_id)| AlignedFeature {
                    alignment_id,
                    molecule_name: record.molecule_name.clone(),
                    cross_collisional_section: record.collisional_cross_section,
                    average_mz: record.precursor_mz,
                    polarity,
                })
                .collect(),
        };

        let cells = fill_cells(polarity, &selected, &unique, &injections)?;

        let n = unique.len();
        let m = injections.len();
        let (retained, excluded): (Vec<usize>, Vec<usize>) =
            (0..m).partition(|&j| self.roles.contains(&bound[j].role));

        let mut values = Vec::with_capacity(n * retained.len());
        for i in 0..n {
            for &j in &retained {
                values.push(fill_not_detected(cells[i * m + j]));
            }
        }

        let columns = retained
            .iter()
            .map(|&j| InjectionColumn {
                name: injections[j].to_string(),
                sample: bound[j].clone(),
            })
            .collect();
        let excluded_injections: Vec<String> =
            excluded.iter().map(|&j| injections[j].to_string()).collect();

        for name in &excluded_injections {
            debug!("Excluding {} injection '{}' (role not retained)", polarity, name);
        }
        info!(
            "Aligned {} {} features across {} injections ({} retained)",
            n,
            polarity,
            m,
            retained.len()
        );

        let matrix = AreaMatrix::new(polarity, descriptors.alignment_ids(), columns, values);
        Ok(Alignment {
            descriptors,
            matrix,
            excluded_injections,
        })
    }
}

/// Raw `n × m` cells, row-major. The first record of a (feature, injection)
/// pair wins; pairs without a record stay `None`.
fn fill_cells<'a>(
    polarity: Polarity,
    selected: &[&'a RawFeatureRecord],
    unique: &[&'a RawFeatureRecord],
    injections: &[&str],
) -> Result<Vec<Option<f64>>, AlignError> {
    let m = injections.len();
    let feature_index: HashMap<FeatureKey<'a>, usize> = unique
        .iter()
        .enumerate()
        .map(|(i, record)| (record.key(), i))
        .collect();
    let injection_index: HashMap<&str, usize> = injections
        .iter()
        .enumerate()
        .map(|(j, name)| (*name, j))
        .collect();

    let mut cells = vec![None; unique.len() * m];
    let mut filled = vec![false; unique.len() * m];

    for record in selected {
        if let Some(area) = record.area {
            if area < 0.0 || area.is_infinite() {
                return Err(AlignError::InvalidArea {
                    polarity,
                    molecule: record.molecule_name.clone(),
                    injection: record.replicate_name.clone(),
                    area,
                });
            }
        }

        let (Some(&i), Some(&j)) = (
            feature_index.get(&record.key()),
            injection_index.get(record.replicate_name.as_str()),
        ) else {
            continue;
        };
        let idx = i * m + j;
        if !filled[idx] {
            filled[idx] = true;
            cells[idx] = record.area;
        }
    }

    Ok(cells)
}
