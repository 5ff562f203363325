//! Property-based tests for alignment and merging
//!
//! This suite validates, over generated exports:
//! - Alignment IDs are contiguous per polarity and unique after merging
//! - Feature deduplication is idempotent
//! - No negative or NaN area survives alignment
//! - Retained columns are exactly those whose sample role is retained

use proptest::prelude::*;

use mzalign::align::{deduplicate_features, FeatureAligner, InjectionBinding};
use mzalign::features::RawFeatureRecord;
use mzalign::merge::DatasetMerger;
use mzalign::metadata::{RetainedRoles, SampleMetadataRecord, SampleRole};
use mzalign::polarity::Polarity;

// ============================================================================
// Strategies
// ============================================================================

fn role() -> impl Strategy<Value = SampleRole> {
    prop_oneof![
        Just(SampleRole::Qc),
        Just(SampleRole::Sample),
        Just(SampleRole::Blank),
        Just(SampleRole::Other("EXCLUDED".to_string())),
    ]
}

/// Feature rows for one polarity over `injections` named `{prefix}{j}`.
///
/// Names and m/z values come from small pools so duplicates are common.
fn export(
    prefix: &'static str,
    charge: i32,
    injections: usize,
) -> impl Strategy<Value = Vec<RawFeatureRecord>> {
    let row = (
        0..6usize,
        0..4usize,
        0..injections,
        prop::option::of(prop_oneof![0.0..1e6f64, Just(f64::NAN)]),
        prop::option::of(100.0..200.0f64),
    );
    prop::collection::vec(row, 1..40).prop_map(move |rows| {
        let mut records: Vec<RawFeatureRecord> = rows
            .into_iter()
            .map(|(name, mz, injection, area, ccs)| {
                let mut record = RawFeatureRecord::new(
                    &format!("M{name}"),
                    100.0 + mz as f64 * 0.5,
                    charge,
                    &format!("{prefix}{injection}"),
                );
                record.area = area;
                record.collisional_cross_section = ccs;
                record
            })
            .collect();
        // Every injection appears at least once
        for j in 0..injections {
            records.push(RawFeatureRecord::new("M0", 100.0, charge, &format!("{prefix}{j}")));
        }
        records
    })
}

fn sheet(prefix: &str, sequence: &str, roles: &[SampleRole], first_order: usize) -> Vec<SampleMetadataRecord> {
    roles
        .iter()
        .enumerate()
        .map(|(j, role)| {
            SampleMetadataRecord::new(sequence, role.clone(), first_order + j)
                .with_injection_name(&format!("{prefix}{j}"))
        })
        .collect()
}

fn scenario() -> impl Strategy<Value = (Vec<RawFeatureRecord>, Vec<RawFeatureRecord>, Vec<SampleMetadataRecord>)> {
    (1..6usize, 1..6usize)
        .prop_flat_map(|(n_pos, n_neg)| {
            (
                export("P", 1, n_pos),
                export("N", -1, n_neg),
                prop::collection::vec(role(), n_pos),
                prop::collection::vec(role(), n_neg),
            )
        })
        .prop_map(|(pos, neg, pos_roles, neg_roles)| {
            let mut metadata = sheet("P", "Positive", &pos_roles, 1);
            metadata.extend(sheet("N", "Negative", &neg_roles, pos_roles.len() + 1));
            (pos, neg, metadata)
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Positive IDs are 0..n_pos, negative IDs continue at n_pos, merged IDs are unique
    #[test]
    fn test_alignment_ids_contiguous((pos, neg, metadata) in scenario()) {
        let aligner = FeatureAligner::default();
        let p = aligner.align(&pos, &metadata, Polarity::Positive, 0).unwrap();
        let n_pos = p.descriptors.len() as u64;
        let n = aligner.align(&neg, &metadata, Polarity::Negative, n_pos).unwrap();

        prop_assert_eq!(p.descriptors.alignment_ids(), (0..n_pos).collect::<Vec<_>>());
        let n_neg = n.descriptors.len() as u64;
        prop_assert_eq!(n.descriptors.alignment_ids(), (n_pos..n_pos + n_neg).collect::<Vec<_>>());

        let combined = DatasetMerger::default()
            .merge(&p.descriptors, &p.matrix, &n.descriptors, &n.matrix)
            .unwrap();
        let ids = combined.alignment_ids();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(ids.len() + combined.duplicates_removed, (n_pos + n_neg) as usize);
    }

    /// Deduplicating twice equals deduplicating once
    #[test]
    fn test_deduplication_idempotent(records in export("P", 1, 3)) {
        let once: Vec<RawFeatureRecord> = deduplicate_features(&records).into_iter().cloned().collect();
        let twice: Vec<RawFeatureRecord> = deduplicate_features(&once).into_iter().cloned().collect();
        prop_assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            prop_assert_eq!(&a.molecule_name, &b.molecule_name);
            prop_assert_eq!(a.precursor_mz.to_bits(), b.precursor_mz.to_bits());
        }
    }

    /// Every matrix cell is finite and non-negative
    #[test]
    fn test_areas_non_negative((pos, neg, metadata) in scenario()) {
        let aligner = FeatureAligner::new(RetainedRoles::default(), InjectionBinding::ByName);
        for (polarity, features) in [(Polarity::Positive, &pos), (Polarity::Negative, &neg)] {
            let alignment = aligner.align(features, &metadata, polarity, 0).unwrap();
            prop_assert!(alignment.matrix.values().iter().all(|v| v.is_finite() && *v >= 0.0));
            prop_assert_eq!(
                alignment.matrix.values().len(),
                alignment.matrix.n_rows() * alignment.matrix.n_columns()
            );
        }
    }

    /// Retained columns are exactly the injections bound to a retained role
    #[test]
    fn test_retained_columns_match_roles((pos, _neg, metadata) in scenario()) {
        let roles = RetainedRoles::qc_and_sample();
        let aligner = FeatureAligner::new(roles.clone(), InjectionBinding::Auto);
        let alignment = aligner.align(&pos, &metadata, Polarity::Positive, 0).unwrap();

        for column in &alignment.matrix.columns {
            prop_assert!(roles.contains(&column.sample.role));
        }
        let expected = metadata
            .iter()
            .filter(|m| m.is_polarity(Polarity::Positive) && roles.contains(&m.role))
            .count();
        prop_assert_eq!(alignment.matrix.n_columns(), expected);
        prop_assert_eq!(
            alignment.matrix.n_columns() + alignment.excluded_injections.len(),
            metadata.iter().filter(|m| m.is_polarity(Polarity::Positive)).count()
        );
    }
}
