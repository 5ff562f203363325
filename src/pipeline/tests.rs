use std::fs;
use tempfile::tempdir;

use super::*;
use crate::metadata::{SampleRole, SampleValue};

fn sheet() -> Vec<SampleMetadataRecord> {
    vec![
        SampleMetadataRecord::new("Positive", SampleRole::Qc, 1)
            .with_injection_name("P_QC")
            .with_description(SampleValue::Text("pool".into())),
        SampleMetadataRecord::new("Positive", SampleRole::Sample, 2)
            .with_injection_name("P_S1")
            .with_description(SampleValue::Text("case".into())),
        SampleMetadataRecord::new("Positive", SampleRole::Other("EXCLUDED".into()), 3)
            .with_injection_name("P_X"),
        SampleMetadataRecord::new("Negative", SampleRole::Qc, 4)
            .with_injection_name("N_QC")
            .with_description(SampleValue::Text("pool".into())),
        SampleMetadataRecord::new("Negative", SampleRole::Sample, 5)
            .with_injection_name("N_S1")
            .with_description(SampleValue::Text("case".into())),
    ]
}

fn positive() -> Vec<RawFeatureRecord> {
    vec![
        RawFeatureRecord::new("Alanine", 90.055, 1, "P_QC").with_ccs(130.1).with_area(10.0),
        RawFeatureRecord::new("Alanine", 90.055, 1, "P_S1").with_ccs(130.1).with_area(12.0),
        RawFeatureRecord::new("Alanine", 90.055, 1, "P_X").with_ccs(130.1).with_area(99.0),
        RawFeatureRecord::new("Serine", 106.050, 1, "P_QC").with_ccs(135.0).with_area(5.0),
    ]
}

fn negative() -> Vec<RawFeatureRecord> {
    vec![
        RawFeatureRecord::new("Citrate", 191.019, -1, "N_QC").with_ccs(140.2).with_area(7.0),
        RawFeatureRecord::new("Citrate", 191.019, -1, "N_S1").with_ccs(140.2),
    ]
}

#[test]
fn test_convert_tables() {
    let conversion = Converter::default()
        .convert_tables(&sheet(), &positive(), &negative())
        .unwrap();

    assert_eq!(conversion.dataset.alignment_ids(), vec![0, 1, 2]);
    assert_eq!(
        conversion.dataset.headers()[6..].to_vec(),
        vec!["P_QC", "P_S1", "N_QC", "N_S1"]
    );
    assert_eq!(conversion.positive.excluded_injections, vec!["P_X".to_string()]);
    assert_eq!(conversion.block.injection_orders(), vec![1, 2, 4, 5]);

    let citrate = &conversion.dataset.rows[2];
    assert_eq!(citrate.areas, vec![None, None, Some(7.0), Some(0.0)]);
}

#[test]
fn test_stats_counts() {
    let conversion = Converter::default()
        .convert_tables(&sheet(), &positive(), &negative())
        .unwrap();
    let stats = conversion.stats(None, Duration::from_millis(5));

    assert_eq!(stats.positive.features, 2);
    assert_eq!(stats.positive.retained_injections, 2);
    assert_eq!(stats.positive.excluded_injections, 1);
    assert_eq!(stats.polarity(Polarity::Negative).features, 1);
    assert_eq!(stats.combined_rows, 3);
    assert!(stats.output.is_none());
    assert!(stats.to_string().contains("Combined 3 rows"));
}

#[test]
fn test_empty_negative_export() {
    let err = Converter::default()
        .convert_tables(&sheet(), &positive(), &[])
        .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::AlignError(crate::align::AlignError::EmptyPolarity(Polarity::Negative))
    ));
    assert_eq!(err.kind(), ErrorKind::EmptyPolarity);
}

#[test]
fn test_reader_errors_classified() {
    let missing = ConvertError::from(crate::features::FeatureError::MissingColumn {
        table: "pos.tsv".into(),
        column: "Area".into(),
    });
    assert_eq!(missing.kind(), ErrorKind::SchemaMismatch);

    let not_found = ConvertError::from(crate::metadata::MetadataError::NotFound("samples.xlsx".into()));
    assert_eq!(not_found.kind(), ErrorKind::InputNotFound);
    assert_eq!(not_found.kind().to_string(), "input not found");
}

#[test]
fn test_missing_input_reported_first() {
    let dir = tempdir().unwrap();
    let metadata = dir.path().join("samples.tsv");
    fs::write(&metadata, "Sequence\tSample_Type\tDescription\tReplicate_Number\n").unwrap();

    let inputs = ConversionInputs::new(&metadata, dir.path().join("pos.tsv"), dir.path().join("neg.tsv"));
    let err = Converter::default().run(&inputs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputNotFound);

    match err {
        ConvertError::InputNotFound(path) => assert!(path.ends_with("pos.tsv")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_run_writes_workbook_and_summary() {
    let dir = tempdir().unwrap();
    let metadata = dir.path().join("samples.tsv");
    let pos = dir.path().join("pos.tsv");
    let neg = dir.path().join("neg.tsv");

    fs::write(
        &metadata,
        "Sequence\tSample_Type\tDescription\tReplicate_Number\n\
         Positive\tQC\tpool\t1\n\
         Negative\tQC\tpool\t1\n",
    )
    .unwrap();
    let header = "Molecule Name\tPrecursor Mz\tPrecursor Charge\tCollisional Cross Section\tReplicate Name\tArea\n";
    fs::write(&pos, format!("{header}Alanine\t90.055\t1\t130.1\tP_QC\t10\n")).unwrap();
    fs::write(&neg, format!("{header}Citrate\t191.019\t-1\t140.2\tN_QC\t7\n")).unwrap();

    let output = dir.path().join("out").join("comb_data.xlsx");
    let config = ConversionConfig {
        output: output.clone(),
        ..Default::default()
    };
    let stats = Converter::new(config)
        .run(&ConversionInputs::new(&metadata, &pos, &neg))
        .unwrap();

    assert!(output.is_file());
    assert_eq!(stats.combined_rows, 2);
    assert_eq!(stats.output.as_deref(), Some(output.as_path()));

    let summary = dir.path().join("summary.json");
    stats.write_json(&summary).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["combined_rows"], 2);
    assert_eq!(json["positive"]["features"], 1);
}

#[test]
fn test_failed_run_leaves_no_output() {
    let dir = tempdir().unwrap();
    let metadata = dir.path().join("samples.tsv");
    let pos = dir.path().join("pos.tsv");
    let neg = dir.path().join("neg.tsv");

    // Two positive sheet rows but one positive injection
    fs::write(
        &metadata,
        "Sequence\tSample_Type\tDescription\tReplicate_Number\n\
         Positive\tQC\tpool\t1\n\
         Positive\tSample\tcase\t1\n\
         Negative\tQC\tpool\t1\n",
    )
    .unwrap();
    let header = "Molecule Name\tPrecursor Mz\tPrecursor Charge\tCollisional Cross Section\tReplicate Name\tArea\n";
    fs::write(&pos, format!("{header}Alanine\t90.055\t1\t130.1\tP_QC\t10\n")).unwrap();
    fs::write(&neg, format!("{header}Citrate\t191.019\t-1\t140.2\tN_QC\t7\n")).unwrap();

    let output = dir.path().join("out").join("comb_data.xlsx");
    let config = ConversionConfig {
        output: output.clone(),
        ..Default::default()
    };
    let err = Converter::new(config)
        .run(&ConversionInputs::new(&metadata, &pos, &neg))
        .unwrap_err();

    assert!(matches!(
        err,
        ConvertError::AlignError(crate::align::AlignError::ShapeMismatch { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert!(!output.exists());
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_ids_match_sequential() {
    let aligner = FeatureAligner::default();
    let metadata = sheet();
    let mut positive = positive();
    // Negative-charge row in the positive export must not shift the offset.
    positive.push(RawFeatureRecord::new("Lactate", 89.024, -1, "P_QC").with_area(3.0));
    let negative = negative();

    let (pos, neg) = align_both(&aligner, &metadata, &positive, &negative).unwrap();

    let seq_pos = aligner.align(&positive, &metadata, Polarity::Positive, 0).unwrap();
    let offset = seq_pos.descriptors.len() as u64;
    let seq_neg = aligner.align(&negative, &metadata, Polarity::Negative, offset).unwrap();

    assert_eq!(pos.descriptors.alignment_ids(), seq_pos.descriptors.alignment_ids());
    assert_eq!(neg.descriptors.alignment_ids(), seq_neg.descriptors.alignment_ids());
    assert_eq!(neg.descriptors.alignment_ids(), vec![2]);
    assert_eq!(neg.matrix.values(), seq_neg.matrix.values());
}
