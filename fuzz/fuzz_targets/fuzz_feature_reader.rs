#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use mzalign::align::FeatureAligner;
use mzalign::features::FeatureExport;
use mzalign::metadata::{SampleSheet, SheetOptions};
use mzalign::polarity::Polarity;

fuzz_target!(|data: &[u8]| {
    // Parsing must fail gracefully, never panic
    let Ok(export) = FeatureExport::from_reader(Cursor::new(data), b'\t', "fuzz") else {
        return;
    };

    // The same bytes as a sample sheet
    let sheet = SampleSheet::from_delimited_reader(
        Cursor::new(data),
        b'\t',
        "fuzz",
        &SheetOptions::default(),
    )
    .unwrap_or_default();

    // Alignment either succeeds or reports an error
    let aligner = FeatureAligner::default();
    for polarity in Polarity::ALL {
        let _ = aligner.align(&export.records, &sheet.records, polarity, 0);
    }
});
