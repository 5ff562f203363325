//! # mzAlign CLI
//!
//! Combines the positive and negative mode feature exports of an LC-IM-MS run
//! into one notame-ready workbook.
//!
//! ## Usage
//!
//! ```bash
//! # Align and write output/comb_data.xlsx
//! mzalign convert samples.xlsx positive.tsv negative.tsv
//!
//! # Keep QC and study samples only, with a JSON summary
//! mzalign -v convert samples.xlsx positive.tsv negative.tsv \
//!     -o combined.xlsx --retain QC,SAMPLE --summary run.json
//!
//! # Check the inputs without writing anything
//! mzalign inspect samples.xlsx positive.tsv negative.tsv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
