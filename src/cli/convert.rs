use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzalign::pipeline::{ConversionInputs, Converter};

use super::Overrides;

/// Align both polarities and write the combined workbook
pub fn run(
    inputs: ConversionInputs,
    config: Option<PathBuf>,
    overrides: Overrides,
    summary: Option<PathBuf>,
) -> Result<()> {
    let config = overrides.resolve(config.as_deref())?;

    info!("mzAlign - feature export alignment");
    info!("===================================");
    info!("Sample sheet:    {}", inputs.metadata.display());
    info!("Positive export: {}", inputs.positive.display());
    info!("Negative export: {}", inputs.negative.display());
    info!("Output:          {}", config.output.display());
    info!("Retained roles:  {}", config.retained_roles);
    info!("Binding:         {}", config.binding);
    info!("Unmatched cells: {}", config.unmatched);

    let converter = Converter::new(config);
    let stats = converter.run(&inputs).map_err(|e| {
        let kind = e.kind();
        anyhow::Error::new(e).context(format!("Conversion failed ({})", kind))
    })?;

    info!("Conversion complete!");
    info!(
        "  Positive: {} features, {} injections ({} excluded)",
        stats.positive.features, stats.positive.retained_injections, stats.positive.excluded_injections
    );
    info!(
        "  Negative: {} features, {} injections ({} excluded)",
        stats.negative.features, stats.negative.retained_injections, stats.negative.excluded_injections
    );
    info!("  Combined rows: {}", stats.combined_rows);
    if stats.duplicates_removed > 0 {
        info!("  Duplicates removed: {}", stats.duplicates_removed);
    }

    if let Some(summary) = summary {
        stats
            .write_json(&summary)
            .with_context(|| format!("Failed to write summary: {}", summary.display()))?;
        info!("  Summary: {}", summary.display());
    }

    println!("{}", stats);
    Ok(())
}
