use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use mzalign::align::{deduplicate_features, distinct_injections};
use mzalign::features::FeatureExport;
use mzalign::metadata::SampleSheet;
use mzalign::pipeline::{ConversionConfig, ConversionInputs, Converter};
use mzalign::polarity::Polarity;

use super::Overrides;

/// Summarize the inputs and dry-run the alignment
pub fn run(inputs: ConversionInputs, config: Option<PathBuf>, overrides: Overrides) -> Result<()> {
    let config = overrides.resolve(config.as_deref())?;
    let converter = Converter::new(config);
    let loaded = converter.load(&inputs).context("Failed to load inputs")?;

    let mut report = InputReport::new(&loaded.sheet, converter.config());
    for (polarity, export) in [
        (Polarity::Positive, &loaded.positive),
        (Polarity::Negative, &loaded.negative),
    ] {
        report.add_polarity(polarity, &loaded.sheet, export, converter.config());
    }

    match converter.convert_tables(
        &loaded.sheet.records,
        &loaded.positive.records,
        &loaded.negative.records,
    ) {
        Ok(conversion) => report.checks.push(Check::ok(format!(
            "Alignment dry run: {} combined rows, {} injection columns",
            conversion.dataset.len(),
            conversion.dataset.injection_columns.len()
        ))),
        Err(e) => report
            .checks
            .push(Check::failed("Alignment dry run", e.to_string())),
    }

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    let failures = report.failure_count();
    if failures > 0 {
        bail!("Inspection found {} problem(s)", failures);
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum CheckStatus {
    Ok,
    Warning(String),
    Failed(String),
}

#[derive(Debug, Clone)]
struct Check {
    name: String,
    status: CheckStatus,
}

impl Check {
    fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Facts about one polarity's inputs
#[derive(Debug, Clone)]
struct PolaritySummary {
    polarity: Polarity,
    export_rows: usize,
    matching_rows: usize,
    features: usize,
    injections: usize,
    sheet_rows: usize,
    roles: BTreeMap<String, usize>,
    binding: String,
}

#[derive(Debug)]
struct InputReport {
    sheet_rows: usize,
    retained_roles: String,
    polarities: Vec<PolaritySummary>,
    checks: Vec<Check>,
}

impl InputReport {
    fn new(sheet: &SampleSheet, config: &ConversionConfig) -> Self {
        let mut checks = Vec::new();
        if !sheet.has_injection_names {
            checks.push(Check::warning(
                "Injection names",
                format!(
                    "no injection names in '{}'; injections are matched by position",
                    config.sheet.injection_name_column
                ),
            ));
        }
        Self {
            sheet_rows: sheet.records.len(),
            retained_roles: config.retained_roles.to_string(),
            polarities: Vec::new(),
            checks,
        }
    }

    fn add_polarity(
        &mut self,
        polarity: Polarity,
        sheet: &SampleSheet,
        export: &FeatureExport,
        config: &ConversionConfig,
    ) {
        let matching: Vec<_> = export
            .records
            .iter()
            .filter(|r| r.is_polarity(polarity))
            .collect();
        let features = deduplicate_features(matching.iter().copied()).len();
        let injections = distinct_injections(matching.iter().copied()).len();

        let samples = sheet.for_polarity(polarity);
        let mut roles: BTreeMap<String, usize> = BTreeMap::new();
        for sample in &samples {
            *roles.entry(sample.role.to_string()).or_default() += 1;
        }

        if matching.is_empty() {
            self.checks.push(Check::failed(
                format!("{} export", polarity),
                format!("no rows with {} charge in {}", polarity, export.table),
            ));
        } else if matching.len() < export.records.len() {
            self.checks.push(Check::warning(
                format!("{} export", polarity),
                format!(
                    "{} rows with another charge sign are ignored",
                    export.records.len() - matching.len()
                ),
            ));
        } else {
            self.checks.push(Check::ok(format!("{} export", polarity)));
        }

        if samples.len() == injections {
            self.checks.push(Check::ok(format!(
                "{} sample sheet rows match injections",
                polarity
            )));
        } else {
            self.checks.push(Check::failed(
                format!("{} sample sheet rows match injections", polarity),
                format!("{} sheet rows, {} injections", samples.len(), injections),
            ));
        }

        self.polarities.push(PolaritySummary {
            polarity,
            export_rows: export.records.len(),
            matching_rows: matching.len(),
            features,
            injections,
            sheet_rows: samples.len(),
            roles,
            binding: config.binding.resolve(&samples).to_string(),
        });
    }

    fn failure_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c.status, CheckStatus::Failed(_)))
            .count()
    }

    #[cfg(feature = "colorized_output")]
    fn format_colored(&self) -> String {
        use console::Emoji;

        static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
        static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
        static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

        let mut output = String::new();
        output.push_str(&format!("{}\n", style("mzAlign Input Report").bold().cyan()));
        output.push_str(&format!("{}\n", style("====================").cyan()));
        output.push_str(&format!(
            "{}: {} rows, retaining {}\n\n",
            style("Sample sheet").bold(),
            self.sheet_rows,
            self.retained_roles
        ));

        for summary in &self.polarities {
            output.push_str(&format!("{}\n", style(summary.polarity).bold()));
            output.push_str(&summary.to_string());
        }
        output.push('\n');

        for check in &self.checks {
            let (symbol, name) = match &check.status {
                CheckStatus::Ok => (OK, style(&check.name).green()),
                CheckStatus::Warning(_) => (WARN, style(&check.name).yellow()),
                CheckStatus::Failed(_) => (FAIL, style(&check.name).red()),
            };
            output.push_str(&format!("[{}] {}", symbol, name));
            match &check.status {
                CheckStatus::Ok => output.push('\n'),
                CheckStatus::Warning(msg) => {
                    output.push_str(&format!(" - {}: {}\n", style("WARNING").yellow().bold(), msg));
                }
                CheckStatus::Failed(msg) => {
                    output.push_str(&format!(" - {}: {}\n", style("FAILED").red().bold(), msg));
                }
            }
        }
        output
    }
}

impl fmt::Display for PolaritySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  Export rows:      {} ({} with {} charge)",
            self.export_rows, self.matching_rows, self.polarity
        )?;
        writeln!(f, "  Unique features:  {}", self.features)?;
        writeln!(f, "  Injections:       {}", self.injections)?;
        writeln!(f, "  Sheet rows:       {}", self.sheet_rows)?;
        let roles: Vec<String> = self
            .roles
            .iter()
            .map(|(role, count)| format!("{} {}", count, role))
            .collect();
        writeln!(f, "  Roles:            {}", roles.join(", "))?;
        writeln!(f, "  Binding:          {}", self.binding)
    }
}

impl fmt::Display for InputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mzAlign Input Report")?;
        writeln!(f, "====================")?;
        writeln!(
            f,
            "Sample sheet: {} rows, retaining {}",
            self.sheet_rows, self.retained_roles
        )?;
        writeln!(f)?;

        for summary in &self.polarities {
            writeln!(f, "{}", summary.polarity)?;
            write!(f, "{}", summary)?;
        }
        writeln!(f)?;

        for check in &self.checks {
            let symbol = match &check.status {
                CheckStatus::Ok => "✓",
                CheckStatus::Warning(_) => "⚠",
                CheckStatus::Failed(_) => "✗",
            };
            write!(f, "[{}] {}", symbol, check.name)?;
            match &check.status {
                CheckStatus::Ok => writeln!(f)?,
                CheckStatus::Warning(msg) => writeln!(f, " - WARNING: {}", msg)?,
                CheckStatus::Failed(msg) => writeln!(f, " - FAILED: {}", msg)?,
            }
        }
        Ok(())
    }
}
