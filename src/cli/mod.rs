use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use mzalign::align::InjectionBinding;
use mzalign::merge::UnmatchedCell;
use mzalign::metadata::RetainedRoles;
use mzalign::output::HeaderStyle;
use mzalign::pipeline::{ConversionConfig, ConversionInputs};

mod config;
mod convert;
mod inspect;

pub use config::Config;

/// mzAlign - combine positive and negative LC-IM-MS feature exports
#[derive(Parser)]
#[command(name = "mzalign")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Injection binding strategy.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum BindingArg {
    /// By name when the sample sheet names injections, otherwise by position
    #[default]
    Auto,
    /// Join on the injection-name column
    ByName,
    /// Pair injections and sample rows in order
    Positional,
}

impl From<BindingArg> for InjectionBinding {
    fn from(arg: BindingArg) -> Self {
        match arg {
            BindingArg::Auto => InjectionBinding::Auto,
            BindingArg::ByName => InjectionBinding::ByName,
            BindingArg::Positional => InjectionBinding::Positional,
        }
    }
}

/// Rendering of cells without a counterpart in the other polarity.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum UnmatchedArg {
    /// Leave the cell empty
    #[default]
    Blank,
    /// Write zero
    Zero,
}

impl From<UnmatchedArg> for UnmatchedCell {
    fn from(arg: UnmatchedArg) -> Self {
        match arg {
            UnmatchedArg::Blank => UnmatchedCell::Blank,
            UnmatchedArg::Zero => UnmatchedCell::Zero,
        }
    }
}

/// Header cell styling.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum HeaderStyleArg {
    /// Unformatted
    #[default]
    Plain,
    /// Bold
    Bold,
}

impl From<HeaderStyleArg> for HeaderStyle {
    fn from(arg: HeaderStyleArg) -> Self {
        match arg {
            HeaderStyleArg::Plain => HeaderStyle::Plain,
            HeaderStyleArg::Bold => HeaderStyle::Bold,
        }
    }
}

/// Values given on the command line; each overrides the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Workbook path
    pub output: Option<PathBuf>,
    /// Retained sample roles
    pub retain: Option<RetainedRoles>,
    /// Binding strategy
    pub binding: Option<InjectionBinding>,
    /// Unmatched-cell rendering
    pub unmatched: Option<UnmatchedCell>,
    /// Header styling
    pub header_style: Option<HeaderStyle>,
    /// Sample sheet worksheet
    pub sheet: Option<String>,
}

impl Overrides {
    /// Load the config file (if any) and apply the command-line values on top.
    pub fn resolve(self, config: Option<&Path>) -> Result<ConversionConfig> {
        let mut resolved = Config::load(config)?.to_conversion_config()?;
        if let Some(output) = self.output {
            resolved.output = output;
        }
        if let Some(retain) = self.retain {
            resolved.retained_roles = retain;
        }
        if let Some(binding) = self.binding {
            resolved.binding = binding;
        }
        if let Some(unmatched) = self.unmatched {
            resolved.unmatched = unmatched;
        }
        if let Some(style) = self.header_style {
            resolved.layout.header_style = style;
        }
        if let Some(sheet) = self.sheet {
            resolved.sheet.sheet_name = sheet;
        }
        Ok(resolved)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Align both polarities and write the combined workbook
    Convert {
        /// Sample sheet (.xlsx, .ods, .tsv, .csv)
        #[arg(value_name = "METADATA")]
        metadata: PathBuf,

        /// Positive mode feature export
        #[arg(value_name = "POSITIVE")]
        positive: PathBuf,

        /// Negative mode feature export
        #[arg(value_name = "NEGATIVE")]
        negative: PathBuf,

        /// Output workbook (default: output/comb_data.xlsx)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Comma-separated sample roles to keep (default: QC,SAMPLE,BLANK)
        #[arg(long, value_name = "ROLE,...")]
        retain: Option<RetainedRoles>,

        /// How exported injections are matched to sample sheet rows
        #[arg(long, value_enum)]
        binding: Option<BindingArg>,

        /// Rendering of cells with no value in the other polarity
        #[arg(long, value_enum)]
        unmatched: Option<UnmatchedArg>,

        /// Header cell styling
        #[arg(long, value_enum)]
        header_style: Option<HeaderStyleArg>,

        /// Worksheet of the sample sheet workbook (default: samples)
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,

        /// Write a JSON run summary
        #[arg(long, value_name = "FILE")]
        summary: Option<PathBuf>,
    },

    /// Summarize the inputs and check that they align, without writing output
    Inspect {
        /// Sample sheet (.xlsx, .ods, .tsv, .csv)
        #[arg(value_name = "METADATA")]
        metadata: PathBuf,

        /// Positive mode feature export
        #[arg(value_name = "POSITIVE")]
        positive: PathBuf,

        /// Negative mode feature export
        #[arg(value_name = "NEGATIVE")]
        negative: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Comma-separated sample roles to keep (default: QC,SAMPLE,BLANK)
        #[arg(long, value_name = "ROLE,...")]
        retain: Option<RetainedRoles>,

        /// How exported injections are matched to sample sheet rows
        #[arg(long, value_enum)]
        binding: Option<BindingArg>,

        /// Worksheet of the sample sheet workbook (default: samples)
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert {
            metadata,
            positive,
            negative,
            output,
            config,
            retain,
            binding,
            unmatched,
            header_style,
            sheet,
            summary,
        } => convert::run(
            ConversionInputs::new(metadata, positive, negative),
            config,
            Overrides {
                output,
                retain,
                binding: binding.map(InjectionBinding::from),
                unmatched: unmatched.map(UnmatchedCell::from),
                header_style: header_style.map(HeaderStyle::from),
                sheet,
            },
            summary,
        ),
        Commands::Inspect {
            metadata,
            positive,
            negative,
            config,
            retain,
            binding,
            sheet,
        } => inspect::run(
            ConversionInputs::new(metadata, positive, negative),
            config,
            Overrides {
                retain,
                binding: binding.map(InjectionBinding::from),
                sheet,
                ..Default::default()
            },
        ),
    }
}
