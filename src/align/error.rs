use crate::polarity::Polarity;

/// Errors that can occur while aligning one polarity
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// No export row carries the requested charge sign
    #[error("No {0} features found in the export")]
    EmptyPolarity(Polarity),

    /// Sample sheet rows and distinct injections disagree in number
    #[error(
        "{polarity} sample sheet has {metadata_rows} rows but the export has {injections} distinct injections"
    )]
    ShapeMismatch {
        /// Polarity being aligned
        polarity: Polarity,
        /// Sample sheet rows for this polarity
        metadata_rows: usize,
        /// Distinct injection names in the export
        injections: usize,
    },

    /// An exported injection has no sample sheet row with the same name
    #[error("{polarity} injection '{name}' is not listed in the sample sheet")]
    UnknownInjection {
        /// Polarity being aligned
        polarity: Polarity,
        /// Injection name from the export
        name: String,
    },

    /// A sample sheet row carries no injection name while other rows of the
    /// same polarity do
    #[error("{polarity} sample sheet row {injection_order} has no injection name")]
    MissingInjectionName {
        /// Polarity being aligned
        polarity: Polarity,
        /// Injection order of the unnamed row
        injection_order: usize,
    },

    /// Positional pairing put an injection on a row that names another one
    #[error(
        "{polarity} injection '{injection}' is paired with sample sheet row {injection_order} named '{sheet_name}'"
    )]
    InjectionNameMismatch {
        /// Polarity being aligned
        polarity: Polarity,
        /// Injection name from the export
        injection: String,
        /// Injection order of the paired row
        injection_order: usize,
        /// Name on the paired row
        sheet_name: String,
    },

    /// Two sample sheet rows of one polarity name the same injection
    #[error("{polarity} injection '{name}' is listed more than once in the sample sheet")]
    DuplicateInjection {
        /// Polarity being aligned
        polarity: Polarity,
        /// Repeated injection name
        name: String,
    },

    /// A measured area is negative or infinite
    #[error("Invalid area {area} for '{molecule}' in {polarity} injection '{injection}'")]
    InvalidArea {
        /// Polarity being aligned
        polarity: Polarity,
        /// Molecule name of the offending row
        molecule: String,
        /// Injection name of the offending row
        injection: String,
        /// Area value
        area: f64,
    },
}
