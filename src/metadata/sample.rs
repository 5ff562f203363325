use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::polarity::Polarity;

/// Purpose of an injection, from the `Sample_Type` column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SampleRole {
    /// Pooled quality-control injection
    Qc,
    /// Study sample
    Sample,
    /// Solvent or process blank
    Blank,
    /// Any other role (standards, conditioning runs, ...), kept verbatim
    Other(String),
}

impl SampleRole {
    /// Parse a `Sample_Type` cell. Matching is case-insensitive.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "QC" => SampleRole::Qc,
            "SAMPLE" => SampleRole::Sample,
            "BLANK" => SampleRole::Blank,
            _ => SampleRole::Other(trimmed.to_string()),
        }
    }

    /// Label written to the `QC` row of the metadata block.
    pub fn as_str(&self) -> &str {
        match self {
            SampleRole::Qc => "QC",
            SampleRole::Sample => "SAMPLE",
            SampleRole::Blank => "BLANK",
            SampleRole::Other(label) => label,
        }
    }
}

impl fmt::Display for SampleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SampleRole {
    fn from(value: String) -> Self {
        SampleRole::parse(&value)
    }
}

impl From<SampleRole> for String {
    fn from(role: SampleRole) -> Self {
        role.as_str().to_string()
    }
}

/// A free-form sample sheet cell (description, replicate number)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    /// Blank cell
    #[default]
    Empty,
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl SampleValue {
    /// Interpret a text cell, recognizing numbers and blanks.
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return SampleValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => SampleValue::Number(number),
            _ => SampleValue::Text(trimmed.to_string()),
        }
    }

    /// Re-interpret a text cell that may hold a number.
    pub fn normalized(self) -> Self {
        match self {
            SampleValue::Text(text) => SampleValue::from_text(&text),
            other => other,
        }
    }

    /// Whether the cell is blank.
    pub fn is_empty(&self) -> bool {
        matches!(self, SampleValue::Empty)
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Empty => Ok(()),
            SampleValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            SampleValue::Number(n) => write!(f, "{}", n),
            SampleValue::Text(s) => f.write_str(s),
        }
    }
}

/// One row of the sample sheet, describing one injection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadataRecord {
    /// Sequence label (`Positive` / `Negative`)
    pub sequence: String,

    /// Sample role from `Sample_Type`
    pub role: SampleRole,

    /// Free-text group from `Description`
    pub description: SampleValue,

    /// 1-based position of the row in the whole sheet
    pub injection_order: usize,

    /// Replicate number from `Replicate_Number`
    pub replicate_number: SampleValue,

    /// Injection (replicate) name, when the sheet provides one
    pub injection_name: Option<String>,
}

impl SampleMetadataRecord {
    /// Create a record with the given sequence, role and injection order
    pub fn new(sequence: &str, role: SampleRole, injection_order: usize) -> Self {
        Self {
            sequence: sequence.to_string(),
            role,
            description: SampleValue::Empty,
            injection_order,
            replicate_number: SampleValue::Empty,
            injection_name: None,
        }
    }

    /// Set the injection name used for name-based binding
    pub fn with_injection_name(mut self, name: &str) -> Self {
        self.injection_name = Some(name.to_string());
        self
    }

    /// Set the description (group)
    pub fn with_description(mut self, description: SampleValue) -> Self {
        self.description = description;
        self
    }

    /// Set the replicate number
    pub fn with_replicate_number(mut self, replicate: SampleValue) -> Self {
        self.replicate_number = replicate;
        self
    }

    /// Whether this row belongs to the given polarity
    pub fn is_polarity(&self, polarity: Polarity) -> bool {
        polarity.matches_sequence(&self.sequence)
    }
}

/// Sample roles whose injections are kept in the output.
///
/// One policy drives both the area-matrix columns and the metadata block.
/// The default keeps QC, SAMPLE and BLANK injections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetainedRoles(Vec<SampleRole>);

impl Default for RetainedRoles {
    fn default() -> Self {
        Self(vec![SampleRole::Qc, SampleRole::Sample, SampleRole::Blank])
    }
}

impl RetainedRoles {
    /// Retain exactly the given roles
    pub fn new(roles: impl IntoIterator<Item = SampleRole>) -> Self {
        let mut retained: Vec<SampleRole> = Vec::new();
        for role in roles {
            if !retained.contains(&role) {
                retained.push(role);
            }
        }
        Self(retained)
    }

    /// QC and SAMPLE only; blanks are dropped
    pub fn qc_and_sample() -> Self {
        Self(vec![SampleRole::Qc, SampleRole::Sample])
    }

    /// Whether a role is retained
    pub fn contains(&self, role: &SampleRole) -> bool {
        self.0.contains(role)
    }

    /// Retained roles in declaration order
    pub fn roles(&self) -> &[SampleRole] {
        &self.0
    }
}

impl fmt::Display for RetainedRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.0.iter().map(SampleRole::as_str).collect();
        write!(f, "{}", labels.join(","))
    }
}

impl FromStr for RetainedRoles {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let roles: Vec<SampleRole> = s
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(SampleRole::parse)
            .collect();
        if roles.is_empty() {
            return Err("At least one sample role must be retained".to_string());
        }
        Ok(Self::new(roles))
    }
}
