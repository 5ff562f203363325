//! Ion polarity of an acquisition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ion mode of a mass spectrometry run.
///
/// The polarity decides which charge sign of exported features is considered,
/// which rows of the sample sheet apply, and the `Ion Mode` label written to
/// the combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Positive ion mode (precursor charge > 0)
    Positive,
    /// Negative ion mode (precursor charge < 0)
    Negative,
}

impl Polarity {
    /// Both polarities in processing order.
    pub const ALL: [Polarity; 2] = [Polarity::Positive, Polarity::Negative];

    /// Charge sign encoding this polarity (+1 or -1).
    pub fn charge_sign(&self) -> i32 {
        match self {
            Polarity::Positive => 1,
            Polarity::Negative => -1,
        }
    }

    /// Whether a precursor charge belongs to this polarity.
    ///
    /// Only the sign matters; a charge of zero matches neither polarity.
    pub fn matches_charge(&self, charge: i32) -> bool {
        charge.signum() == self.charge_sign()
    }

    /// Label used in the `Sequence` column of the sample sheet.
    pub fn sequence_label(&self) -> &'static str {
        match self {
            Polarity::Positive => "Positive",
            Polarity::Negative => "Negative",
        }
    }

    /// Whether a sample sheet `Sequence` value refers to this polarity.
    pub fn matches_sequence(&self, label: &str) -> bool {
        label.trim().eq_ignore_ascii_case(self.sequence_label())
    }

    /// Label written to the `Ion Mode` column.
    pub fn ion_mode(&self) -> &'static str {
        match self {
            Polarity::Positive => "POS",
            Polarity::Negative => "NEG",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "positive"),
            Polarity::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "pos" | "+" | "1" => Ok(Polarity::Positive),
            "negative" | "neg" | "-" | "-1" => Ok(Polarity::Negative),
            _ => Err(format!(
                "Unknown polarity '{}'. Valid options: positive, negative",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_matching() {
        assert!(Polarity::Positive.matches_charge(1));
        assert!(Polarity::Positive.matches_charge(2));
        assert!(!Polarity::Positive.matches_charge(-1));
        assert!(Polarity::Negative.matches_charge(-1));
        assert!(!Polarity::Negative.matches_charge(0));
        assert!(!Polarity::Positive.matches_charge(0));
    }

    #[test]
    fn test_sequence_matching() {
        assert!(Polarity::Positive.matches_sequence("Positive"));
        assert!(Polarity::Positive.matches_sequence(" positive "));
        assert!(!Polarity::Positive.matches_sequence("Negative"));
        assert!(Polarity::Negative.matches_sequence("NEGATIVE"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Polarity::Positive.ion_mode(), "POS");
        assert_eq!(Polarity::Negative.ion_mode(), "NEG");
        assert_eq!(Polarity::from_str("neg").unwrap(), Polarity::Negative);
        assert!(Polarity::from_str("neutral").is_err());
    }
}
