use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::AlignError;
use crate::metadata::SampleMetadataRecord;
use crate::polarity::Polarity;

/// How exported injections are joined to sample sheet rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionBinding {
    /// By name when any row of the polarity names its injection, else by position
    #[default]
    Auto,
    /// Join on the sample sheet injection-name column
    ByName,
    /// Pair the i-th distinct injection with the i-th sample sheet row
    Positional,
}

impl InjectionBinding {
    /// Pick the concrete strategy for one polarity's sample rows
    pub fn resolve(&self, samples: &[&SampleMetadataRecord]) -> Self {
        match self {
            InjectionBinding::Auto => {
                if samples.iter().any(|s| s.injection_name.is_some()) {
                    InjectionBinding::ByName
                } else {
                    InjectionBinding::Positional
                }
            }
            other => *other,
        }
    }

    /// Bind every injection to one sample row.
    ///
    /// The result is parallel to `injections`. Both strategies require the
    /// polarity to have exactly one sample row per distinct injection. A row
    /// that names its injection is only ever bound to that injection.
    pub fn bind<'a>(
        &self,
        polarity: Polarity,
        injections: &[&str],
        samples: &[&'a SampleMetadataRecord],
    ) -> Result<Vec<&'a SampleMetadataRecord>, AlignError> {
        if samples.len() != injections.len() {
            return Err(AlignError::ShapeMismatch {
                polarity,
                metadata_rows: samples.len(),
                injections: injections.len(),
            });
        }

        let strategy = self.resolve(samples);
        debug!("Binding {} {} injections {}", injections.len(), polarity, strategy);

        match strategy {
            InjectionBinding::ByName => bind_by_name(polarity, injections, samples),
            _ => bind_by_position(polarity, injections, samples),
        }
    }
}

fn bind_by_position<'a>(
    polarity: Polarity,
    injections: &[&str],
    samples: &[&'a SampleMetadataRecord],
) -> Result<Vec<&'a SampleMetadataRecord>, AlignError> {
    for (injection, sample) in injections.iter().zip(samples) {
        if let Some(name) = sample.injection_name.as_deref() {
            if name != *injection {
                return Err(AlignError::InjectionNameMismatch {
                    polarity,
                    injection: injection.to_string(),
                    injection_order: sample.injection_order,
                    sheet_name: name.to_string(),
                });
            }
        }
    }
    Ok(samples.to_vec())
}

fn bind_by_name<'a>(
    polarity: Polarity,
    injections: &[&str],
    samples: &[&'a SampleMetadataRecord],
) -> Result<Vec<&'a SampleMetadataRecord>, AlignError> {
    let mut by_name: HashMap<&str, &'a SampleMetadataRecord> = HashMap::with_capacity(samples.len());
    for sample in samples {
        let Some(name) = sample.injection_name.as_deref() else {
            return Err(AlignError::MissingInjectionName {
                polarity,
                injection_order: sample.injection_order,
            });
        };
        if by_name.insert(name, *sample).is_some() {
            return Err(AlignError::DuplicateInjection {
                polarity,
                name: name.to_string(),
            });
        }
    }

    injections
        .iter()
        .map(|name| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| AlignError::UnknownInjection {
                    polarity,
                    name: name.to_string(),
                })
        })
        .collect()
}

impl fmt::Display for InjectionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectionBinding::Auto => write!(f, "auto"),
            InjectionBinding::ByName => write!(f, "by-name"),
            InjectionBinding::Positional => write!(f, "positional"),
        }
    }
}

impl FromStr for InjectionBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(InjectionBinding::Auto),
            "by-name" | "name" => Ok(InjectionBinding::ByName),
            "positional" | "position" => Ok(InjectionBinding::Positional),
            _ => Err(format!(
                "Unknown binding '{}'. Valid options: auto, by-name, positional",
                s
            )),
        }
    }
}
