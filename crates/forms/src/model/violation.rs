//! Condominium violation report.

use chrono::{NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{blank_as_none, vocabulary};

/// Category of reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    Noise,
    Construction,
    Pet,
    Parking,
    Harassment,
    Other,
}

vocabulary!(ViolationType {
    Noise => ("noise", "Noise/disturbance"),
    Construction => ("construction", "Unauthorized construction/alteration"),
    Pet => ("pet", "Pet violation"),
    Parking => ("parking", "Parking/vehicle issue"),
    Harassment => ("harassment", "Harassment"),
    Other => ("other", "Other"),
});

/// Outcome the reporter asks the association for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedAction {
    #[default]
    Warning,
    Fine,
    Hearing,
    Other,
}

vocabulary!(RequestedAction {
    Warning => ("warning", "Warning"),
    Fine => ("fine", "Fine"),
    Hearing => ("hearing", "Hearing"),
    Other => ("other", "Other"),
});

/// A yes/no radio answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

vocabulary!(YesNo {
    Yes => ("yes", "Yes"),
    No => ("no", "No"),
});

/// Violation types in the order the reporter ticked them.
///
/// Serializes as a JSON array of tags. Deserializes from either an array or
/// the comma-joined string produced by [`ViolationTypes::joined`]. Duplicate
/// tags are dropped, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationTypes(Vec<ViolationType>);

impl ViolationTypes {
    /// Build from tags, dropping duplicates.
    pub fn new(types: impl IntoIterator<Item = ViolationType>) -> Self {
        let mut set = Self::default();
        for t in types {
            set.check(t);
        }
        set
    }

    /// Tick a box. Ticking an already ticked box is a no-op.
    pub fn check(&mut self, violation: ViolationType) {
        if !self.0.contains(&violation) {
            self.0.push(violation);
        }
    }

    /// Untick a box.
    pub fn uncheck(&mut self, violation: ViolationType) {
        self.0.retain(|t| *t != violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViolationType> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ViolationType] {
        &self.0
    }

    /// Tags joined with `", "` in selection order.
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(ViolationType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Serialize for ViolationTypes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ViolationTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => {
                let types = items
                    .into_iter()
                    .map(ViolationType::deserialize)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(de::Error::custom)?;
                Ok(Self::new(types))
            }
            Value::String(joined) => {
                let types = joined
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::parse::<ViolationType>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(de::Error::custom)?;
                Ok(Self::new(types))
            }
            Value::Null => Ok(Self::default()),
            other => Err(de::Error::custom(format!(
                "expected a list of violation types, got {other}"
            ))),
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn date_or_today<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    Ok(blank_as_none(deserializer)?.unwrap_or_else(today))
}

/// A violation report filed by a resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub reporter_name: String,
    pub reporter_unit_address: String,
    pub reporter_contact: String,
    #[serde(default = "today", deserialize_with = "date_or_today")]
    pub report_date: NaiveDate,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub violator_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub violator_unit: Option<String>,
    #[serde(default)]
    pub violation_types: ViolationTypes,
    pub violation_details: String,
    #[serde(default)]
    pub reported_before: YesNo,
    #[serde(default)]
    pub requested_action: RequestedAction,
    pub signature: String,
    #[serde(default)]
    pub acknowledged_sharing: bool,
    #[serde(default)]
    pub certified_accurate: bool,
    #[serde(default)]
    pub acknowledged_contact: bool,
}

impl Default for ViolationReport {
    fn default() -> Self {
        Self {
            reporter_name: String::new(),
            reporter_unit_address: String::new(),
            reporter_contact: String::new(),
            report_date: today(),
            violator_name: None,
            violator_unit: None,
            violation_types: ViolationTypes::default(),
            violation_details: String::new(),
            reported_before: YesNo::No,
            requested_action: RequestedAction::Warning,
            signature: String::new(),
            acknowledged_sharing: false,
            certified_accurate: false,
            acknowledged_contact: false,
        }
    }
}
