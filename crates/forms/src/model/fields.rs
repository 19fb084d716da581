//! Field-level value types and lenient deserializers.
//!
//! Browser forms send every value as a string, so blank strings mean
//! "not provided" and numeric inputs may arrive as either strings or numbers.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Deserialize an optional field, treating `null`, a missing key and a
/// blank string as absent.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(de::Error::custom),
    }
}

/// Deserialize an optional non-negative integer from a number or a numeric string.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a whole number, got {s:?}"))),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a whole number, got {n}"))),
        Some(other) => Err(de::Error::custom(format!(
            "expected a whole number, got {other}"
        ))),
    }
}

/// Time lived at a property, in half-year steps.
///
/// Stored as a count of half years so equality and display are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearsAtProperty {
    half_years: u32,
}

impl YearsAtProperty {
    /// Build from whole years.
    pub fn whole(years: u32) -> Self {
        Self {
            half_years: years.saturating_mul(2),
        }
    }

    /// Build from a count of half years (`5` = 2.5 years).
    pub fn from_half_years(half_years: u32) -> Self {
        Self { half_years }
    }

    /// Number of half years.
    pub fn half_years(&self) -> u32 {
        self.half_years
    }

    /// Value in years.
    pub fn as_years(&self) -> f64 {
        f64::from(self.half_years) / 2.0
    }

    fn from_f64(years: f64) -> Result<Self, YearsError> {
        if !years.is_finite() || years < 0.0 {
            return Err(YearsError::Negative);
        }
        let doubled = years * 2.0;
        if (doubled - doubled.round()).abs() > f64::EPSILON || doubled > f64::from(u32::MAX) {
            return Err(YearsError::NotHalfStep);
        }
        Ok(Self {
            half_years: doubled.round() as u32,
        })
    }
}

/// Why a years value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum YearsError {
    #[error("years must be a number")]
    NotANumber,

    #[error("years must be zero or more")]
    Negative,

    #[error("years must be in half-year steps")]
    NotHalfStep,
}

impl FromStr for YearsAtProperty {
    type Err = YearsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let years: f64 = s.trim().parse().map_err(|_| YearsError::NotANumber)?;
        Self::from_f64(years)
    }
}

impl fmt::Display for YearsAtProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.half_years % 2 == 0 {
            write!(f, "{}", self.half_years / 2)
        } else {
            write!(f, "{}.5", self.half_years / 2)
        }
    }
}

impl Serialize for YearsAtProperty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearsAtProperty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => s.parse().map_err(de::Error::custom),
            Value::Number(n) => {
                let years = n
                    .as_f64()
                    .ok_or_else(|| de::Error::custom(YearsError::NotANumber))?;
                Self::from_f64(years).map_err(de::Error::custom)
            }
            other => Err(de::Error::custom(format!(
                "expected years as a number, got {other}"
            ))),
        }
    }
}

/// Implements `Display`/`FromStr` over a fixed wire vocabulary for a
/// unit-only enum, plus a human label used in notifications and receipts.
macro_rules! vocabulary {
    ($ty:ident { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $ty {
            /// Every value, in form order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Wire value as sent by the form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }

            /// Human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::model::fields::UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err($crate::model::fields::UnknownValue(other.to_string())),
                }
            }
        }
    };
}

pub(crate) use vocabulary;

/// A choice value outside the field's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value {0:?}")]
pub struct UnknownValue(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "blank_as_none")]
        text: Option<String>,
        #[serde(default, deserialize_with = "lenient_count")]
        count: Option<u32>,
    }

    #[test]
    fn blank_strings_are_absent() {
        let probe: Probe = serde_json::from_str(r#"{"text": "  ", "count": ""}"#).unwrap();
        assert_eq!(probe.text, None);
        assert_eq!(probe.count, None);

        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.text, None);
    }

    #[test]
    fn counts_accept_numbers_and_strings() {
        let probe: Probe = serde_json::from_str(r#"{"count": "12"}"#).unwrap();
        assert_eq!(probe.count, Some(12));
        let probe: Probe = serde_json::from_str(r#"{"count": 40}"#).unwrap();
        assert_eq!(probe.count, Some(40));
        assert!(serde_json::from_str::<Probe>(r#"{"count": "-3"}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"count": "a dozen"}"#).is_err());
    }

    #[test]
    fn years_parse_in_half_steps() {
        assert_eq!("2.5".parse::<YearsAtProperty>().unwrap().half_years(), 5);
        assert_eq!("0".parse::<YearsAtProperty>().unwrap().half_years(), 0);
        assert_eq!("1.25".parse::<YearsAtProperty>(), Err(YearsError::NotHalfStep));
        assert_eq!("-1".parse::<YearsAtProperty>(), Err(YearsError::Negative));
        assert_eq!("soon".parse::<YearsAtProperty>(), Err(YearsError::NotANumber));
    }

    #[test]
    fn years_display_drops_trailing_zero() {
        assert_eq!(YearsAtProperty::whole(3).to_string(), "3");
        assert_eq!(YearsAtProperty::from_half_years(7).to_string(), "3.5");
    }

    #[test]
    fn years_deserialize_from_number_or_string() {
        let from_number: YearsAtProperty = serde_json::from_str("4.5").unwrap();
        let from_string: YearsAtProperty = serde_json::from_str(r#""4.5""#).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), r#""4.5""#);
    }
}
