//! FILENAME: dataset/src/value.rs
//! PURPOSE: Defines the fundamental value types for a dataset cell.
//! CONTEXT: This file contains the raw `DataValue` enum and its normalized,
//! hashable mirror `KeyValue`. Raw values keep plain `f64` for arithmetic;
//! `KeyValue` wraps numbers in `OrderedFloat` so value combinations can be
//! used as grouping keys.

use serde::{Deserialize, Serialize};

/// Represents the raw data within a single dataset cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    Missing,
    Number(f64),
    Text(String),
}

impl DataValue {
    pub fn number(n: f64) -> Self {
        DataValue::Number(n)
    }

    pub fn text(s: impl Into<String>) -> Self {
        DataValue::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DataValue::Missing)
    }

    /// Coerces the value to a number, if possible.
    ///
    /// `Number` values coerce directly. `Text` values coerce when they are
    /// standard decimal/integer/negative/exponent notation (e.g. "42",
    /// "-3.5", "1e6"); textual spellings of infinities and NaN are not
    /// treated as numbers. `Missing` never coerces.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            DataValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            DataValue::Missing => None,
        }
    }

    /// Returns the display string of the value.
    /// This is what filters match against and what node labels are built from.
    pub fn display(&self) -> String {
        match self {
            DataValue::Missing => String::new(),
            DataValue::Number(n) => format_number(*n),
            DataValue::Text(s) => s.clone(),
        }
    }
}

/// Formats a number without unnecessary decimal places.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A normalized, hashable representation of a cell value.
/// Used inside group keys and node identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyValue {
    Missing,
    Number(OrderedFloat),
    Text(String),
}

impl From<&DataValue> for KeyValue {
    fn from(value: &DataValue) -> Self {
        match value {
            DataValue::Missing => KeyValue::Missing,
            DataValue::Number(n) => KeyValue::Number(OrderedFloat(*n)),
            DataValue::Text(s) => KeyValue::Text(s.clone()),
        }
    }
}

impl KeyValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, KeyValue::Missing)
    }

    /// Returns the display string of the key value.
    /// Matches `DataValue::display` for the corresponding raw value.
    pub fn display(&self) -> String {
        match self {
            KeyValue::Missing => String::new(),
            KeyValue::Number(n) => format_number(n.0),
            KeyValue::Text(s) => s.clone(),
        }
    }
}
