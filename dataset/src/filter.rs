//! FILENAME: dataset/src/filter.rs
//! PURPOSE: Per-column row predicates and their application.
//! CONTEXT: A `FilterSpec` describes one predicate; `Dataset::filter`
//! applies a list of them as an AND conjunction. Specs are validated
//! against the schema (existence and kind) before any row is visited, so
//! a failed call never returns a partially filtered dataset.

use serde::{Deserialize, Serialize};

use crate::column::ColumnKind;
use crate::error::DatasetError;
use crate::table::Dataset;
use crate::value::DataValue;

/// A single per-column predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterSpec {
    /// Keep rows whose value lies in `[min, max]`, inclusive on both ends.
    /// Only valid on a `Numeric` column.
    NumericRange { column: String, min: f64, max: f64 },

    /// Keep rows whose display string is one of `allowed`, matched exactly
    /// and case-sensitively. Only valid on a `Categorical` column.
    OneOf { column: String, allowed: Vec<String> },
}

impl FilterSpec {
    /// The column this predicate applies to.
    pub fn column(&self) -> &str {
        match self {
            FilterSpec::NumericRange { column, .. } => column,
            FilterSpec::OneOf { column, .. } => column,
        }
    }

    /// The column kind this predicate requires.
    fn expected_kind(&self) -> ColumnKind {
        match self {
            FilterSpec::NumericRange { .. } => ColumnKind::Numeric,
            FilterSpec::OneOf { .. } => ColumnKind::Categorical,
        }
    }

    /// Whether a single value satisfies the predicate.
    ///
    /// A missing value never satisfies a predicate, and neither does a
    /// value that fails numeric coercion under a `NumericRange`.
    fn matches(&self, value: &DataValue) -> bool {
        match self {
            FilterSpec::NumericRange { min, max, .. } => match value.as_number() {
                Some(n) => *min <= n && n <= *max,
                None => false,
            },
            FilterSpec::OneOf { allowed, .. } => {
                if value.is_missing() {
                    return false;
                }
                let display = value.display();
                allowed.iter().any(|a| *a == display)
            }
        }
    }
}

impl Dataset {
    /// Applies every spec as an AND conjunction: a record survives only if
    /// it satisfies all of them. Record order is preserved, and an empty
    /// result is a dataset, not an error.
    ///
    /// Fails with `UnknownColumn` if a spec names an absent column and
    /// `KindMismatch` if a spec's kind does not match the column's kind.
    pub fn filter(&self, specs: &[FilterSpec]) -> Result<Dataset, DatasetError> {
        let mut checks: Vec<(usize, &FilterSpec)> = Vec::with_capacity(specs.len());
        for spec in specs {
            let (idx, column) = self.require_column(spec.column())?;
            let expected = spec.expected_kind();
            if column.kind != expected {
                return Err(DatasetError::KindMismatch {
                    column: column.name.clone(),
                    expected,
                    actual: column.kind,
                });
            }
            checks.push((idx, spec));
        }

        let records = self
            .records()
            .iter()
            .filter(|record| {
                checks
                    .iter()
                    .all(|(idx, spec)| spec.matches(&record.values[*idx]))
            })
            .cloned()
            .collect();

        Ok(self.with_records(records))
    }
}
