//! FILENAME: drilldown-engine/src/group.rs
//! Group-And-Reduce - single-pass aggregation over record columns.
//!
//! The primitive underneath every drill level: partition records by the
//! distinct combinations of one or more group columns, then reduce a
//! measure column within each partition. Key order is first-seen order, so
//! output is deterministic for a given record order; callers that want a
//! canonical order sort the input first.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use dataset::{ColumnKind, Dataset, KeyValue};

use crate::definition::Reducer;
use crate::error::DrillError;

/// A key representing one distinct combination of group-column values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    /// One entry per group column, in group-column order.
    pub values: SmallVec<[KeyValue; 4]>,
}

impl GroupKey {
    pub fn new(values: SmallVec<[KeyValue; 4]>) -> Self {
        GroupKey { values }
    }

    /// The key without its last segment (the parent prefix in a drill path).
    pub fn parent(&self) -> GroupKey {
        let mut values = self.values.clone();
        values.pop();
        GroupKey { values }
    }

    /// Display string of the last segment, used as a node label.
    pub fn last_display(&self) -> String {
        self.values.last().map(|v| v.display()).unwrap_or_default()
    }
}

/// Accumulator for computing aggregates incrementally.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    sum: f64,
    count: u64,
    count_numbers: u64,
    min: Option<f64>,
    max: Option<f64>,
}

impl Accumulator {
    /// Adds a valid numeric measure value.
    fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.count_numbers += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Adds a row whose measure value is missing or fails numeric coercion
    /// (only increments the row count).
    fn add_non_number(&mut self) {
        self.count += 1;
    }

    /// Computes the final aggregate value.
    ///
    /// Over a group with zero valid numeric measure values, `Sum` is 0 and
    /// `Count` is the row count, while `Mean`/`Max`/`Min` have no defined
    /// value and fail with `EmptyGroup`.
    fn compute(&self, reducer: Reducer, measure: &str) -> Result<f64, DrillError> {
        match reducer {
            Reducer::Sum => Ok(self.sum),
            Reducer::Count => Ok(self.count as f64),
            Reducer::Mean => {
                if self.count_numbers > 0 {
                    Ok(self.sum / self.count_numbers as f64)
                } else {
                    Err(DrillError::EmptyGroup {
                        column: measure.to_string(),
                    })
                }
            }
            Reducer::Max => self.max.ok_or_else(|| DrillError::EmptyGroup {
                column: measure.to_string(),
            }),
            Reducer::Min => self.min.ok_or_else(|| DrillError::EmptyGroup {
                column: measure.to_string(),
            }),
        }
    }
}

/// Groups records by the distinct combinations of `group_columns` values
/// and reduces `measure` within each group.
///
/// Keys appear in first-seen order (insertion order of the first occurrence
/// in the input). A record with a missing value in any group column is
/// excluded from the grouping entirely; there is no synthetic "N/A" bucket,
/// callers that want one pre-fill a marker value into the dataset.
///
/// `Sum`/`Mean`/`Max`/`Min` aggregate only records whose measure value
/// coerces to a number; `Count` counts every record in the group regardless
/// of measure validity. An empty `group_columns` list degenerates to a
/// single grand-total group keyed by the empty tuple.
///
/// Fails with `UnknownColumn` if `measure` or any group column is absent,
/// and with `NonNumericMeasure` if the reducer needs numeric input but the
/// measure column is categorical (`Count` never looks at the measure and
/// is allowed on any column).
pub fn group_reduce<S: AsRef<str>>(
    dataset: &Dataset,
    group_columns: &[S],
    measure: &str,
    reducer: Reducer,
) -> Result<Vec<(GroupKey, f64)>, DrillError> {
    let (measure_idx, measure_column) = dataset.require_column(measure)?;
    if reducer != Reducer::Count && measure_column.kind == ColumnKind::Categorical {
        return Err(DrillError::NonNumericMeasure {
            column: measure_column.name.clone(),
        });
    }

    let mut group_indices = Vec::with_capacity(group_columns.len());
    for name in group_columns {
        let (idx, _) = dataset.require_column(name.as_ref())?;
        group_indices.push(idx);
    }

    // Map for O(1) lookup plus a vec for first-seen order.
    let mut accumulators: FxHashMap<GroupKey, Accumulator> = FxHashMap::default();
    let mut order: Vec<GroupKey> = Vec::new();

    'records: for record in dataset.records() {
        let mut values: SmallVec<[KeyValue; 4]> = SmallVec::with_capacity(group_indices.len());
        for &idx in &group_indices {
            let value = &record.values[idx];
            if value.is_missing() {
                continue 'records;
            }
            values.push(KeyValue::from(value));
        }

        let acc = match accumulators.entry(GroupKey::new(values)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(Accumulator::default())
            }
        };

        match record.values[measure_idx].as_number() {
            Some(n) => acc.add_number(n),
            None => acc.add_non_number(),
        }
    }

    order
        .into_iter()
        .map(|key| {
            let value = accumulators[&key].compute(reducer, &measure_column.name)?;
            Ok((key, value))
        })
        .collect()
}
