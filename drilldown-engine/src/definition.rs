//! FILENAME: drilldown-engine/src/definition.rs
//! Drill-Down Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a drill-down
//! computation. These structures are designed to be:
//! - Serializable (for requests arriving from a presentation layer)
//! - Immutable snapshots of caller intent

use serde::{Deserialize, Serialize};

use dataset::FilterSpec;

/// Supported aggregation functions for the standalone group-reduce.
///
/// The drill-down tree always aggregates with `Sum`; the other reducers are
/// available through `group_reduce` for single-level use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reducer {
    Sum,
    Mean,
    Count,
    Max,
    Min,
}

impl Default for Reducer {
    fn default() -> Self {
        Reducer::Sum
    }
}

/// The complete, serializable description of a drill-down computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillRequest {
    /// Optional projection: restrict the dataset to these columns before
    /// anything else happens.
    #[serde(default)]
    pub scope: Option<Vec<String>>,

    /// Predicates applied as an AND conjunction after scoping.
    #[serde(default)]
    pub filters: Vec<FilterSpec>,

    /// The drill hierarchy, outermost column first.
    /// At least two distinct columns, all present in the (scoped) schema.
    pub drill_path: Vec<String>,

    /// The numeric column whose sum is aggregated at every level.
    pub measure: String,
}

impl DrillRequest {
    /// Creates a request with no scope and no filters.
    pub fn new<S: Into<String>>(drill_path: Vec<S>, measure: impl Into<String>) -> Self {
        DrillRequest {
            scope: None,
            filters: Vec::new(),
            drill_path: drill_path.into_iter().map(Into::into).collect(),
            measure: measure.into(),
        }
    }

    pub fn with_scope<S: Into<String>>(mut self, scope: Vec<S>) -> Self {
        self.scope = Some(scope.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterSpec>) -> Self {
        self.filters = filters;
        self
    }
}
