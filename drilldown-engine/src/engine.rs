//! FILENAME: drilldown-engine/src/engine.rs
//! Drill-Down Engine - builds the multi-level aggregation tree.
//!
//! This module takes a Dataset (data) and a DrillRequest (configuration)
//! and produces a DrillTree (nested aggregation ready for rendering).
//!
//! Algorithm:
//! 1. Scope and filter the dataset per the request
//! 2. Validate the drill path and measure against the scoped schema
//! 3. For each level, group-reduce by the cumulative prefix of drill columns
//! 4. Wire each level's nodes into its parent's child list by node id

use serde::{Deserialize, Serialize};

use dataset::{ColumnKind, Dataset};

use crate::definition::{DrillRequest, Reducer};
use crate::error::DrillError;
use crate::group::group_reduce;
use crate::view::{DrillTree, Node, NodeId};

/// The tree together with the scoped, filtered table it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillResponse {
    pub tree: DrillTree,
    pub table: Dataset,
}

/// Applies the request's scope and filters, returning the flat table the
/// tree is computed from. Record order and `source_row` identity are
/// preserved; an empty result is a dataset, not an error.
pub fn prepare_table(dataset: &Dataset, request: &DrillRequest) -> Result<Dataset, DrillError> {
    let scoped = match &request.scope {
        Some(columns) => dataset.scope(columns)?,
        None => dataset.clone(),
    };
    Ok(scoped.filter(&request.filters)?)
}

/// Builds the drill-down tree for a request.
///
/// Composes scope → filter → per-level prefix aggregation. Validation
/// completes before any aggregation begins, so failure is atomic: either a
/// complete tree is returned or none is. An empty filtered dataset yields
/// an empty tree.
pub fn build_drill_tree(
    dataset: &Dataset,
    request: &DrillRequest,
) -> Result<DrillTree, DrillError> {
    let table = prepare_table(dataset, request)?;
    validate_request(&table, request)?;
    build_tree_from_table(&table, request)
}

/// Builds the tree and returns it together with the prepared flat table,
/// for callers that also display the filtered data.
pub fn run(dataset: &Dataset, request: &DrillRequest) -> Result<DrillResponse, DrillError> {
    let table = prepare_table(dataset, request)?;
    validate_request(&table, request)?;
    let tree = build_tree_from_table(&table, request)?;
    Ok(DrillResponse { tree, table })
}

/// Validates the drill path and measure against the scoped schema.
fn validate_request(table: &Dataset, request: &DrillRequest) -> Result<(), DrillError> {
    if request.drill_path.len() < 2 {
        return Err(DrillError::InvalidDrillPath {
            reason: format!(
                "at least two columns required, got {}",
                request.drill_path.len()
            ),
        });
    }
    for (i, name) in request.drill_path.iter().enumerate() {
        if table.column(name).is_none() {
            return Err(DrillError::InvalidDrillPath {
                reason: format!("column '{}' is not in the dataset", name),
            });
        }
        if request.drill_path[..i].contains(name) {
            return Err(DrillError::InvalidDrillPath {
                reason: format!("column '{}' appears more than once", name),
            });
        }
    }

    let (_, measure) = table.require_column(&request.measure)?;
    if measure.kind != ColumnKind::Numeric {
        return Err(DrillError::NonNumericMeasure {
            column: measure.name.clone(),
        });
    }
    Ok(())
}

fn build_tree_from_table(table: &Dataset, request: &DrillRequest) -> Result<DrillTree, DrillError> {
    let path = &request.drill_path;
    let last_level = path.len() - 1;

    let mut tree = DrillTree::default();

    for level in 0..path.len() {
        let prefix = &path[..=level];

        // Each level is an independent aggregation over the cumulative
        // column prefix, never derived from its children.
        let grouped = group_reduce(table, prefix, &request.measure, Reducer::Sum)?;

        for (key, value) in grouped {
            let id = NodeId::from_key(prefix, &key);
            let children_id = if level < last_level {
                // The id doubles as the key into `groups` for the children;
                // register the (possibly empty) child list up front so every
                // children_id resolves.
                tree.groups.entry(id.clone()).or_default();
                Some(id.clone())
            } else {
                None
            };

            let node = Node {
                label: key.last_display(),
                value,
                level,
                children_id,
                id: id.clone(),
            };

            if level == 0 {
                tree.top_level.push(node);
            } else {
                let parent_id = id.parent();
                tree.groups
                    .entry(parent_id)
                    .or_default()
                    .push(node);
            }
        }
    }

    Ok(tree)
}
