//! FILENAME: drilldown-engine/src/error.rs

use thiserror::Error;

use dataset::DatasetError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrillError {
    /// Schema errors from scoping and filtering (`UnknownColumn`,
    /// `KindMismatch`, ...) pass through unchanged.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Non-numeric measure: column '{column}' is categorical")]
    NonNumericMeasure { column: String },

    #[error("Invalid drill path: {reason}")]
    InvalidDrillPath { reason: String },

    #[error("Empty group: no valid numeric values for measure '{column}' in a group")]
    EmptyGroup { column: String },

    #[error("Invalid node id: '{input}'")]
    InvalidNodeId { input: String },
}
