//! FILENAME: dataset/src/error.rs

use thiserror::Error;

use crate::column::ColumnKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Filter kind mismatch on column '{column}': predicate expects a {expected} column, found {actual}")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Row {row} has {actual} values, schema declares {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
