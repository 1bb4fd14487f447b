//! FILENAME: dataset/src/table.rs
//! PURPOSE: The `Dataset` container: ordered records plus the column schema.
//! CONTEXT: A dataset is an immutable snapshot. Construction validates the
//! schema invariants (unique names, rectangular rows) and classifies every
//! column; all later operations (`scope`, `filter`, aggregation) read from
//! the snapshot and allocate fresh datasets rather than mutating it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::column::{classify_values, Column};
use crate::error::DatasetError;
use crate::value::DataValue;

/// A single row from the source data, values in schema order.
/// `source_row` is the original 0-based row index, preserved across scoping
/// and filtering so callers can join results back to their source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub source_row: u32,
    pub values: Vec<DataValue>,
}

/// An ordered collection of records with a typed column schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    column_indices: FxHashMap<String, usize>,
    records: Vec<Record>,
}

impl Dataset {
    /// Builds a dataset from column names and row values, classifying each
    /// column's kind from its values.
    ///
    /// Fails with `DuplicateColumn` if two columns share a name and with
    /// `RowWidthMismatch` if any row does not have exactly one value per
    /// declared column.
    pub fn from_rows<N: Into<String>>(
        names: Vec<N>,
        rows: Vec<Vec<DataValue>>,
    ) -> Result<Dataset, DatasetError> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        let mut column_indices = FxHashMap::default();
        for (i, name) in names.iter().enumerate() {
            if column_indices.insert(name.clone(), i).is_some() {
                return Err(DatasetError::DuplicateColumn(name.clone()));
            }
        }

        for (row, values) in rows.iter().enumerate() {
            if values.len() != names.len() {
                return Err(DatasetError::RowWidthMismatch {
                    row,
                    expected: names.len(),
                    actual: values.len(),
                });
            }
        }

        let columns = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let kind = classify_values(rows.iter().map(|r| &r[i]));
                Column::new(name.clone(), kind)
            })
            .collect();

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| Record {
                source_row: i as u32,
                values,
            })
            .collect();

        Ok(Dataset {
            columns,
            column_indices,
            records,
        })
    }

    /// The ordered column schema.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Looks up a column's position in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_indices.get(name).copied()
    }

    /// Resolves a column by name or fails with `UnknownColumn`.
    pub fn require_column(&self, name: &str) -> Result<(usize, &Column), DatasetError> {
        match self.column_index(name) {
            Some(i) => Ok((i, &self.columns[i])),
            None => Err(DatasetError::UnknownColumn(name.to_string())),
        }
    }

    /// The ordered records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The value a record holds for a named column, if the column exists.
    pub fn value<'a>(&self, record: &'a Record, name: &str) -> Option<&'a DataValue> {
        self.column_index(name).map(|i| &record.values[i])
    }

    /// Projects the dataset to the named columns, preserving record order
    /// and `source_row` identity. Column kinds are carried over from the
    /// original classification, not recomputed.
    ///
    /// Fails with `UnknownColumn` if any requested column is absent and
    /// with `DuplicateColumn` if a column is requested twice.
    pub fn scope<S: AsRef<str>>(&self, names: &[S]) -> Result<Dataset, DatasetError> {
        let mut picked: Vec<usize> = Vec::with_capacity(names.len());
        let mut column_indices = FxHashMap::default();
        let mut columns = Vec::with_capacity(names.len());

        for name in names {
            let (idx, column) = self.require_column(name.as_ref())?;
            if column_indices
                .insert(column.name.clone(), columns.len())
                .is_some()
            {
                return Err(DatasetError::DuplicateColumn(column.name.clone()));
            }
            picked.push(idx);
            columns.push(column.clone());
        }

        let records = self
            .records
            .iter()
            .map(|record| Record {
                source_row: record.source_row,
                values: picked.iter().map(|&i| record.values[i].clone()).collect(),
            })
            .collect();

        Ok(Dataset {
            columns,
            column_indices,
            records,
        })
    }

    /// Internal constructor for operations that keep the schema but replace
    /// the record list (filtering).
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            column_indices: self.column_indices.clone(),
            records,
        }
    }
}
