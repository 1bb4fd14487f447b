//! FILENAME: dataset/src/lib.rs
//! PURPOSE: Main library entry point for the dataset crate.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod column;
pub mod error;
pub mod filter;
pub mod table;
pub mod value;

// Re-export commonly used types at the crate root
pub use column::{Column, ColumnKind};
pub use error::DatasetError;
pub use filter::FilterSpec;
pub use table::{Dataset, Record};
pub use value::{DataValue, KeyValue, OrderedFloat};

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_dataset() -> Dataset {
        Dataset::from_rows(
            vec!["Region", "Country", "Sales"],
            vec![
                vec![
                    DataValue::text("East"),
                    DataValue::text("US"),
                    DataValue::number(10.0),
                ],
                vec![
                    DataValue::text("East"),
                    DataValue::text("US"),
                    DataValue::number(5.0),
                ],
                vec![
                    DataValue::text("West"),
                    DataValue::text("CA"),
                    DataValue::number(7.0),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn it_classifies_columns() {
        let ds = sales_dataset();
        assert_eq!(ds.column("Region").unwrap().kind, ColumnKind::Categorical);
        assert_eq!(ds.column("Sales").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(
            ds.value(&ds.records()[0], "Country"),
            Some(&DataValue::text("US"))
        );
        assert_eq!(ds.value(&ds.records()[0], "Profit"), None);
    }

    #[test]
    fn it_classifies_numeric_text_as_numeric() {
        let ds = Dataset::from_rows(
            vec!["Year"],
            vec![
                vec![DataValue::text("2023")],
                vec![DataValue::text("-1.5e3")],
                vec![DataValue::Missing],
            ],
        )
        .unwrap();
        assert_eq!(ds.column("Year").unwrap().kind, ColumnKind::Numeric);
    }

    #[test]
    fn it_classifies_all_missing_as_categorical() {
        let ds = Dataset::from_rows(
            vec!["Empty"],
            vec![vec![DataValue::Missing], vec![DataValue::Missing]],
        )
        .unwrap();
        assert_eq!(ds.column("Empty").unwrap().kind, ColumnKind::Categorical);
    }

    #[test]
    fn it_rejects_duplicate_columns() {
        let result = Dataset::from_rows(vec!["A", "A"], vec![]);
        assert_eq!(
            result.unwrap_err(),
            DatasetError::DuplicateColumn("A".to_string())
        );
    }

    #[test]
    fn it_rejects_ragged_rows() {
        let result = Dataset::from_rows(
            vec!["A", "B"],
            vec![vec![DataValue::number(1.0)]],
        );
        assert!(matches!(
            result.unwrap_err(),
            DatasetError::RowWidthMismatch {
                row: 0,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn it_scopes_preserving_row_identity() {
        let ds = sales_dataset();
        let scoped = ds.scope(&["Country", "Sales"]).unwrap();

        assert_eq!(scoped.columns().len(), 2);
        assert_eq!(scoped.len(), 3);
        // Kinds carried over, source rows intact
        assert_eq!(scoped.column("Sales").unwrap().kind, ColumnKind::Numeric);
        assert_eq!(scoped.records()[2].source_row, 2);
        assert_eq!(
            scoped.records()[0].values[0],
            DataValue::text("US")
        );
    }

    #[test]
    fn it_rejects_unknown_scope_column() {
        let ds = sales_dataset();
        assert_eq!(
            ds.scope(&["Region", "Profit"]).unwrap_err(),
            DatasetError::UnknownColumn("Profit".to_string())
        );
    }

    #[test]
    fn it_filters_numeric_ranges_inclusively() {
        let ds = sales_dataset();
        let filtered = ds
            .filter(&[FilterSpec::NumericRange {
                column: "Sales".to_string(),
                min: 7.0,
                max: 10.0,
            }])
            .unwrap();

        // Both bounds inclusive: 10 and 7 survive, 5 does not
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.records()[0].source_row, 0);
        assert_eq!(filtered.records()[1].source_row, 2);
    }

    #[test]
    fn it_filters_categorical_membership() {
        let ds = sales_dataset();
        let filtered = ds
            .filter(&[FilterSpec::OneOf {
                column: "Region".to_string(),
                allowed: vec!["East".to_string()],
            }])
            .unwrap();
        assert_eq!(filtered.len(), 2);

        // Case-sensitive: "east" matches nothing
        let none = ds
            .filter(&[FilterSpec::OneOf {
                column: "Region".to_string(),
                allowed: vec!["east".to_string()],
            }])
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn it_rejects_kind_mismatched_specs() {
        let ds = sales_dataset();
        let result = ds.filter(&[FilterSpec::NumericRange {
            column: "Region".to_string(),
            min: 0.0,
            max: 1.0,
        }]);
        assert_eq!(
            result.unwrap_err(),
            DatasetError::KindMismatch {
                column: "Region".to_string(),
                expected: ColumnKind::Numeric,
                actual: ColumnKind::Categorical,
            }
        );
    }

    #[test]
    fn it_filters_idempotently() {
        let ds = sales_dataset();
        let specs = vec![
            FilterSpec::OneOf {
                column: "Region".to_string(),
                allowed: vec!["East".to_string()],
            },
            FilterSpec::NumericRange {
                column: "Sales".to_string(),
                min: 0.0,
                max: 100.0,
            },
        ];

        let once = ds.filter(&specs).unwrap();
        let twice = once.filter(&specs).unwrap();

        assert_eq!(once.len(), twice.len());
        for (a, b) in once.records().iter().zip(twice.records()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn it_serializes_filter_specs() {
        let spec = FilterSpec::NumericRange {
            column: "Sales".to_string(),
            min: 6.0,
            max: 100.0,
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: FilterSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
