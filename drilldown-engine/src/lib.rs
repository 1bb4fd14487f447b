//! FILENAME: drilldown-engine/src/lib.rs
//! Drill-down aggregation subsystem.
//!
//! This crate turns a typed tabular dataset into a hierarchical,
//! multi-level aggregation suitable for nested drill-down charts. It
//! depends on `dataset` only for the data model (values, columns,
//! scoping and filtering).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the drill-down IS)
//! - `group`: Group-and-reduce primitives (HOW we aggregate)
//! - `view`: Renderable output for the frontend (WHAT we display)
//! - `engine`: Tree construction (HOW we calculate)

pub mod definition;
pub mod engine;
pub mod error;
pub mod group;
pub mod view;

pub use definition::{DrillRequest, Reducer};
pub use engine::{build_drill_tree, prepare_table, run, DrillResponse};
pub use error::DrillError;
pub use group::{group_reduce, GroupKey};
pub use view::{
    DrillSeries, DrillTree, Node, NodeId, SegmentValue, SeriesGroup, SeriesPoint,
};
