//! FILENAME: drilldown-engine/src/view.rs
//! Drill-Down View - Renderable output for a charting frontend.
//!
//! This module defines the tree the engine produces and its flat,
//! chart-facing serialization. It includes:
//! - Stable composite node identifiers (escape-and-join encoding)
//! - Tree nodes with parent→children linkage by identifier
//! - The top-level/drilldown series payload nested charts consume

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use dataset::{KeyValue, OrderedFloat};

use crate::error::DrillError;
use crate::group::GroupKey;

// ============================================================================
// NODE IDENTIFIERS
// ============================================================================

/// Separator between (column, value) segments in the encoded form.
const SEGMENT_SEPARATOR: char = '/';
/// Separator between a column name and its value within one segment.
const PAIR_SEPARATOR: char = '=';
/// Marks the value part of a segment as a number rather than text.
const NUMBER_TAG: char = '#';
/// Escape character; escapes itself, both separators, and the number tag.
const ESCAPE: char = '\\';

/// The value part of one `NodeId` segment.
///
/// Missing values never reach a node id: records with a missing drill value
/// are excluded from every grouping that column participates in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentValue {
    Number(OrderedFloat),
    Text(String),
}

impl SegmentValue {
    fn display(&self) -> String {
        match self {
            SegmentValue::Number(n) => KeyValue::Number(*n).display(),
            SegmentValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for SegmentValue {
    fn from(s: &str) -> Self {
        SegmentValue::Text(s.to_string())
    }
}

impl From<f64> for SegmentValue {
    fn from(n: f64) -> Self {
        SegmentValue::Number(OrderedFloat(n))
    }
}

/// A stable, collision-free identifier for one node of a drill tree.
///
/// The identity is the ordered list of `(column, value)` pairs addressing
/// the node, not a display string: equality and hashing are structural, so
/// two distinct nodes can never share an id, whatever characters their
/// values contain. `encode` renders an unambiguous string form for
/// serialization and chart payloads; `parse` is its exact inverse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    segments: Vec<(String, SegmentValue)>,
}

impl NodeId {
    pub fn from_segments(segments: Vec<(String, SegmentValue)>) -> Self {
        NodeId { segments }
    }

    /// Pairs a drill-column prefix with a group key's values.
    pub(crate) fn from_key(columns: &[String], key: &GroupKey) -> Self {
        let segments = columns
            .iter()
            .zip(key.values.iter())
            .map(|(column, value)| {
                let value = match value {
                    KeyValue::Number(n) => SegmentValue::Number(*n),
                    KeyValue::Text(s) => SegmentValue::Text(s.clone()),
                    // Records with missing drill values never enter a grouping
                    KeyValue::Missing => SegmentValue::Text(String::new()),
                };
                (column.clone(), value)
            })
            .collect();
        NodeId { segments }
    }

    pub fn segments(&self) -> &[(String, SegmentValue)] {
        &self.segments
    }

    /// The id of the prefix without the last segment (the parent node).
    pub fn parent(&self) -> NodeId {
        let mut segments = self.segments.clone();
        segments.pop();
        NodeId { segments }
    }

    /// Renders the unambiguous string form: segments joined with `/`,
    /// column and value joined with `=`, number values tagged with `#`,
    /// special characters escaped with `\`.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (i, (column, value)) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(SEGMENT_SEPARATOR);
            }
            push_escaped(&mut out, column);
            out.push(PAIR_SEPARATOR);
            match value {
                SegmentValue::Number(_) => {
                    out.push(NUMBER_TAG);
                    out.push_str(&value.display());
                }
                SegmentValue::Text(s) => push_escaped(&mut out, s),
            }
        }
        out
    }

    /// Parses an encoded id back into its segments.
    /// Inverts `encode`; structurally malformed input (unterminated
    /// escapes, segments without a value, bad number payloads) fails
    /// with `InvalidNodeId`.
    pub fn parse(input: &str) -> Result<NodeId, DrillError> {
        let invalid = || DrillError::InvalidNodeId {
            input: input.to_string(),
        };

        let mut segments = Vec::new();
        let mut column = String::new();
        let mut value = String::new();
        let mut in_value = false;
        let mut number_tagged = false;

        let finish_segment =
            |column: &mut String, value: &mut String, number_tagged: bool| -> Result<(String, SegmentValue), DrillError> {
                let parsed = if number_tagged {
                    let n: f64 = value.parse().map_err(|_| invalid())?;
                    SegmentValue::Number(OrderedFloat(n))
                } else {
                    SegmentValue::Text(std::mem::take(value))
                };
                value.clear();
                Ok((std::mem::take(column), parsed))
            };

        let mut chars = input.chars();
        while let Some(c) = chars.next() {
            match c {
                ESCAPE => {
                    let next = chars.next().ok_or_else(invalid)?;
                    if !matches!(next, ESCAPE | SEGMENT_SEPARATOR | PAIR_SEPARATOR | NUMBER_TAG) {
                        return Err(invalid());
                    }
                    if in_value { value.push(next) } else { column.push(next) }
                }
                PAIR_SEPARATOR => {
                    if in_value {
                        return Err(invalid());
                    }
                    in_value = true;
                }
                SEGMENT_SEPARATOR => {
                    if !in_value {
                        return Err(invalid());
                    }
                    segments.push(finish_segment(&mut column, &mut value, number_tagged)?);
                    in_value = false;
                    number_tagged = false;
                }
                NUMBER_TAG => {
                    // Only valid unescaped as the first character of a value
                    if !in_value || !value.is_empty() || number_tagged {
                        return Err(invalid());
                    }
                    number_tagged = true;
                }
                other => {
                    if in_value {
                        value.push(other)
                    } else {
                        column.push(other)
                    }
                }
            }
        }

        if !in_value {
            return Err(invalid());
        }
        segments.push(finish_segment(&mut column, &mut value, number_tagged)?);

        Ok(NodeId { segments })
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        if matches!(c, ESCAPE | SEGMENT_SEPARATOR | PAIR_SEPARATOR | NUMBER_TAG) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        NodeId::parse(&encoded).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TREE NODES
// ============================================================================

/// A single node of the drill tree. Created once per aggregation call and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Globally unique identifier within the tree.
    pub id: NodeId,

    /// Display label: the value of the node's own drill column.
    pub label: String,

    /// Sum of the measure over all records matching the node's full prefix.
    pub value: f64,

    /// 0-based depth in the drill path.
    pub level: usize,

    /// Key into `DrillTree::groups` for this node's children.
    /// Always the node's own id when present; absent at the deepest level.
    pub children_id: Option<NodeId>,
}

/// The complete multi-level aggregation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrillTree {
    /// Level-0 nodes in first-seen order.
    pub top_level: Vec<Node>,

    /// Child lists keyed by the parent node's id, each in first-seen order.
    /// Every non-terminal node owns exactly one entry here (possibly empty
    /// when all of its records lack the next drill column's value).
    pub groups: FxHashMap<NodeId, Vec<Node>>,
}

impl DrillTree {
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }

    /// Total number of nodes across all levels.
    pub fn node_count(&self) -> usize {
        self.top_level.len() + self.groups.values().map(Vec::len).sum::<usize>()
    }

    /// Flattens the tree into the chart series payload.
    ///
    /// Groups are emitted parent-before-child in first-seen order,
    /// independent of map iteration order.
    pub fn to_series(&self) -> DrillSeries {
        let top_level = self.top_level.iter().map(series_point).collect();

        let mut drilldown = Vec::with_capacity(self.groups.len());
        let mut pending: VecDeque<&NodeId> = self
            .top_level
            .iter()
            .filter_map(|n| n.children_id.as_ref())
            .collect();

        while let Some(id) = pending.pop_front() {
            if let Some(children) = self.groups.get(id) {
                drilldown.push(SeriesGroup {
                    id: id.clone(),
                    data: children.iter().map(series_point).collect(),
                });
                pending.extend(children.iter().filter_map(|n| n.children_id.as_ref()));
            }
        }

        DrillSeries {
            top_level,
            drilldown,
        }
    }
}

// ============================================================================
// CHART SERIES PAYLOAD
// ============================================================================

/// One point of a chart series: the label, the aggregated value, and the
/// id of the series to load when the point is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drilldown: Option<NodeId>,
}

/// The child series revealed by selecting one expandable point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGroup {
    pub id: NodeId,
    pub data: Vec<SeriesPoint>,
}

/// The flat payload a drilldown chart consumes: the top-level series plus
/// every child series, addressable by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillSeries {
    pub top_level: Vec<SeriesPoint>,
    pub drilldown: Vec<SeriesGroup>,
}

fn series_point(node: &Node) -> SeriesPoint {
    SeriesPoint {
        name: node.label.clone(),
        y: node.value,
        drilldown: node.children_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(pairs: &[(&str, &str)]) -> NodeId {
        NodeId::from_segments(
            pairs
                .iter()
                .map(|(c, v)| (c.to_string(), SegmentValue::from(*v)))
                .collect(),
        )
    }

    #[test]
    fn test_encode_roundtrip_plain() {
        let original = id(&[("Region", "East"), ("Country", "US")]);
        assert_eq!(original.encode(), "Region=East/Country=US");
        assert_eq!(NodeId::parse(&original.encode()).unwrap(), original);
    }

    #[test]
    fn test_encode_roundtrip_adversarial() {
        let ids = vec![
            id(&[("Region", "East/West")]),
            id(&[("Region", "East"), ("Country", "West")]),
            id(&[("Region", "East\\West")]),
            id(&[("Region", "a=b")]),
            id(&[("Region", "#5")]),
            id(&[("Region", "")]),
            id(&[("", "")]),
            id(&[("Re=gion", "Ea/st")]),
            NodeId::from_segments(vec![("Region".to_string(), SegmentValue::from(5.0))]),
            id(&[("Region", "5")]),
        ];

        // All encodings distinct, every one parses back to its source
        for (i, a) in ids.iter().enumerate() {
            assert_eq!(&NodeId::parse(&a.encode()).unwrap(), a);
            for b in &ids[i + 1..] {
                assert_ne!(a.encode(), b.encode(), "collision between distinct ids");
            }
        }
    }

    #[test]
    fn test_number_and_text_ids_are_distinct() {
        let number = NodeId::from_segments(vec![("Sales".to_string(), SegmentValue::from(5.0))]);
        let text = id(&[("Sales", "5")]);
        assert_ne!(number, text);
        assert_eq!(number.encode(), "Sales=#5");
        assert_eq!(text.encode(), "Sales=5");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in ["", "Region", "Region=East/", "Region=East/Country", "a=\\", "a=\\x", "a=b#c", "a=#", "a=#x", "a#=b"] {
            assert!(
                matches!(NodeId::parse(input), Err(DrillError::InvalidNodeId { .. })),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parent_drops_last_segment() {
        let child = id(&[("Region", "East"), ("Country", "US")]);
        assert_eq!(child.parent(), id(&[("Region", "East")]));
    }

    #[test]
    fn test_node_id_serde_as_string() {
        let original = id(&[("Region", "East"), ("Country", "U/S")]);
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, "\"Region=East/Country=U\\\\/S\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_series_payload_shape() {
        let east = id(&[("Region", "East")]);
        let tree = DrillTree {
            top_level: vec![Node {
                id: east.clone(),
                label: "East".to_string(),
                value: 15.0,
                level: 0,
                children_id: Some(east.clone()),
            }],
            groups: [(
                east.clone(),
                vec![Node {
                    id: id(&[("Region", "East"), ("Country", "US")]),
                    label: "US".to_string(),
                    value: 15.0,
                    level: 1,
                    children_id: None,
                }],
            )]
            .into_iter()
            .collect(),
        };

        let series = tree.to_series();
        let json = serde_json::to_value(&series).unwrap();

        assert_eq!(json["top_level"][0]["name"], "East");
        assert_eq!(json["top_level"][0]["y"], 15.0);
        assert_eq!(json["top_level"][0]["drilldown"], "Region=East");
        assert_eq!(json["drilldown"][0]["id"], "Region=East");
        assert_eq!(json["drilldown"][0]["data"][0]["name"], "US");
        // Terminal points carry no drilldown key at all
        assert!(json["drilldown"][0]["data"][0].get("drilldown").is_none());
    }
}
