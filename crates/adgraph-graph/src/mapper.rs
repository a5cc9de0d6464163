//! Entity mapping: one raw store record to one client node or link.
//!
//! Pure functions. Malformed records are defaulted, never rejected.

use adgraph_core::{GraphLink, GraphNode, NodeType, RelType, UNKNOWN_LABEL};
use serde_json::{Map, Value};

use crate::record::{coerce_int, coerce_score, normalize_value, RawNode, RawRelationship};

/// Read a non-blank text property. Numbers are rendered as text.
fn text_prop(props: &Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolve the node type from the first label on the record.
pub fn node_type(raw: &RawNode) -> NodeType {
    let name = text_prop(&raw.properties, "name");
    raw.labels
        .first()
        .map(|label| NodeType::from_label(label, name.as_deref()))
        .unwrap_or(NodeType::Person)
}

/// The identity key of a node: display name, then internal key, then the
/// store identity.
pub fn node_key(raw: &RawNode) -> String {
    text_prop(&raw.properties, "name")
        .or_else(|| text_prop(&raw.properties, "key"))
        .unwrap_or_else(|| raw.identity.clone())
}

/// The stable client id of a node.
pub fn node_id(raw: &RawNode) -> String {
    GraphNode::make_id(node_type(raw), &node_key(raw))
}

/// Whether a record is flagged as anonymized.
pub fn is_anonymized(raw: &RawNode) -> bool {
    match raw.properties.get("anonymized") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

pub fn map_node(raw: &RawNode) -> GraphNode {
    let props = &raw.properties;
    let label = text_prop(props, "name")
        .or_else(|| text_prop(props, "title"))
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string());

    GraphNode {
        label,
        degree: 0,
        verdict: text_prop(props, "verdict"),
        confidence: text_prop(props, "confidence"),
        rank_score: coerce_score(props.get("rank_score")),
        centrality: coerce_score(props.get("pagerank")),
        community: coerce_int(props.get("community_id")),
        lat: coerce_score(props.get("lat")),
        lng: coerce_score(props.get("lng")),
        city: text_prop(props, "city"),
        country: text_prop(props, "country"),
        year: coerce_int(props.get("year")),
        month: coerce_int(props.get("month")),
        feature_id: coerce_int(props.get("feature_id")),
        ..GraphNode::new(node_type(raw), &node_key(raw), String::new())
    }
}

/// Build a link between two already-mapped node ids.
pub fn map_link(raw: &RawRelationship, source: String, target: String) -> GraphLink {
    let properties = raw
        .properties
        .iter()
        .map(|(k, v)| (k.clone(), normalize_value(v.clone())))
        .collect();

    GraphLink {
        source,
        target,
        rel_type: RelType::from_store(&raw.rel_type),
        properties,
    }
}
