//! Decoded store values.
//!
//! Queries project every graph value into a map tagged with `kind`. Each
//! returned column is classified exactly once into a [`StoreValue`] before
//! any mapping happens.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// A node record as returned by the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNode {
    #[serde(deserialize_with = "identity")]
    pub identity: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Map<String, Value>,
}

/// A relationship record with its endpoint identities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRelationship {
    #[serde(deserialize_with = "identity")]
    pub identity: String,
    #[serde(deserialize_with = "identity")]
    pub start: String,
    #[serde(deserialize_with = "identity")]
    pub end: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Map<String, Value>,
}

/// A traversal path: its nodes and the relationships between them, in
/// traversal order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPath {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<RawNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: Vec<RawRelationship>,
}

impl RawPath {
    pub fn node(&self, identity: &str) -> Option<&RawNode> {
        self.nodes.iter().find(|n| n.identity == identity)
    }

    /// Segments as `(start, relationship, end)`, oriented by the stored
    /// relationship direction rather than the traversal direction.
    pub fn segments(&self) -> impl Iterator<Item = (Option<&RawNode>, &RawRelationship, Option<&RawNode>)> {
        self.relationships
            .iter()
            .map(move |rel| (self.node(&rel.start), rel, self.node(&rel.end)))
    }
}

/// One classified column value.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Node(RawNode),
    Relationship(RawRelationship),
    Path(RawPath),
    Scalar(Value),
    Null,
}

impl StoreValue {
    /// Classify a raw column value.
    ///
    /// Tagged maps that fail to decode degrade to `Null`.
    pub fn classify(value: Value) -> Self {
        let kind = value.get("kind").and_then(Value::as_str).map(str::to_owned);
        match (kind.as_deref(), value) {
            (_, Value::Null) => Self::Null,
            (Some("node"), value) => decode(value, "node", Self::Node),
            (Some("relationship"), value) => decode(value, "relationship", Self::Relationship),
            (Some("path"), value) => decode(value, "path", Self::Path),
            (_, value) => Self::Scalar(value),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

fn decode<T, F>(value: Value, kind: &str, wrap: F) -> StoreValue
where
    T: for<'de> Deserialize<'de>,
    F: FnOnce(T) -> StoreValue,
{
    match serde_json::from_value::<T>(value) {
        Ok(decoded) => wrap(decoded),
        Err(e) => {
            warn!(kind, error = %e, "Skipping malformed store value");
            StoreValue::Null
        }
    }
}

/// One result row: named, classified column values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreRecord {
    fields: Vec<(String, StoreValue)>,
}

impl StoreRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: StoreValue) -> Self {
        self.fields.push((column.into(), value));
        self
    }

    pub fn get(&self, column: &str) -> Option<&StoreValue> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn values(&self) -> impl Iterator<Item = &StoreValue> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut StoreValue> {
        self.fields.iter_mut().map(|(_, v)| v)
    }
}

impl FromIterator<(String, StoreValue)> for StoreRecord {
    fn from_iter<I: IntoIterator<Item = (String, StoreValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn identity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid identity: {}", other))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Numeric coercion. Counts and scores may arrive as plain numbers, numeric
// strings, or 64-bit integers split into `{low, high}` 32-bit halves.

/// Read a numeric value, normalizing integer wrappers. Non-finite values
/// are treated as absent.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Object(map) => {
            let low = map.get("low").and_then(Value::as_i64)?;
            let high = map.get("high").and_then(Value::as_i64)?;
            Some(high as f64 * 4_294_967_296.0 + (low as u32) as f64)
        }
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// Coerce a count. Missing, null, negative or non-numeric values are 0.
pub fn coerce_count(value: Option<&Value>) -> u32 {
    value
        .and_then(as_number)
        .filter(|n| *n > 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Coerce an optional score. Missing or non-numeric values stay absent.
pub fn coerce_score(value: Option<&Value>) -> Option<f64> {
    value.and_then(as_number)
}

pub fn coerce_int(value: Option<&Value>) -> Option<i64> {
    value.and_then(as_number).map(|n| n.trunc() as i64)
}

/// Replace integer wrappers anywhere inside a property value with plain
/// numbers.
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) if is_int_wrapper(&map) => as_number(&Value::Object(map))
            .map(|n| Value::from(n as i64))
            .unwrap_or(Value::Null),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_value(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        other => other,
    }
}

fn is_int_wrapper(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.contains_key("low") && map.contains_key("high")
}
