//! Store boundary: the query shape handed to the graph store and the trait
//! every store implementation satisfies.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::record::StoreRecord;

/// A typed query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Int(i64),
    TextList(Vec<String>),
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for QueryParam {
    fn from(value: Vec<String>) -> Self {
        Self::TextList(value)
    }
}

/// A parameterized Cypher query together with the result columns to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    pub text: String,
    pub params: Vec<(&'static str, QueryParam)>,
    pub columns: Vec<&'static str>,
}

impl CypherQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<QueryParam>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Result columns, in the order they are decoded.
    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.columns = columns.to_vec();
        self
    }

    pub fn param_value(&self, key: &str) -> Option<&QueryParam> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

/// Read access to a property-graph store.
///
/// Each call is one bounded query against a short-lived session; nothing
/// is cached between calls.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a query and decode every row.
    async fn fetch(&self, query: &CypherQuery) -> Result<Vec<StoreRecord>>;

    /// Node and relationship counts for status display.
    async fn counts(&self) -> Result<GraphCounts>;
}
