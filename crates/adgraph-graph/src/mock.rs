//! Scripted in-memory [`GraphStore`] for tests.
//!
//! Responses are queued and returned in order, one per `fetch`; an
//! exhausted queue answers with no rows. Every query received is recorded
//! so tests can assert on bounds and parameters.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::record::StoreRecord;
use crate::store::{CypherQuery, GraphCounts, GraphStore};

#[derive(Default)]
pub struct MockGraphStore {
    responses: Mutex<VecDeque<Result<Vec<StoreRecord>, String>>>,
    queries: Mutex<Vec<CypherQuery>>,
    counts: GraphCounts,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond(self, records: Vec<StoreRecord>) -> Self {
        self.push(Ok(records));
        self
    }

    /// Queue a store failure.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    pub fn with_counts(mut self, nodes: usize, relationships: usize) -> Self {
        self.counts = GraphCounts { nodes, relationships };
        self
    }

    /// Queries received so far, in order.
    pub fn queries(&self) -> Vec<CypherQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn push(&self, response: Result<Vec<StoreRecord>, String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn fetch(&self, query: &CypherQuery) -> Result<Vec<StoreRecord>> {
        self.queries
            .lock()
            .map_err(|_| anyhow!("mock query log poisoned"))?
            .push(query.clone());

        let next = self
            .responses
            .lock()
            .map_err(|_| anyhow!("mock response queue poisoned"))?
            .pop_front();

        match next {
            Some(Ok(records)) => Ok(records),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn counts(&self) -> Result<GraphCounts> {
        Ok(self.counts)
    }
}

/// Builders for store values, routed through the same decode step real
/// results take.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::record::{StoreRecord, StoreValue};

    /// `(identity, label, name)`
    pub type NodeFixture<'a> = (&'a str, &'a str, &'a str);

    fn node_json((identity, label, name): NodeFixture<'_>) -> Value {
        json!({
            "identity": identity,
            "labels": [label],
            "properties": {"name": name}
        })
    }

    pub fn node(identity: &str, label: &str, name: &str) -> StoreValue {
        let mut value = node_json((identity, label, name));
        value["kind"] = json!("node");
        StoreValue::classify(value)
    }

    /// A node with extra properties merged over its name.
    pub fn node_with(identity: &str, label: &str, name: &str, properties: Value) -> StoreValue {
        let mut value = node_json((identity, label, name));
        value["kind"] = json!("node");
        if let (Some(target), Some(extra)) = (value["properties"].as_object_mut(), properties.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        StoreValue::classify(value)
    }

    pub fn rel(identity: &str, start: &str, end: &str, rel_type: &str) -> Value {
        json!({
            "identity": identity,
            "start": start,
            "end": end,
            "type": rel_type,
            "properties": {}
        })
    }

    pub fn path(nodes: &[NodeFixture<'_>], relationships: &[Value]) -> StoreValue {
        StoreValue::classify(json!({
            "kind": "path",
            "nodes": nodes.iter().copied().map(node_json).collect::<Vec<_>>(),
            "relationships": relationships
        }))
    }

    pub fn scalar(value: Value) -> StoreValue {
        StoreValue::classify(value)
    }

    /// A single-column record.
    pub fn row(column: &str, value: StoreValue) -> StoreRecord {
        StoreRecord::new().with(column, value)
    }
}
