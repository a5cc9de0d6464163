//! Neo4j connection client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query, Row};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::record::{StoreRecord, StoreValue};
use crate::store::{CypherQuery, GraphCounts, GraphStore, QueryParam};

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "adgraph_dev".to_string(),
            database: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 200,
        }
    }
}

/// Client for the knowledge graph. Cheap to clone; clones share one pool.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs builds its pool lazily, so a `RETURN 1` ping forces the bolt
    /// handshake here and an unreachable server fails at startup rather
    /// than on the first request.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        Ok(Self { graph })
    }

    /// Execute a Cypher statement that returns no results.
    pub async fn execute(&self, query: Query) -> Result<()> {
        self.graph.run(query).await.context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return raw rows.
    ///
    /// The pooled connection is held by the row stream and goes back to
    /// the pool when the stream is dropped, including on cancellation.
    pub async fn query(&self, query: Query) -> Result<Vec<Row>> {
        let mut result = self.graph.execute(query).await.context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Some(row) = result.next().await.context("Failed to read Neo4j result row")? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn query_count(&self, cypher: &str) -> Result<usize> {
        let rows = self.query(Query::new(cypher.to_string())).await?;
        let count: i64 = match rows.first() {
            Some(row) => row
                .get("count")
                .map_err(|e| anyhow::anyhow!("Failed to get field 'count': {:?}", e))?,
            None => 0,
        };
        Ok(count.max(0) as usize)
    }
}

/// Translate a store-neutral query into a neo4rs query.
fn to_neo4j(query: &CypherQuery) -> Query {
    query
        .params
        .iter()
        .fold(Query::new(query.text.clone()), |q, (key, value)| match value {
            QueryParam::Text(s) => q.param(key, s.as_str()),
            QueryParam::Int(i) => q.param(key, *i),
            QueryParam::TextList(list) => q.param(key, list.clone()),
        })
}

/// Decode the requested columns of one row. A column that cannot be read
/// becomes `Null` rather than failing the whole result.
fn decode_row(row: &Row, columns: &[&'static str]) -> StoreRecord {
    columns
        .iter()
        .map(|column| {
            let value = row.get::<Value>(column).unwrap_or_else(|e| {
                warn!(column, error = ?e, "Failed to decode result column");
                Value::Null
            });
            (column.to_string(), StoreValue::classify(value))
        })
        .collect()
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn fetch(&self, query: &CypherQuery) -> Result<Vec<StoreRecord>> {
        debug!(columns = ?query.columns, params = query.params.len(), "Running graph query");
        let rows = self.query(to_neo4j(query)).await?;
        Ok(rows.iter().map(|row| decode_row(row, &query.columns)).collect())
    }

    async fn counts(&self) -> Result<GraphCounts> {
        Ok(GraphCounts {
            nodes: self.query_count("MATCH (n) RETURN count(n) AS count").await?,
            relationships: self.query_count("MATCH ()-[r]->() RETURN count(r) AS count").await?,
        })
    }
}
