//! Graph-shaped presets.
//!
//! Every query projects paths (and occasionally bare nodes) through
//! [`cypher`](super::cypher) and is folded by the normalizer. Variable
//! length bounds are interpolated from clamped integers; all user input
//! travels as parameters.

use std::collections::HashSet;

use adgraph_core::GraphData;
use anyhow::{Context, Result};
use tracing::debug;

use super::cypher::{node_map, path_map};
use super::*;
use crate::normalize::normalize;
use crate::record::{StoreRecord, StoreValue};
use crate::store::{CypherQuery, GraphStore};

/// Subgraph within `depth` hops of the named subject. The subject alone is
/// returned when it has no links; an absent subject yields an empty graph.
pub async fn ego_network(store: &dyn GraphStore, name: &str, depth: u32) -> Result<GraphData> {
    let depth = depth.clamp(EGO_MIN_DEPTH, EGO_MAX_DEPTH);
    let query = CypherQuery::new(format!(
        "MATCH (center) WHERE center.name = $name
         WITH center LIMIT 1
         OPTIONAL MATCH p = (center)-[*1..{depth}]-(other)
         WITH center, p LIMIT $limit
         RETURN {center} AS center, {path} AS path",
        center = node_map("center"),
        path = path_map("p"),
    ))
    .param("name", normalize_name(name))
    .param("limit", EGO_ROW_LIMIT)
    .columns(&["center", "path"]);

    let records = store.fetch(&query).await.context("Ego network query failed")?;
    Ok(normalize(&records))
}

/// Shortest path of at most [`SHORTEST_PATH_MAX_HOPS`] between two
/// subjects. A subject paired with itself is a single-node graph.
pub async fn shortest_path(store: &dyn GraphStore, from: &str, to: &str) -> Result<GraphData> {
    let from = normalize_name(from);
    let to = normalize_name(to);

    if from == to {
        let query = CypherQuery::new(format!(
            "MATCH (n) WHERE n.name = $name
             WITH n LIMIT 1
             RETURN {node} AS node",
            node = node_map("n"),
        ))
        .param("name", from)
        .columns(&["node"]);

        let records = store.fetch(&query).await.context("Subject lookup failed")?;
        return Ok(normalize(&records));
    }

    let query = CypherQuery::new(format!(
        "MATCH (a) WHERE a.name = $from
         MATCH (b) WHERE b.name = $to
         WITH a, b LIMIT 1
         MATCH p = shortestPath((a)-[*..{hops}]-(b))
         RETURN {path} AS path",
        hops = SHORTEST_PATH_MAX_HOPS,
        path = path_map("p"),
    ))
    .param("from", from)
    .param("to", to)
    .columns(&["path"]);

    let records = store.fetch(&query).await.context("Shortest path query failed")?;
    Ok(normalize(&records))
}

/// People who hired the same designer. The pairing is capped before the
/// display paths are expanded.
pub async fn shared_designers(store: &dyn GraphStore) -> Result<GraphData> {
    let query = CypherQuery::new(format!(
        "MATCH (a:Person)-[:HIRED]->(d:Designer)<-[:HIRED]-(b:Person)
         WHERE elementId(a) < elementId(b)
         WITH a, d, b LIMIT $limit
         MATCH p = (a)-[:HIRED]->(d)<-[:HIRED]-(b)
         RETURN {path} AS path",
        path = path_map("p"),
    ))
    .param("limit", SHARED_TRIPLE_LIMIT)
    .columns(&["path"]);

    let records = store.fetch(&query).await.context("Shared designer query failed")?;
    Ok(normalize(&records))
}

/// The `limit` highest-degree entities with their neighborhoods. Ties keep
/// the store's native order.
///
/// Every ranked hub is returned as its own column, so a hub shows up even
/// when its neighborhood is cut. The [`HUB_NEIGHBORHOOD_LIMIT`] ceiling is
/// shared out evenly, one slice per hub.
pub async fn hub_ranking(store: &dyn GraphStore, limit: u32) -> Result<GraphData> {
    let limit = limit.clamp(1, HUB_MAX_LIMIT);
    let query = CypherQuery::new(format!(
        "MATCH (h)
         WITH h, size([(h)--() | 1]) AS degree
         ORDER BY degree DESC
         LIMIT $limit
         CALL {{
           WITH h
           OPTIONAL MATCH p = (h)--(neighbor)
           RETURN p LIMIT $per_hub
         }}
         RETURN {hub} AS hub, {path} AS path",
        hub = node_map("h"),
        path = path_map("p"),
    ))
    .param("limit", i64::from(limit))
    .param("per_hub", hub_neighbors_per_hub(limit))
    .columns(&["hub", "path"]);

    let records = store.fetch(&query).await.context("Hub ranking query failed")?;
    Ok(normalize(&records))
}

fn hub_neighbors_per_hub(limit: u32) -> i64 {
    (HUB_NEIGHBORHOOD_LIMIT / i64::from(limit.max(1))).max(1)
}

/// People appearing in the Epstein source documents, with the designers
/// they hired.
pub async fn epstein_subgraph(store: &dyn GraphStore) -> Result<GraphData> {
    let query = CypherQuery::new(format!(
        "MATCH p = (person:Person)-[:APPEARS_IN]->(:EpsteinSource)
         OPTIONAL MATCH q = (person)-[:HIRED]->(:Designer)
         WITH p, q LIMIT $limit
         RETURN {appearance} AS appearance, {hire} AS hire",
        appearance = path_map("p"),
        hire = path_map("q"),
    ))
    .param("limit", TAGGED_ROW_LIMIT)
    .columns(&["appearance", "hire"]);

    let records = store.fetch(&query).await.context("Epstein subgraph query failed")?;
    Ok(normalize(&records))
}

/// Sample of seeds with degree above [`SAMPLE_MIN_DEGREE`], expanded one
/// hop. Both stages are capped.
pub async fn full_graph_sample(store: &dyn GraphStore) -> Result<GraphData> {
    let query = CypherQuery::new(format!(
        "MATCH (n)
         WITH n, size([(n)--() | 1]) AS degree
         WHERE degree > $min_degree
         WITH n LIMIT $seeds
         MATCH p = (n)--(m)
         WITH p LIMIT $limit
         RETURN {path} AS path",
        path = path_map("p"),
    ))
    .param("min_degree", SAMPLE_MIN_DEGREE)
    .param("seeds", SAMPLE_SEED_COUNT)
    .param("limit", SAMPLE_EXPANSION_LIMIT)
    .columns(&["path"]);

    let records = store.fetch(&query).await.context("Graph sample query failed")?;
    Ok(normalize(&records))
}

/// Confirmed matches and only the links between two confirmed matches.
///
/// Two passes: collect the qualifying identities, then query edges among
/// them. Paths that leave the qualifying set are discarded before
/// normalization.
pub async fn confirmed_network(store: &dyn GraphStore) -> Result<GraphData> {
    let collect = CypherQuery::new(
        "MATCH (n) WHERE toLower(coalesce(n.verdict, '')) = $verdict
         RETURN elementId(n) AS id
         LIMIT $limit",
    )
    .param("verdict", CONFIRMED_VERDICT)
    .param("limit", CONFIRMED_NODE_LIMIT)
    .columns(&["id"]);

    let ids: Vec<String> = store
        .fetch(&collect)
        .await
        .context("Confirmed node query failed")?
        .iter()
        .filter_map(|record| record.get("id").and_then(StoreValue::as_str).map(str::to_string))
        .collect();

    if ids.is_empty() {
        return Ok(GraphData::default());
    }
    debug!(qualifying = ids.len(), "Collected confirmed nodes");

    let edges = CypherQuery::new(format!(
        "MATCH (n) WHERE elementId(n) IN $ids
         OPTIONAL MATCH p = (n)--(m) WHERE elementId(m) IN $ids
         WITH n, p LIMIT $limit
         RETURN {node} AS node, {path} AS path",
        node = node_map("n"),
        path = path_map("p"),
    ))
    .param("ids", ids.clone())
    .param("limit", CONFIRMED_EDGE_LIMIT)
    .columns(&["node", "path"]);

    let mut records = store.fetch(&edges).await.context("Confirmed edge query failed")?;
    let qualifying: HashSet<&str> = ids.iter().map(String::as_str).collect();
    retain_within(&mut records, &qualifying);
    Ok(normalize(&records))
}

/// Null out any node or path touching an identity outside `allowed`.
fn retain_within(records: &mut [StoreRecord], allowed: &HashSet<&str>) {
    for value in records.iter_mut().flat_map(StoreRecord::values_mut) {
        let inside = match value {
            StoreValue::Node(node) => allowed.contains(node.identity.as_str()),
            StoreValue::Path(path) => path.nodes.iter().all(|n| allowed.contains(n.identity.as_str())),
            _ => true,
        };
        if !inside {
            *value = StoreValue::Null;
        }
    }
}
