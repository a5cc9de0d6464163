//! Name search.

use adgraph_core::GraphNode;
use anyhow::{Context, Result};

use super::cypher::node_map;
use super::SEARCH_LIMIT;
use crate::mapper::{is_anonymized, map_node};
use crate::record::{coerce_count, StoreValue};
use crate::store::{CypherQuery, GraphStore};

/// Case-insensitive substring match on display names, most connected
/// first. Anonymized records are excluded. The popularity score is
/// reported as the node's degree.
pub async fn search_nodes(store: &dyn GraphStore, text: &str) -> Result<Vec<GraphNode>> {
    let query = CypherQuery::new(format!(
        "MATCH (n)
         WHERE n.name IS NOT NULL
           AND toLower(n.name) CONTAINS toLower($q)
           AND toLower(toString(coalesce(n.anonymized, false))) <> 'true'
         WITH n, size([(n)--() | 1]) AS popularity
         ORDER BY popularity DESC, n.name
         LIMIT $limit
         RETURN {node} AS node, popularity",
        node = node_map("n"),
    ))
    .param("q", text.trim())
    .param("limit", SEARCH_LIMIT as i64)
    .columns(&["node", "popularity"]);

    let records = store.fetch(&query).await.context("Search query failed")?;

    let mut results: Vec<GraphNode> = records
        .iter()
        .filter_map(|record| {
            let StoreValue::Node(raw) = record.get("node")? else {
                return None;
            };
            if is_anonymized(raw) {
                return None;
            }
            let mut node = map_node(raw);
            if node.has_unknown_label() {
                return None;
            }
            node.degree = coerce_count(record.get("popularity").and_then(StoreValue::as_scalar));
            Some(node)
        })
        .collect();

    // Stable: ties keep the store's order.
    results.sort_by(|a, b| b.degree.cmp(&a.degree));
    results.truncate(SEARCH_LIMIT);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::fixtures::{node, node_with, scalar};
    use crate::mock::MockGraphStore;
    use crate::record::StoreRecord;
    use crate::store::QueryParam;
    use serde_json::json;

    fn hit(identity: &str, name: &str, popularity: i64) -> StoreRecord {
        StoreRecord::new()
            .with("node", node(identity, "Person", name))
            .with("popularity", scalar(json!(popularity)))
    }

    #[tokio::test]
    async fn test_single_character_search_bounded() {
        let rows: Vec<StoreRecord> = (0..15)
            .map(|i| hit(&format!("n{}", i), &format!("Person {}", i), i))
            .collect();
        let store = MockGraphStore::new().respond(rows);

        let results = search_nodes(&store, "e").await.unwrap();
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(results[0].label, "Person 14");
        assert!(results.windows(2).all(|w| w[0].degree >= w[1].degree));
        assert_eq!(
            store.queries()[0].param_value("limit"),
            Some(&QueryParam::Int(SEARCH_LIMIT as i64))
        );
    }

    #[tokio::test]
    async fn test_anonymized_and_unknown_excluded() {
        let store = MockGraphStore::new().respond(vec![
            hit("n1", "Jane Doe", 3),
            StoreRecord::new()
                .with("node", node_with("n2", "Person", "Jane Roe", json!({"anonymized": true})))
                .with("popularity", scalar(json!(9))),
            hit("n3", "Unknown", 5),
        ]);

        let results = search_nodes(&store, "j").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "person:Jane Doe");
        assert_eq!(results[0].degree, 3);
    }

    #[tokio::test]
    async fn test_string_flags_filtered_like_booleans() {
        let store = MockGraphStore::new().respond(vec![
            StoreRecord::new()
                .with("node", node_with("n1", "Person", "Jane Doe", json!({"anonymized": "False"})))
                .with("popularity", scalar(json!(2))),
            StoreRecord::new()
                .with("node", node_with("n2", "Person", "Jane Roe", json!({"anonymized": "TRUE"})))
                .with("popularity", scalar(json!(4))),
        ]);

        let results = search_nodes(&store, "jane").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "person:Jane Doe");

        let text = &store.queries()[0].text;
        assert!(text.contains("toLower(toString(coalesce(n.anonymized, false))) <> 'true'"));
    }

    #[tokio::test]
    async fn test_query_is_trimmed_not_recased() {
        let store = MockGraphStore::new();
        search_nodes(&store, "  hAmPton ").await.unwrap();
        assert_eq!(
            store.queries()[0].param_value("q"),
            Some(&QueryParam::Text("hAmPton".into()))
        );
    }
}
