//! Path normalization.
//!
//! Folds the records of one traversal into a deduplicated [`GraphData`]:
//! nodes keyed by id (last write wins), links keyed by
//! `(source, target, relType)` (first write wins). Bare relationships are
//! ignored; links only come from paths, which always carry both endpoints.

use adgraph_core::{GraphData, GraphLink, GraphNode, RelType};
use indexmap::IndexMap;
use tracing::debug;

use crate::mapper::{map_link, map_node, node_id};
use crate::record::{RawPath, StoreRecord, StoreValue};

type LinkKey = (String, String, RelType);

/// Dedup arena for a single query's results.
#[derive(Debug, Default)]
pub struct GraphAccumulator {
    nodes: IndexMap<String, GraphNode>,
    links: IndexMap<LinkKey, GraphLink>,
}

impl GraphAccumulator {
    /// Insert or replace a node. Returns its id.
    pub fn insert_node(&mut self, node: GraphNode) -> String {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Insert a link unless its triple has been seen. Returns whether it
    /// was inserted.
    pub fn insert_link(&mut self, link: GraphLink) -> bool {
        let key = link.key();
        if self.links.contains_key(&key) {
            return false;
        }
        self.links.insert(key, link);
        true
    }

    pub fn absorb_value(mut self, value: &StoreValue) -> Self {
        match value {
            StoreValue::Node(raw) => {
                self.insert_node(map_node(raw));
            }
            StoreValue::Path(path) => self.absorb_path(path),
            StoreValue::Relationship(_) | StoreValue::Scalar(_) | StoreValue::Null => {}
        }
        self
    }

    pub fn absorb_record(self, record: &StoreRecord) -> Self {
        record.values().fold(self, Self::absorb_value)
    }

    fn absorb_path(&mut self, path: &RawPath) {
        for raw in &path.nodes {
            self.insert_node(map_node(raw));
        }

        for (start, rel, end) in path.segments() {
            match (start, end) {
                (Some(start), Some(end)) => {
                    self.insert_link(map_link(rel, node_id(start), node_id(end)));
                }
                _ => debug!(relationship = %rel.identity, "Path segment endpoint missing, skipping"),
            }
        }
    }

    /// Apply the post-passes and produce the final graph:
    /// drop unknown-label nodes, drop links to removed nodes, then compute
    /// degree from the surviving links. Degree is the number of incident
    /// links, so a self-loop counts once.
    pub fn finish(self) -> GraphData {
        let mut nodes = self.nodes;
        nodes.retain(|_, node| !node.has_unknown_label());

        let links: Vec<GraphLink> = self
            .links
            .into_values()
            .filter(|link| nodes.contains_key(&link.source) && nodes.contains_key(&link.target))
            .collect();

        for node in nodes.values_mut() {
            node.degree = 0;
        }
        for link in &links {
            if let Some(node) = nodes.get_mut(&link.source) {
                node.degree += 1;
            }
            if link.target != link.source {
                if let Some(node) = nodes.get_mut(&link.target) {
                    node.degree += 1;
                }
            }
        }

        GraphData {
            nodes: nodes.into_values().collect(),
            links,
        }
    }
}

/// Normalize a full traversal result set.
pub fn normalize(records: &[StoreRecord]) -> GraphData {
    records
        .iter()
        .fold(GraphAccumulator::default(), GraphAccumulator::absorb_record)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::fixtures::{node, path, rel};
    use std::collections::HashSet;

    fn record(values: Vec<StoreValue>) -> StoreRecord {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (format!("c{}", i), v))
            .collect()
    }

    fn assert_invariants(graph: &GraphData) {
        let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len(), "duplicate node ids");

        let keys: HashSet<_> = graph.links.iter().map(|l| l.key()).collect();
        assert_eq!(keys.len(), graph.links.len(), "duplicate links");

        for link in &graph.links {
            assert!(ids.contains(link.source.as_str()));
            assert!(ids.contains(link.target.as_str()));
        }
        for n in &graph.nodes {
            let incident = graph
                .links
                .iter()
                .filter(|l| l.source == n.id || l.target == n.id)
                .count();
            assert_eq!(n.degree as usize, incident, "degree mismatch for {}", n.id);
        }
    }

    #[test]
    fn test_shared_edge_traversed_both_directions() {
        let jane = ("n1", "Person", "Jane Doe");
        let studio = ("n2", "Designer", "Studio Peregalli");
        let forward = path(&[jane, studio], &[rel("r1", "n1", "n2", "HIRED")]);
        let backward = path(&[studio, jane], &[rel("r1", "n1", "n2", "HIRED")]);

        let graph = normalize(&[record(vec![forward]), record(vec![backward])]);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].source, "person:Jane Doe");
        assert_eq!(graph.links[0].target, "designer:Studio Peregalli");
        assert_invariants(&graph);
    }

    #[test]
    fn test_same_entity_from_different_identities_merges() {
        // The same person surfaced by two records with different store ids.
        let a = path(
            &[("x1", "Person", "Jane Doe"), ("x2", "Issue", "March 1998")],
            &[rel("r1", "x1", "x2", "FEATURED_IN")],
        );
        let b = path(
            &[("y1", "Person", "Jane Doe"), ("y2", "Location", "Palm Beach")],
            &[rel("r2", "y1", "y2", "LOCATED_IN")],
        );
        let graph = normalize(&[record(vec![a, b])]);
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.node("person:Jane Doe").map(|n| n.degree), Some(2));
        assert_invariants(&graph);
    }

    #[test]
    fn test_bare_relationships_ignored() {
        let graph = normalize(&[record(vec![
            node("n1", "Person", "Jane Doe"),
            StoreValue::Relationship(crate::record::RawRelationship {
                identity: "r".into(),
                start: "n1".into(),
                end: "n9".into(),
                rel_type: "HIRED".into(),
                properties: Default::default(),
            }),
        ])]);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());
        assert_eq!(graph.nodes[0].degree, 0);
    }

    #[test]
    fn test_unknown_nodes_and_their_links_dropped() {
        let p = path(
            &[("n1", "Person", "Jane Doe"), ("n2", "Person", "Unknown"), ("n3", "Style", "Neoclassical")],
            &[rel("r1", "n1", "n2", "ASSOCIATED_WITH"), rel("r2", "n1", "n3", "HAS_STYLE")],
        );
        let graph = normalize(&[record(vec![p])]);
        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.node("person:Unknown").is_none());
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.node("person:Jane Doe").map(|n| n.degree), Some(1));
        assert_invariants(&graph);
    }

    #[test]
    fn test_segment_with_missing_endpoint_skipped() {
        let p = path(&[("n1", "Person", "Jane Doe")], &[rel("r1", "n1", "gone", "HIRED")]);
        let graph = normalize(&[record(vec![p])]);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.links.is_empty());
    }

    #[test]
    fn test_parallel_kinds_kept_distinct() {
        let p = path(
            &[("n1", "Person", "Jane Doe"), ("n2", "Person", "John Roe")],
            &[rel("r1", "n1", "n2", "ASSOCIATED_WITH"), rel("r2", "n1", "n2", "MENTIONED_IN")],
        );
        let graph = normalize(&[record(vec![p.clone()]), record(vec![p])]);
        assert_eq!(graph.links.len(), 2);
        assert_eq!(graph.node("person:John Roe").map(|n| n.degree), Some(2));
        assert_invariants(&graph);
    }

    #[test]
    fn test_empty_and_null_records() {
        assert!(normalize(&[]).is_empty());
        assert!(normalize(&[record(vec![StoreValue::Null, StoreValue::Null])]).is_empty());
    }

    #[test]
    fn test_membership_independent_of_record_order() {
        let a = path(
            &[("n1", "Person", "A"), ("n2", "Designer", "B")],
            &[rel("r1", "n1", "n2", "HIRED")],
        );
        let b = path(
            &[("n2", "Designer", "B"), ("n3", "Person", "C")],
            &[rel("r2", "n3", "n2", "HIRED")],
        );
        let one = normalize(&[record(vec![a.clone()]), record(vec![b.clone()])]);
        let two = normalize(&[record(vec![b]), record(vec![a])]);

        let degrees = |g: &GraphData| -> HashSet<(String, u32)> {
            g.nodes.iter().map(|n| (n.id.clone(), n.degree)).collect()
        };
        let links = |g: &GraphData| -> HashSet<LinkKey> { g.links.iter().map(|l| l.key()).collect() };
        assert_eq!(degrees(&one), degrees(&two));
        assert_eq!(links(&one), links(&two));
    }

    #[test]
    fn test_accumulator_insert_or_ignore() {
        let mut acc = GraphAccumulator::default();
        let link = GraphLink {
            source: "a".into(),
            target: "b".into(),
            rel_type: RelType::Hired,
            properties: Default::default(),
        };
        assert!(acc.insert_link(link.clone()));
        assert!(!acc.insert_link(link));
    }

    #[test]
    fn test_self_loop_counts_once() {
        let p = path(
            &[("n1", "Person", "Jane Doe")],
            &[rel("r1", "n1", "n1", "ASSOCIATED_WITH")],
        );
        let graph = normalize(&[record(vec![p])]);
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.nodes[0].degree, 1);
        assert_invariants(&graph);
    }

    #[test]
    fn test_distinct_records_merging_into_self_loop() {
        // Two store nodes that resolve to the same client id.
        let p = path(
            &[("a1", "Person", "Jane Doe"), ("a2", "Person", "Jane Doe")],
            &[rel("r1", "a1", "a2", "ASSOCIATED_WITH")],
        );
        let graph = normalize(&[record(vec![p])]);
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.links[0].source, graph.links[0].target);
        assert_invariants(&graph);
    }
}
