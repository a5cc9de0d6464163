//! Preset query catalog.
//!
//! A preset is a named, pre-validated traversal template. Each one carries
//! its own bound, since variable-length traversals are combinatorially
//! explosive and these bounds are the only admission control in front of
//! the store.

pub mod cypher;
pub mod network;
pub mod search;

use adgraph_core::{ExploreError, ExploreResult, GraphData, GraphNode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::GraphStore;

pub const EGO_MIN_DEPTH: u32 = 1;
pub const EGO_MAX_DEPTH: u32 = 3;
pub const EGO_DEFAULT_DEPTH: u32 = 2;
pub const EGO_ROW_LIMIT: i64 = 500;
pub const SHORTEST_PATH_MAX_HOPS: u32 = 6;
pub const SHARED_TRIPLE_LIMIT: i64 = 100;
pub const HUB_DEFAULT_LIMIT: u32 = 20;
pub const HUB_MAX_LIMIT: u32 = 50;
pub const HUB_NEIGHBORHOOD_LIMIT: i64 = 300;
pub const TAGGED_ROW_LIMIT: i64 = 500;
pub const SAMPLE_MIN_DEGREE: i64 = 1;
pub const SAMPLE_SEED_COUNT: i64 = 150;
pub const SAMPLE_EXPANSION_LIMIT: i64 = 1000;
pub const CONFIRMED_VERDICT: &str = "confirmed";
pub const CONFIRMED_NODE_LIMIT: i64 = 500;
pub const CONFIRMED_EDGE_LIMIT: i64 = 1000;
pub const SEARCH_LIMIT: usize = 10;

/// One exploration request.
#[derive(Debug, Clone, PartialEq)]
pub enum Preset {
    /// Everything within `depth` hops of a subject.
    EgoNetwork { name: String, depth: u32 },
    /// A shortest path between two subjects.
    ShortestPath { from: String, to: String },
    /// People connected through a designer they both hired.
    SharedDesigners,
    /// The best-connected entities and their neighborhoods.
    HubRanking { limit: u32 },
    /// People appearing in the Epstein source documents.
    EpsteinSubgraph,
    /// A bounded sample of the well-connected part of the graph.
    FullGraphSample,
    /// Confirmed matches and the links among them.
    ConfirmedNetwork,
    /// Name search; returns a flat list.
    Search { query: String },
}

/// Raw request parameters, as they arrive in a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetParams {
    pub preset: Option<String>,
    pub name: Option<String>,
    pub depth: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
    pub q: Option<String>,
}

/// Preset output: a graph, or a ranked list for search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PresetOutput {
    Graph(GraphData),
    Results { results: Vec<GraphNode> },
}

impl Preset {
    pub const NAMES: [&'static str; 8] = [
        "ego",
        "shortest-path",
        "shared-designers",
        "hubs",
        "epstein-subgraph",
        "full-graph",
        "confirmed",
        "search",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::EgoNetwork { .. } => "ego",
            Self::ShortestPath { .. } => "shortest-path",
            Self::SharedDesigners => "shared-designers",
            Self::HubRanking { .. } => "hubs",
            Self::EpsteinSubgraph => "epstein-subgraph",
            Self::FullGraphSample => "full-graph",
            Self::ConfirmedNetwork => "confirmed",
            Self::Search { .. } => "search",
        }
    }

    /// Validate request parameters into a preset. Fails before any store
    /// access.
    pub fn from_params(params: &PresetParams) -> ExploreResult<Self> {
        let preset = required_raw(params.preset.as_deref()).ok_or(ExploreError::MissingPreset)?;

        match preset {
            "ego" => Ok(Self::EgoNetwork {
                name: required("ego", "name", params.name.as_deref())?,
                depth: match optional_int("depth", params.depth.as_deref())? {
                    Some(depth) => clamp_depth(depth),
                    None => EGO_DEFAULT_DEPTH,
                },
            }),
            "shortest-path" => Ok(Self::ShortestPath {
                from: required("shortest-path", "from", params.from.as_deref())?,
                to: required("shortest-path", "to", params.to.as_deref())?,
            }),
            "shared-designers" => Ok(Self::SharedDesigners),
            "hubs" => Ok(Self::HubRanking {
                limit: match optional_int("limit", params.limit.as_deref())? {
                    Some(limit) => clamp_hub_limit(limit),
                    None => HUB_DEFAULT_LIMIT,
                },
            }),
            "epstein-subgraph" => Ok(Self::EpsteinSubgraph),
            "full-graph" => Ok(Self::FullGraphSample),
            "confirmed" => Ok(Self::ConfirmedNetwork),
            "search" => Ok(Self::Search {
                query: required("search", "q", params.q.as_deref())?,
            }),
            other => Err(ExploreError::UnknownPreset(other.to_string())),
        }
    }
}

fn required_raw(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required(preset: &'static str, param: &'static str, value: Option<&str>) -> ExploreResult<String> {
    required_raw(value)
        .map(str::to_string)
        .ok_or(ExploreError::MissingParameter { preset, param })
}

fn optional_int(param: &'static str, value: Option<&str>) -> ExploreResult<Option<i64>> {
    match required_raw(value) {
        None => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|e| ExploreError::InvalidParameter {
            param,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

pub fn clamp_depth(depth: i64) -> u32 {
    depth.clamp(i64::from(EGO_MIN_DEPTH), i64::from(EGO_MAX_DEPTH)) as u32
}

pub fn clamp_hub_limit(limit: i64) -> u32 {
    limit.clamp(1, i64::from(HUB_MAX_LIMIT)) as u32
}

/// Normalize a subject name to the store's canonical casing: trim, split
/// on whitespace, capitalize each word and lowercase the rest.
///
/// Applied only when building lookups; returned labels are left as stored.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a preset against the store.
///
/// An empty result is a valid, empty output. Store failures surface as
/// [`ExploreError::Store`] and are never retried here.
pub async fn run_preset(store: &dyn GraphStore, preset: &Preset) -> ExploreResult<PresetOutput> {
    let output = match preset {
        Preset::EgoNetwork { name, depth } => network::ego_network(store, name, *depth)
            .await
            .map(PresetOutput::Graph),
        Preset::ShortestPath { from, to } => network::shortest_path(store, from, to)
            .await
            .map(PresetOutput::Graph),
        Preset::SharedDesigners => network::shared_designers(store).await.map(PresetOutput::Graph),
        Preset::HubRanking { limit } => network::hub_ranking(store, *limit).await.map(PresetOutput::Graph),
        Preset::EpsteinSubgraph => network::epstein_subgraph(store).await.map(PresetOutput::Graph),
        Preset::FullGraphSample => network::full_graph_sample(store).await.map(PresetOutput::Graph),
        Preset::ConfirmedNetwork => network::confirmed_network(store).await.map(PresetOutput::Graph),
        Preset::Search { query } => search::search_nodes(store, query)
            .await
            .map(|results| PresetOutput::Results { results }),
    }
    .map_err(ExploreError::store)?;

    match &output {
        PresetOutput::Graph(graph) => info!(
            preset = preset.name(),
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            "Preset executed"
        ),
        PresetOutput::Results { results } => {
            info!(preset = preset.name(), results = results.len(), "Preset executed")
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::fixtures::{path, rel, row};
    use crate::mock::MockGraphStore;

    fn params(pairs: &[(&str, &str)]) -> PresetParams {
        let mut p = PresetParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "preset" => p.preset = v,
                "name" => p.name = v,
                "depth" => p.depth = v,
                "from" => p.from = v,
                "to" => p.to = v,
                "limit" => p.limit = v,
                "q" => p.q = v,
                _ => unreachable!(),
            }
        }
        p
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("jeffrey EPSTEIN"), "Jeffrey Epstein");
        assert_eq!(normalize_name("jeffrey EPSTEIN"), normalize_name("Jeffrey Epstein"));
        assert_eq!(normalize_name("  mark\thampton  "), "Mark Hampton");
        assert_eq!(normalize_name(&normalize_name("ÉLISE de WOLFE")), "Élise De Wolfe");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_ego_params() {
        let preset = Preset::from_params(&params(&[("preset", "ego"), ("name", "jane doe"), ("depth", "10")])).unwrap();
        assert_eq!(preset, Preset::EgoNetwork { name: "jane doe".into(), depth: 3 });

        let preset = Preset::from_params(&params(&[("preset", "ego"), ("name", "x"), ("depth", "-4")])).unwrap();
        assert_eq!(preset, Preset::EgoNetwork { name: "x".into(), depth: 1 });

        let preset = Preset::from_params(&params(&[("preset", "ego"), ("name", "x")])).unwrap();
        assert_eq!(preset, Preset::EgoNetwork { name: "x".into(), depth: EGO_DEFAULT_DEPTH });
    }

    #[test]
    fn test_missing_and_invalid_params() {
        assert!(matches!(
            Preset::from_params(&params(&[])),
            Err(ExploreError::MissingPreset)
        ));
        assert!(matches!(
            Preset::from_params(&params(&[("preset", "ego"), ("name", "  ")])),
            Err(ExploreError::MissingParameter { preset: "ego", param: "name" })
        ));
        assert!(matches!(
            Preset::from_params(&params(&[("preset", "shortest-path"), ("from", "a")])),
            Err(ExploreError::MissingParameter { param: "to", .. })
        ));
        assert!(matches!(
            Preset::from_params(&params(&[("preset", "hubs"), ("limit", "lots")])),
            Err(ExploreError::InvalidParameter { param: "limit", .. })
        ));
        assert!(matches!(
            Preset::from_params(&params(&[("preset", "search")])),
            Err(ExploreError::MissingParameter { param: "q", .. })
        ));
        assert!(matches!(
            Preset::from_params(&params(&[("preset", "everything")])),
            Err(ExploreError::UnknownPreset(name)) if name == "everything"
        ));
    }

    #[test]
    fn test_every_name_parses() {
        let full = [("name", "a"), ("from", "a"), ("to", "b"), ("q", "a")];
        for name in Preset::NAMES {
            let mut pairs = vec![("preset", name)];
            pairs.extend_from_slice(&full);
            let preset = Preset::from_params(&params(&pairs)).unwrap();
            assert_eq!(preset.name(), name);
        }
    }

    #[test]
    fn test_hub_limit_default_and_clamp() {
        let preset = Preset::from_params(&params(&[("preset", "hubs")])).unwrap();
        assert_eq!(preset, Preset::HubRanking { limit: HUB_DEFAULT_LIMIT });
        let preset = Preset::from_params(&params(&[("preset", "hubs"), ("limit", "500")])).unwrap();
        assert_eq!(preset, Preset::HubRanking { limit: HUB_MAX_LIMIT });
    }

    #[tokio::test]
    async fn test_run_preset_graph_output() {
        let p = path(
            &[("a", "Person", "Jane Doe"), ("b", "Designer", "Mark Hampton")],
            &[rel("r", "a", "b", "HIRED")],
        );
        let store = MockGraphStore::new().respond(vec![row("path", p)]);
        let output = run_preset(&store, &Preset::SharedDesigners).await.unwrap();

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["nodes"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["links"][0]["relType"], "HIRED");
    }

    #[tokio::test]
    async fn test_run_preset_search_output_shape() {
        let store = MockGraphStore::new();
        let output = run_preset(&store, &Preset::Search { query: "z".into() }).await.unwrap();
        assert_eq!(serde_json::to_value(&output).unwrap(), serde_json::json!({"results": []}));
    }

    #[tokio::test]
    async fn test_run_preset_store_error() {
        let store = MockGraphStore::new().fail("bolt: connection refused");
        let err = run_preset(&store, &Preset::FullGraphSample).await.unwrap_err();
        assert!(!err.is_caller_error());
        assert!(err.to_string().contains("connection refused"));
    }
}
