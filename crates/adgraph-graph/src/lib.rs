//! # ADGraph Graph
//!
//! Neo4j knowledge-graph access for ADGraph.
//!
//! Provides the store boundary (client, query and record types), the
//! mapping and normalization of traversal results into [`GraphData`], and
//! the catalog of bounded exploration presets.
//!
//! [`GraphData`]: adgraph_core::GraphData

pub mod client;
pub mod mapper;
pub mod normalize;
pub mod presets;
pub mod record;
pub mod schema;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use client::{GraphClient, GraphConfig};
pub use normalize::{normalize, GraphAccumulator};
pub use presets::{run_preset, Preset, PresetOutput, PresetParams};
pub use record::{RawNode, RawPath, RawRelationship, StoreRecord, StoreValue};
pub use store::{CypherQuery, GraphCounts, GraphStore, QueryParam};
