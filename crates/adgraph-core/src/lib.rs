//! ADGraph Core Library
//!
//! Client-facing graph data model, the error taxonomy shared by every
//! preset, and the pure visual-encoding contract consumed by renderers.

pub mod encoding;
pub mod error;
pub mod model;

pub use error::{ExploreError, ExploreResult};
pub use model::{ConfidenceLevel, GraphData, GraphLink, GraphNode, NodeType, RelType, UNKNOWN_LABEL};
