//! Application state.

use std::sync::Arc;

use adgraph_graph::GraphStore;

/// Application state shared across handlers.
///
/// The store is constructed once at startup and injected; handlers never
/// reach for a global client.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GraphStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }
}
