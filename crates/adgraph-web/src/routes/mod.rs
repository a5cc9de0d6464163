//! Route handlers.

pub mod error;
pub mod graph;

pub async fn health() -> &'static str {
    "ok"
}
