//! Graph exploration route handlers.

use adgraph_core::encoding::{self, Legend};
use adgraph_graph::{run_preset, GraphCounts, Preset, PresetOutput, PresetParams};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use super::error::ApiError;
use crate::state::AppState;

/// `GET /graph?preset=<name>&...`
pub async fn explore(
    State(state): State<AppState>,
    params: Result<Query<PresetParams>, QueryRejection>,
) -> Result<Json<PresetOutput>, ApiError> {
    let Query(params) = params?;
    let preset = Preset::from_params(&params)?;
    let output = run_preset(state.store.as_ref(), &preset).await?;
    Ok(Json(output))
}

pub async fn legend() -> Json<Legend> {
    Json(encoding::legend())
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<GraphCounts>, ApiError> {
    let counts = state.store.counts().await.map_err(ApiError::internal)?;
    Ok(Json(counts))
}
