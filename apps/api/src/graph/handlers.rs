//! Axum route handlers for the user knowledge graph.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::graph::assembler::{assemble_user_graph, AssembledGraph, GraphSource};
use crate::graph::local::load_local_profile;
use crate::graph::sync::sync_profile_to_graph;
use crate::routes::extractors::{AppJson, AppQuery};
use crate::routes::params::require_user_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGraphQuery {
    pub user_id: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSyncRequest {
    pub user_id: Option<String>,
    pub sync_to_zep: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSyncResponse {
    pub success: bool,
    pub synced: bool,
    pub item_count: usize,
}

/// GET /api/graph/user?userId=&source=auto|zep|local
pub async fn handle_user_graph(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserGraphQuery>,
) -> Result<Json<AssembledGraph>, AppError> {
    let user_id = require_user_id(params.user_id.as_deref())?;
    let source = GraphSource::parse(params.source.as_deref())?;

    let db = &state.db;
    let assembled = assemble_user_graph(
        user_id,
        source,
        state.graph_provider.as_ref(),
        move || async move { load_local_profile(db, user_id).await.map_err(AppError::from) },
    )
    .await?;

    Ok(Json(assembled))
}

/// POST /api/graph/user
pub async fn handle_sync_user_graph(
    State(state): State<AppState>,
    AppJson(req): AppJson<GraphSyncRequest>,
) -> Result<Json<GraphSyncResponse>, AppError> {
    let user_id = require_user_id(req.user_id.as_deref())?;

    if !req.sync_to_zep.unwrap_or(true) {
        return Ok(Json(GraphSyncResponse {
            success: true,
            synced: false,
            item_count: 0,
        }));
    }

    let profile = load_local_profile(&state.db, user_id).await?;
    let item_count = sync_profile_to_graph(state.graph_provider.as_ref(), user_id, &profile)
        .await
        .map_err(|e| AppError::upstream("Zep", e))?;

    Ok(Json(GraphSyncResponse {
        success: true,
        synced: true,
        item_count,
    }))
}
