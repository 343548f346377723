//! Axum route handlers for the Extraction API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract::{run_extraction, ExtractDeps, ExtractRequest, ExtractResponse};
use crate::extraction::pending::{list_pending, resolve_pending, PendingDecision};
use crate::models::pending::PendingItemRow;
use crate::routes::extractors::{AppJson, AppPath, AppQuery};
use crate::routes::params::{require_user_id, UserIdQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingListResponse {
    pub items: Vec<PendingItemRow>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvePendingRequest {
    pub user_id: Option<String>,
    pub action: PendingDecision,
}

/// POST /api/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    AppJson(req): AppJson<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let deps = ExtractDeps {
        pool: &state.db,
        llm: &state.llm,
        validator: state.company_validator.as_ref(),
        graph_provider: state.graph_provider.clone(),
    };
    Ok(Json(run_extraction(deps, req).await?))
}

/// GET /api/extract?userId=
pub async fn handle_list_pending(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<PendingListResponse>, AppError> {
    let user_id = params.require()?;
    let items = list_pending(&state.db, user_id).await?;
    Ok(Json(PendingListResponse {
        count: items.len(),
        items,
    }))
}

/// POST /api/extract/pending/:id
pub async fn handle_resolve_pending(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<ResolvePendingRequest>,
) -> Result<Json<PendingItemRow>, AppError> {
    let user_id = require_user_id(req.user_id.as_deref())?;
    let item = resolve_pending(&state.db, user_id, id, req.action).await?;
    Ok(Json(item))
}
