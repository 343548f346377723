//! Axum route handlers for the Hume EVI configuration proxy.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::hume::HumeResource;
use crate::routes::extractors::{AppJson, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HumeActionQuery {
    pub action: Option<String>,
}

impl HumeActionQuery {
    /// `config` (default), `tools` or `prompts`.
    pub fn resource(&self) -> Result<HumeResource, AppError> {
        match self.action.as_deref().map(str::trim) {
            None | Some("") | Some("config") => Ok(HumeResource::Configs),
            Some("tools") => Ok(HumeResource::Tools),
            Some("prompts") => Ok(HumeResource::Prompts),
            Some(other) => Err(AppError::Validation(format!(
                "Unknown action '{other}'. Expected config, tools or prompts"
            ))),
        }
    }
}

/// GET /api/hume-config?action=config|tools|prompts
pub async fn handle_hume_get(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HumeActionQuery>,
) -> Result<Json<Value>, AppError> {
    let resource = query.resource()?;
    let data = state
        .hume
        .get(resource)
        .await
        .map_err(|e| AppError::upstream("Hume", e))?;
    Ok(Json(data))
}

/// POST /api/hume-config?action=config|tools|prompts
pub async fn handle_hume_create(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HumeActionQuery>,
    AppJson(body): AppJson<Value>,
) -> Result<Json<Value>, AppError> {
    let resource = query.resource()?;
    if !body.is_object() {
        return Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        ));
    }
    let data = state
        .hume
        .create(resource, &body)
        .await
        .map_err(|e| AppError::upstream("Hume", e))?;
    Ok(Json(data))
}
