//! Axum route handlers for company validation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::routes::extractors::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyValidateRequest {
    pub company_name: Option<String>,
    pub action: Option<String>,
    pub confirmed_domain: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyAction {
    Validate,
    Confirm,
}

impl CompanyAction {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") | Some("validate") => Ok(CompanyAction::Validate),
            Some("confirm") => Ok(CompanyAction::Confirm),
            Some(other) => Err(AppError::Validation(format!(
                "Unknown action '{other}'. Expected 'validate' or 'confirm'"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyConfirmResponse {
    pub success: bool,
    pub confirmation_id: Uuid,
    pub company_name: String,
    pub confirmed_domain: String,
}

/// POST /api/company/validate
pub async fn handle_company_validate(
    State(state): State<AppState>,
    AppJson(req): AppJson<CompanyValidateRequest>,
) -> Result<Json<Value>, AppError> {
    let company_name = req
        .company_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("companyName is required".to_string()))?
        .to_string();

    match CompanyAction::parse(req.action.as_deref())? {
        CompanyAction::Validate => {
            let validation = state
                .company_validator
                .validate(&company_name)
                .await
                .map_err(|e| AppError::upstream("Company validation", e))?;
            Ok(Json(json!({
                "companyName": company_name,
                "validation": validation,
            })))
        }
        CompanyAction::Confirm => {
            let domain = req
                .confirmed_domain
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .ok_or_else(|| {
                    AppError::Validation("confirmedDomain is required for confirm".to_string())
                })?
                .to_string();
            let response =
                save_confirmation(&state.db, req.user_id.as_deref(), &company_name, &domain)
                    .await?;
            Ok(Json(serde_json::to_value(response).map_err(anyhow::Error::from)?))
        }
    }
}

async fn save_confirmation(
    pool: &PgPool,
    user_id: Option<&str>,
    company_name: &str,
    domain: &str,
) -> Result<CompanyConfirmResponse, AppError> {
    let confirmation_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO company_confirmations (id, user_id, company_name, confirmed_domain, confirmed_at)
        VALUES ($1, $2, $3, $4, NOW())
        "#,
    )
    .bind(confirmation_id)
    .bind(user_id)
    .bind(company_name)
    .bind(domain)
    .execute(pool)
    .await?;

    info!("Confirmed company '{company_name}' as {domain} (user {user_id:?})");

    Ok(CompanyConfirmResponse {
        success: true,
        confirmation_id,
        company_name: company_name.to_string(),
        confirmed_domain: domain.to_string(),
    })
}
