//! Axum route handlers for job lookups.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::graph::job_graph::build_job_graph;
use crate::graph::types::Graph;
use crate::jobs::repository::{job_by_slug, jobs_by_slugs, normalize_slugs};
use crate::models::job::JobRow;
use crate::routes::extractors::{AppJson, AppPath};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsBySlugRequest {
    #[serde(default)]
    pub slugs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JobsBySlugResponse {
    pub jobs: Vec<JobRow>,
}

#[derive(Debug, Serialize)]
pub struct JobGraphResponse {
    pub graph: Option<Graph>,
}

/// POST /api/jobs/by-slug
pub async fn handle_jobs_by_slug(
    State(state): State<AppState>,
    AppJson(req): AppJson<JobsBySlugRequest>,
) -> Result<Json<JobsBySlugResponse>, AppError> {
    let slugs = normalize_slugs(&req.slugs);
    let jobs = jobs_by_slugs(&state.db, &slugs).await?;
    Ok(Json(JobsBySlugResponse { jobs }))
}

/// GET /api/jobs/:slug/graph
pub async fn handle_job_graph(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<JobGraphResponse>, AppError> {
    let job = job_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job '{slug}' not found")))?;

    let graph = build_job_graph(
        &job.title,
        job.company_name.as_deref(),
        &job.skills_required,
        job.location.as_deref(),
    );
    Ok(Json(JobGraphResponse { graph }))
}
