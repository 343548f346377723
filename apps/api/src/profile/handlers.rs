//! Axum route handlers for the profile repository and onboarding.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::errors::AppError;
use crate::extraction::models::ExtractedPreferences;
use crate::graph::local::load_local_profile;
use crate::graph::sync::sync_profile_to_graph;
use crate::graph::zep::GraphProvider;
use crate::profile::completeness::{compute_completeness, CompletenessReport};
use crate::profile::repository::{
    fetch_profile, save_onboarding, ExperienceInput, OnboardingSaved, ProfileSnapshot, SkillInput,
};
use crate::routes::extractors::{AppJson, AppQuery};
use crate::routes::params::{require_user_id, UserIdQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoResponse {
    #[serde(flatten)]
    pub profile: ProfileSnapshot,
    pub completeness: CompletenessReport,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillInput>,
    #[serde(default)]
    pub experiences: Vec<ExperienceInput>,
    pub preferences: Option<ExtractedPreferences>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphSyncStatus {
    Queued,
    Skipped,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponse {
    pub success: bool,
    pub saved: OnboardingSaved,
    pub graph_sync: GraphSyncStatus,
}

/// GET /api/repo?userId=
pub async fn handle_repo(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserIdQuery>,
) -> Result<Json<RepoResponse>, AppError> {
    let user_id = params.require()?;
    let profile = fetch_profile(&state.db, user_id).await?;
    let completeness = compute_completeness(
        profile.skills.len(),
        profile.experiences.len(),
        profile.qualifications.len(),
        profile.preferences.is_some(),
    );
    Ok(Json(RepoResponse {
        profile,
        completeness,
    }))
}

/// POST /api/onboarding/complete
pub async fn handle_onboarding_complete(
    State(state): State<AppState>,
    AppJson(req): AppJson<OnboardingRequest>,
) -> Result<Json<OnboardingResponse>, AppError> {
    let user_id = require_user_id(req.user_id.as_deref())?.to_string();

    let saved = save_onboarding(
        &state.db,
        &user_id,
        &req.skills,
        &req.experiences,
        req.preferences.as_ref(),
    )
    .await?;

    let graph_sync = if state.graph_provider.is_enabled() {
        // Fire-and-forget: onboarding succeeds whether or not the sync does.
        drop(spawn_graph_sync(
            state.db.clone(),
            state.graph_provider.clone(),
            user_id,
        ));
        GraphSyncStatus::Queued
    } else {
        GraphSyncStatus::Skipped
    };

    Ok(Json(OnboardingResponse {
        success: true,
        saved,
        graph_sync,
    }))
}

fn spawn_graph_sync(
    pool: sqlx::PgPool,
    provider: Arc<dyn GraphProvider>,
    user_id: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let profile = match load_local_profile(&pool, &user_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!("Graph sync skipped for user {user_id}: profile load failed: {e}");
                return;
            }
        };
        if let Err(e) = sync_profile_to_graph(provider.as_ref(), &user_id, &profile).await {
            warn!("Graph sync failed for user {user_id}: {e}");
        }
    })
}
