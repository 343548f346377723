pub mod extractors;
pub mod health;
pub mod params;

use axum::{
    routing::{get, post},
    Router,
};

use crate::company::handlers as company;
use crate::extraction::handlers as extraction;
use crate::graph::handlers as graph;
use crate::hume::handlers as hume;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Company validation
        .route(
            "/api/company/validate",
            post(company::handle_company_validate),
        )
        // Extraction & pending review
        .route(
            "/api/extract",
            get(extraction::handle_list_pending).post(extraction::handle_extract),
        )
        .route(
            "/api/extract/pending/:id",
            post(extraction::handle_resolve_pending),
        )
        // Knowledge graph
        .route(
            "/api/graph/user",
            get(graph::handle_user_graph).post(graph::handle_sync_user_graph),
        )
        // Voice assistant configuration proxy
        .route(
            "/api/hume-config",
            get(hume::handle_hume_get).post(hume::handle_hume_create),
        )
        // Jobs
        .route("/api/jobs/by-slug", post(jobs::handle_jobs_by_slug))
        .route("/api/jobs/:slug/graph", get(jobs::handle_job_graph))
        // Profile
        .route(
            "/api/onboarding/complete",
            post(profile::handle_onboarding_complete),
        )
        .route("/api/repo", get(profile::handle_repo))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use reqwest::Client;
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::company::LlmCompanyValidator;
    use crate::graph::zep::ZepClient;
    use crate::hume::HumeClient;
    use crate::llm_client::LlmClient;

    /// Every upstream points at a closed port; only paths that fail before
    /// touching the database or an external service are exercised.
    fn test_router() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let http = Client::new();
        let llm = LlmClient::with_api_url(
            http.clone(),
            "test-key".into(),
            "http://127.0.0.1:1/v1/messages".into(),
        );
        let state = AppState {
            db,
            llm: llm.clone(),
            company_validator: Arc::new(LlmCompanyValidator::new(llm)),
            graph_provider: Arc::new(ZepClient::new(http.clone(), None, "http://127.0.0.1:1")),
            hume: HumeClient::new(http, None, None, "http://127.0.0.1:1"),
        };
        build_router(state)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_repo_requires_user_id() {
        let (status, body) = send(get_req("/api/repo")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "userId is required");
    }

    #[tokio::test]
    async fn test_pending_list_requires_user_id() {
        let (status, _) = send(get_req("/api/extract?userId=%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extract_requires_transcript() {
        let (status, body) = send(post_json("/api/extract", json!({"userId": "u1"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "transcript is required");
    }

    #[tokio::test]
    async fn test_jobs_by_empty_slug_list() {
        let (status, body) = send(post_json("/api/jobs/by-slug", json!({"slugs": []}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"jobs": []}));
    }

    #[tokio::test]
    async fn test_invalid_graph_source() {
        let (status, body) = send(get_req("/api/graph/user?userId=u1&source=neo4j")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("neo4j"));
    }

    #[tokio::test]
    async fn test_company_validate_requires_name() {
        let (status, body) =
            send(post_json("/api/company/validate", json!({"companyName": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "companyName is required");
    }

    #[tokio::test]
    async fn test_hume_unknown_action() {
        let (status, _) = send(get_req("/api/hume-config?action=voices")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_hume_without_key_is_upstream_error() {
        let (status, body) = send(get_req("/api/hume-config")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Hume request failed");
    }

    #[tokio::test]
    async fn test_onboarding_requires_user_id() {
        let (status, _) = send(post_json("/api/onboarding/complete", json!({"skills": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrongly_typed_body_is_json_400() {
        let (status, body) = send(post_json("/api/extract", json!({"transcript": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("transcript"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/jobs/by-slug")
            .body(Body::from(r#"{"slugs": []}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_pending_id_is_json_400() {
        let (status, body) = send(post_json(
            "/api/extract/pending/not-a-uuid",
            json!({"userId": "u1", "action": "accept"}),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_pending_action_is_json_400() {
        let (status, body) = send(post_json(
            "/api/extract/pending/6f1c2d3e-4a5b-4c6d-8e9f-0a1b2c3d4e5f",
            json!({"userId": "u1"}),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("action"));
    }
}
