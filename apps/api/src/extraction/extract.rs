//! Transcript extraction pipeline.
//!
//! Flow: LLM extract → optional incremental merge → company enrichment →
//!       save pending items → detached graph enrichment → response.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use crate::company::CompanyValidator;
use crate::errors::AppError;
use crate::extraction::enrichment::{enrich_companies, spawn_graph_enrichment};
use crate::extraction::merge::merge_extractions;
use crate::extraction::models::{CompanyQuestion, ExtractionResult};
use crate::extraction::pending::save_pending_facts;
use crate::extraction::prompts::{EXTRACT_PROMPT, EXTRACT_SYSTEM};
use crate::graph::zep::GraphProvider;
use crate::llm_client::prompts::CONFIDENCE_INSTRUCTION;
use crate::llm_client::LlmClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    pub transcript: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    #[serde(default)]
    pub incremental: bool,
    pub existing_data: Option<ExtractionResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    pub extraction: ExtractionResult,
    pub pending_count: usize,
    pub company_questions: Vec<CompanyQuestion>,
}

/// Everything the pipeline needs besides the request itself.
pub struct ExtractDeps<'a> {
    pub pool: &'a PgPool,
    pub llm: &'a LlmClient,
    pub validator: &'a dyn CompanyValidator,
    pub graph_provider: Arc<dyn GraphProvider>,
}

pub async fn run_extraction(
    deps: ExtractDeps<'_>,
    req: ExtractRequest,
) -> Result<ExtractResponse, AppError> {
    let transcript = req
        .transcript
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("transcript is required".to_string()))?
        .to_string();

    let fresh = extract_from_transcript(deps.llm, &transcript)
        .await?
        .clamp_confidences();
    let existing = req.existing_data.map(ExtractionResult::clamp_confidences);
    let mut extraction = combine_with_existing(fresh, req.incremental, existing);

    let enriched = enrich_companies(std::mem::take(&mut extraction.companies), deps.validator).await;
    extraction.companies = enriched.companies;

    let user_id = req
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let pending_count = match user_id {
        Some(user_id) => {
            let facts = extraction.to_facts();
            let saved =
                save_pending_facts(deps.pool, user_id, req.session_id.as_deref(), &facts).await;
            // Fire-and-forget: the handle is dropped on purpose.
            drop(spawn_graph_enrichment(
                deps.graph_provider,
                user_id.to_string(),
                transcript,
            ));
            saved
        }
        None => 0,
    };

    info!(
        "Extraction complete: {} skills, {} companies, {} qualifications, {} questions",
        extraction.skills.len(),
        extraction.companies.len(),
        extraction.qualifications.len(),
        enriched.questions.len()
    );

    Ok(ExtractResponse {
        success: true,
        extraction,
        pending_count,
        company_questions: enriched.questions,
    })
}

async fn extract_from_transcript(
    llm: &LlmClient,
    transcript: &str,
) -> Result<ExtractionResult, AppError> {
    let prompt = format!(
        "{}\n{}",
        EXTRACT_PROMPT.replace("{transcript}", transcript),
        CONFIDENCE_INSTRUCTION
    );
    llm.call_json::<ExtractionResult>(&prompt, EXTRACT_SYSTEM)
        .await
        .map_err(|e| AppError::upstream("LLM", format!("Transcript extraction failed: {e}")))
}

/// Incremental requests merge into the caller's existing data; otherwise the
/// fresh extraction stands alone.
fn combine_with_existing(
    fresh: ExtractionResult,
    incremental: bool,
    existing: Option<ExtractionResult>,
) -> ExtractionResult {
    match (incremental, existing) {
        (true, Some(existing)) => merge_extractions(existing, fresh),
        _ => fresh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::{CompanyValidation, ValidatorError};
    use crate::extraction::models::ExtractedSkill;
    use crate::graph::zep::ZepClient;
    use async_trait::async_trait;
    use reqwest::Client;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Known names validate; anything else fails.
    struct TableValidator(Vec<(&'static str, CompanyValidation)>);

    #[async_trait]
    impl CompanyValidator for TableValidator {
        async fn validate(&self, company_name: &str) -> Result<CompanyValidation, ValidatorError> {
            self.0
                .iter()
                .find(|(n, _)| *n == company_name)
                .map(|(_, v)| v.clone())
                .ok_or(ValidatorError::EmptyName)
        }
    }

    fn validators() -> TableValidator {
        TableValidator(vec![
            (
                "Acme",
                CompanyValidation {
                    normalized_name: Some("Acme Corp".into()),
                    confidence: 0.9,
                    ..Default::default()
                },
            ),
            (
                "Pwc",
                CompanyValidation {
                    normalized_name: Some("PwC".into()),
                    confidence: 0.6,
                    needs_confirmation: true,
                    suggested_url: Some("https://pwc.com".into()),
                    question: Some("Did you mean PwC?".into()),
                    ..Default::default()
                },
            ),
        ])
    }

    fn llm_text_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 100, "output_tokens": 50}
        }))
    }

    async fn run(server: &MockServer, req: ExtractRequest) -> Result<ExtractResponse, AppError> {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let llm = LlmClient::with_api_url(Client::new(), "k".into(), server.uri());
        let validator = validators();
        let deps = ExtractDeps {
            pool: &pool,
            llm: &llm,
            validator: &validator,
            graph_provider: Arc::new(ZepClient::new(Client::new(), None, "http://127.0.0.1:1")),
        };
        run_extraction(deps, req).await
    }

    #[tokio::test]
    async fn test_pipeline_merges_enriches_and_reports_questions() {
        let server = MockServer::start().await;
        let extraction = json!({
            "skills": [{"name": "Treasury", "confidence": 1.4}],
            "companies": [
                {"name": "Acme", "confidence": 0.6},
                {"name": "Pwc", "confidence": 0.5},
                {"name": "Ghost", "confidence": 0.3}
            ],
            "qualifications": null,
            "preferences": {"roleTypes": ["CFO"], "locations": null}
        });
        Mock::given(method("POST"))
            .respond_with(llm_text_reply(&extraction.to_string()))
            .expect(1)
            .mount(&server)
            .await;

        let req: ExtractRequest = serde_json::from_value(json!({
            "transcript": "I was CFO at Acme, then did a stint at Pwc.",
            "incremental": true,
            "existingData": {"skills": [{"name": "Board reporting", "confidence": 0.8}]}
        }))
        .unwrap();
        let resp = run(&server, req).await.unwrap();

        assert!(resp.success);
        assert_eq!(resp.pending_count, 0);

        let skills: Vec<_> = resp.extraction.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skills, vec!["Board reporting", "Treasury"]);
        assert_eq!(resp.extraction.skills[1].confidence, 1.0);

        let companies = &resp.extraction.companies;
        assert_eq!(companies.len(), 3);
        assert_eq!(companies[0].normalized_name.as_deref(), Some("Acme Corp"));
        assert_eq!(companies[0].confidence, 0.9);
        assert!(companies[1].needs_validation);
        assert_eq!(companies[2].name, "Ghost");
        assert_eq!(companies[2].confidence, 0.3);

        assert_eq!(resp.company_questions.len(), 1);
        assert_eq!(resp.company_questions[0].company_name, "Pwc");
        assert_eq!(resp.company_questions[0].question, "Did you mean PwC?");
        assert_eq!(resp.extraction.preferences.role_types, vec!["CFO"]);

        let body = serde_json::to_value(&resp).unwrap();
        assert_eq!(body["pendingCount"], 0);
        assert_eq!(body["companyQuestions"][0]["suggestedUrl"], "https://pwc.com");
    }

    #[tokio::test]
    async fn test_llm_failure_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let req: ExtractRequest =
            serde_json::from_value(json!({"transcript": "hello"})).unwrap();
        let err = run(&server, req).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { service: "LLM", .. }));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_blank_transcript_never_reaches_llm() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(llm_text_reply("{}"))
            .expect(0)
            .mount(&server)
            .await;

        let req: ExtractRequest = serde_json::from_value(json!({"transcript": "  "})).unwrap();
        let err = run(&server, req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    fn with_skill(name: &str) -> ExtractionResult {
        ExtractionResult {
            skills: vec![ExtractedSkill {
                name: name.into(),
                confidence: 0.5,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_non_incremental_ignores_existing() {
        let out = combine_with_existing(with_skill("New"), false, Some(with_skill("Old")));
        assert_eq!(out.skills.len(), 1);
        assert_eq!(out.skills[0].name, "New");
    }

    #[test]
    fn test_incremental_merges_existing_first() {
        let out = combine_with_existing(with_skill("New"), true, Some(with_skill("Old")));
        let names: Vec<_> = out.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Old", "New"]);
    }

    #[test]
    fn test_incremental_without_existing_is_fresh() {
        let out = combine_with_existing(with_skill("New"), true, None);
        assert_eq!(out, with_skill("New"));
    }

    #[test]
    fn test_request_accepts_camel_case_body() {
        let req: ExtractRequest = serde_json::from_str(
            r#"{"transcript": "hi", "userId": "u1", "sessionId": "s1", "incremental": true,
                "existingData": {"skills": [{"name": "SQL", "confidence": 0.4}]}}"#,
        )
        .unwrap();
        assert!(req.incremental);
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.existing_data.unwrap().skills[0].name, "SQL");
    }
}
