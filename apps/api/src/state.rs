use std::sync::Arc;

use sqlx::PgPool;

use crate::company::CompanyValidator;
use crate::graph::zep::GraphProvider;
use crate::hume::HumeClient;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Default: LlmCompanyValidator.
    pub company_validator: Arc<dyn CompanyValidator>,
    /// Default: ZepClient. Disabled when ZEP_API_KEY is unset.
    pub graph_provider: Arc<dyn GraphProvider>,
    pub hume: HumeClient,
}
