//! Company enrichment: runs every extracted company through the validator and
//! folds the result back into the extraction.
//!
//! Calls are sequential and each one is isolated. A failed validation leaves
//! that company untouched, so the output always has one entry per input.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::company::{CompanyValidation, CompanyValidator};
use crate::extraction::models::{CompanyQuestion, ExtractedCompany};
use crate::graph::zep::{GraphPayload, GraphProvider};

#[derive(Debug, Default)]
pub struct EnrichedCompanies {
    pub companies: Vec<ExtractedCompany>,
    pub questions: Vec<CompanyQuestion>,
}

pub async fn enrich_companies(
    companies: Vec<ExtractedCompany>,
    validator: &dyn CompanyValidator,
) -> EnrichedCompanies {
    let mut enriched = EnrichedCompanies {
        companies: Vec::with_capacity(companies.len()),
        questions: Vec::new(),
    };

    for company in companies {
        match validator.validate(&company.name).await {
            Ok(validation) => {
                if let Some(question) = confirmation_question(&company, &validation) {
                    enriched.questions.push(question);
                }
                enriched.companies.push(apply_validation(company, validation));
            }
            Err(e) => {
                warn!("Company validation failed for '{}': {e}", company.name);
                enriched.companies.push(company);
            }
        }
    }

    enriched
}

fn apply_validation(mut company: ExtractedCompany, validation: CompanyValidation) -> ExtractedCompany {
    if let Some(name) = validation.normalized_name {
        company.normalized_name = Some(name);
    }
    company.needs_validation = validation.needs_confirmation;
    company.confidence = company.confidence.max(validation.confidence);
    company
}

fn confirmation_question(
    company: &ExtractedCompany,
    validation: &CompanyValidation,
) -> Option<CompanyQuestion> {
    if !validation.needs_confirmation {
        return None;
    }
    validation
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| CompanyQuestion {
            company_name: company.name.clone(),
            question: q.to_string(),
            suggested_url: validation.suggested_url.clone(),
        })
}

/// Pushes a transcript to the external graph so it can enrich the user's
/// knowledge graph. Detached: the caller never awaits the handle, and the
/// outcome is only logged.
pub fn spawn_graph_enrichment(
    provider: Arc<dyn GraphProvider>,
    user_id: String,
    transcript: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if !provider.is_enabled() {
            return;
        }
        match provider
            .add_data(&user_id, GraphPayload::Text(transcript))
            .await
        {
            Ok(()) => info!("Graph enrichment queued for user {user_id}"),
            Err(e) => warn!("Graph enrichment failed for user {user_id}: {e}"),
        }
    })
}
