//! Company Validator: trait-based resolver for free-text company names.
//!
//! Default: `LlmCompanyValidator` (one structured-JSON call through `llm_client`).
//! `AppState` holds an `Arc<dyn CompanyValidator>` so extraction and the
//! validate endpoint share one backend, and tests can substitute a fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::company::prompts::{COMPANY_VALIDATE_PROMPT, COMPANY_VALIDATE_SYSTEM};
use crate::llm_client::prompts::CONFIDENCE_INSTRUCTION;
use crate::llm_client::{clamp_confidence, null_as_default, LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("company name is empty")]
    EmptyName,

    #[error("LLM validation failed: {0}")]
    Llm(#[from] LlmError),
}

/// Result of validating one company name. Computed per request; only the
/// explicit confirm action persists anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyValidation {
    pub normalized_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub needs_confirmation: bool,
    pub suggested_domain: Option<String>,
    pub suggested_url: Option<String>,
    pub question: Option<String>,
}

impl CompanyValidation {
    /// Clamps confidence into [0, 1], derives the URL from the domain and
    /// fills in a default question when confirmation is required.
    fn normalize(mut self, company_name: &str) -> Self {
        self.confidence = clamp_confidence(self.confidence);
        self.normalized_name = non_blank(self.normalized_name);
        self.question = non_blank(self.question);
        self.suggested_domain = self
            .suggested_domain
            .map(|d| {
                d.trim()
                    .trim_start_matches("https://")
                    .trim_start_matches("http://")
                    .trim_end_matches('/')
                    .to_lowercase()
            })
            .filter(|d| !d.is_empty());
        self.suggested_url = non_blank(self.suggested_url);
        if self.suggested_url.is_none() {
            self.suggested_url = self.suggested_domain.as_ref().map(|d| format!("https://{d}"));
        }
        if self.needs_confirmation && self.question.is_none() {
            let target = self.normalized_name.as_deref().unwrap_or(company_name);
            self.question = Some(match &self.suggested_domain {
                Some(domain) => format!("When you mentioned {company_name}, did you mean {target} ({domain})?"),
                None => format!("When you mentioned {company_name}, did you mean {target}?"),
            });
        }
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Implement this to swap the validation backend without touching callers.
#[async_trait]
pub trait CompanyValidator: Send + Sync {
    async fn validate(&self, company_name: &str) -> Result<CompanyValidation, ValidatorError>;
}

pub struct LlmCompanyValidator {
    llm: LlmClient,
}

impl LlmCompanyValidator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CompanyValidator for LlmCompanyValidator {
    async fn validate(&self, company_name: &str) -> Result<CompanyValidation, ValidatorError> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(ValidatorError::EmptyName);
        }

        let prompt = format!(
            "{}\n{}",
            COMPANY_VALIDATE_PROMPT.replace("{company_name}", company_name),
            CONFIDENCE_INSTRUCTION
        );
        let raw: CompanyValidation = self.llm.call_json(&prompt, COMPANY_VALIDATE_SYSTEM).await?;
        let validation = raw.normalize(company_name);

        debug!(
            "Validated company '{company_name}' -> {:?} (confidence {:.2})",
            validation.normalized_name, validation.confidence
        );
        Ok(validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps_confidence() {
        let v = CompanyValidation {
            confidence: 1.7,
            ..Default::default()
        }
        .normalize("Acme");
        assert_eq!(v.confidence, 1.0);

        let v = CompanyValidation {
            confidence: f64::NAN,
            ..Default::default()
        }
        .normalize("Acme");
        assert_eq!(v.confidence, 0.0);
    }

    #[test]
    fn test_normalize_derives_url_from_domain() {
        let v = CompanyValidation {
            suggested_domain: Some("https://Acme.com/".into()),
            ..Default::default()
        }
        .normalize("Acme");
        assert_eq!(v.suggested_domain.as_deref(), Some("acme.com"));
        assert_eq!(v.suggested_url.as_deref(), Some("https://acme.com"));
    }

    #[test]
    fn test_default_question_only_when_confirmation_needed() {
        let v = CompanyValidation {
            normalized_name: Some("PwC".into()),
            needs_confirmation: true,
            ..Default::default()
        }
        .normalize("Price Waterhouse");
        assert_eq!(
            v.question.as_deref(),
            Some("When you mentioned Price Waterhouse, did you mean PwC?")
        );

        let v = CompanyValidation {
            normalized_name: Some("PwC".into()),
            needs_confirmation: false,
            ..Default::default()
        }
        .normalize("PwC");
        assert!(v.question.is_none());
    }

    #[test]
    fn test_blank_question_is_replaced_by_default() {
        let v = CompanyValidation {
            needs_confirmation: true,
            question: Some("   ".into()),
            ..Default::default()
        }
        .normalize("Acme");
        assert_eq!(
            v.question.as_deref(),
            Some("When you mentioned Acme, did you mean Acme?")
        );

        let v = CompanyValidation {
            question: Some("".into()),
            ..Default::default()
        }
        .normalize("Acme");
        assert!(v.question.is_none());
    }

    #[test]
    fn test_validation_accepts_null_flags() {
        let v: CompanyValidation =
            serde_json::from_str(r#"{"confidence": null, "needsConfirmation": null}"#).unwrap();
        assert_eq!(v.confidence, 0.0);
        assert!(!v.needs_confirmation);
    }

    #[test]
    fn test_validation_deserializes_partial_llm_output() {
        let json = r#"{"normalizedName": "Unilever", "confidence": 0.93}"#;
        let v: CompanyValidation = serde_json::from_str(json).unwrap();
        assert_eq!(v.normalized_name.as_deref(), Some("Unilever"));
        assert!(!v.needs_confirmation);
        assert!(v.suggested_domain.is_none());
    }
}
