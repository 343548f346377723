use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::llm_client::{clamp_confidence, null_as_default};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    Skill,
    Company,
    Qualification,
    Preference,
}

impl FactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FactKind::Skill => "skill",
            FactKind::Company => "company",
            FactKind::Qualification => "qualification",
            FactKind::Preference => "preference",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "skill" => Some(FactKind::Skill),
            "company" => Some(FactKind::Company),
            "qualification" => Some(FactKind::Qualification),
            "preference" => Some(FactKind::Preference),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactSource {
    Manual,
    Extracted,
}

impl FactSource {
    pub fn as_str(self) -> &'static str {
        match self {
            FactSource::Manual => "manual",
            FactSource::Extracted => "extracted",
        }
    }
}

// Model output may carry explicit nulls for anything it did not find, so
// every non-optional field decodes null as its default.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedSkill {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub normalized: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedCompany {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub normalized_name: Option<String>,
    pub role: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub needs_validation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedQualification {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub issuer: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedPreferences {
    pub remote_preference: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role_types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub locations: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub industries: Vec<String>,
    pub day_rate_min: Option<i32>,
    pub day_rate_max: Option<i32>,
    pub availability: Option<String>,
}

/// Structured facts pulled out of one transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionResult {
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<ExtractedSkill>,
    #[serde(deserialize_with = "null_as_default")]
    pub companies: Vec<ExtractedCompany>,
    #[serde(deserialize_with = "null_as_default")]
    pub qualifications: Vec<ExtractedQualification>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferences: ExtractedPreferences,
}

/// Follow-up question surfaced when a company match needs the user's confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyQuestion {
    pub company_name: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_url: Option<String>,
}

/// A single discovered attribute about a user, in the shape stored as a pending item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFact {
    pub kind: FactKind,
    pub raw: String,
    pub normalized: Option<String>,
    pub confidence: f64,
    pub source: FactSource,
    /// Kind-specific fields (category, role, preference field name, ...).
    pub detail: Value,
}

impl ProfileFact {
    fn extracted(
        kind: FactKind,
        raw: &str,
        normalized: Option<&str>,
        confidence: f64,
        detail: Value,
    ) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            normalized: normalized.map(String::from),
            confidence,
            source: FactSource::Extracted,
            detail,
        }
    }

    /// JSON persisted in `pending_extractions.value`.
    pub fn to_value(&self) -> Value {
        json!({
            "raw": self.raw,
            "normalized": self.normalized,
            "source": self.source.as_str(),
            "detail": self.detail,
        })
    }
}

impl ExtractionResult {
    /// Pulls every confidence into [0, 1].
    pub fn clamp_confidences(mut self) -> Self {
        for s in &mut self.skills {
            s.confidence = clamp_confidence(s.confidence);
        }
        for c in &mut self.companies {
            c.confidence = clamp_confidence(c.confidence);
        }
        for q in &mut self.qualifications {
            q.confidence = clamp_confidence(q.confidence);
        }
        self
    }

    /// Flattens the extraction into individual facts. Each preference value
    /// becomes its own fact so it can be accepted or rejected separately.
    pub fn to_facts(&self) -> Vec<ProfileFact> {
        let mut facts = Vec::new();

        for s in &self.skills {
            facts.push(ProfileFact::extracted(
                FactKind::Skill,
                &s.name,
                s.normalized.as_deref(),
                s.confidence,
                json!({ "category": s.category }),
            ));
        }
        for c in &self.companies {
            facts.push(ProfileFact::extracted(
                FactKind::Company,
                &c.name,
                c.normalized_name.as_deref(),
                c.confidence,
                json!({ "role": c.role, "needsValidation": c.needs_validation }),
            ));
        }
        for q in &self.qualifications {
            facts.push(ProfileFact::extracted(
                FactKind::Qualification,
                &q.name,
                None,
                q.confidence,
                json!({ "type": q.kind, "issuer": q.issuer }),
            ));
        }

        let p = &self.preferences;
        let mut push_pref = |field: &str, value: &str| {
            facts.push(ProfileFact::extracted(
                FactKind::Preference,
                value,
                None,
                1.0,
                json!({ "field": field }),
            ));
        };
        if let Some(remote) = &p.remote_preference {
            push_pref("remotePreference", remote);
        }
        for v in &p.role_types {
            push_pref("roleTypes", v);
        }
        for v in &p.locations {
            push_pref("locations", v);
        }
        for v in &p.industries {
            push_pref("industries", v);
        }
        if let Some(a) = &p.availability {
            push_pref("availability", a);
        }

        facts
    }
}
