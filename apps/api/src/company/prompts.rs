// Company validation LLM prompt templates.

pub const COMPANY_VALIDATE_SYSTEM: &str = "\
You are a company name resolver for an executive recruiting service. \
Given a company name typed or spoken by a senior executive, identify the real organization it most likely refers to. \
You MUST respond with valid JSON only — no markdown fences, no explanations.";

pub const COMPANY_VALIDATE_PROMPT: &str = r#"Resolve the following company name.

COMPANY NAME:
{company_name}

OUTPUT SCHEMA (return exactly this structure):
{
  "normalizedName": "string" | null,      // official trading name, null if unknown
  "confidence": number,                   // 0.0 - 1.0 that normalizedName is the company meant
  "needsConfirmation": boolean,           // true if several companies match or confidence < 0.8
  "suggestedDomain": "string" | null,     // primary web domain, e.g. "acme.com"
  "question": "string" | null             // short question to ask the user when needsConfirmation is true
}

RULES:
- Transcription errors are common ("Price Waterhouse" -> "PwC"). Correct them.
- Do not guess a domain you are not sure of. Use null instead.
"#;
