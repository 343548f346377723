// Transcript extraction LLM prompt templates.

pub const EXTRACT_SYSTEM: &str = "\
You extract structured profile facts from conversations between an interim executive \
and a recruiting assistant. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Only extract facts the executive states about themselves.";

pub const EXTRACT_PROMPT: &str = r#"Extract the executive's profile facts from the transcript below.

TRANSCRIPT:
{transcript}

OUTPUT SCHEMA (return exactly this structure; use [] for empty lists and null only for unknown single values):
{
  "skills": [{"name": "string", "normalized": "string" | null, "category": "string" | null, "confidence": number}],
  "companies": [{"name": "string", "role": "string" | null, "confidence": number}],
  "qualifications": [{"name": "string", "type": "degree" | "certification" | "membership" | null, "issuer": "string" | null, "confidence": number}],
  "preferences": {
    "remotePreference": "remote" | "hybrid" | "onsite" | null,
    "roleTypes": ["string"],        // e.g. "CFO", "Interim CTO"
    "locations": ["string"],
    "industries": ["string"],
    "dayRateMin": number | null,    // GBP per day
    "dayRateMax": number | null,
    "availability": "string" | null
  }
}
"#;
