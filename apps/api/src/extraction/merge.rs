//! Incremental extraction merge.
//!
//! A conversation is extracted in chunks; each new chunk is merged into the
//! data already collected. List facts are keyed case-insensitively and the
//! higher-confidence copy wins; the loser only fills in missing fields.

use crate::extraction::models::{
    ExtractedCompany, ExtractedPreferences, ExtractedQualification, ExtractedSkill,
    ExtractionResult,
};

pub fn merge_extractions(existing: ExtractionResult, fresh: ExtractionResult) -> ExtractionResult {
    ExtractionResult {
        skills: merge_by_key(existing.skills, fresh.skills, |s| s.name.as_str(), merge_skill),
        companies: merge_by_key(
            existing.companies,
            fresh.companies,
            |c| c.name.as_str(),
            merge_company,
        ),
        qualifications: merge_by_key(
            existing.qualifications,
            fresh.qualifications,
            |q| q.name.as_str(),
            merge_qualification,
        ),
        preferences: merge_preferences(existing.preferences, fresh.preferences),
    }
}

/// Existing items keep their position; unseen fresh items are appended.
fn merge_by_key<T>(
    existing: Vec<T>,
    fresh: Vec<T>,
    key: impl Fn(&T) -> &str,
    combine: impl Fn(T, T) -> T,
) -> Vec<T> {
    let mut merged: Vec<T> = Vec::with_capacity(existing.len() + fresh.len());
    for item in existing.into_iter().chain(fresh) {
        let k = normalize_key(key(&item));
        if k.is_empty() {
            continue;
        }
        match merged.iter().position(|m| normalize_key(key(m)) == k) {
            Some(idx) => {
                let current = merged.remove(idx);
                merged.insert(idx, combine(current, item));
            }
            None => merged.push(item),
        }
    }
    merged
}

fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Returns (winner, loser) by confidence. Ties go to the newer item.
fn by_confidence<T>(current: T, incoming: T, conf: impl Fn(&T) -> f64) -> (T, T) {
    if conf(&current) > conf(&incoming) {
        (current, incoming)
    } else {
        (incoming, current)
    }
}

fn merge_skill(current: ExtractedSkill, incoming: ExtractedSkill) -> ExtractedSkill {
    let (mut win, lose) = by_confidence(current, incoming, |s| s.confidence);
    win.normalized = win.normalized.or(lose.normalized);
    win.category = win.category.or(lose.category);
    win
}

fn merge_company(current: ExtractedCompany, incoming: ExtractedCompany) -> ExtractedCompany {
    let (mut win, lose) = by_confidence(current, incoming, |c| c.confidence);
    win.normalized_name = win.normalized_name.or(lose.normalized_name);
    win.role = win.role.or(lose.role);
    win
}

fn merge_qualification(
    current: ExtractedQualification,
    incoming: ExtractedQualification,
) -> ExtractedQualification {
    let (mut win, lose) = by_confidence(current, incoming, |q| q.confidence);
    win.kind = win.kind.or(lose.kind);
    win.issuer = win.issuer.or(lose.issuer);
    win
}

fn merge_preferences(
    existing: ExtractedPreferences,
    fresh: ExtractedPreferences,
) -> ExtractedPreferences {
    ExtractedPreferences {
        remote_preference: non_empty(fresh.remote_preference).or(existing.remote_preference),
        role_types: union(existing.role_types, fresh.role_types),
        locations: union(existing.locations, fresh.locations),
        industries: union(existing.industries, fresh.industries),
        day_rate_min: fresh.day_rate_min.or(existing.day_rate_min),
        day_rate_max: fresh.day_rate_max.or(existing.day_rate_max),
        availability: non_empty(fresh.availability).or(existing.availability),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

fn union(existing: Vec<String>, fresh: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(existing.len() + fresh.len());
    for v in existing.into_iter().chain(fresh) {
        let k = normalize_key(&v);
        if !k.is_empty() && !out.iter().any(|o| normalize_key(o) == k) {
            out.push(v);
        }
    }
    out
}
