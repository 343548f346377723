//! Pushes a user's relational profile into the external graph as one JSON episode.

use serde_json::{json, Value};
use tracing::info;

use crate::graph::local::{preference_entries, LocalProfile};
use crate::graph::zep::{GraphPayload, GraphProvider, ZepError};

/// Episode body plus the number of profile items it carries.
pub fn build_sync_payload(profile: &LocalProfile) -> (Value, usize) {
    let skills: Vec<&str> = profile.skills.iter().map(|s| s.skill_name.as_str()).collect();
    let experiences: Vec<Value> = profile
        .experiences
        .iter()
        .map(|e| {
            json!({
                "company": e.company_name,
                "role": e.role_title,
                "isCurrent": e.is_current,
            })
        })
        .collect();
    let preferences = profile
        .preferences
        .as_ref()
        .map(preference_entries)
        .unwrap_or_default();

    let item_count = skills.len() + experiences.len() + preferences.len();
    let payload = json!({
        "kind": "executive_profile",
        "skills": skills,
        "experiences": experiences,
        "preferences": preferences,
    });
    (payload, item_count)
}

pub async fn sync_profile_to_graph(
    provider: &dyn GraphProvider,
    user_id: &str,
    profile: &LocalProfile,
) -> Result<usize, ZepError> {
    let (payload, item_count) = build_sync_payload(profile);
    provider.add_data(user_id, GraphPayload::Json(payload)).await?;
    info!("Synced {item_count} profile items to Zep for user {user_id}");
    Ok(item_count)
}
