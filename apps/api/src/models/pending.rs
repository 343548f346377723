use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// An extracted fact awaiting the user's accept/reject decision.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PendingItemRow {
    pub id: Uuid,
    pub user_id: String,
    pub session_id: Option<String>,
    pub item_type: String,
    pub value: Value,
    pub confidence: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
