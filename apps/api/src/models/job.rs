use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Select list for [`JobRow`]. A NULL skill list decodes as empty and a
/// NULL `is_active` as inactive.
pub const JOB_COLUMNS: &str = "id, slug, title, company_name, location, role_category, \
    COALESCE(skills_required, '{}') AS skills_required, compensation, \
    COALESCE(is_active, FALSE) AS is_active, posted_date";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub role_category: Option<String>,
    pub skills_required: Vec<String>,
    pub compensation: Option<String>,
    pub is_active: bool,
    pub posted_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_job_columns_are_coalesced() {
        assert!(JOB_COLUMNS.contains("COALESCE(skills_required, '{}') AS skills_required"));
        assert!(JOB_COLUMNS.contains("COALESCE(is_active, FALSE) AS is_active"));
    }
}
