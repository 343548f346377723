use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SkillRow {
    pub id: Uuid,
    pub user_id: String,
    pub skill_name: String,
    pub category: Option<String>,
    pub confidence: Option<f64>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRow {
    pub id: Uuid,
    pub user_id: String,
    pub company_name: String,
    pub role_title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QualificationRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub qualification_type: Option<String>,
    pub issuer: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Select list for [`PreferencesRow`]. NULL arrays decode as empty.
pub const PREFERENCES_COLUMNS: &str = "user_id, remote_preference, \
    COALESCE(role_types, '{}') AS role_types, \
    COALESCE(locations, '{}') AS locations, \
    COALESCE(industries, '{}') AS industries, \
    day_rate_min, day_rate_max, availability, updated_at";

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRow {
    pub user_id: String,
    pub remote_preference: Option<String>,
    pub role_types: Vec<String>,
    pub locations: Vec<String>,
    pub industries: Vec<String>,
    pub day_rate_min: Option<i32>,
    pub day_rate_max: Option<i32>,
    pub availability: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_arrays_are_coalesced() {
        for column in ["role_types", "locations", "industries"] {
            assert!(PREFERENCES_COLUMNS.contains(&format!("COALESCE({column}, '{{}}') AS {column}")));
        }
    }
}
