use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::extraction::models::{ExtractedPreferences, FactSource};
use crate::models::pending::PendingItemRow;
use crate::models::profile::{
    ExperienceRow, PreferencesRow, QualificationRow, SkillRow, PREFERENCES_COLUMNS,
};

/// Everything stored for a user, as shown on the profile ("repo") page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub skills: Vec<SkillRow>,
    pub experiences: Vec<ExperienceRow>,
    pub qualifications: Vec<QualificationRow>,
    pub preferences: Option<PreferencesRow>,
    pub pending_items: Vec<PendingItemRow>,
}

/// Loads all profile sections concurrently; any failure fails the whole load.
pub async fn fetch_profile(pool: &PgPool, user_id: &str) -> Result<ProfileSnapshot, sqlx::Error> {
    let skills = sqlx::query_as::<_, SkillRow>(
        "SELECT * FROM user_skills WHERE user_id = $1 ORDER BY confidence DESC NULLS LAST, skill_name",
    )
    .bind(user_id)
    .fetch_all(pool);

    let experiences = sqlx::query_as::<_, ExperienceRow>(
        "SELECT * FROM user_experiences WHERE user_id = $1 ORDER BY is_current DESC, start_date DESC NULLS LAST",
    )
    .bind(user_id)
    .fetch_all(pool);

    let qualifications = sqlx::query_as::<_, QualificationRow>(
        "SELECT * FROM user_qualifications WHERE user_id = $1 ORDER BY year DESC NULLS LAST, name",
    )
    .bind(user_id)
    .fetch_all(pool);

    let preferences_sql =
        format!("SELECT {PREFERENCES_COLUMNS} FROM user_preferences WHERE user_id = $1");
    let preferences = sqlx::query_as::<_, PreferencesRow>(&preferences_sql)
        .bind(user_id)
        .fetch_optional(pool);

    let pending_items = sqlx::query_as::<_, PendingItemRow>(
        "SELECT * FROM pending_extractions WHERE user_id = $1 AND status = 'pending' ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool);

    let (skills, experiences, qualifications, preferences, pending_items) =
        tokio::try_join!(skills, experiences, qualifications, preferences, pending_items)?;

    Ok(ProfileSnapshot {
        skills,
        experiences,
        qualifications,
        preferences,
        pending_items,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    pub company_name: String,
    pub role_title: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSaved {
    pub skills: u64,
    pub experiences: u64,
    pub preferences: bool,
}

/// Persists onboarding answers in one transaction. Skills and experiences
/// already on the profile are skipped; preferences are upserted.
pub async fn save_onboarding(
    pool: &PgPool,
    user_id: &str,
    skills: &[SkillInput],
    experiences: &[ExperienceInput],
    preferences: Option<&ExtractedPreferences>,
) -> Result<OnboardingSaved, sqlx::Error> {
    let source = FactSource::Manual.as_str();
    let mut saved = OnboardingSaved::default();
    let mut tx = pool.begin().await?;

    for skill in skills.iter().filter(|s| !s.name.trim().is_empty()) {
        let result = sqlx::query(
            r#"
            INSERT INTO user_skills (id, user_id, skill_name, category, confidence, source, created_at)
            SELECT $1, $2, $3, $4, 1.0, $5, NOW()
            WHERE NOT EXISTS (
                SELECT 1 FROM user_skills WHERE user_id = $2 AND lower(skill_name) = lower($3)
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(skill.name.trim())
        .bind(&skill.category)
        .bind(source)
        .execute(&mut *tx)
        .await?;
        saved.skills += result.rows_affected();
    }

    for exp in experiences.iter().filter(|e| !e.company_name.trim().is_empty()) {
        let result = sqlx::query(
            r#"
            INSERT INTO user_experiences
                (id, user_id, company_name, role_title, start_date, end_date, is_current, source, created_at)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, NOW()
            WHERE NOT EXISTS (
                SELECT 1 FROM user_experiences
                WHERE user_id = $2
                  AND lower(company_name) = lower($3)
                  AND COALESCE(lower(role_title), '') = COALESCE(lower($4), '')
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(exp.company_name.trim())
        .bind(&exp.role_title)
        .bind(exp.start_date)
        .bind(exp.end_date)
        .bind(exp.is_current)
        .bind(source)
        .execute(&mut *tx)
        .await?;
        saved.experiences += result.rows_affected();
    }

    if let Some(prefs) = preferences {
        sqlx::query(
            r#"
            INSERT INTO user_preferences
                (user_id, remote_preference, role_types, locations, industries,
                 day_rate_min, day_rate_max, availability, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                remote_preference = EXCLUDED.remote_preference,
                role_types = EXCLUDED.role_types,
                locations = EXCLUDED.locations,
                industries = EXCLUDED.industries,
                day_rate_min = EXCLUDED.day_rate_min,
                day_rate_max = EXCLUDED.day_rate_max,
                availability = EXCLUDED.availability,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(&prefs.remote_preference)
        .bind(&prefs.role_types)
        .bind(&prefs.locations)
        .bind(&prefs.industries)
        .bind(prefs.day_rate_min)
        .bind(prefs.day_rate_max)
        .bind(&prefs.availability)
        .execute(&mut *tx)
        .await?;
        saved.preferences = true;
    }

    tx.commit().await?;
    info!(
        "Onboarding saved for user {user_id}: {} skills, {} experiences, preferences={}",
        saved.skills, saved.experiences, saved.preferences
    );
    Ok(saved)
}
