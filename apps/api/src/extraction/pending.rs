//! Pending-item queue: extracted facts wait here until the user accepts or
//! rejects them. Accepted facts are copied into the profile tables.

use serde::Deserialize;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::models::{FactKind, FactSource, ProfileFact};
use crate::models::pending::PendingItemRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingDecision {
    Accept,
    Reject,
}

impl PendingDecision {
    fn status(self) -> &'static str {
        match self {
            PendingDecision::Accept => "confirmed",
            PendingDecision::Reject => "rejected",
        }
    }
}

/// Saves each fact as a pending item. Inserts are independent: a failing row
/// is logged and skipped. Returns how many rows were saved.
pub async fn save_pending_facts(
    pool: &PgPool,
    user_id: &str,
    session_id: Option<&str>,
    facts: &[ProfileFact],
) -> usize {
    let mut saved = 0;
    for fact in facts {
        let result = sqlx::query(
            r#"
            INSERT INTO pending_extractions
                (id, user_id, session_id, item_type, value, confidence, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(session_id)
        .bind(fact.kind.as_str())
        .bind(fact.to_value())
        .bind(fact.confidence)
        .execute(pool)
        .await;

        match result {
            Ok(_) => saved += 1,
            Err(e) => warn!(
                "Failed to save pending {} '{}' for user {user_id}: {e}",
                fact.kind.as_str(),
                fact.raw
            ),
        }
    }
    info!("Saved {saved}/{} pending items for user {user_id}", facts.len());
    saved
}

pub async fn list_pending(pool: &PgPool, user_id: &str) -> Result<Vec<PendingItemRow>, sqlx::Error> {
    sqlx::query_as::<_, PendingItemRow>(
        r#"
        SELECT * FROM pending_extractions
        WHERE user_id = $1 AND status = 'pending'
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Moves a pending item to `confirmed` or `rejected`. On accept, the fact is
/// written to the matching profile table in the same transaction.
pub async fn resolve_pending(
    pool: &PgPool,
    user_id: &str,
    item_id: Uuid,
    decision: PendingDecision,
) -> Result<PendingItemRow, AppError> {
    let mut tx = pool.begin().await?;

    let item: PendingItemRow = sqlx::query_as(
        "SELECT * FROM pending_extractions WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Pending item {item_id} not found")))?;

    if item.status != "pending" {
        return Err(AppError::Validation(format!(
            "Pending item {item_id} is already {}",
            item.status
        )));
    }

    let updated: PendingItemRow = sqlx::query_as(
        "UPDATE pending_extractions SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(decision.status())
    .bind(item_id)
    .fetch_one(&mut *tx)
    .await?;

    if decision == PendingDecision::Accept {
        persist_accepted(&mut tx, &item).await?;
    }

    tx.commit().await?;
    info!("Pending item {item_id} -> {}", updated.status);
    Ok(updated)
}

fn str_field<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

async fn persist_accepted(
    tx: &mut Transaction<'_, Postgres>,
    item: &PendingItemRow,
) -> Result<(), AppError> {
    let kind = FactKind::parse(&item.item_type).ok_or_else(|| {
        AppError::Validation(format!("Unknown pending item type '{}'", item.item_type))
    })?;
    let raw = str_field(&item.value, &["raw"])
        .ok_or_else(|| AppError::Validation("Pending item has no value".to_string()))?;
    let name = str_field(&item.value, &["normalized"]).unwrap_or(raw);
    let source = FactSource::Extracted.as_str();

    match kind {
        FactKind::Skill => {
            sqlx::query(
                r#"
                INSERT INTO user_skills (id, user_id, skill_name, category, confidence, source, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&item.user_id)
            .bind(name)
            .bind(str_field(&item.value, &["detail", "category"]))
            .bind(item.confidence)
            .bind(source)
            .execute(&mut **tx)
            .await?;
        }
        FactKind::Company => {
            sqlx::query(
                r#"
                INSERT INTO user_experiences (id, user_id, company_name, role_title, is_current, source, created_at)
                VALUES ($1, $2, $3, $4, FALSE, $5, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&item.user_id)
            .bind(name)
            .bind(str_field(&item.value, &["detail", "role"]))
            .bind(source)
            .execute(&mut **tx)
            .await?;
        }
        FactKind::Qualification => {
            sqlx::query(
                r#"
                INSERT INTO user_qualifications (id, user_id, name, qualification_type, issuer, created_at)
                VALUES ($1, $2, $3, $4, $5, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&item.user_id)
            .bind(name)
            .bind(str_field(&item.value, &["detail", "type"]))
            .bind(str_field(&item.value, &["detail", "issuer"]))
            .execute(&mut **tx)
            .await?;
        }
        FactKind::Preference => {
            let field = str_field(&item.value, &["detail", "field"]).unwrap_or_default();
            let sql = preference_upsert_sql(field).ok_or_else(|| {
                AppError::Validation(format!("Unknown preference field '{field}'"))
            })?;
            sqlx::query(&sql)
                .bind(&item.user_id)
                .bind(name)
                .execute(&mut **tx)
                .await?;
        }
    }
    Ok(())
}

const PREFERENCE_LIST_COLUMNS: [&str; 3] = ["role_types", "locations", "industries"];

/// Upsert for one accepted preference value. List columns append without
/// duplicates; scalar columns are overwritten. A new row gets `'{}'` in every
/// list column it does not set, so no array is ever left NULL. Column names
/// come from a fixed allow-list, never from input.
fn preference_upsert_sql(field: &str) -> Option<String> {
    let (column, is_list) = match field {
        "remotePreference" => ("remote_preference", false),
        "availability" => ("availability", false),
        "roleTypes" => ("role_types", true),
        "locations" => ("locations", true),
        "industries" => ("industries", true),
        _ => return None,
    };

    let value_for = |list_column: &str| {
        if is_list && list_column == column {
            "ARRAY[$2::text]"
        } else {
            "'{}'"
        }
    };
    let list_values = PREFERENCE_LIST_COLUMNS.map(value_for).join(", ");
    let list_columns = PREFERENCE_LIST_COLUMNS.join(", ");

    Some(if is_list {
        format!(
            r#"
            INSERT INTO user_preferences (user_id, {list_columns}, updated_at)
            VALUES ($1, {list_values}, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                {column} = CASE
                    WHEN $2::text = ANY(COALESCE(user_preferences.{column}, '{{}}'))
                        THEN COALESCE(user_preferences.{column}, '{{}}')
                    ELSE array_append(COALESCE(user_preferences.{column}, '{{}}'), $2::text)
                END,
                updated_at = NOW()
            "#
        )
    } else {
        format!(
            r#"
            INSERT INTO user_preferences (user_id, {column}, {list_columns}, updated_at)
            VALUES ($1, $2, {list_values}, NOW())
            ON CONFLICT (user_id) DO UPDATE SET {column} = EXCLUDED.{column}, updated_at = NOW()
            "#
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decision_status_mapping() {
        assert_eq!(PendingDecision::Accept.status(), "confirmed");
        assert_eq!(PendingDecision::Reject.status(), "rejected");
    }

    #[test]
    fn test_decision_deserializes_lowercase() {
        let d: PendingDecision = serde_json::from_str(r#""accept""#).unwrap();
        assert_eq!(d, PendingDecision::Accept);
        assert!(serde_json::from_str::<PendingDecision>(r#""maybe""#).is_err());
    }

    #[test]
    fn test_str_field_walks_nested_paths() {
        let value = json!({"raw": "CFO", "detail": {"field": "roleTypes", "empty": " "}});
        assert_eq!(str_field(&value, &["raw"]), Some("CFO"));
        assert_eq!(str_field(&value, &["detail", "field"]), Some("roleTypes"));
        assert_eq!(str_field(&value, &["detail", "empty"]), None);
        assert_eq!(str_field(&value, &["detail", "missing"]), None);
    }

    #[test]
    fn test_preference_upsert_uses_allow_listed_columns() {
        let list_sql = preference_upsert_sql("roleTypes").unwrap();
        assert!(list_sql.contains("array_append(COALESCE(user_preferences.role_types, '{}')"));

        let scalar_sql = preference_upsert_sql("remotePreference").unwrap();
        assert!(scalar_sql.contains("remote_preference = EXCLUDED.remote_preference"));

        assert!(preference_upsert_sql("user_id; DROP TABLE jobs").is_none());
    }

    #[test]
    fn test_new_preference_row_never_leaves_arrays_null() {
        let scalar_sql = preference_upsert_sql("availability").unwrap();
        assert!(scalar_sql.contains(
            "(user_id, availability, role_types, locations, industries, updated_at)"
        ));
        assert!(scalar_sql.contains("VALUES ($1, $2, '{}', '{}', '{}', NOW())"));

        let list_sql = preference_upsert_sql("locations").unwrap();
        assert!(list_sql.contains("(user_id, role_types, locations, industries, updated_at)"));
        assert!(list_sql.contains("VALUES ($1, '{}', ARRAY[$2::text], '{}', NOW())"));
    }
}
