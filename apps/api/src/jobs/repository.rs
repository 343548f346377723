use sqlx::PgPool;

use crate::models::job::{JobRow, JOB_COLUMNS};

/// Upper bound on slugs resolved per request.
pub const MAX_SLUGS: usize = 10;

/// Trims, drops blanks and duplicates (first occurrence kept), then caps at
/// [`MAX_SLUGS`].
pub fn normalize_slugs(slugs: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(slugs.len().min(MAX_SLUGS));
    for slug in slugs.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if out.len() == MAX_SLUGS {
            break;
        }
        if !out.iter().any(|existing| existing == slug) {
            out.push(slug.to_string());
        }
    }
    out
}

/// Returns without touching the pool when `slugs` is empty.
pub async fn jobs_by_slugs(pool: &PgPool, slugs: &[String]) -> Result<Vec<JobRow>, sqlx::Error> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE slug = ANY($1) ORDER BY posted_date DESC NULLS LAST"
    );
    sqlx::query_as::<_, JobRow>(&sql)
        .bind(slugs)
        .fetch_all(pool)
        .await
}

pub async fn job_by_slug(pool: &PgPool, slug: &str) -> Result<Option<JobRow>, sqlx::Error> {
    let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE slug = $1");
    sqlx::query_as::<_, JobRow>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await
}
