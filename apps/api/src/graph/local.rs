//! Local graph fallback, built from relational rows when the external graph
//! is unavailable or empty.
//!
//! The local graph is a flat node list around the user: no edges are built.

use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::graph::types::{Graph, GraphNode, NodeType};
use crate::models::job::{JobRow, JOB_COLUMNS};
use crate::models::profile::{ExperienceRow, PreferencesRow, SkillRow, PREFERENCES_COLUMNS};

const MAX_SKILLS: i64 = 20;
const MAX_COMPANIES: i64 = 10;
const MAX_MATCHED_JOBS: i64 = 5;
const MAX_ROLE_TYPES: usize = 3;
const MAX_LOCATIONS: usize = 2;
const MAX_INDUSTRIES: usize = 2;

/// Rows the local graph is built from.
#[derive(Debug, Clone, Default)]
pub struct LocalProfile {
    pub skills: Vec<SkillRow>,
    pub experiences: Vec<ExperienceRow>,
    pub preferences: Option<PreferencesRow>,
    /// Most recent active jobs. Not ranked against the user's profile.
    pub matched_jobs: Vec<JobRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
}

/// Runs the four profile queries concurrently; any failure fails the load.
pub async fn load_local_profile(pool: &PgPool, user_id: &str) -> Result<LocalProfile, sqlx::Error> {
    let skills = sqlx::query_as::<_, SkillRow>(
        r#"
        SELECT * FROM user_skills
        WHERE user_id = $1
        ORDER BY confidence DESC NULLS LAST, created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(MAX_SKILLS)
    .fetch_all(pool);

    let experiences = sqlx::query_as::<_, ExperienceRow>(
        r#"
        SELECT * FROM (
            SELECT DISTINCT ON (lower(company_name)) *
            FROM user_experiences
            WHERE user_id = $1
            ORDER BY lower(company_name), is_current DESC, start_date DESC NULLS LAST
        ) AS companies
        ORDER BY is_current DESC, start_date DESC NULLS LAST
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(MAX_COMPANIES)
    .fetch_all(pool);

    let preferences_sql =
        format!("SELECT {PREFERENCES_COLUMNS} FROM user_preferences WHERE user_id = $1 LIMIT 1");
    let preferences = sqlx::query_as::<_, PreferencesRow>(&preferences_sql)
        .bind(user_id)
        .fetch_optional(pool);

    // TODO: rank by overlap with the user's skills and preferences instead of recency.
    let jobs_sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE is_active = TRUE \
         ORDER BY posted_date DESC NULLS LAST LIMIT $1"
    );
    let matched_jobs = sqlx::query_as::<_, JobRow>(&jobs_sql)
        .bind(MAX_MATCHED_JOBS)
        .fetch_all(pool);

    let (skills, experiences, preferences, matched_jobs) =
        tokio::try_join!(skills, experiences, preferences, matched_jobs)?;

    Ok(LocalProfile {
        skills,
        experiences,
        preferences,
        matched_jobs,
    })
}

/// Each preference value becomes its own entry, capped per category.
pub fn preference_entries(prefs: &PreferencesRow) -> Vec<PreferenceEntry> {
    let mut entries = Vec::new();
    if let Some(remote) = prefs
        .remote_preference
        .as_deref()
        .filter(|r| !r.trim().is_empty())
    {
        entries.push(PreferenceEntry {
            kind: "remote",
            value: remote.to_string(),
        });
    }
    let capped = [
        ("role", &prefs.role_types, MAX_ROLE_TYPES),
        ("location", &prefs.locations, MAX_LOCATIONS),
        ("industry", &prefs.industries, MAX_INDUSTRIES),
    ];
    for (kind, values, cap) in capped {
        entries.extend(
            values
                .iter()
                .filter(|v| !v.trim().is_empty())
                .take(cap)
                .map(|v| PreferenceEntry {
                    kind,
                    value: v.clone(),
                }),
        );
    }
    entries
}

pub fn build_local_graph(user_id: &str, profile: &LocalProfile) -> Graph {
    let mut graph = Graph::new(GraphNode::new(format!("user-{user_id}"), NodeType::User, "You"));

    // Row ids are unique, so insertion cannot collide.
    let mut push = |node: GraphNode| {
        let _ = graph.add_node(node);
    };

    for skill in &profile.skills {
        push(
            GraphNode::new(format!("skill-{}", skill.id), NodeType::Skill, &skill.skill_name)
                .with_data(json!({
                    "category": skill.category,
                    "confidence": skill.confidence,
                })),
        );
    }
    for exp in &profile.experiences {
        push(
            GraphNode::new(format!("company-{}", exp.id), NodeType::Company, &exp.company_name)
                .with_data(json!({
                    "role": exp.role_title,
                    "isCurrent": exp.is_current,
                })),
        );
    }
    if let Some(prefs) = &profile.preferences {
        for (i, entry) in preference_entries(prefs).into_iter().enumerate() {
            push(
                GraphNode::new(
                    format!("pref-{}-{i}", entry.kind),
                    NodeType::Preference,
                    entry.value.clone(),
                )
                .with_data(json!(entry)),
            );
        }
    }
    for job in &profile.matched_jobs {
        push(
            GraphNode::new(format!("job-{}", job.id), NodeType::Job, &job.title).with_data(json!({
                "slug": job.slug,
                "company": job.company_name,
                "location": job.location,
            })),
        );
    }

    graph
}
