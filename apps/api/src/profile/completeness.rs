use serde::{Deserialize, Serialize};

const SKILL_POINTS: u32 = 5;
const SKILL_CAP: u32 = 30;
const EXPERIENCE_POINTS: u32 = 10;
const EXPERIENCE_CAP: u32 = 30;
const QUALIFICATION_POINTS: u32 = 10;
const QUALIFICATION_CAP: u32 = 20;
const PREFERENCES_POINTS: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    /// 0 – 100
    pub score: u32,
    pub skills: u32,
    pub experiences: u32,
    pub qualifications: u32,
    pub preferences: u32,
    pub missing_sections: Vec<String>,
}

/// Weighted profile completeness: skills ≤30, experiences ≤30,
/// qualifications ≤20, preferences 20.
pub fn compute_completeness(
    skills: usize,
    experiences: usize,
    qualifications: usize,
    has_preferences: bool,
) -> CompletenessReport {
    let part = |count: usize, points: u32, cap: u32| {
        u32::try_from(count)
            .unwrap_or(u32::MAX)
            .saturating_mul(points)
            .min(cap)
    };

    let skills_score = part(skills, SKILL_POINTS, SKILL_CAP);
    let experiences_score = part(experiences, EXPERIENCE_POINTS, EXPERIENCE_CAP);
    let qualifications_score = part(qualifications, QUALIFICATION_POINTS, QUALIFICATION_CAP);
    let preferences_score = if has_preferences { PREFERENCES_POINTS } else { 0 };

    let mut missing_sections = Vec::new();
    for (name, count) in [
        ("skills", skills),
        ("experiences", experiences),
        ("qualifications", qualifications),
    ] {
        if count == 0 {
            missing_sections.push(name.to_string());
        }
    }
    if !has_preferences {
        missing_sections.push("preferences".to_string());
    }

    CompletenessReport {
        score: (skills_score + experiences_score + qualifications_score + preferences_score)
            .min(100),
        skills: skills_score,
        experiences: experiences_score,
        qualifications: qualifications_score,
        preferences: preferences_score,
        missing_sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_profile_scores_100() {
        let report = compute_completeness(6, 3, 2, true);
        assert_eq!(report.score, 100);
        assert!(report.missing_sections.is_empty());
    }

    #[test]
    fn test_sections_are_capped() {
        let report = compute_completeness(50, 50, 50, false);
        assert_eq!(report.skills, 30);
        assert_eq!(report.experiences, 30);
        assert_eq!(report.qualifications, 20);
        assert_eq!(report.score, 80);
        assert_eq!(report.missing_sections, vec!["preferences"]);
    }

    #[test]
    fn test_partial_profile() {
        // 2*5 + 1*10 + 0 + 20 = 40
        let report = compute_completeness(2, 1, 0, true);
        assert_eq!(report.score, 40);
        assert_eq!(report.missing_sections, vec!["qualifications"]);
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        let report = compute_completeness(0, 0, 0, false);
        assert_eq!(report.score, 0);
        assert_eq!(report.missing_sections.len(), 4);
    }
}
