//! Axum route handlers for the Skills API.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::skills::extractor::SkillHit;
use crate::skills::jd_sections::{extract_jd_skills, JdSkill};
use crate::skills::taxonomy::{Skill, SkillCategory};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub text: String,
    /// Treat `text` as a job description and report requirement priorities.
    #[serde(default)]
    pub job_description: bool,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: Vec<SkillHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorities: Option<Vec<JdSkill>>,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyCategory {
    pub category: SkillCategory,
    pub label: String,
    pub weight: f64,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
    pub total: usize,
    pub categories: Vec<TaxonomyCategory>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skills/extract
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractSkillsRequest>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let analyzer = Arc::clone(&state.analyzer);
    let response = tokio::task::spawn_blocking(move || {
        let extractor = analyzer.extractor();
        let skills = extractor.extract(&request.text);
        let priorities = request
            .job_description
            .then(|| extract_jd_skills(extractor, &request.text));
        ExtractSkillsResponse { skills, priorities }
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(response))
}

/// GET /api/v1/skills/taxonomy
///
/// The active taxonomy (built-in plus any merged file), grouped by category.
pub async fn handle_get_taxonomy(State(state): State<AppState>) -> Json<TaxonomyResponse> {
    let taxonomy = state.analyzer.extractor().taxonomy();

    let categories = SkillCategory::ALL
        .iter()
        .map(|category| TaxonomyCategory {
            category: *category,
            label: category.label().to_string(),
            weight: category.weight(),
            skills: taxonomy
                .skills()
                .iter()
                .filter(|s| s.category == *category)
                .cloned()
                .collect(),
        })
        .filter(|c| !c.skills.is_empty())
        .collect();

    Json(TaxonomyResponse {
        total: taxonomy.len(),
        categories,
    })
}
