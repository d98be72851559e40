//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::report::AnalysisReport;
use crate::analysis::upload::{read_analyze_form, resolve_resume_text};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub jd_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload: `resume` (PDF) or `resume_text`, plus `jd_text`.
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let upload = read_analyze_form(multipart).await?;
    let resume = resolve_resume_text(&upload).await?;

    let mut report = state.analyzer.analyze(&resume.text, &upload.jd_text).await?;
    report.extraction_backend = resume.backend.map(|b| b.as_str().to_string());

    Ok(Json(report))
}

/// POST /api/v1/analyze/text
///
/// Same pipeline for callers that already have the resume as text.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = state
        .analyzer
        .analyze(&request.resume_text, &request.jd_text)
        .await?;
    Ok(Json(report))
}
