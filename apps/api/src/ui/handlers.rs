//! Axum route handlers for the web UI.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use tracing::debug;

use crate::analysis::upload::{read_analyze_form, resolve_resume_text};
use crate::errors::AppError;
use crate::state::AppState;
use crate::ui::view::{PageView, ResultsView};

/// GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let view = PageView::form("", false, state.config.max_upload_bytes);
    Ok(Html(state.renderer.render_page(&view)?))
}

/// POST /analyze
///
/// Runs the pipeline on the submitted form. Pipeline errors render inline on
/// the form with the error's status; only a template failure escapes as JSON.
pub async fn handle_analyze_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Html<String>), AppError> {
    let mut view = PageView::form("", false, state.config.max_upload_bytes);

    let outcome = async {
        let upload = read_analyze_form(multipart).await?;
        view.jd_text = upload.jd_text.clone();
        view.show_resume = upload.show_resume;

        let resume = resolve_resume_text(&upload).await?;
        let mut report = state.analyzer.analyze(&resume.text, &upload.jd_text).await?;
        report.extraction_backend = resume.backend.map(|b| b.as_str().to_string());
        Ok::<_, AppError>(ResultsView::build(
            &report,
            &resume.text,
            upload.show_resume,
            state.analyzer.extractor(),
        ))
    }
    .await;

    let status = match outcome {
        Ok(results) => {
            view.results = Some(results);
            StatusCode::OK
        }
        Err(e) => {
            debug!("Analyze form rejected: {e}");
            view.error = Some(e.public_message());
            e.status()
        }
    };

    Ok((status, Html(state.renderer.render_page(&view)?)))
}
