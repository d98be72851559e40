//! Multipart analyze form: reading the fields and turning the upload into resume text.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::analysis::report::{EMPTY_JD_MESSAGE, EMPTY_RESUME_MESSAGE};
use crate::errors::AppError;
use crate::extraction::pdf::{extract_pdf_text, ExtractionBackend, PdfError};

pub const MISSING_RESUME_MESSAGE: &str = "Please upload a PDF resume.";

/// The fields of the analyze form. Browsers send the checkbox only when ticked.
#[derive(Debug, Default)]
pub struct AnalyzeUpload {
    pub resume_pdf: Option<Bytes>,
    pub resume_filename: Option<String>,
    /// Plain-text resume, accepted by the JSON API in place of a PDF.
    pub resume_text: Option<String>,
    pub jd_text: String,
    pub show_resume: bool,
}

/// Resume text ready for analysis, with where it came from.
#[derive(Debug, Clone)]
pub struct ResumeText {
    pub text: String,
    pub backend: Option<ExtractionBackend>,
}

pub async fn read_analyze_form(mut multipart: Multipart) -> Result<AnalyzeUpload, AppError> {
    let mut upload = AnalyzeUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                // An empty file input still submits a nameless, empty part.
                if !data.is_empty() {
                    upload.resume_filename = filename;
                    upload.resume_pdf = Some(data);
                }
            }
            "resume_text" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    upload.resume_text = Some(text);
                }
            }
            "jd_text" => upload.jd_text = field.text().await?,
            "show_resume" => upload.show_resume = is_checked(&field.text().await?),
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(upload)
}

fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

/// Checks the form is complete, then extracts the resume text.
///
/// Checks run in the order a user fixes them: resume present, JD present, resume readable.
pub async fn resolve_resume_text(upload: &AnalyzeUpload) -> Result<ResumeText, AppError> {
    if upload.resume_pdf.is_none() && upload.resume_text.is_none() {
        return Err(AppError::Validation(MISSING_RESUME_MESSAGE.to_string()));
    }
    if upload.jd_text.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_JD_MESSAGE.to_string()));
    }

    let Some(pdf) = upload.resume_pdf.clone() else {
        return Ok(ResumeText {
            text: upload.resume_text.clone().unwrap_or_default(),
            backend: None,
        });
    };

    let extracted = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    match extracted {
        Ok(extracted) if extracted.text.trim().is_empty() => {
            warn!(
                filename = upload.resume_filename.as_deref().unwrap_or("-"),
                "PDF has no extractable text"
            );
            Err(AppError::UnprocessableEntity(EMPTY_RESUME_MESSAGE.to_string()))
        }
        Ok(extracted) => {
            info!(
                backend = extracted.backend.as_str(),
                pages = ?extracted.pages,
                chars = extracted.text.len(),
                "Extracted resume text"
            );
            Ok(ResumeText {
                text: extracted.text,
                backend: Some(extracted.backend),
            })
        }
        Err(PdfError::NotPdf) => Err(AppError::Validation(MISSING_RESUME_MESSAGE.to_string())),
        Err(e @ PdfError::Unreadable { .. }) => {
            warn!("Resume extraction failed: {e}");
            Err(AppError::Extraction(EMPTY_RESUME_MESSAGE.to_string()))
        }
    }
}
