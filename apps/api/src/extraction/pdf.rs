//! PDF text extraction with a two-stage fallback.
//!
//! Stage 1 is `pdf-extract`, which handles most real-world resumes and keeps
//! reading order. Some generators (and some malformed files) make it error or
//! panic, or come back empty; stage 2 then asks `lopdf` for the page text.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// How far into the upload the `%PDF-` header may appear.
const HEADER_SCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionBackend {
    PdfExtract,
    Lopdf,
}

impl ExtractionBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionBackend::PdfExtract => "pdf-extract",
            ExtractionBackend::Lopdf => "lopdf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub backend: ExtractionBackend,
    pub pages: Option<usize>,
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("the uploaded file is not a PDF document")]
    NotPdf,

    #[error("the PDF could not be read (pdf-extract: {primary}; lopdf: {fallback})")]
    Unreadable { primary: String, fallback: String },
}

/// Extracts the text of every page in `bytes`.
///
/// Blank output is not an error here: a scanned resume legitimately has no text
/// layer, and the caller decides how to report that.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<ExtractedText, PdfError> {
    if !looks_like_pdf(bytes) {
        return Err(PdfError::NotPdf);
    }

    run_stages(|| extract_with_pdf_extract(bytes), || extract_with_lopdf(bytes))
}

/// Runs the primary extractor and falls back when it errors or finds no text.
/// A blank primary result is kept if the fallback fails too.
fn run_stages<P, F>(primary: P, fallback: F) -> Result<ExtractedText, PdfError>
where
    P: FnOnce() -> Result<String, String>,
    F: FnOnce() -> Result<(String, usize), String>,
{
    let primary = match primary() {
        Ok(text) if !text.trim().is_empty() => {
            debug!(chars = text.len(), "pdf-extract produced text");
            return Ok(ExtractedText {
                text,
                backend: ExtractionBackend::PdfExtract,
                pages: None,
            });
        }
        Ok(text) => {
            warn!("pdf-extract returned no text, trying lopdf");
            Ok(text)
        }
        Err(e) => {
            warn!("pdf-extract failed ({e}), trying lopdf");
            Err(e)
        }
    };

    match fallback() {
        Ok((text, pages)) => Ok(ExtractedText {
            text,
            backend: ExtractionBackend::Lopdf,
            pages: Some(pages),
        }),
        Err(fallback) => match primary {
            Ok(blank) => Ok(ExtractedText {
                text: blank,
                backend: ExtractionBackend::PdfExtract,
                pages: None,
            }),
            Err(primary) => Err(PdfError::Unreadable { primary, fallback }),
        },
    }
}

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SCAN_BYTES)];
    head.windows(5).any(|w| w == b"%PDF-")
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some unsupported encodings instead of returning Err.
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("parser panicked".to_string()),
    }
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<(String, usize), String> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Err("document has no pages".to_string());
    }
    let text = doc.extract_text(&pages).map_err(|e| e.to_string())?;
    Ok((text, pages.len()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a one-page PDF with each line drawn in Courier.
    pub(crate) fn sample_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("TL", vec![16.into()]),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = extract_pdf_text(b"Name: Jane Doe\nSkills: Rust").unwrap_err();
        assert!(matches!(err, PdfError::NotPdf));
    }

    #[test]
    fn test_rejects_empty_upload() {
        assert!(matches!(extract_pdf_text(&[]), Err(PdfError::NotPdf)));
    }

    #[test]
    fn test_header_may_follow_leading_garbage() {
        let mut bytes = b"\xef\xbb\xbf\r\n".to_vec();
        bytes.extend_from_slice(b"%PDF-1.4\n");
        assert!(looks_like_pdf(&bytes));
    }

    #[test]
    fn test_truncated_pdf_yields_no_text() {
        match extract_pdf_text(b"%PDF-1.7\n1 0 obj << /Type /Catalog") {
            Err(PdfError::Unreadable { .. }) => {}
            Ok(extracted) => assert!(extracted.text.trim().is_empty()),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extracts_text_from_generated_pdf() {
        let bytes = sample_pdf(&["Jane Doe", "Python Kubernetes Terraform"]);
        let extracted = extract_pdf_text(&bytes).unwrap();
        assert!(
            extracted.text.contains("Kubernetes"),
            "text was {:?} via {:?}",
            extracted.text,
            extracted.backend
        );
    }

    #[test]
    fn test_primary_text_skips_fallback() {
        let extracted = run_stages(
            || Ok("Jane Doe".to_string()),
            || panic!("fallback should not run"),
        )
        .unwrap();
        assert_eq!(extracted.backend, ExtractionBackend::PdfExtract);
        assert_eq!(extracted.text, "Jane Doe");
        assert_eq!(extracted.pages, None);
    }

    #[test]
    fn test_primary_error_falls_back_to_lopdf() {
        let extracted = run_stages(
            || Err("parser panicked".to_string()),
            || Ok(("Python Kubernetes".to_string(), 2)),
        )
        .unwrap();
        assert_eq!(extracted.backend, ExtractionBackend::Lopdf);
        assert_eq!(extracted.text, "Python Kubernetes");
        assert_eq!(extracted.pages, Some(2));
    }

    #[test]
    fn test_blank_primary_falls_back_to_lopdf() {
        let extracted = run_stages(
            || Ok(" \n\t".to_string()),
            || Ok(("Terraform".to_string(), 1)),
        )
        .unwrap();
        assert_eq!(extracted.backend, ExtractionBackend::Lopdf);
        assert_eq!(extracted.text, "Terraform");
    }

    #[test]
    fn test_blank_primary_kept_when_fallback_fails() {
        let extracted = run_stages(
            || Ok("  ".to_string()),
            || Err("document has no pages".to_string()),
        )
        .unwrap();
        assert_eq!(extracted.backend, ExtractionBackend::PdfExtract);
        assert!(extracted.text.trim().is_empty());
        assert_eq!(extracted.pages, None);
    }

    #[test]
    fn test_both_stages_failing_is_unreadable() {
        let err = run_stages(
            || Err("bad xref".to_string()),
            || Err("invalid file header".to_string()),
        )
        .unwrap_err();
        match err {
            PdfError::Unreadable { primary, fallback } => {
                assert_eq!(primary, "bad xref");
                assert_eq!(fallback, "invalid file header");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_backend_labels() {
        assert_eq!(ExtractionBackend::PdfExtract.as_str(), "pdf-extract");
        assert_eq!(ExtractionBackend::Lopdf.as_str(), "lopdf");
    }
}
