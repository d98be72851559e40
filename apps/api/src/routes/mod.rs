pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::skills::handlers as skills;
use crate::state::AppState;
use crate::ui::handlers as ui;

/// Room for the JD text and multipart framing on top of the PDF itself.
const FORM_HEADROOM_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes.saturating_add(FORM_HEADROOM_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Web UI
        .route("/", get(ui::handle_index))
        .route("/analyze", post(ui::handle_analyze_page))
        // Analysis API
        .route("/api/v1/analyze", post(analysis::handle_analyze_upload))
        .route("/api/v1/analyze/text", post(analysis::handle_analyze_text))
        // Skills API
        .route("/api/v1/skills/extract", post(skills::handle_extract_skills))
        .route("/api/v1/skills/taxonomy", get(skills::handle_get_taxonomy))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::analysis::report::tests::{analyzer, JD, RESUME};
    use crate::config::Config;
    use crate::extraction::pdf::tests::sample_pdf;
    use crate::ui::Renderer;

    const BOUNDARY: &str = "ats-test-boundary";

    fn test_state(max_upload_bytes: usize) -> AppState {
        let mut config = Config::from_lookup(|_| None).unwrap();
        config.max_upload_bytes = max_upload_bytes;
        AppState {
            config,
            analyzer: Arc::new(analyzer()),
            renderer: Arc::new(Renderer::new().unwrap()),
        }
    }

    fn app() -> Router {
        build_router(test_state(10 * 1024 * 1024))
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_request(uri: &str, parts: &[Part]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    let header = format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n");
                    body.extend_from_slice(header.as_bytes());
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; \
                             filename=\"{filename}\"\r\n\
                             Content-Type: application/pdf\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, value: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    fn resume_pdf() -> Vec<u8> {
        sample_pdf(&[
            "Jane Doe, Data Engineer",
            "Built batch pipelines in Python and SQL with Airflow",
            "Streamed events through Kafka into PostgreSQL",
            "Containerised services with Docker",
        ])
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["embedder"], "hash");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"jd_text\""));
    }

    #[tokio::test]
    async fn test_analyze_page_without_resume_shows_inline_error() {
        let request = multipart_request("/analyze", &[Part::Text("jd_text", JD)]);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("Please upload a PDF resume."));
        // The JD survives the round trip so the user doesn't retype it.
        assert!(html.contains("Nice to have: Kafka, Terraform"));
    }

    #[tokio::test]
    async fn test_analyze_page_without_jd_shows_inline_error() {
        let pdf = resume_pdf();
        let request = multipart_request(
            "/analyze",
            &[Part::File("resume", "resume.pdf", &pdf), Part::Text("jd_text", "  ")],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response)
            .await
            .contains("Please paste a job description to analyze."));
    }

    #[tokio::test]
    async fn test_analyze_page_renders_results() {
        let pdf = resume_pdf();
        let request = multipart_request(
            "/analyze",
            &[
                Part::File("resume", "resume.pdf", &pdf),
                Part::Text("jd_text", JD),
                Part::Text("show_resume", "on"),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("ATS Match Score"));
        assert!(html.contains("Kubernetes"));
        assert!(html.contains("id=\"panel-preview\""));
        assert!(html.contains("id=\"tab-raw\""));
        assert!(html.contains("name=\"show_resume\" checked"));
    }

    #[tokio::test]
    async fn test_api_analyze_upload_with_pdf() {
        let pdf = resume_pdf();
        let request = multipart_request(
            "/api/v1/analyze",
            &[Part::File("resume", "resume.pdf", &pdf), Part::Text("jd_text", JD)],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let score = body["overall_score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert!(body["extraction_backend"].is_string());
        assert!(body["resume_skills"]
            .as_array()
            .unwrap()
            .contains(&json!("Python")));
    }

    #[tokio::test]
    async fn test_api_analyze_upload_with_resume_text() {
        let request = multipart_request(
            "/api/v1/analyze",
            &[Part::Text("resume_text", RESUME), Part::Text("jd_text", JD)],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["extraction_backend"].is_null());
        assert_eq!(body["embedder"], "hash");
    }

    #[tokio::test]
    async fn test_api_analyze_rejects_non_pdf() {
        let request = multipart_request(
            "/api/v1/analyze",
            &[
                Part::File("resume", "resume.pdf", b"just some text"),
                Part::Text("jd_text", JD),
            ],
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Please upload a PDF resume.");
    }

    #[tokio::test]
    async fn test_api_analyze_text() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({ "resume_text": RESUME, "jd_text": JD }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let missing: Vec<&str> = body["missing"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|m| m["name"].as_str())
            .collect();
        assert!(missing.contains(&"Kubernetes"));
        assert!(!missing.contains(&"Python"));
        assert!(body["verdict"].is_string());
    }

    #[tokio::test]
    async fn test_api_analyze_text_blank_resume() {
        let request = json_request(
            "/api/v1/analyze/text",
            json!({ "resume_text": "", "jd_text": JD }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_api_extract_skills_with_priorities() {
        let request = json_request(
            "/api/v1/skills/extract",
            json!({ "text": JD, "job_description": true }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let priorities = body["priorities"].as_array().unwrap();
        assert!(priorities
            .iter()
            .any(|p| p["name"] == "Kubernetes" && p["priority"] == "required"));
        assert!(priorities
            .iter()
            .any(|p| p["name"] == "Kafka" && p["priority"] == "preferred"));
    }

    #[tokio::test]
    async fn test_api_extract_skills_plain() {
        let request = json_request("/api/v1/skills/extract", json!({ "text": "k8s and Rust" }));
        let response = app().oneshot(request).await.unwrap();
        let body = body_json(response).await;
        assert!(body.get("priorities").is_none());
        let skills: Vec<&str> = body["skills"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|s| s["skill"].as_str())
            .collect();
        assert_eq!(skills, vec!["Kubernetes", "Rust"]);
    }

    #[tokio::test]
    async fn test_api_extract_skills_empty_text() {
        let request = json_request("/api/v1/skills/extract", json!({ "text": " " }));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_taxonomy() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/skills/taxonomy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["total"].as_u64().unwrap() > 100);
        let labels: Vec<&str> = body["categories"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["label"].as_str())
            .collect();
        assert!(labels.contains(&"Cloud & DevOps"));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let app = build_router(test_state(1024));
        let big = vec![b'a'; 3 * 1024 * 1024];
        let request = multipart_request(
            "/api/v1/analyze",
            &[Part::File("resume", "resume.pdf", &big), Part::Text("jd_text", JD)],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
