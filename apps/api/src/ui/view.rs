//! Page view models handed to the templates.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::analysis::report::AnalysisReport;
use crate::extraction::text::preview;
use crate::skills::extractor::SkillExtractor;
use crate::ui::components::{highlight_segments, Gauge, Pill, Segment};

pub const PREVIEW_CHARS: usize = 3000;
pub const RAW_CHARS: usize = 8000;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub error: Option<String>,
    pub jd_text: String,
    pub show_resume: bool,
    pub max_upload_mb: usize,
    pub results: Option<ResultsView>,
}

impl PageView {
    pub fn form(jd_text: &str, show_resume: bool, max_upload_bytes: usize) -> Self {
        Self {
            error: None,
            jd_text: jd_text.to_string(),
            show_resume,
            max_upload_mb: max_upload_bytes / (1024 * 1024),
            results: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub label: String,
    pub matched: usize,
    pub total: usize,
    pub percent: String,
    pub capped: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub gauge: Gauge,
    pub semantic_score: String,
    pub coverage_score: String,
    pub recommendation: String,
    pub matched_count: usize,
    pub jd_skill_count: usize,
    pub resume_words: usize,
    pub jd_words: usize,
    pub matched: Vec<Pill>,
    pub missing: Vec<Pill>,
    pub resume_skills: Vec<Pill>,
    pub jd_skills: Vec<Pill>,
    pub categories: Vec<CategoryRow>,
    pub show_resume: bool,
    pub preview: Vec<Segment>,
    pub raw: String,
    pub embedder: String,
    pub extraction_backend: Option<String>,
}

impl ResultsView {
    pub fn build(
        report: &AnalysisReport,
        resume_text: &str,
        show_resume: bool,
        extractor: &SkillExtractor,
    ) -> Self {
        let resume: BTreeSet<&str> = report.resume_skills.iter().map(String::as_str).collect();

        let jd_skills = report
            .jd_skills
            .iter()
            .map(|s| {
                if resume.contains(s.name.as_str()) {
                    Pill::present(&s.name)
                } else {
                    Pill::missing(&s.name, None)
                }
            })
            .collect();

        let (preview_segments, raw) = if show_resume {
            let snippet = preview(resume_text, PREVIEW_CHARS);
            let ranges = extractor.highlight_ranges(snippet, &report.coverage.matched);
            (
                highlight_segments(snippet, &ranges),
                preview(resume_text, RAW_CHARS).to_string(),
            )
        } else {
            (Vec::new(), String::new())
        };

        Self {
            gauge: Gauge::new(report.overall_score),
            semantic_score: format!("{:.1}", report.semantic_score),
            coverage_score: format!("{:.1}", report.coverage_score),
            recommendation: report.recommendation.clone(),
            matched_count: report.coverage.matched.len(),
            jd_skill_count: report.jd_skills.len(),
            resume_words: report.resume_word_count,
            jd_words: report.jd_word_count,
            matched: report.coverage.matched.iter().map(Pill::present).collect(),
            missing: report
                .missing
                .iter()
                .map(|m| Pill::missing(&m.name, Some(m.priority.label())))
                .collect(),
            resume_skills: report.resume_skills.iter().map(Pill::present).collect(),
            jd_skills,
            categories: report
                .coverage
                .categories
                .iter()
                .map(|c| CategoryRow {
                    label: c.label.clone(),
                    matched: c.matched,
                    total: c.total,
                    percent: format!("{:.0}", c.percent()),
                    capped: c.capped,
                })
                .collect(),
            show_resume,
            preview: preview_segments,
            raw,
            embedder: report.embedder.clone(),
            extraction_backend: report.extraction_backend.clone(),
        }
    }
}
