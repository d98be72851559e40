//! The analysis pipeline: chunk, embed, match skills, score, explain.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::coverage::{coverage_score, round2, skill_weight, CoverageReport};
use crate::analysis::similarity::section_similarity;
use crate::config::Config;
use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::extraction::text::{chunk_words, clean_text, word_count};
use crate::skills::extractor::SkillExtractor;
use crate::skills::jd_sections::{extract_jd_skills, JdSkill, Priority};

pub const EMPTY_JD_MESSAGE: &str = "Please paste a job description to analyze.";
pub const EMPTY_RESUME_MESSAGE: &str = "Resume text could not be extracted. Try another PDF.";

/// How many missing skills the recommendation names.
const RECOMMENDATION_TOP_N: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "Needs Work")]
    NeedsWork,
    #[serde(rename = "Okay Match")]
    OkayMatch,
    #[serde(rename = "Strong Fit")]
    StrongFit,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score < 50.0 {
            Verdict::NeedsWork
        } else if score < 75.0 {
            Verdict::OkayMatch
        } else {
            Verdict::StrongFit
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::NeedsWork => "Needs Work",
            Verdict::OkayMatch => "Okay Match",
            Verdict::StrongFit => "Strong Fit",
        }
    }
}

/// A JD skill the resume doesn't mention.
#[derive(Debug, Clone, Serialize)]
pub struct MissingSkill {
    pub name: String,
    pub priority: Priority,
    pub category: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Blend of semantic and coverage scores, `[0, 100]`.
    pub overall_score: f64,
    /// Mean chunk similarity × 100.
    pub semantic_score: f64,
    pub coverage_score: f64,
    pub verdict: Verdict,
    pub recommendation: String,
    pub resume_skills: Vec<String>,
    pub jd_skills: Vec<JdSkill>,
    /// Most important first.
    pub missing: Vec<MissingSkill>,
    pub coverage: CoverageReport,
    pub per_chunk_similarity: Vec<f64>,
    pub resume_word_count: usize,
    pub jd_word_count: usize,
    pub embedder: String,
    /// Set when the resume came from a PDF.
    pub extraction_backend: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub semantic_weight: f64,
    pub coverage_weight: f64,
}

impl AnalysisOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            semantic_weight: config.semantic_weight,
            coverage_weight: config.coverage_weight,
        }
    }

    /// Blend weights scaled to sum to one. Unusable weights fall back to the defaults.
    fn normalized_weights(&self) -> (f64, f64) {
        let (semantic, coverage) = (self.semantic_weight, self.coverage_weight);
        let usable = [semantic, coverage]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        let total = semantic + coverage;
        if usable && total > 0.0 && total.is_finite() {
            (semantic / total, coverage / total)
        } else {
            let defaults = Self::default();
            (defaults.semantic_weight, defaults.coverage_weight)
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            chunk_size: 900,
            chunk_overlap: 100,
            semantic_weight: 0.4,
            coverage_weight: 0.6,
        }
    }
}

pub struct Analyzer {
    extractor: Arc<SkillExtractor>,
    embedder: Arc<dyn Embedder>,
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(
        extractor: Arc<SkillExtractor>,
        embedder: Arc<dyn Embedder>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            extractor,
            embedder,
            options,
        }
    }

    pub fn extractor(&self) -> &SkillExtractor {
        &self.extractor
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Scores `resume_text` against `jd_text`.
    pub async fn analyze(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<AnalysisReport, AppError> {
        if jd_text.trim().is_empty() {
            return Err(AppError::Validation(EMPTY_JD_MESSAGE.to_string()));
        }
        if resume_text.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(EMPTY_RESUME_MESSAGE.to_string()));
        }

        let analysis_id = Uuid::new_v4();
        let resume_clean = clean_text(resume_text);
        let jd_clean = clean_text(jd_text);

        let (size, overlap) = (self.options.chunk_size, self.options.chunk_overlap);
        let resume_chunks = chunk_words(&resume_clean, size, overlap);
        let jd_chunks = chunk_words(&jd_clean, size, overlap);
        debug!(
            %analysis_id,
            resume_chunks = resume_chunks.len(),
            jd_chunks = jd_chunks.len(),
            "chunked documents"
        );

        // Skill matching is CPU-bound; it runs on a blocking thread while the chunks embed.
        let extractor = Arc::clone(&self.extractor);
        let (resume_owned, jd_owned) = (resume_text.to_string(), jd_text.to_string());
        let skills_task = tokio::task::spawn_blocking(move || {
            let resume_skills = extractor.extract_skills(&resume_owned);
            let jd_skills = extract_jd_skills(&extractor, &jd_owned);
            (resume_skills, jd_skills)
        });

        let similarity =
            section_similarity(self.embedder.as_ref(), &resume_chunks, &jd_chunks).await?;
        let (resume_skills, jd_skills) = skills_task
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        let taxonomy = self.extractor.taxonomy();
        let coverage = coverage_score(taxonomy, &resume_skills, &jd_skills);

        let mut missing: Vec<MissingSkill> = jd_skills
            .iter()
            .filter(|s| coverage.missing.contains(&s.name))
            .map(|s| MissingSkill {
                name: s.name.clone(),
                priority: s.priority,
                category: taxonomy.category_of(&s.name).label().to_string(),
                weight: skill_weight(taxonomy, s),
            })
            .collect();
        missing.sort_by(|a, b| {
            b.priority
                .factor()
                .total_cmp(&a.priority.factor())
                .then(b.weight.total_cmp(&a.weight))
                .then_with(|| a.name.cmp(&b.name))
        });

        let semantic_score = round2(similarity.mean * 100.0).clamp(0.0, 100.0);
        let (w_semantic, w_coverage) = self.options.normalized_weights();
        let overall_score =
            round2(w_semantic * semantic_score + w_coverage * coverage.score).clamp(0.0, 100.0);
        let verdict = Verdict::from_score(overall_score);
        let recommendation = build_recommendation(overall_score, verdict, &missing);

        info!(
            %analysis_id,
            overall_score,
            semantic_score,
            coverage_score = coverage.score,
            missing = missing.len(),
            "Analysis complete"
        );

        Ok(AnalysisReport {
            analysis_id,
            generated_at: Utc::now(),
            overall_score,
            semantic_score,
            coverage_score: coverage.score,
            verdict,
            recommendation,
            resume_skills,
            jd_skills,
            missing,
            coverage,
            per_chunk_similarity: similarity.per_jd_chunk,
            resume_word_count: word_count(&resume_clean),
            jd_word_count: word_count(&jd_clean),
            embedder: self.embedder.name().to_string(),
            extraction_backend: None,
        })
    }
}

/// Human-readable advice from the score and the most important gaps.
fn build_recommendation(score: f64, verdict: Verdict, missing: &[MissingSkill]) -> String {
    let top: Vec<&str> = missing
        .iter()
        .take(RECOMMENDATION_TOP_N)
        .map(|m| m.name.as_str())
        .collect();

    match (verdict, top.is_empty()) {
        (Verdict::StrongFit, true) => {
            "Strong fit. Your resume covers the key JD requirements.".to_string()
        }
        (Verdict::StrongFit, false) => format!(
            "Strong fit ({score:.0}/100). To close the remaining gaps, mention: {}.",
            top.join(", ")
        ),
        (Verdict::OkayMatch, true) => format!(
            "Okay match ({score:.0}/100). The skills line up; \
             describe your experience in the JD's own terms."
        ),
        (Verdict::OkayMatch, false) => format!(
            "Okay match ({score:.0}/100). Consider adding evidence for: {}.",
            top.join(", ")
        ),
        (Verdict::NeedsWork, true) => format!(
            "Needs work ({score:.0}/100). The skills line up but the wording doesn't; \
             tailor your summary and bullets to the role."
        ),
        (Verdict::NeedsWork, false) => format!(
            "Needs work ({score:.0}/100). Significant gaps: {}. \
             Tailor your resume before applying.",
            top.join(", ")
        ),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::embedding::hashing::HashEmbedder;
    use crate::skills::taxonomy::SkillTaxonomy;

    pub(crate) const RESUME: &str = "Jane Doe, Data Engineer
Experience
• Built batch pipelines in Python and SQL orchestrated with Airflow
• Streamed events through Kafka into PostgreSQL
• Containerised services with Docker";

    pub(crate) const JD: &str = "Data Engineer
Requirements:
- Python and SQL
- Airflow, Kubernetes
Nice to have: Kafka, Terraform";

    pub(crate) fn analyzer() -> Analyzer {
        let taxonomy = Arc::new(SkillTaxonomy::builtin());
        let extractor = Arc::new(SkillExtractor::new(taxonomy).unwrap());
        Analyzer::new(extractor, Arc::new(HashEmbedder::new()), AnalysisOptions::default())
    }

    fn missing(names: &[(&str, Priority)]) -> Vec<MissingSkill> {
        names
            .iter()
            .map(|(name, priority)| MissingSkill {
                name: name.to_string(),
                priority: *priority,
                category: "Other".to_string(),
                weight: 1.0,
            })
            .collect()
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::from_score(0.0), Verdict::NeedsWork);
        assert_eq!(Verdict::from_score(49.99), Verdict::NeedsWork);
        assert_eq!(Verdict::from_score(50.0), Verdict::OkayMatch);
        assert_eq!(Verdict::from_score(74.99), Verdict::OkayMatch);
        assert_eq!(Verdict::from_score(75.0), Verdict::StrongFit);
        assert_eq!(Verdict::StrongFit.label(), "Strong Fit");
    }

    #[test]
    fn test_recommendation_names_top_three() {
        let gaps = missing(&[
            ("Kubernetes", Priority::Required),
            ("Terraform", Priority::Required),
            ("Snowflake", Priority::General),
            ("dbt", Priority::Preferred),
        ]);
        let rec = build_recommendation(62.0, Verdict::OkayMatch, &gaps);
        assert!(rec.starts_with("Okay match (62/100)"));
        assert!(rec.contains("Kubernetes, Terraform, Snowflake"));
        assert!(!rec.contains("dbt"));
    }

    #[test]
    fn test_recommendation_strong_fit_without_gaps() {
        let rec = build_recommendation(91.0, Verdict::StrongFit, &[]);
        assert_eq!(rec, "Strong fit. Your resume covers the key JD requirements.");
    }

    #[test]
    fn test_normalized_weights() {
        let options = AnalysisOptions {
            semantic_weight: 1.0,
            coverage_weight: 3.0,
            ..AnalysisOptions::default()
        };
        assert_eq!(options.normalized_weights(), (0.25, 0.75));
    }

    #[test]
    fn test_non_finite_weights_use_defaults() {
        for (semantic, coverage) in [(f64::INFINITY, 0.6), (0.4, f64::NAN), (f64::MAX, f64::MAX)] {
            let options = AnalysisOptions {
                semantic_weight: semantic,
                coverage_weight: coverage,
                ..AnalysisOptions::default()
            };
            assert_eq!(options.normalized_weights(), (0.4, 0.6));
        }
    }

    #[tokio::test]
    async fn test_overall_score_stays_finite_with_extreme_weights() {
        let taxonomy = Arc::new(SkillTaxonomy::builtin());
        let extractor = Arc::new(SkillExtractor::new(taxonomy).unwrap());
        let options = AnalysisOptions {
            semantic_weight: f64::INFINITY,
            ..AnalysisOptions::default()
        };
        let analyzer = Analyzer::new(extractor, Arc::new(HashEmbedder::new()), options);
        let report = analyzer
            .analyze("Pastry chef. Croissants and sourdough.", "Python Kubernetes")
            .await
            .unwrap();
        assert!(report.overall_score.is_finite());
        assert!((0.0..=100.0).contains(&report.overall_score));
        assert_eq!(report.verdict, Verdict::NeedsWork);
    }

    #[tokio::test]
    async fn test_blank_jd_is_validation_error() {
        let err = analyzer().analyze(RESUME, "   \n").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == EMPTY_JD_MESSAGE));
    }

    #[tokio::test]
    async fn test_blank_resume_is_unprocessable() {
        let err = analyzer().analyze("  ", JD).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(ref m) if m == EMPTY_RESUME_MESSAGE));
    }

    #[tokio::test]
    async fn test_analyze_end_to_end() {
        let report = analyzer().analyze(RESUME, JD).await.unwrap();

        assert!((0.0..=100.0).contains(&report.overall_score));
        assert!((0.0..=100.0).contains(&report.semantic_score));
        assert!((0.0..=100.0).contains(&report.coverage_score));
        assert!(report.semantic_score > 0.0);

        let missing: Vec<&str> = report.missing.iter().map(|m| m.name.as_str()).collect();
        assert!(missing.contains(&"Kubernetes"));
        assert!(missing.contains(&"Terraform"));
        assert_eq!(missing[0], "Kubernetes");
        for skill in &report.resume_skills {
            assert!(!missing.contains(&skill.as_str()), "{skill} reported missing");
        }

        assert_eq!(report.embedder, "hash");
        assert_eq!(report.per_chunk_similarity.len(), 1);
        assert!(report.resume_word_count > report.jd_word_count);
        assert!(report.recommendation.contains("Kubernetes"));
        assert_eq!(report.verdict, Verdict::from_score(report.overall_score));
    }

    #[tokio::test]
    async fn test_tailored_resume_beats_unrelated_one() {
        let analyzer = analyzer();
        let tailored = analyzer.analyze(RESUME, JD).await.unwrap();
        let unrelated = analyzer
            .analyze("Pastry chef. Croissants, sourdough and wedding cakes.", JD)
            .await
            .unwrap();
        assert!(tailored.overall_score > unrelated.overall_score);
        assert_eq!(unrelated.coverage_score, 0.0);
    }
}
