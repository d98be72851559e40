//! Skill coverage: how much of the JD's weighted skill demand the resume meets.
//!
//! Each JD skill weighs `category weight × (0.5 if common) × priority factor`.
//! Weights are summed per category and each category total is capped at
//! `CATEGORY_CAP`; a capped category's matched weight shrinks by the same ratio.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::skills::jd_sections::JdSkill;
use crate::skills::taxonomy::{SkillCategory, SkillTaxonomy};

/// Maximum weight units a single category contributes to the denominator.
pub const CATEGORY_CAP: f64 = 5.0;

/// Multiplier for ubiquitous skills.
pub const COMMON_SKILL_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    pub category: SkillCategory,
    pub label: String,
    pub matched: usize,
    pub total: usize,
    /// Matched weight after capping.
    pub weight_matched: f64,
    /// Total weight after capping.
    pub weight_total: f64,
    pub capped: bool,
}

impl CategoryBreakdown {
    pub fn percent(&self) -> f64 {
        if self.weight_total > 0.0 {
            round2(100.0 * self.weight_matched / self.weight_total)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageReport {
    /// Weighted coverage in `[0, 100]`, two decimals.
    pub score: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// Resume skills the JD never asks for.
    pub extra: Vec<String>,
    pub categories: Vec<CategoryBreakdown>,
}

#[derive(Default)]
struct Bucket {
    got: f64,
    total: f64,
    matched: usize,
    count: usize,
}

/// Weight of one JD skill in the coverage score.
pub fn skill_weight(taxonomy: &SkillTaxonomy, skill: &JdSkill) -> f64 {
    let common = if taxonomy.is_common(&skill.name) {
        COMMON_SKILL_FACTOR
    } else {
        1.0
    };
    taxonomy.category_of(&skill.name).weight() * common * skill.priority.factor()
}

pub fn coverage_score(
    taxonomy: &SkillTaxonomy,
    resume_skills: &[String],
    jd_skills: &[JdSkill],
) -> CoverageReport {
    let resume: BTreeSet<String> = resume_skills
        .iter()
        .map(|s| taxonomy.canonicalize(s))
        .collect();

    // A JD may name the same skill twice through different aliases; keep the strongest ask.
    let mut jd: BTreeMap<String, JdSkill> = BTreeMap::new();
    for skill in jd_skills {
        let name = taxonomy.canonicalize(&skill.name);
        let entry = jd.entry(name.clone()).or_insert_with(|| JdSkill {
            name,
            priority: skill.priority,
        });
        entry.priority = entry.priority.min(skill.priority);
    }

    if jd.is_empty() {
        return CoverageReport {
            extra: resume.into_iter().collect(),
            ..CoverageReport::default()
        };
    }

    let mut buckets: BTreeMap<SkillCategory, Bucket> = BTreeMap::new();
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for (name, skill) in &jd {
        let weight = skill_weight(taxonomy, skill);
        let bucket = buckets.entry(taxonomy.category_of(name)).or_default();
        bucket.total += weight;
        bucket.count += 1;
        if resume.contains(name) {
            bucket.got += weight;
            bucket.matched += 1;
            matched.push(name.clone());
        } else {
            missing.push(name.clone());
        }
    }

    let categories: Vec<CategoryBreakdown> = buckets
        .into_iter()
        .map(|(category, bucket)| {
            let capped = bucket.total > CATEGORY_CAP;
            let (got, total) = if capped {
                let ratio = CATEGORY_CAP / bucket.total;
                (bucket.got * ratio, CATEGORY_CAP)
            } else {
                (bucket.got, bucket.total)
            };
            CategoryBreakdown {
                category,
                label: category.label().to_string(),
                matched: bucket.matched,
                total: bucket.count,
                weight_matched: got,
                weight_total: total,
                capped,
            }
        })
        .collect();

    let got: f64 = categories.iter().map(|c| c.weight_matched).sum();
    let total: f64 = categories.iter().map(|c| c.weight_total).sum();
    let score = if total > 0.0 {
        round2(100.0 * got / total).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let extra = resume
        .into_iter()
        .filter(|name| !jd.contains_key(name))
        .collect();

    CoverageReport {
        score,
        matched,
        missing,
        extra,
        categories,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
