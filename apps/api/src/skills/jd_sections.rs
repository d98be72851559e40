//! Job-description sections: tells required skills apart from nice-to-haves.
//!
//! A section starts at a recognised heading line ("Requirements:", "Nice to have",
//! ...) and runs until the next heading, a heading-only line such as "Benefits:",
//! or the end of the text. Headings may carry content inline after the colon.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::skills::extractor::SkillExtractor;

static SKILL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:[-*•#]+\s*)?(",
        r"requirements|minimum qualifications|basic qualifications|qualifications|",
        r"what you['’]ll do|what we look for|what we['’]re looking for|must[- ]haves?|",
        r"preferred qualifications|preferred|nice[- ]to[- ]haves?|bonus points|bonus",
        r")(?:\s*:\s*(.*)|\s*)$",
    ))
    .expect("skill header pattern is valid")
});

static OTHER_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^\s*(?:[-*•#]+\s*)?(",
        r"about(?: us| the role| the team)?|benefits|perks|compensation|salary|location|",
        r"who we are|responsibilities|equal opportunity",
        r")\b\s*:",
    ))
    .expect("other header pattern is valid")
});

static HEADING_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][^:\n]{0,40}:\s*$").expect("heading pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Required,
    Preferred,
}

/// How strongly a JD asks for a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Required,
    Preferred,
    General,
}

impl Priority {
    /// Multiplier applied to the skill's weight in the coverage score.
    pub fn factor(&self) -> f64 {
        match self {
            Priority::Required => 1.5,
            Priority::General => 1.0,
            Priority::Preferred => 0.75,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Required => "required",
            Priority::Preferred => "preferred",
            Priority::General => "mentioned",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JdSection {
    pub kind: SectionKind,
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JdSkill {
    pub name: String,
    pub priority: Priority,
}

pub fn find_sections(text: &str) -> Vec<JdSection> {
    let mut sections = Vec::new();
    let mut current: Option<JdSection> = None;

    for line in text.lines() {
        if let Some(caps) = SKILL_HEADER.captures(line) {
            sections.extend(current.take());
            let heading = caps[1].to_string();
            let inline = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            current = Some(JdSection {
                kind: classify_heading(&heading),
                heading,
                body: inline.to_string(),
            });
            continue;
        }
        if OTHER_HEADER.is_match(line) || HEADING_ONLY.is_match(line.trim()) {
            sections.extend(current.take());
            continue;
        }
        if let Some(section) = current.as_mut() {
            if !section.body.is_empty() {
                section.body.push('\n');
            }
            section.body.push_str(line);
        }
    }
    sections.extend(current);
    sections
}

fn classify_heading(heading: &str) -> SectionKind {
    let lower = heading.to_lowercase();
    if lower.starts_with("preferred") || lower.starts_with("nice") || lower.starts_with("bonus") {
        SectionKind::Preferred
    } else {
        SectionKind::Required
    }
}

/// Skills in a job description, each tagged with the strongest section it appears in.
pub fn extract_jd_skills(extractor: &SkillExtractor, text: &str) -> Vec<JdSkill> {
    let mut priorities: BTreeMap<String, Priority> = extractor
        .extract_skills(text)
        .into_iter()
        .map(|name| (name, Priority::General))
        .collect();

    for section in find_sections(text) {
        let priority = match section.kind {
            SectionKind::Required => Priority::Required,
            SectionKind::Preferred => Priority::Preferred,
        };
        debug!(heading = %section.heading, ?priority, "JD section");
        for name in extractor.extract_skills(&section.body) {
            let entry = priorities.entry(name).or_insert(priority);
            // Required < Preferred < General, so the minimum is the strongest ask.
            *entry = (*entry).min(priority);
        }
    }

    priorities
        .into_iter()
        .map(|(name, priority)| JdSkill { name, priority })
        .collect()
}
