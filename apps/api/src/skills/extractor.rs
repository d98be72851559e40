//! Skill extraction: finds taxonomy skills mentioned in free text.
//!
//! Two passes:
//! 1. Exact: every canonical name and alias, case-insensitive, bounded so that
//!    `Java` is not found inside `JavaScript` and `C` is not found in `C++`.
//! 2. Fuzzy: 1–3 word windows of the normalised text against the normalised
//!    names of skills the exact pass missed (spelling and formatting variants).

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::text::{clean_text, normalize_token};
use crate::skills::taxonomy::SkillTaxonomy;

/// Targets shorter than this are matched exactly or not at all.
const MIN_FUZZY_LEN: usize = 4;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9+.#]+").expect("token pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// One skill found in a document, with the text that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillHit {
    pub skill: String,
    pub kind: MatchKind,
    pub evidence: String,
}

/// A canonical name or alias compiled for matching.
struct Term {
    skill: usize,
    pattern: Regex,
    normalized: String,
}

pub struct SkillExtractor {
    taxonomy: Arc<SkillTaxonomy>,
    terms: Vec<Term>,
}

impl SkillExtractor {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Result<Self, regex::Error> {
        let mut terms = Vec::new();
        for (idx, skill) in taxonomy.skills().iter().enumerate() {
            let mut seen = HashSet::new();
            for name in std::iter::once(&skill.canonical).chain(skill.aliases.iter()) {
                if name.trim().is_empty() || !seen.insert(name.to_lowercase()) {
                    continue;
                }
                terms.push(Term {
                    skill: idx,
                    pattern: term_pattern(name)?,
                    normalized: normalize_token(name),
                });
            }
        }
        Ok(Self { taxonomy, terms })
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    /// Finds every taxonomy skill mentioned in `text`, sorted by canonical name.
    pub fn extract(&self, text: &str) -> Vec<SkillHit> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let cleaned = clean_text(text);
        let skills = self.taxonomy.skills();
        let mut found: BTreeMap<usize, SkillHit> = BTreeMap::new();

        for term in &self.terms {
            if found.contains_key(&term.skill) {
                continue;
            }
            if let Some(range) = bounded_matches(&term.pattern, &cleaned).next() {
                found.insert(
                    term.skill,
                    SkillHit {
                        skill: skills[term.skill].canonical.clone(),
                        kind: MatchKind::Exact,
                        evidence: cleaned[range].to_string(),
                    },
                );
            }
        }

        let windows = Windows::new(&cleaned);
        for term in &self.terms {
            if found.contains_key(&term.skill) || term.normalized.chars().count() < MIN_FUZZY_LEN {
                continue;
            }
            if let Some(evidence) = windows.find(&term.normalized) {
                found.insert(
                    term.skill,
                    SkillHit {
                        skill: skills[term.skill].canonical.clone(),
                        kind: MatchKind::Fuzzy,
                        evidence,
                    },
                );
            }
        }

        let mut hits: Vec<SkillHit> = found.into_values().collect();
        hits.sort_by(|a, b| a.skill.cmp(&b.skill));
        hits
    }

    /// Canonical names of the skills mentioned in `text`, sorted.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        self.extract(text).into_iter().map(|h| h.skill).collect()
    }

    /// JD skills the resume doesn't have, after mapping both sides to canonical names.
    pub fn compare_skills(&self, resume_skills: &[String], jd_skills: &[String]) -> Vec<String> {
        let resume: BTreeSet<String> = resume_skills
            .iter()
            .map(|s| self.taxonomy.canonicalize(s))
            .collect();
        let jd: BTreeSet<String> = jd_skills
            .iter()
            .map(|s| self.taxonomy.canonicalize(s))
            .collect();
        jd.difference(&resume).cloned().collect()
    }

    /// Byte ranges in `text` where any of `skills` is mentioned verbatim (canonical
    /// name or alias). Sorted and non-overlapping.
    pub fn highlight_ranges(&self, text: &str, skills: &[String]) -> Vec<Range<usize>> {
        let wanted: HashSet<&str> = skills
            .iter()
            .filter_map(|s| self.taxonomy.lookup(s))
            .map(|s| s.canonical.as_str())
            .collect();
        let all = self.taxonomy.skills();

        let mut ranges: Vec<Range<usize>> = self
            .terms
            .iter()
            .filter(|t| wanted.contains(all[t.skill].canonical.as_str()))
            .flat_map(|t| bounded_matches(&t.pattern, text).collect::<Vec<_>>())
            .collect();
        merge_ranges(&mut ranges)
    }
}

/// Case-insensitive pattern for a skill name; inner whitespace matches any run of whitespace.
fn term_pattern(name: &str) -> Result<Regex, regex::Error> {
    let body = name
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!("(?i){body}"))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Matches of `pattern` that stand on their own: no word char or `#` right before,
/// no word char, `-`, `#` or `+` right after.
fn bounded_matches<'a>(
    pattern: &'a Regex,
    text: &'a str,
) -> impl Iterator<Item = Range<usize>> + 'a {
    pattern.find_iter(text).filter_map(move |m| {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        let clean_before = !before.is_some_and(|c| is_word_char(c) || c == '#');
        let clean_after = !after.is_some_and(|c| is_word_char(c) || matches!(c, '-' | '#' | '+'));
        (clean_before && clean_after).then_some(m.range())
    })
}

/// Normalised 1-, 2- and 3-word windows of a text, indexed by length for the fuzzy pass.
struct Windows {
    /// Distinct windows in order of appearance, with their length in chars.
    items: Vec<(String, usize)>,
    /// Indices into `items`, sorted by length then position.
    by_len: Vec<usize>,
    /// Every token joined and padded with spaces, for whole-token containment.
    padded: String,
}

impl Windows {
    fn new(cleaned: &str) -> Self {
        let tokens: Vec<String> = TOKEN
            .find_iter(cleaned)
            .map(|m| normalize_token(m.as_str()).trim_matches('.').to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for n in 1..=3 {
            for gram in tokens.windows(n) {
                let window = gram.join(" ");
                if seen.insert(window.clone()) {
                    let len = window.chars().count();
                    items.push((window, len));
                }
            }
        }

        let mut by_len: Vec<usize> = (0..items.len()).collect();
        by_len.sort_by_key(|&i| (items[i].1, i));

        Self {
            items,
            by_len,
            padded: format!(" {} ", tokens.join(" ")),
        }
    }

    /// Evidence for a fuzzy hit on `target`: the target itself when it appears as
    /// whole tokens, otherwise the first window within the similarity threshold.
    fn find(&self, target: &str) -> Option<String> {
        if target.is_empty() {
            return None;
        }
        if self.padded.contains(&format!(" {target} ")) {
            return Some(target.to_string());
        }

        let target_len = target.chars().count();
        let threshold = fuzzy_threshold(target_len);
        // Edit distance is at least the length difference, which bounds the usable lengths.
        let min_len = (target_len as f64 * threshold - 1e-9).ceil() as usize;
        let max_len = (target_len as f64 / threshold + 1e-9).floor() as usize;
        let start = self.by_len.partition_point(|&i| self.items[i].1 < min_len);
        let end = self.by_len.partition_point(|&i| self.items[i].1 <= max_len);

        self.by_len[start..end]
            .iter()
            .copied()
            .filter(|&i| strsim::normalized_levenshtein(&self.items[i].0, target) >= threshold)
            .min()
            .map(|i| self.items[i].0.clone())
    }
}

fn fuzzy_threshold(target_len: usize) -> f64 {
    if target_len >= 10 {
        0.86
    } else if target_len >= 6 {
        0.88
    } else {
        0.92
    }
}

fn merge_ranges(ranges: &mut Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.sort_by_key(|r| (r.start, r.end));
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges.drain(..) {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}
