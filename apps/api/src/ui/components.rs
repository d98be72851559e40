//! View pieces shared by the results page: score gauge, skill pills, highlighted text.

use std::f64::consts::PI;
use std::ops::Range;

use serde::Serialize;

use crate::analysis::report::Verdict;

pub const GAUGE_RADIUS: f64 = 56.0;
pub const GAUGE_STROKE: u32 = 10;

const RED: &str = "#ef4444";
const AMBER: &str = "#f59e0b";
const GREEN: &str = "#10b981";

/// SVG circle gauge geometry for a 0–100 score.
#[derive(Debug, Clone, Serialize)]
pub struct Gauge {
    pub radius: f64,
    pub stroke: u32,
    pub circumference: String,
    pub offset: String,
    pub color: &'static str,
    pub score_text: String,
    pub verdict: &'static str,
}

impl Gauge {
    pub fn new(score: f64) -> Self {
        let score = score.clamp(0.0, 100.0);
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        let offset = circumference * (1.0 - score / 100.0);
        let color = if score < 50.0 {
            RED
        } else if score < 75.0 {
            AMBER
        } else {
            GREEN
        };
        Self {
            radius: GAUGE_RADIUS,
            stroke: GAUGE_STROKE,
            circumference: format!("{circumference:.1}"),
            offset: format!("{offset:.1}"),
            color,
            score_text: format!("{score:.0}%"),
            verdict: Verdict::from_score(score).label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Pill {
    pub text: String,
    /// Green when true, red when false.
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

impl Pill {
    pub fn present(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ok: true,
            note: None,
        }
    }

    pub fn missing(text: impl Into<String>, note: Option<&'static str>) -> Self {
        Self {
            text: text.into(),
            ok: false,
            note,
        }
    }
}

/// A run of text, highlighted or not. The template escapes `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub mark: bool,
}

/// Splits `text` into plain and highlighted runs. `ranges` must be sorted,
/// non-overlapping byte ranges on char boundaries.
pub fn highlight_segments(text: &str, ranges: &[Range<usize>]) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for range in ranges {
        if range.start < cursor || range.end > text.len() {
            continue;
        }
        if range.start > cursor {
            segments.push(Segment {
                text: text[cursor..range.start].to_string(),
                mark: false,
            });
        }
        segments.push(Segment {
            text: text[range.clone()].to_string(),
            mark: true,
        });
        cursor = range.end;
    }
    if cursor < text.len() {
        segments.push(Segment {
            text: text[cursor..].to_string(),
            mark: false,
        });
    }
    segments
}
