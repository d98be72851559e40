//! Text normalisation shared by skill extraction, chunking and rendering.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[•·●▪►▶]+").expect("bullet pattern is valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static TOKEN_JUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.+#]").expect("token filter pattern is valid"));

/// Flattens extracted text onto one line: NBSP and bullet glyphs become spaces,
/// whitespace runs collapse.
pub fn clean_text(s: &str) -> String {
    let s = s.replace('\u{a0}', " ");
    let s = BULLETS.replace_all(&s, " ");
    WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// Lowercases a token and keeps only word chars, whitespace, `.`, `+` and `#`.
/// `/` and `-` split into separate words.
pub fn normalize_token(s: &str) -> String {
    let s = s.trim().to_lowercase().replace(['/', '-'], " ");
    TOKEN_JUNK.replace_all(&s, "").into_owned()
}

/// Splits `text` into windows of `size` words that advance by `size - overlap`
/// (at least one word), so consecutive chunks share `overlap` words.
pub fn chunk_words(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || size == 0 {
        return Vec::new();
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + size).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += step;
    }
    chunks
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
