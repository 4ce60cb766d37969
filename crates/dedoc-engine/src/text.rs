//! Character-offset helpers.
//!
//! Annotation bounds count Unicode scalar values, not bytes. Every conversion
//! between `str` byte indices and annotation offsets goes through this module.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// A character range `[start, end)` into a line's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in characters. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Length of `text` in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Substring between two character offsets. Offsets past the end clamp to it.
pub fn char_slice(text: &str, start: usize, stop: usize) -> &str {
    let begin = byte_offset(text, start);
    let end = byte_offset(text, stop).max(begin);
    &text[begin..end]
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(index, _)| index)
}

/// Character spans of every match of `pattern`, in order.
pub fn match_spans(text: &str, pattern: &Regex) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut byte_cursor = 0;
    let mut char_cursor = 0;

    for found in pattern.find_iter(text) {
        char_cursor += text[byte_cursor..found.start()].chars().count();
        let start = char_cursor;
        char_cursor += found.as_str().chars().count();
        byte_cursor = found.end();
        spans.push(Span::new(start, char_cursor));
    }

    spans
}

/// Character spans of maximal whitespace runs.
pub fn whitespace_spans(text: &str) -> Vec<Span> {
    match_spans(text, &WHITESPACE)
}

/// True when `text` is non-empty and made of whitespace only.
pub fn is_blank(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}
