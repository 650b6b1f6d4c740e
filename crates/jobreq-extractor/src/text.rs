//! Text segmentation helpers
//!
//! Sentence splitting is best-effort: it breaks on terminal punctuation
//! followed by whitespace (or end of text), on newline-introduced bullet or
//! numbered list items, and on blank lines. Abbreviations such as "e.g. " are
//! split like any other sentence end; decimals ("3.5") are not.
//!
//! List items are read line by line: a line is an item when it opens with a
//! bullet (`-`, `•`, `*`) or a number (`1.`, `2)`), or is indented by four
//! spaces or a tab.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]+(?:\s+|$)|\n[ \t]*(?:[-•*]|\d+[.)])[ \t]+|\n[ \t]*\n")
        .expect("sentence boundary expression is valid")
});

static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:[-•*]|\d+[.)])[ \t]+").expect("list marker expression is valid")
});

/// Shortest list item kept, in characters
const MIN_LIST_ITEM_CHARS: usize = 4;

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY
        .split(text)
        .map(|s| s.trim().trim_start_matches(['-', '•', '*']).trim())
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}

/// List lines with their marker and surrounding whitespace removed
pub fn list_items(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(|line| {
            let item = match LIST_MARKER.find(line) {
                Some(marker) => &line[marker.end()..],
                None if line.starts_with("    ") || line.starts_with('\t') => line,
                None => return None,
            };
            let item = item.trim();
            (item.chars().count() >= MIN_LIST_ITEM_CHARS).then_some(item)
        })
        .collect()
}

/// Uppercase the first character when it is a letter
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => first.to_uppercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length in characters (not bytes)
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
