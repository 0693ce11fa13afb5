use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s,.%]").expect("valid ad-copy regex"));

/// Reduces raw OCR output to readable ad copy.
///
/// Newlines become spaces, characters outside letters, digits, underscore,
/// whitespace, `,`, `.` and `%` are dropped, and only tokens longer than two
/// characters survive, joined by single spaces.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let flattened = raw.replace('\n', " ");
    let kept = DISALLOWED.replace_all(&flattened, "");
    kept.split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .collect::<Vec<_>>()
        .join(" ")
}
