//! Resume Parser: extraction, name guess, skill match and normalization in one record.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::ResumeRecord;
use crate::screening::context::ScreeningContext;
use crate::screening::extractor::{extract_text, ExtractError};

/// Two or more capitalised words at the start of a line.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+").expect("valid name regex")
});

/// Line terminators for the name search; `str::lines` alone misses bare `\r`.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Parses the resume at `path`. Any extraction failure aborts the whole record.
pub fn parse_resume(path: &Path, context: &ScreeningContext) -> Result<ResumeRecord, ExtractError> {
    let text = extract_text(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parse_text(filename, &text, context))
}

pub fn parse_text(filename: String, text: &str, context: &ScreeningContext) -> ResumeRecord {
    ResumeRecord {
        filename,
        name: guess_name(text),
        skills: context.skills.extract(text),
        raw_text: context.normalizer.normalize(text),
        score: None,
    }
}

/// First line that starts with two or more capitalised words.
///
/// Known limitation: section headings such as "Professional Summary" match too, and
/// all-caps or single-word names never do. First match wins.
pub fn guess_name(text: &str) -> Option<String> {
    text.split(LINE_BREAKS)
        .map(str::trim)
        .find_map(|line| NAME_PATTERN.find(line))
        .map(|m| m.as_str().to_string())
}
