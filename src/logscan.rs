//! Error-signal extraction from raw workflow log text.

use regex::Regex;
use std::sync::OnceLock;

/// Upper bound on pattern-matched lines kept in an excerpt.
const MAX_MATCHED_LINES: usize = 50;

/// Length of the trailing excerpt returned when no pattern matches.
const TAIL_CHARS: usize = 2000;

/// Failure markers commonly found in CI logs, in priority order.
///
/// Each pattern is applied across the whole text before the next one, so
/// the excerpt groups lines by marker rather than by position. Matching is
/// case-insensitive, which also folds the `Error:`/`ERROR:` and
/// `Failed:`/`FAILED:` spellings into a single pattern each.
const ERROR_PATTERNS: [&str; 4] = [
    r"(?im)^error:.*",
    r"(?im)^failed:.*",
    r"(?im)^.*\[error\].*",
    r"(?im)^.*fatal:.*",
];

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        ERROR_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("error patterns are statically valid"))
            .collect()
    })
}

/// Reduce raw log text to a bounded, human-readable error excerpt.
///
/// Two-tier policy: collect every line matching one of the known failure
/// markers (pattern order first, document order within a pattern), capped
/// at 50 lines and newline-joined. When nothing matches, fall back to the
/// last 2000 characters of the text so the caller still sees how the run
/// ended.
pub fn extract_error_excerpt(log_text: &str) -> String {
    let mut matched: Vec<&str> = Vec::new();

    'scan: for pattern in patterns() {
        for found in pattern.find_iter(log_text) {
            if matched.len() == MAX_MATCHED_LINES {
                break 'scan;
            }
            matched.push(found.as_str().trim_end_matches('\r'));
        }
    }

    if matched.is_empty() {
        return tail_excerpt(log_text).to_string();
    }

    matched.join("\n")
}

/// Last `TAIL_CHARS` characters of the text, or the whole text if shorter.
/// Counts characters rather than bytes so the cut never lands inside a
/// UTF-8 sequence.
fn tail_excerpt(text: &str) -> &str {
    let char_count = text.chars().count();
    if char_count <= TAIL_CHARS {
        return text;
    }

    let start = text
        .char_indices()
        .nth(char_count - TAIL_CHARS)
        .map(|(index, _)| index)
        .unwrap_or(0);

    &text[start..]
}
