//! Perfect-score detection over free-text autograder reports

use crate::types::ScoreVerdict;
use once_cell::sync::Lazy;
use regex::Regex;

/// Literal marker emitted by the autograder when every test passes
pub const ALL_PASSED_MARKER: &str = "All tests passed";

static POINTS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Points\s+([0-9]+)\s*/\s*([0-9]+)").expect("valid points regex"));

/// True when the report shows full marks
///
/// Either the literal marker is present, or the first `Points X / Y` match
/// has `X == Y`.
pub fn is_perfect(text: &str) -> bool {
    if text.contains(ALL_PASSED_MARKER) {
        return true;
    }

    POINTS_PATTERN
        .captures(text)
        .map(|caps| same_number(&caps[1], &caps[2]))
        .unwrap_or(false)
}

/// Compare two ASCII digit strings by value, with no width limit
fn same_number(a: &str, b: &str) -> bool {
    fn significant(digits: &str) -> &str {
        match digits.trim_start_matches('0') {
            "" => "0",
            rest => rest,
        }
    }

    significant(a) == significant(b)
}

/// Classify a report into a [`ScoreVerdict`]
pub fn verdict(text: &str) -> ScoreVerdict {
    if is_perfect(text) {
        ScoreVerdict::Perfect
    } else {
        ScoreVerdict::NeedsWork
    }
}
