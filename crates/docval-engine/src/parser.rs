//! Parse free-text judge replies into judgments
//!
//! Replies are expected to follow the requested layout:
//!
//! ```text
//! Result: PASS
//! Confidence: 0.9
//! Reasoning: The document has a title.
//! ```
//!
//! Parsing never fails; anything missing falls back to a default.

use docval_domain::Judgment;

/// Confidence assumed when the reply states none
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

const RESULT_MARKER: &str = "Result:";
const CONFIDENCE_MARKER: &str = "Confidence:";
const REASONING_MARKER: &str = "Reasoning:";

/// Parse a judge reply for one requirement
///
/// - `passed`: the first line containing `Result:` contains `PASS` and not
///   `FAIL`, case-insensitively; a reply without such a line fails
/// - `confidence`: the number after the first `Confidence:`, clamped to
///   [0, 1]; [`DEFAULT_CONFIDENCE`] when absent or unparsable
/// - `reasoning`: everything after the first `Reasoning:`, trimmed; the full
///   reply when absent or empty
pub fn parse_judgment(requirement_name: &str, text: &str) -> Judgment {
    Judgment {
        requirement_name: requirement_name.to_string(),
        passed: parse_verdict(text),
        confidence: parse_confidence(text),
        reasoning: Some(parse_reasoning(text)),
    }
}

fn parse_verdict(text: &str) -> bool {
    text.lines()
        .find(|line| line.contains(RESULT_MARKER))
        .map(str::to_uppercase)
        .is_some_and(|line| line.contains("PASS") && !line.contains("FAIL"))
}

fn parse_confidence(text: &str) -> f64 {
    text.lines()
        .find_map(|line| {
            line.find(CONFIDENCE_MARKER)
                .map(|idx| &line[idx + CONFIDENCE_MARKER.len()..])
        })
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|token| token.trim_end_matches([',', ';', '.']).parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_CONFIDENCE)
}

fn parse_reasoning(text: &str) -> String {
    text.find(REASONING_MARKER)
        .map(|idx| text[idx + REASONING_MARKER.len()..].trim())
        .filter(|reasoning| !reasoning.is_empty())
        .unwrap_or(text)
        .to_string()
}
