//! Reader for the document-level model reply.
//!
//! The reply is untrusted free text laid out under four headers. Each field
//! has its own extraction rule and its own fallback, so a missing, reordered
//! or garbled section only costs that one field.

use crate::models::{Confidence, Verdict};
use regex::Regex;
use std::sync::LazyLock;

pub const VERDICT_HEADER: &str = "VERDICT:";
pub const CONFIDENCE_HEADER: &str = "CONFIDENCE:";
pub const EXPLANATION_HEADER: &str = "EXPLANATION:";
pub const KEY_POINTS_HEADER: &str = "KEY ANALYSIS POINTS:";
pub const FACT_CHECK_SUMMARY_HEADER: &str = "FACT CHECK SUMMARY:";

/// Every header that terminates a free-text section.
const KNOWN_HEADERS: [&str; 5] = [
    VERDICT_HEADER,
    CONFIDENCE_HEADER,
    EXPLANATION_HEADER,
    KEY_POINTS_HEADER,
    FACT_CHECK_SUMMARY_HEADER,
];

pub const BULLET: char = '•';
pub const EXPLANATION_FALLBACK: &str = "Analysis completed.";

static VERDICT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VERDICT:\s*(.+)").expect("static regex"));
static CONFIDENCE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CONFIDENCE:\s*(\d+)%").expect("static regex"));

/// Fields read from the reply. Always complete; fallbacks fill the gaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedAnalysis {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub explanation: String,
    pub key_points: Vec<String>,
}

pub fn parse_analysis(reply: &str) -> ParsedAnalysis {
    ParsedAnalysis {
        verdict: parse_verdict(reply),
        confidence: parse_confidence(reply),
        explanation: parse_explanation(reply),
        key_points: parse_key_points(reply),
    }
}

/// First line after `VERDICT:`; INSUFFICIENT DATA unless it names one of the
/// four verdicts.
pub fn parse_verdict(reply: &str) -> Verdict {
    VERDICT_LINE
        .captures(reply)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or_default()
}

/// First `<digits>%` right after `CONFIDENCE:`; 50 when absent. Values above
/// 100 are clamped.
pub fn parse_confidence(reply: &str) -> Confidence {
    CONFIDENCE_VALUE
        .captures(reply)
        .map(|caps| match caps[1].parse::<u32>() {
            Ok(n) => Confidence::clamped(n),
            // more digits than fit in a u32
            Err(_) => Confidence::clamped(u32::MAX),
        })
        .unwrap_or(Confidence::FALLBACK)
}

pub fn parse_explanation(reply: &str) -> String {
    section(reply, EXPLANATION_HEADER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| EXPLANATION_FALLBACK.to_string())
}

pub fn parse_key_points(reply: &str) -> Vec<String> {
    section(reply, KEY_POINTS_HEADER)
        .map(|body| {
            body.split(BULLET)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Text between `header` and whichever known header comes next, or the end
/// of the reply.
fn section<'a>(reply: &'a str, header: &str) -> Option<&'a str> {
    let start = reply.find(header)? + header.len();
    let rest = &reply[start..];
    let end = KNOWN_HEADERS
        .iter()
        .filter_map(|h| rest.find(h))
        .min()
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
