use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)STATUS:\s*\[?\s*(UNVERIFIABLE|DISPUTED|VERIFIED)").expect("static regex")
});

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Verified,
    Disputed,
    Unverifiable,
}

impl ClaimStatus {
    /// Reads the status out of a model's verification reply.
    ///
    /// An explicit `STATUS:` line wins. Otherwise falls back to keyword
    /// containment, with `VERIFIED` checked last.
    pub fn from_verification(text: &str) -> Self {
        if let Some(caps) = STATUS_LINE.captures(text) {
            return Self::from_keyword(&caps[1]).unwrap_or(Self::Unverifiable);
        }
        let upper = text.to_uppercase();
        if upper.contains("UNVERIFIABLE") {
            Self::Unverifiable
        } else if upper.contains("DISPUTED") {
            Self::Disputed
        } else if upper.contains("VERIFIED") {
            Self::Verified
        } else {
            Self::Unverifiable
        }
    }

    fn from_keyword(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "VERIFIED" => Some(Self::Verified),
            "DISPUTED" => Some(Self::Disputed),
            "UNVERIFIABLE" => Some(Self::Unverifiable),
            _ => None,
        }
    }

    /// Marker used in the fact-check summary block of the document prompt.
    pub fn summary_marker(&self) -> &'static str {
        match self {
            Self::Verified => "✓ Verified",
            Self::Disputed => "✗ Disputed",
            Self::Unverifiable => "? Unverifiable",
        }
    }
}
