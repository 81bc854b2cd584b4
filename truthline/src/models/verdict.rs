use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level classification assigned to the whole input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "REAL NEWS")]
    RealNews,
    #[serde(rename = "FAKE NEWS")]
    FakeNews,
    #[serde(rename = "POTENTIALLY MISLEADING")]
    PotentiallyMisleading,
    #[serde(rename = "INSUFFICIENT DATA")]
    #[default]
    InsufficientData,
}

impl Verdict {
    pub const ALL: [Verdict; 4] = [
        Verdict::RealNews,
        Verdict::FakeNews,
        Verdict::PotentiallyMisleading,
        Verdict::InsufficientData,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::RealNews => "REAL NEWS",
            Verdict::FakeNews => "FAKE NEWS",
            Verdict::PotentiallyMisleading => "POTENTIALLY MISLEADING",
            Verdict::InsufficientData => "INSUFFICIENT DATA",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verdict: {0}")]
pub struct UnknownVerdict(pub String);

impl FromStr for Verdict {
    type Err = UnknownVerdict;

    /// Accepts the four labels in any case, with optional surrounding
    /// brackets or markdown emphasis (`[FAKE NEWS]`, `**REAL NEWS**`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c: char| c == '*' || c == '[' || c == ']' || c == '_')
            .trim()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        Verdict::ALL
            .into_iter()
            .find(|v| v.label() == cleaned)
            .ok_or_else(|| UnknownVerdict(s.trim().to_string()))
    }
}

/// Confidence score in percent. Always within `0..=100`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MAX: u8 = 100;
    /// Used whenever the model's output carries no readable score.
    pub const FALLBACK: Confidence = Confidence(50);

    pub fn clamped(value: u32) -> Self {
        Self(value.min(Self::MAX as u32) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl TryFrom<u32> for Confidence {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value > Self::MAX as u32 {
            return Err(format!("confidence {value} out of range 0..=100"));
        }
        Ok(Self(value as u8))
    }
}

impl From<Confidence> for u8 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
