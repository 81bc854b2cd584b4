use crate::models::verify::ClaimStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One independently checkable factual assertion pulled out of the input text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claim(String);

impl Claim {
    pub fn new(statement: impl Into<String>) -> Self {
        Self(statement.into())
    }

    pub fn statement(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A web location returned by a search lookup. Either a full URL or a bare
/// domain, depending on what the provider shows; it is never parsed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Verification outcome for a single claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheck {
    pub claim: Claim,
    pub verification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
    pub status: ClaimStatus,
}

impl FactCheck {
    pub fn new(claim: Claim, verification: String, source: Option<SourceRef>) -> Self {
        let status = ClaimStatus::from_verification(&verification);
        Self {
            claim,
            verification,
            source,
            status,
        }
    }
}
