//! Evidence cards - trust-weighted snippets tied to a source

use crate::{ClaimType, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an evidence card (e.g. `E1`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceId(String);

impl EvidenceId {
    /// Create an evidence id
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EvidenceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// How a snippet was matched against its source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// Verbatim (whitespace- and case-normalized) substring
    Exact,
    /// Approximate match above the fuzzy threshold
    Fuzzy,
    /// Not verified
    #[default]
    None,
}

/// Outcome of verifying a snippet against the source text
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Verification {
    /// Whether the snippet was found in the source
    #[serde(default)]
    pub verified: bool,

    /// Matching method that produced the verdict
    #[serde(default, rename = "verification_method")]
    pub method: VerificationMethod,

    /// Similarity score in [0, 100], when one was computed
    #[serde(default, rename = "verification_score")]
    pub score: Option<f64>,
}

impl Verification {
    /// Verbatim match
    pub fn exact() -> Self {
        Self {
            verified: true,
            method: VerificationMethod::Exact,
            score: Some(100.0),
        }
    }

    /// Approximate match with the given score
    pub fn fuzzy(score: f64) -> Self {
        Self {
            verified: true,
            method: VerificationMethod::Fuzzy,
            score: Some(score),
        }
    }

    /// No match; `score` is the best similarity seen, if any
    pub fn unverified(score: Option<f64>) -> Self {
        Self {
            verified: false,
            method: VerificationMethod::None,
            score,
        }
    }
}

fn default_reliability() -> u8 {
    3
}

/// A snippet extracted from a source, with its derived weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceCard {
    /// Unique identifier within the batch
    pub id: EvidenceId,

    /// Source the snippet was taken from
    pub source_id: SourceId,

    /// Claim types the snippet speaks to
    #[serde(default)]
    pub claim_types: Vec<ClaimType>,

    /// Short quote from the source
    #[serde(default)]
    pub snippet: String,

    /// Externally assigned reliability rating in [1, 5]
    #[serde(default = "default_reliability")]
    pub reliability: u8,

    /// Snippet verification outcome
    #[serde(flatten)]
    pub verification: Verification,

    /// Derived weight in [0.0, 1.0]
    #[serde(default)]
    pub evidence_weight: f64,
}

impl EvidenceCard {
    /// Create an unweighted, unverified card
    pub fn new(id: impl Into<EvidenceId>, source_id: impl Into<SourceId>, reliability: u8) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            claim_types: Vec::new(),
            snippet: String::new(),
            reliability,
            verification: Verification::default(),
            evidence_weight: 0.0,
        }
    }

    /// Attach a verification outcome
    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }

    /// Set an already computed weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.evidence_weight = weight;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_serializes_flat() {
        let card = EvidenceCard::new("E1", "S1", 4).with_verification(Verification::fuzzy(91.0));
        let value = serde_json::to_value(&card).unwrap();

        assert_eq!(value["verified"], true);
        assert_eq!(value["verification_method"], "fuzzy");
        assert_eq!(value["verification_score"], 91.0);
        assert!(value.get("verification").is_none());
    }

    #[test]
    fn test_card_defaults_when_deserialized() {
        let card: EvidenceCard =
            serde_json::from_str(r#"{"id": "E2", "source_id": "S9"}"#).unwrap();

        assert_eq!(card.reliability, 3);
        assert!(!card.verification.verified);
        assert_eq!(card.verification.method, VerificationMethod::None);
        assert_eq!(card.evidence_weight, 0.0);
    }
}
