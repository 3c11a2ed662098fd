//! Claim module - the unit that evidence is aggregated into

use crate::{ConfidenceComponents, EvidenceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a claim within one batch (e.g. `C1`)
///
/// Claim ids are assigned by the extraction step outside this core and are
/// only required to be unique within a batch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Create a claim id from any string-like value
    ///
    /// # Examples
    ///
    /// ```
    /// use corroborate_domain::ClaimId;
    ///
    /// let id = ClaimId::new("C1");
    /// assert_eq!(id.as_str(), "C1");
    /// ```
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ClaimId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The fixed set of claim categories
///
/// Canonicalization and relation building only ever compare claims that share
/// a claim type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// Coverage, noise, and fidelity of data
    DataQuality,
    /// Skew and fairness effects
    Bias,
    /// Benchmarks and measured outcomes
    Evaluation,
    /// Leakage, memorization, and attack surface
    PrivacySecurity,
    /// Operational and deployment risk
    OpsRisk,
}

impl ClaimType {
    /// Every claim type, in declaration order
    pub const ALL: [ClaimType; 5] = [
        ClaimType::DataQuality,
        ClaimType::Bias,
        ClaimType::Evaluation,
        ClaimType::PrivacySecurity,
        ClaimType::OpsRisk,
    ];

    /// Wire name of the claim type
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::DataQuality => "data_quality",
            ClaimType::Bias => "bias",
            ClaimType::Evaluation => "evaluation",
            ClaimType::PrivacySecurity => "privacy_security",
            ClaimType::OpsRisk => "ops_risk",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stance a claim takes on the question under research
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// In favour
    Pro,
    /// Against
    Con,
    /// Both, depending on conditions
    Mixed,
    /// No stance
    #[default]
    Neutral,
}

impl Polarity {
    /// Normalize a free-form polarity label from an extractor
    ///
    /// Unknown or empty labels map to [`Polarity::Neutral`].
    ///
    /// # Examples
    ///
    /// ```
    /// use corroborate_domain::Polarity;
    ///
    /// assert_eq!(Polarity::parse_lenient(" Positive "), Polarity::Pro);
    /// assert_eq!(Polarity::parse_lenient("neg"), Polarity::Con);
    /// assert_eq!(Polarity::parse_lenient("???"), Polarity::Neutral);
    /// ```
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "positive" | "pos" | "pro" => Polarity::Pro,
            "negative" | "neg" | "con" => Polarity::Con,
            "mixed" | "both" => Polarity::Mixed,
            _ => Polarity::Neutral,
        }
    }

    /// Whether two polarities take opposite definite stances (pro vs con)
    pub fn opposes(&self, other: Polarity) -> bool {
        matches!(
            (self, other),
            (Polarity::Pro, Polarity::Con) | (Polarity::Con, Polarity::Pro)
        )
    }
}

fn default_rating() -> u8 {
    3
}

/// A claim - a typed assertion backed by evidence cards
///
/// Claims arrive from the extraction step with only `id`, `claim_type`,
/// `statement`, `polarity` and `supported_by` filled in. The scoring core
/// mutates the remaining fields; it never invents claims beyond merged
/// survivors of canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier within the batch
    pub id: ClaimId,

    /// Category of the claim
    pub claim_type: ClaimType,

    /// The assertion itself
    pub statement: String,

    /// Stance of the assertion
    #[serde(default)]
    pub polarity: Polarity,

    /// Evidence card ids backing the claim (order of first appearance)
    #[serde(default)]
    pub supported_by: Vec<EvidenceId>,

    /// Ordinal rating in [1, 5]
    #[serde(default = "default_rating")]
    pub confidence: u8,

    /// Composite score in [0.0, 1.0]
    #[serde(default)]
    pub confidence_score: f64,

    /// Breakdown of the composite score, once scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_components: Option<ConfidenceComponents>,

    /// Set when the claim is thinly or contentiously supported
    #[serde(default)]
    pub needs_more_evidence: bool,

    /// Statements of near-duplicate claims absorbed into this one
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Claim {
    /// Create an unscored claim
    pub fn new(
        id: impl Into<ClaimId>,
        claim_type: ClaimType,
        statement: impl Into<String>,
        polarity: Polarity,
        supported_by: Vec<EvidenceId>,
    ) -> Self {
        Self {
            id: id.into(),
            claim_type,
            statement: statement.into(),
            polarity,
            supported_by,
            confidence: default_rating(),
            confidence_score: 0.0,
            confidence_components: None,
            needs_more_evidence: false,
            aliases: Vec::new(),
        }
    }

    /// Set a pre-existing confidence score (builder style)
    pub fn with_score(mut self, score: f64) -> Self {
        self.confidence_score = score;
        self
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: ClaimId ordering matches string ordering
        #[test]
        fn test_claim_id_ordering_property(a in "[A-Z][0-9]{1,4}", b in "[A-Z][0-9]{1,4}") {
            let id_a = ClaimId::new(a.clone());
            let id_b = ClaimId::new(b.clone());

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: lenient polarity parsing never panics and is case-insensitive
        #[test]
        fn test_polarity_parse_case_insensitive(label in "[a-zA-Z ]{0,12}") {
            prop_assert_eq!(
                Polarity::parse_lenient(&label),
                Polarity::parse_lenient(&label.to_uppercase())
            );
        }
    }
}
