//! Trait definitions for external collaborators
//!
//! Judging how two claim statements relate, and narrating the outcome of a
//! contradiction cluster, are done outside this core (usually by a language
//! model). These traits are the seam; implementations live with the caller.

use crate::{Claim, ClaimId, EvidenceId, Relation};
use std::collections::BTreeMap;

/// A judged relation between two claims
#[derive(Debug, Clone, PartialEq)]
pub struct RelationJudgment {
    /// The relation label
    pub relation: Relation,
    /// Optional justification
    pub rationale: Option<String>,
    /// Evidence the judge cited
    pub evidence_ids: Vec<EvidenceId>,
}

impl RelationJudgment {
    /// A bare relation without rationale or cited evidence
    pub fn bare(relation: Relation) -> Self {
        Self {
            relation,
            rationale: None,
            evidence_ids: Vec::new(),
        }
    }
}

/// Narrative outcome for one contradiction cluster
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolutionJudgment {
    /// Narrative summary
    pub summary: String,
    /// Conditions under which the leaning claim holds
    pub conditions: Option<String>,
    /// Claim the evidence leans towards
    pub leaning_claim_id: Option<ClaimId>,
}

/// The material a judge sees for one contradiction cluster
#[derive(Debug, Clone, Copy)]
pub struct ClusterBrief<'a> {
    /// Resolution id the cluster will receive
    pub resolution_id: &'a str,
    /// Member claims, in traversal order
    pub claims: &'a [&'a Claim],
    /// Summed evidence weight per member
    pub weight_by_claim: &'a BTreeMap<ClaimId, f64>,
}

/// Trait for an external judgment capability
///
/// Implemented by the caller (for example on top of an LLM client) and
/// injected into relation building and contradiction resolution.
pub trait ClaimJudge {
    /// Error type for judgment calls
    type Error: std::fmt::Display;

    /// Judge the relation between two claims of the same claim type
    fn relate(&self, a: &Claim, b: &Claim) -> Result<RelationJudgment, Self::Error>;

    /// Narrate the outcome of a contradiction cluster
    fn resolve(&self, cluster: &ClusterBrief<'_>) -> Result<ResolutionJudgment, Self::Error>;
}

impl<J: ClaimJudge + ?Sized> ClaimJudge for &J {
    type Error = J::Error;

    fn relate(&self, a: &Claim, b: &Claim) -> Result<RelationJudgment, Self::Error> {
        (**self).relate(a, b)
    }

    fn resolve(&self, cluster: &ClusterBrief<'_>) -> Result<ResolutionJudgment, Self::Error> {
        (**self).resolve(cluster)
    }
}
