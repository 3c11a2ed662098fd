//! Relationship module - pairwise judged relations between claims

use crate::{ClaimId, EvidenceId};
use serde::{Deserialize, Serialize};

/// Relation label between two claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// One claim supports the other
    Supports,

    /// The claims cannot both hold
    Contradicts,

    /// One claim narrows the other to a condition
    Refines,

    /// No meaningful relation
    Unrelated,
}

impl Relation {
    /// Wire name of the relation
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Supports => "supports",
            Relation::Contradicts => "contradicts",
            Relation::Refines => "refines",
            Relation::Unrelated => "unrelated",
        }
    }
}

/// A relation between two claims of the same claim type
///
/// Edges are produced outside the resolver. The resolver only ever stamps
/// `resolution_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source claim ID
    pub src_claim_id: ClaimId,

    /// Target claim ID
    pub dst_claim_id: ClaimId,

    /// Judged relation
    pub relation: Relation,

    /// Free-text justification from the judge
    #[serde(default)]
    pub rationale: Option<String>,

    /// Evidence the judge cited
    #[serde(default)]
    pub evidence_ids: Vec<EvidenceId>,

    /// Resolution this edge was folded into
    #[serde(default)]
    pub resolution_id: Option<String>,
}

impl Edge {
    /// Create an edge without rationale or resolution
    pub fn new(src: impl Into<ClaimId>, dst: impl Into<ClaimId>, relation: Relation) -> Self {
        Self {
            src_claim_id: src.into(),
            dst_claim_id: dst.into(),
            relation,
            rationale: None,
            evidence_ids: Vec::new(),
            resolution_id: None,
        }
    }

    /// Stable identifier of the edge, `"<src>-><dst>"`
    pub fn id(&self) -> String {
        format!("{}->{}", self.src_claim_id, self.dst_claim_id)
    }

    /// Whether the edge is a contradiction
    pub fn is_contradiction(&self) -> bool {
        self.relation == Relation::Contradicts
    }

    /// The endpoint opposite `claim`, if `claim` is an endpoint
    pub fn other_end(&self, claim: &ClaimId) -> Option<&ClaimId> {
        if &self.src_claim_id == claim {
            Some(&self.dst_claim_id)
        } else if &self.dst_claim_id == claim {
            Some(&self.src_claim_id)
        } else {
            None
        }
    }
}
