//! Resolution records for contradiction clusters

use crate::ClaimId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary used when no judgment is available for a contradiction cluster
pub const NEUTRAL_SUMMARY: &str = "Contradictory claims detected.";

/// Outcome of judging one connected component of contradicting claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Identifier in discovery order (`R1`, `R2`, ...)
    pub id: String,

    /// Members of the component, in traversal order
    pub claim_ids: Vec<ClaimId>,

    /// Ids of the contradiction edges folded into this resolution
    pub edge_ids: Vec<String>,

    /// Narrative summary
    pub summary: String,

    /// Conditions under which the leaning claim holds
    #[serde(default)]
    pub conditions: Option<String>,

    /// Claim the evidence leans towards, if the judge named one
    #[serde(default)]
    pub leaning_claim_id: Option<ClaimId>,

    /// Summed evidence weight per member (every member present, zero included)
    #[serde(default)]
    pub weight_by_claim: BTreeMap<ClaimId, f64>,
}

impl Resolution {
    /// Whether `claim` is a member of this resolution
    pub fn contains(&self, claim: &ClaimId) -> bool {
        self.claim_ids.iter().any(|c| c == claim)
    }

    /// Member with the largest aggregate weight (first in traversal order on ties)
    ///
    /// Informational only: the leaning claim is never derived from this.
    pub fn heaviest_claim(&self) -> Option<&ClaimId> {
        let mut best: Option<(&ClaimId, f64)> = None;
        for id in &self.claim_ids {
            let weight = self.weight_by_claim.get(id).copied().unwrap_or(0.0);
            match best {
                Some((_, w)) if w >= weight => {}
                _ => best = Some((id, weight)),
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Resolution {
        let mut weight_by_claim = BTreeMap::new();
        weight_by_claim.insert(ClaimId::new("C1"), 0.4);
        weight_by_claim.insert(ClaimId::new("C2"), 0.8);
        weight_by_claim.insert(ClaimId::new("C3"), 0.8);
        Resolution {
            id: "R1".to_string(),
            claim_ids: vec![ClaimId::new("C1"), ClaimId::new("C2"), ClaimId::new("C3")],
            edge_ids: vec!["C1->C2".to_string(), "C2->C3".to_string()],
            summary: NEUTRAL_SUMMARY.to_string(),
            conditions: None,
            leaning_claim_id: None,
            weight_by_claim,
        }
    }

    #[test]
    fn test_contains() {
        let resolution = sample();
        assert!(resolution.contains(&ClaimId::new("C2")));
        assert!(!resolution.contains(&ClaimId::new("C9")));
    }

    #[test]
    fn test_heaviest_claim_prefers_first_on_tie() {
        let resolution = sample();
        assert_eq!(resolution.heaviest_claim(), Some(&ClaimId::new("C2")));
    }
}
