//! Conflict penalties derived from contradiction edges and their resolutions

use crate::config::ConflictPenaltyConfig;
use corroborate_domain::{Claim, ClaimId, Edge, Resolution};
use std::collections::{BTreeMap, HashMap};

impl ConflictPenaltyConfig {
    /// Penalty one contradiction edge imposes on `claim`
    ///
    /// `resolution` is the resolution the edge was folded into, if any.
    pub fn tier(&self, claim: &ClaimId, resolution: Option<&Resolution>) -> f64 {
        let Some(resolution) = resolution else {
            return self.unresolved;
        };
        match &resolution.leaning_claim_id {
            Some(leaning) if leaning == claim => self.leaning,
            Some(_) => self.opposed,
            None => self.undecided,
        }
    }
}

/// Multiplicative conflict penalty for every claim
///
/// Every claim starts at 1.0. Each contradiction edge applies a tier to both
/// endpoints and the smallest tier over all touching edges wins. An edge whose
/// `resolution_id` is missing or unknown gets the unresolved tier.
pub fn conflict_penalties(
    claims: &[Claim],
    edges: &[Edge],
    resolutions: &[Resolution],
    config: &ConflictPenaltyConfig,
) -> BTreeMap<ClaimId, f64> {
    let mut penalty: BTreeMap<ClaimId, f64> = claims.iter().map(|c| (c.id.clone(), 1.0)).collect();
    let by_id: HashMap<&str, &Resolution> = resolutions.iter().map(|r| (r.id.as_str(), r)).collect();

    for edge in edges.iter().filter(|e| e.is_contradiction()) {
        let resolution = edge
            .resolution_id
            .as_deref()
            .and_then(|id| by_id.get(id).copied());
        for claim in [&edge.src_claim_id, &edge.dst_claim_id] {
            let tier = config.tier(claim, resolution);
            let current = penalty.entry(claim.clone()).or_insert(1.0);
            *current = current.min(tier);
        }
    }
    penalty
}
