//! Contradiction resolution
//!
//! Claims linked by `contradicts` edges form an undirected graph. Each
//! connected component becomes one [`Resolution`] carrying the evidence
//! weight of every member and, when a judge is available, a narrative with
//! an optional leaning claim. Contradiction edges are stamped with the id of
//! the resolution they were folded into.

use crate::confidence::EvidenceIndex;
use crate::error::ScoringError;
use crate::relation::Judgment;
use corroborate_domain::resolution::NEUTRAL_SUMMARY;
use corroborate_domain::traits::{ClaimJudge, ClusterBrief, ResolutionJudgment};
use corroborate_domain::{Claim, ClaimId, Edge, Resolution};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Prefix for resolution ids (`R1`, `R2`, ...)
const RESOLUTION_PREFIX: &str = "R";

/// Resolves contradiction clusters
pub struct ContradictionResolver<'a, J> {
    index: &'a EvidenceIndex,
    judgment: &'a Judgment<J>,
}

impl<'a, J: ClaimJudge> ContradictionResolver<'a, J> {
    /// Create a resolver over the given evidence and judgment strategy
    pub fn new(index: &'a EvidenceIndex, judgment: &'a Judgment<J>) -> Self {
        Self { index, judgment }
    }

    /// Group contradicting claims and produce one resolution per cluster
    ///
    /// Components are seeded in claim order, so a cluster made only of
    /// unknown claim ids is never formed and its edges stay unstamped. An
    /// unknown id reached from a known claim joins with zero weight. Returns
    /// the resolutions and the (stamped) edges.
    pub fn resolve(&self, claims: &[Claim], mut edges: Vec<Edge>) -> (Vec<Resolution>, Vec<Edge>) {
        let mut adjacency: HashMap<&ClaimId, Vec<&ClaimId>> = HashMap::new();
        for edge in edges.iter().filter(|e| e.is_contradiction()) {
            for end in [&edge.src_claim_id, &edge.dst_claim_id] {
                if let Some(other) = edge.other_end(end) {
                    adjacency.entry(end).or_default().push(other);
                }
            }
        }

        let components = components(claims, &adjacency);
        let by_id: HashMap<&ClaimId, &Claim> = claims.iter().map(|c| (&c.id, c)).collect();

        let mut resolutions = Vec::with_capacity(components.len());
        let mut resolution_of: HashMap<ClaimId, usize> = HashMap::new();

        for (n, members) in components.into_iter().enumerate() {
            let id = format!("{}{}", RESOLUTION_PREFIX, n + 1);
            let member_claims: Vec<&Claim> =
                members.iter().filter_map(|m| by_id.get(m).copied()).collect();
            let weight_by_claim: BTreeMap<ClaimId, f64> = members
                .iter()
                .map(|m| {
                    let weight = by_id.get(m).map_or(0.0, |c| self.index.total_weight(c));
                    (m.clone(), weight)
                })
                .collect();

            let brief = ClusterBrief {
                resolution_id: &id,
                claims: &member_claims,
                weight_by_claim: &weight_by_claim,
            };
            let narrative = self.narrate(&brief);
            let leaning_claim_id = narrative.leaning_claim_id.filter(|leaning| {
                let member = members.contains(leaning);
                if !member {
                    tracing::warn!(
                        "{}: leaning claim {} is not a cluster member, dropped",
                        id,
                        leaning
                    );
                }
                member
            });

            for member in &members {
                resolution_of.insert(member.clone(), n);
            }

            let resolution = Resolution {
                id,
                claim_ids: members,
                edge_ids: Vec::new(),
                summary: narrative.summary,
                conditions: narrative.conditions,
                leaning_claim_id,
                weight_by_claim,
            };
            tracing::debug!(
                "{}: {} claims, heaviest {:?}, leaning {:?}",
                resolution.id,
                resolution.claim_ids.len(),
                resolution.heaviest_claim().map(ClaimId::as_str),
                resolution.leaning_claim_id.as_ref().map(ClaimId::as_str)
            );
            resolutions.push(resolution);
        }

        for edge in edges.iter_mut().filter(|e| e.is_contradiction()) {
            let src = resolution_of.get(&edge.src_claim_id);
            let dst = resolution_of.get(&edge.dst_claim_id);
            if let (Some(&a), Some(&b)) = (src, dst) {
                if a == b {
                    let resolution = &mut resolutions[a];
                    edge.resolution_id = Some(resolution.id.clone());
                    resolution.edge_ids.push(edge.id());
                }
            }
        }

        tracing::info!(
            "Resolved {} contradiction clusters over {} claims",
            resolutions.len(),
            claims.len()
        );
        (resolutions, edges)
    }

    fn narrate(&self, brief: &ClusterBrief<'_>) -> ResolutionJudgment {
        let neutral = || ResolutionJudgment {
            summary: NEUTRAL_SUMMARY.to_string(),
            conditions: None,
            leaning_claim_id: None,
        };
        match self.judgment {
            Judgment::HeuristicFallback => neutral(),
            Judgment::External(judge) => match judge.resolve(brief) {
                Ok(narrative) => narrative,
                Err(e) => {
                    let err = ScoringError::Judge(e.to_string());
                    tracing::warn!(
                        "Resolution judge failed for {}, using neutral summary: {}",
                        brief.resolution_id,
                        err
                    );
                    neutral()
                }
            },
        }
    }
}

/// Connected components over claims that have at least one contradiction
///
/// Iterative DFS with an explicit stack, seeded in claim order. Members
/// appear in visit order.
fn components(claims: &[Claim], adjacency: &HashMap<&ClaimId, Vec<&ClaimId>>) -> Vec<Vec<ClaimId>> {
    let mut visited: HashSet<&ClaimId> = HashSet::new();
    let mut out = Vec::new();

    for claim in claims {
        let Some((seed, _)) = adjacency.get_key_value(&claim.id) else {
            continue;
        };
        let seed: &ClaimId = seed;
        if !visited.insert(seed) {
            continue;
        }

        let mut members = Vec::new();
        let mut stack = vec![seed];
        while let Some(node) = stack.pop() {
            members.push(node.clone());
            if let Some(neighbors) = adjacency.get(node) {
                for next in neighbors.iter().rev() {
                    if visited.insert(*next) {
                        stack.push(*next);
                    }
                }
            }
        }
        out.push(members);
    }
    out
}

/// Resolve contradictions with the given evidence and judgment strategy
pub fn resolve_contradictions<J: ClaimJudge>(
    claims: &[Claim],
    edges: Vec<Edge>,
    index: &EvidenceIndex,
    judgment: &Judgment<J>,
) -> (Vec<Resolution>, Vec<Edge>) {
    ContradictionResolver::new(index, judgment).resolve(claims, edges)
}
