//! Relation building between claims of the same type
//!
//! Relations come from an injected judgment strategy. The caller either
//! supplies an external [`ClaimJudge`] or opts into the built-in heuristic;
//! an external judge that fails on a pair is replaced by the heuristic for
//! that pair only.

use crate::error::ScoringError;
use corroborate_domain::traits::{
    ClaimJudge, ClusterBrief, RelationJudgment, ResolutionJudgment,
};
use corroborate_domain::{Claim, Edge, Relation};
use std::convert::Infallible;

/// How relations and resolution narratives are judged
#[derive(Debug, Clone)]
pub enum Judgment<J> {
    /// Delegate to an external judge
    External(J),
    /// No external judge: heuristic relations and neutral resolutions
    HeuristicFallback,
}

/// Uninhabited judge type for [`Judgment::heuristic`]
#[derive(Debug, Clone, Copy)]
pub enum NoJudge {}

impl ClaimJudge for NoJudge {
    type Error = Infallible;

    fn relate(&self, _a: &Claim, _b: &Claim) -> Result<RelationJudgment, Self::Error> {
        match *self {}
    }

    fn resolve(&self, _cluster: &ClusterBrief<'_>) -> Result<ResolutionJudgment, Self::Error> {
        match *self {}
    }
}

impl Judgment<NoJudge> {
    /// The heuristic fallback, without naming a judge type
    pub fn heuristic() -> Self {
        Judgment::HeuristicFallback
    }
}

impl<J> Judgment<J> {
    /// Whether an external judge is available
    pub fn is_external(&self) -> bool {
        matches!(self, Judgment::External(_))
    }
}

impl<J: ClaimJudge> Judgment<J> {
    /// Relation between two claims, falling back to the heuristic on judge failure
    pub fn relate(&self, a: &Claim, b: &Claim) -> RelationJudgment {
        let Judgment::External(judge) = self else {
            return RelationJudgment::bare(heuristic_relation(a, b));
        };
        match judge.relate(a, b) {
            Ok(judgment) => judgment,
            Err(e) => {
                let err = ScoringError::Judge(e.to_string());
                tracing::warn!(
                    "Relation judge failed for {} / {}, using heuristic: {}",
                    a.id,
                    b.id,
                    err
                );
                RelationJudgment::bare(heuristic_relation(a, b))
            }
        }
    }
}

fn has_word(statement: &str, words: &[&str]) -> bool {
    statement
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| words.iter().any(|w| token.eq_ignore_ascii_case(w)))
}

/// Heuristic relation between two claims of the same type
///
/// Opposite definite polarity (pro vs con) contradicts; a conditional
/// statement ("when", "if") refines; anything else is unrelated.
pub fn heuristic_relation(a: &Claim, b: &Claim) -> Relation {
    if a.polarity.opposes(b.polarity) {
        Relation::Contradicts
    } else if has_word(&a.statement, &["when", "if"]) || has_word(&b.statement, &["when", "if"]) {
        Relation::Refines
    } else {
        Relation::Unrelated
    }
}

/// Build one edge for every unordered pair of same-type claims
///
/// Pairs are visited in claim order (`i < j`); `src` is the earlier claim.
pub fn build_edges<J: ClaimJudge>(claims: &[Claim], judgment: &Judgment<J>) -> Vec<Edge> {
    let mut edges = Vec::new();
    for (i, a) in claims.iter().enumerate() {
        for b in claims.iter().skip(i + 1) {
            if a.claim_type != b.claim_type {
                continue;
            }
            let judged = judgment.relate(a, b);
            let mut edge = Edge::new(a.id.clone(), b.id.clone(), judged.relation);
            edge.rationale = judged.rationale;
            edge.evidence_ids = judged.evidence_ids;
            edges.push(edge);
        }
    }

    tracing::debug!(
        "Built {} edges ({} contradictions) over {} claims",
        edges.len(),
        edges.iter().filter(|e| e.is_contradiction()).count(),
        claims.len()
    );
    edges
}
