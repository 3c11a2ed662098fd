//! Confidence scoring
//!
//! Implements the four-component confidence model:
//! 1. Strength - saturating aggregation of evidence weights
//! 2. Diversity - independence of sources, providers and publishers
//! 3. Verification - mean snippet verification quality
//! 4. Conflict penalty - multiplicative discount supplied by resolution
//!
//! Components are combined into one scalar in [0, 1].

use crate::config::ConfidenceConfig;
use crate::verification::verification_quality;
use crate::weighting::clamp;
use corroborate_domain::{
    Claim, ConfidenceComponents, EvidenceCard, EvidenceId, Source, SourceId,
};
use std::collections::{HashMap, HashSet};

/// Decimal places kept in stored components
const COMPONENT_DECIMALS: i32 = 6;

/// Saturating aggregate of evidence weights
///
/// Weights are sorted descending and the i-th is discounted by `decay^i`.
/// Each adjusted weight is treated as an independent chance of refuting the
/// "no support" hypothesis: `1 - Π(1 - adjusted_i)`. Returns 0 for no
/// evidence and never leaves [0, 1].
///
/// # Examples
///
/// ```
/// use corroborate_scoring::confidence::evidence_strength;
///
/// assert_eq!(evidence_strength(&[], 0.85), 0.0);
/// let s = evidence_strength(&[0.6, 0.4], 0.85);
/// assert!((s - (1.0 - 0.4 * (1.0 - 0.34))).abs() < 1e-12);
/// ```
pub fn evidence_strength(weights: &[f64], decay: f64) -> f64 {
    if weights.is_empty() {
        return 0.0;
    }
    let decay = clamp(decay, 0.0, 1.0);
    let mut sorted: Vec<f64> = weights.iter().map(|w| clamp(*w, 0.0, 1.0)).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut remaining = 1.0;
    let mut factor = 1.0;
    for weight in sorted {
        let adjusted = clamp(weight * factor, 0.0, 1.0);
        remaining *= 1.0 - adjusted;
        factor *= decay;
    }
    clamp(1.0 - remaining, 0.0, 1.0)
}

/// Rating derived from a strength-only score, used before calibration
pub fn provisional_rating(score: f64) -> u8 {
    clamp(score * 5.0, 1.0, 5.0).round() as u8
}

/// Read-only index over evidence cards and their sources
///
/// Unknown evidence ids are skipped silently; an unknown source contributes
/// no provider or publisher.
#[derive(Debug, Clone, Default)]
pub struct EvidenceIndex {
    evidence: HashMap<EvidenceId, EvidenceCard>,
    provider_by_source: HashMap<SourceId, String>,
    publisher_by_source: HashMap<SourceId, String>,
}

impl EvidenceIndex {
    /// Build the index from weighted sources and evidence
    pub fn new(sources: &[Source], evidence: &[EvidenceCard]) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            evidence: evidence.iter().map(|e| (e.id.clone(), e.clone())).collect(),
            provider_by_source: sources
                .iter()
                .filter_map(|s| non_empty(&s.provider).map(|p| (s.id.clone(), p)))
                .collect(),
            publisher_by_source: sources
                .iter()
                .filter_map(|s| non_empty(&s.publisher).map(|p| (s.id.clone(), p)))
                .collect(),
        }
    }

    /// Look up an evidence card
    pub fn get(&self, id: &EvidenceId) -> Option<&EvidenceCard> {
        self.evidence.get(id)
    }

    /// Weight of an evidence card, if known
    pub fn weight(&self, id: &EvidenceId) -> Option<f64> {
        self.evidence.get(id).map(|e| e.evidence_weight)
    }

    /// Known evidence cards backing `claim`, in `supported_by` order
    pub fn supporting<'a>(&'a self, claim: &Claim) -> Vec<&'a EvidenceCard> {
        claim.supported_by.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Sum of the known evidence weights backing `claim`
    pub fn total_weight(&self, claim: &Claim) -> f64 {
        claim.supported_by.iter().filter_map(|id| self.weight(id)).sum()
    }

    fn provider_of(&self, source: &SourceId) -> Option<&str> {
        self.provider_by_source.get(source).map(String::as_str)
    }

    fn publisher_of(&self, source: &SourceId) -> Option<&str> {
        self.publisher_by_source.get(source).map(String::as_str)
    }
}

/// Computes confidence components and composite scores
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer {
    config: ConfidenceConfig,
}

impl ConfidenceScorer {
    /// Create a scorer with the given weights and thresholds
    pub fn new(config: ConfidenceConfig) -> Self {
        Self { config }
    }

    /// Strength of a set of weights under this scorer's decay
    pub fn strength(&self, weights: &[f64]) -> f64 {
        evidence_strength(weights, self.config.redundancy_decay)
    }

    /// Provisional strength-only score of a claim
    pub fn provisional_score(&self, claim: &Claim, index: &EvidenceIndex) -> f64 {
        let weights: Vec<f64> = claim
            .supported_by
            .iter()
            .filter_map(|id| index.weight(id))
            .collect();
        self.strength(&weights)
    }

    /// Compute all four components for a claim
    pub fn components(
        &self,
        claim: &Claim,
        index: &EvidenceIndex,
        conflict_penalty: f64,
    ) -> ConfidenceComponents {
        let supporting = index.supporting(claim);
        let weights: Vec<f64> = supporting.iter().map(|e| e.evidence_weight).collect();

        ConfidenceComponents {
            strength: self.strength(&weights),
            diversity: diversity(&supporting, index),
            verification: verification(&supporting),
            conflict_penalty: clamp(conflict_penalty, 0.0, 1.0),
        }
        .rounded(COMPONENT_DECIMALS)
    }

    /// Combine components into the composite score
    pub fn score(&self, components: &ConfidenceComponents) -> f64 {
        let base = self.config.strength_weight * components.strength
            + self.config.diversity_weight * components.diversity
            + self.config.verification_weight * components.verification;
        clamp(base * components.conflict_penalty, 0.0, 1.0)
    }

    /// Whether the components flag the claim as thinly or contentiously supported
    ///
    /// Any single trigger suffices.
    pub fn needs_more_evidence(&self, components: &ConfidenceComponents) -> bool {
        components.strength < self.config.min_strength
            || components.diversity < self.config.min_diversity
            || components.conflict_penalty < self.config.min_conflict_penalty
    }

    /// Score a claim in place with the given conflict penalty
    pub fn apply(&self, claim: &mut Claim, index: &EvidenceIndex, conflict_penalty: f64) {
        let components = self.components(claim, index, conflict_penalty);
        claim.confidence_score = self.score(&components);
        claim.needs_more_evidence = self.needs_more_evidence(&components);
        claim.confidence_components = Some(components);
    }
}

fn diversity(supporting: &[&EvidenceCard], index: &EvidenceIndex) -> f64 {
    if supporting.is_empty() {
        return 0.0;
    }
    let count = supporting.len() as f64;
    let sources: HashSet<&SourceId> = supporting.iter().map(|e| &e.source_id).collect();
    let providers: HashSet<&str> = sources.iter().filter_map(|s| index.provider_of(s)).collect();
    let publishers: HashSet<&str> = sources.iter().filter_map(|s| index.publisher_of(s)).collect();

    let ratio = |unique: usize| (unique as f64).min(count) / count;
    clamp(
        (ratio(sources.len()) + ratio(providers.len()) + ratio(publishers.len())) / 3.0,
        0.0,
        1.0,
    )
}

fn verification(supporting: &[&EvidenceCard]) -> f64 {
    if supporting.is_empty() {
        return 0.0;
    }
    let total: f64 = supporting
        .iter()
        .map(|e| verification_quality(&e.verification))
        .sum();
    clamp(total / supporting.len() as f64, 0.0, 1.0)
}
