//! Quality metrics for a finished corroboration run
//!
//! Calibration error is measured against a proxy label: a claim counts as
//! "correct" when nothing contradicts it and at least two evidence cards
//! support it. There is no ground truth in a batch, so ECE and Brier here
//! measure self-consistency, not accuracy.

use corroborate_domain::{Claim, ClaimId, ClaimType, Edge, Source};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Scores below this count as weakly supported
pub const WEAK_SCORE: f64 = 0.4;

/// Number of equal-width bins for expected calibration error
pub const ECE_BINS: usize = 10;

/// Supporting evidence count required for a positive proxy label
const PROXY_MIN_SUPPORT: usize = 2;

/// Metrics computed over one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Share of claims with at least one supporting evidence id
    pub supported_claim_rate: f64,

    /// Distinct non-empty providers among sources
    pub providers: usize,

    /// Distinct non-empty publishers among sources
    pub publishers: usize,

    /// Claims per claim type
    pub claim_type_coverage: BTreeMap<ClaimType, usize>,

    /// Contradiction edges over evaluated pairs
    pub contradiction_density: f64,

    /// Share of claims scoring below [`WEAK_SCORE`]
    pub weak_evidence_rate: f64,

    /// Claims per 1-5 rating
    pub rating_distribution: BTreeMap<u8, usize>,

    /// Mean confidence score
    pub avg_confidence_score: f64,

    /// Expected calibration error against the proxy label
    pub ece: f64,

    /// Brier score against the proxy label
    pub brier: f64,
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Proxy correctness label per claim (1 = uncontradicted and well supported)
pub fn proxy_labels(claims: &[Claim], edges: &[Edge]) -> Vec<u8> {
    let contradicted: HashSet<&ClaimId> = edges
        .iter()
        .filter(|e| e.is_contradiction())
        .flat_map(|e| [&e.src_claim_id, &e.dst_claim_id])
        .collect();
    claims
        .iter()
        .map(|c| {
            let positive =
                !contradicted.contains(&c.id) && c.supported_by.len() >= PROXY_MIN_SUPPORT;
            u8::from(positive)
        })
        .collect()
}

/// Mean squared error between probabilities and 0/1 labels
pub fn brier_score(probs: &[f64], labels: &[u8]) -> f64 {
    if probs.is_empty() {
        return 0.0;
    }
    let total: f64 = probs
        .iter()
        .zip(labels)
        .map(|(p, y)| (p - f64::from(*y)).powi(2))
        .sum();
    total / probs.len() as f64
}

/// Expected calibration error over `bins` equal-width bins
///
/// Bins are half-open `[low, high)`; a probability of exactly 1.0 falls in
/// the last bin.
pub fn expected_calibration_error(probs: &[f64], labels: &[u8], bins: usize) -> f64 {
    if probs.is_empty() || bins == 0 {
        return 0.0;
    }
    let mut count = vec![0usize; bins];
    let mut positives = vec![0.0f64; bins];
    let mut confidence = vec![0.0f64; bins];

    for (p, y) in probs.iter().zip(labels) {
        let bin = ((p * bins as f64) as usize).min(bins - 1);
        count[bin] += 1;
        positives[bin] += f64::from(*y);
        confidence[bin] += p;
    }

    let n = probs.len() as f64;
    (0..bins)
        .filter(|&b| count[b] > 0)
        .map(|b| {
            let size = count[b] as f64;
            (size / n) * (positives[b] / size - confidence[b] / size).abs()
        })
        .sum()
}

impl RunMetrics {
    /// Compute metrics over final claims, edges and sources
    pub fn compute(claims: &[Claim], edges: &[Edge], sources: &[Source]) -> Self {
        let total = claims.len();

        let providers: HashSet<&str> = sources
            .iter()
            .filter_map(|s| s.provider.as_deref())
            .filter(|p| !p.is_empty())
            .collect();
        let publishers: HashSet<&str> = sources
            .iter()
            .filter_map(|s| s.publisher.as_deref())
            .filter(|p| !p.is_empty())
            .collect();

        let mut claim_type_coverage = BTreeMap::new();
        let mut rating_distribution = BTreeMap::new();
        for claim in claims {
            *claim_type_coverage.entry(claim.claim_type).or_insert(0) += 1;
            *rating_distribution.entry(claim.confidence).or_insert(0) += 1;
        }

        let contradictions = edges.iter().filter(|e| e.is_contradiction()).count();
        let supported = claims.iter().filter(|c| !c.supported_by.is_empty()).count();
        let weak = claims.iter().filter(|c| c.confidence_score < WEAK_SCORE).count();
        let score_sum: f64 = claims.iter().map(|c| c.confidence_score).sum();

        let probs: Vec<f64> = claims.iter().map(|c| c.confidence_score.clamp(0.0, 1.0)).collect();
        let labels = proxy_labels(claims, edges);

        Self {
            supported_claim_rate: ratio(supported, total),
            providers: providers.len(),
            publishers: publishers.len(),
            claim_type_coverage,
            contradiction_density: ratio(contradictions, edges.len()),
            weak_evidence_rate: ratio(weak, total),
            rating_distribution,
            avg_confidence_score: if total == 0 { 0.0 } else { score_sum / total as f64 },
            ece: expected_calibration_error(&probs, &labels, ECE_BINS),
            brier: brier_score(&probs, &labels),
        }
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Run Metrics Summary".to_string(),
            "===================".to_string(),
            format!("Supported claim rate: {:.3}", self.supported_claim_rate),
            format!("Providers: {}, publishers: {}", self.providers, self.publishers),
            format!("Contradiction density: {:.3}", self.contradiction_density),
            format!("Weak evidence rate: {:.3}", self.weak_evidence_rate),
            format!("Average confidence score: {:.3}", self.avg_confidence_score),
            format!("ECE (proxy): {:.4}", self.ece),
            format!("Brier (proxy): {:.4}", self.brier),
            String::new(),
        ];

        if !self.claim_type_coverage.is_empty() {
            lines.push("Claims by type:".to_string());
            for (claim_type, count) in &self.claim_type_coverage {
                lines.push(format!("  {}: {}", claim_type, count));
            }
            lines.push(String::new());
        }

        if !self.rating_distribution.is_empty() {
            lines.push("Ratings:".to_string());
            for (rating, count) in &self.rating_distribution {
                lines.push(format!("  {}: {}", rating, count));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corroborate_domain::{EvidenceId, Polarity, Relation};

    fn claim(id: &str, claim_type: ClaimType, evidence: usize, score: f64, rating: u8) -> Claim {
        let supported_by = (0..evidence).map(|i| EvidenceId::new(format!("E{}", i))).collect();
        let mut claim = Claim::new(id, claim_type, "s", Polarity::Neutral, supported_by).with_score(score);
        claim.confidence = rating;
        claim
    }

    #[test]
    fn test_empty_run() {
        let metrics = RunMetrics::compute(&[], &[], &[]);
        assert_eq!(metrics, RunMetrics::default());
    }

    #[test]
    fn test_proxy_labels() {
        let claims = vec![
            claim("C1", ClaimType::Bias, 2, 0.9, 5),
            claim("C2", ClaimType::Bias, 3, 0.5, 3),
            claim("C3", ClaimType::Bias, 1, 0.2, 1),
        ];
        let edges = vec![Edge::new("C2", "C9", Relation::Contradicts)];
        assert_eq!(proxy_labels(&claims, &edges), vec![1, 0, 0]);
    }

    #[test]
    fn test_brier_and_ece() {
        assert_eq!(brier_score(&[], &[]), 0.0);
        assert!((brier_score(&[1.0, 0.5], &[1, 0]) - 0.125).abs() < 1e-12);

        let ece = expected_calibration_error(&[0.8, 0.85, 0.9, 1.0], &[1, 0, 1, 1], 10);
        // Bin 8: |0.5 - 0.825| * 2/4; bin 9: |1.0 - 0.95| * 2/4
        assert!((ece - (0.1625 + 0.025)).abs() < 1e-9);
    }

    #[test]
    fn test_compute() {
        let claims = vec![
            claim("C1", ClaimType::Bias, 2, 0.8, 5),
            claim("C2", ClaimType::Bias, 0, 0.1, 1),
            claim("C3", ClaimType::Evaluation, 1, 0.3, 1),
        ];
        let edges = vec![
            Edge::new("C1", "C2", Relation::Contradicts),
            Edge::new("C1", "C2", Relation::Unrelated),
        ];
        let sources = vec![
            Source::new("S1", "https://a").with_provider("arxiv").with_publisher("arXiv"),
            Source::new("S2", "https://b").with_provider("arxiv"),
            Source::new("S3", "https://c").with_provider(""),
        ];
        let metrics = RunMetrics::compute(&claims, &edges, &sources);

        assert!((metrics.supported_claim_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(metrics.providers, 1);
        assert_eq!(metrics.publishers, 1);
        assert_eq!(metrics.claim_type_coverage[&ClaimType::Bias], 2);
        assert_eq!(metrics.contradiction_density, 0.5);
        assert!((metrics.weak_evidence_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(metrics.rating_distribution[&1], 2);
        assert!((metrics.avg_confidence_score - 0.4).abs() < 1e-12);
        assert!(metrics.ece >= 0.0 && metrics.ece <= 1.0);
    }

    #[test]
    fn test_summary() {
        let claims = vec![claim("C1", ClaimType::OpsRisk, 2, 0.8, 4)];
        let summary = RunMetrics::compute(&claims, &[], &[]).summary();
        assert!(summary.contains("Supported claim rate: 1.000"));
        assert!(summary.contains("  ops_risk: 1"));
        assert!(summary.contains("  4: 1"));
    }
}
