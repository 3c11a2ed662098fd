//! The two-pass corroboration batch
//!
//! Weighting and a strength-only provisional score come first, because
//! canonicalization picks survivors by score. Contradiction resolution needs
//! canonical claims, and the final score needs the conflict penalties that
//! resolution produces, so scoring runs a second time at the end.

use crate::calibration::calibrate;
use crate::canonicalize::Canonicalizer;
use crate::confidence::{provisional_rating, ConfidenceScorer, EvidenceIndex};
use crate::config::ScoringConfig;
use crate::metrics::RunMetrics;
use crate::penalty::conflict_penalties;
use crate::relation::{build_edges, Judgment};
use crate::resolver::resolve_contradictions;
use crate::verification::verify_snippet;
use crate::weighting::{domain_of, infer_source_type, thin_source_reliability, weigh_evidence, weigh_sources};
use corroborate_domain::traits::ClaimJudge;
use corroborate_domain::{Claim, Edge, EvidenceCard, Resolution, Source, SourceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Input records for one run
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Retrieved sources
    pub sources: Vec<Source>,
    /// Evidence cards extracted from the sources
    pub evidence: Vec<EvidenceCard>,
    /// Claims extracted from the evidence
    pub claims: Vec<Claim>,
    /// Full text per source, for snippet verification
    ///
    /// Cards whose source has no text here keep their verification as given.
    pub source_texts: BTreeMap<SourceId, String>,
}

impl Batch {
    /// Create a batch without source texts
    pub fn new(sources: Vec<Source>, evidence: Vec<EvidenceCard>, claims: Vec<Claim>) -> Self {
        Self {
            sources,
            evidence,
            claims,
            source_texts: BTreeMap::new(),
        }
    }

    /// Attach the full text of a source (builder style)
    pub fn with_source_text(mut self, source: impl Into<SourceId>, text: impl Into<String>) -> Self {
        self.source_texts.insert(source.into(), text.into());
        self
    }
}

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Sources with derived weights
    pub sources: Vec<Source>,
    /// Admitted evidence with derived weights
    pub evidence: Vec<EvidenceCard>,
    /// Canonical, scored and calibrated claims
    pub claims: Vec<Claim>,
    /// Relations between same-type claims
    pub edges: Vec<Edge>,
    /// One resolution per contradiction cluster
    pub resolutions: Vec<Resolution>,
    /// Run quality metrics
    pub metrics: RunMetrics,
}

/// Runs batches under one configuration
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ScoringConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Run one batch end to end
    pub fn run<J: ClaimJudge>(&self, batch: Batch, judgment: &Judgment<J>) -> PipelineOutput {
        let Batch {
            sources,
            evidence,
            claims,
            source_texts,
        } = batch;
        info!(
            "Starting run: {} sources, {} evidence cards, {} claims ({} judgment)",
            sources.len(),
            evidence.len(),
            claims.len(),
            if judgment.is_external() { "external" } else { "heuristic" }
        );

        let sources: Vec<Source> = sources.into_iter().map(normalize_source).collect();
        let sources = weigh_sources(sources, &self.config);
        let evidence = self.verify_evidence(evidence, &source_texts);
        let evidence = weigh_evidence(evidence, &sources);
        let index = EvidenceIndex::new(&sources, &evidence);
        debug!("Weighted {} sources and {} evidence cards", sources.len(), evidence.len());

        let scorer = ConfidenceScorer::new(self.config.confidence);
        let claims: Vec<Claim> = claims
            .into_iter()
            .map(|mut claim| {
                claim.confidence_score = scorer.provisional_score(&claim, &index);
                claim.confidence = provisional_rating(claim.confidence_score);
                claim
            })
            .collect();

        let before = claims.len();
        let canonicalizer = Canonicalizer::new(self.config.clustering.similarity_threshold, scorer);
        let mut claims = canonicalizer.canonicalize(claims, &index);
        info!("Canonicalized {} claims into {}", before, claims.len());

        let edges = build_edges(&claims, judgment);
        let (resolutions, edges) = resolve_contradictions(&claims, edges, &index, judgment);

        let penalties = conflict_penalties(&claims, &edges, &resolutions, &self.config.conflict_penalty);
        for claim in &mut claims {
            let penalty = penalties.get(&claim.id).copied().unwrap_or(1.0);
            scorer.apply(claim, &index, penalty);
        }

        let scores: Vec<f64> = claims.iter().map(|c| c.confidence_score).collect();
        for (claim, rating) in claims.iter_mut().zip(calibrate(&scores)) {
            claim.confidence = rating;
        }

        let metrics = RunMetrics::compute(&claims, &edges, &sources);
        info!(
            "Run complete: {} claims, {} edges, {} resolutions, {} flagged for more evidence",
            claims.len(),
            edges.len(),
            resolutions.len(),
            claims.iter().filter(|c| c.needs_more_evidence).count()
        );
        debug!("{}", metrics.summary());

        PipelineOutput {
            sources,
            evidence,
            claims,
            edges,
            resolutions,
            metrics,
        }
    }

    fn verify_evidence(
        &self,
        evidence: Vec<EvidenceCard>,
        source_texts: &BTreeMap<SourceId, String>,
    ) -> Vec<EvidenceCard> {
        if source_texts.is_empty() {
            return evidence;
        }
        let policy = self.config.verification;
        let before = evidence.len();

        let admitted: Vec<EvidenceCard> = evidence
            .into_iter()
            .filter_map(|mut card| {
                let Some(text) = source_texts.get(&card.source_id) else {
                    return Some(card);
                };
                let verification = verify_snippet(text, &card.snippet, policy.fuzzy_threshold);
                if !policy.admits(&verification) {
                    debug!(
                        "Dropping evidence {}: snippet not found in source {} (score {:?})",
                        card.id,
                        card.source_id,
                        verification.score
                    );
                    return None;
                }
                let reliability = thin_source_reliability(card.reliability, text.chars().count());
                card.reliability = policy.admitted_reliability(&verification, reliability);
                card.verification = verification;
                Some(card)
            })
            .collect();

        if admitted.len() < before {
            info!("Dropped {} unverified evidence cards", before - admitted.len());
        }
        admitted
    }
}

/// Fill in the domain and, when unspecified, the source type from the URL
fn normalize_source(mut source: Source) -> Source {
    if source.domain.is_none() {
        source.domain = domain_of(&source.url);
    }
    source.source_type = infer_source_type(&source.url, Some(source.source_type));
    source
}
