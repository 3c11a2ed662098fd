//! Corroborate Scoring
//!
//! The deterministic core of evidence corroboration: trust weighting for
//! sources and evidence, near-duplicate claim merging, multi-factor confidence
//! scoring, quantile calibration into 1-5 ratings, and resolution of
//! contradicting claims.
//!
//! # Overview
//!
//! - **Weighting**: provider × source type × domain trust, clamped to [0.1, 1.0]
//! - **Canonicalization**: TF-IDF cosine similarity + union-find, per claim type
//! - **Confidence**: strength, diversity, verification and conflict penalty
//! - **Calibration**: rank percentiles over the whole claim population
//! - **Resolution**: connected components over `contradicts` edges
//!
//! Nothing here performs I/O. Relation and resolution *judgment* (usually a
//! language model) is injected through [`corroborate_domain::traits::ClaimJudge`];
//! without one the heuristic fallback is used.
//!
//! # Usage
//!
//! ```
//! use corroborate_domain::{Claim, ClaimType, EvidenceCard, EvidenceId, Polarity, Source};
//! use corroborate_scoring::{Batch, Judgment, Pipeline, ScoringConfig};
//!
//! let sources = vec![Source::new("S1", "https://arxiv.org/abs/2401.00001").with_provider("arxiv")];
//! let evidence = vec![EvidenceCard::new("E1", "S1", 4)];
//! let claims = vec![
//!     Claim::new("C1", ClaimType::DataQuality, "Synthetic data improves coverage.",
//!                Polarity::Pro, vec![EvidenceId::from("E1")]),
//!     Claim::new("C2", ClaimType::DataQuality, "Synthetic data reduces coverage.",
//!                Polarity::Con, vec![]),
//! ];
//!
//! let pipeline = Pipeline::new(ScoringConfig::default());
//! let output = pipeline.run(Batch::new(sources, evidence, claims), &Judgment::heuristic());
//!
//! assert_eq!(output.resolutions.len(), 1);
//! assert!(output.claims.iter().all(|c| (1..=5).contains(&c.confidence)));
//! ```
//!
//! # Features
//!
//! - `parallel`: canonicalize claim-type groups on the rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calibration;
pub mod canonicalize;
pub mod confidence;
pub mod config;
pub mod error;
pub mod metrics;
pub mod penalty;
pub mod pipeline;
pub mod relation;
pub mod resolver;
pub mod similarity;
pub mod verification;
pub mod weighting;

// Re-exports for convenience
pub use calibration::calibrate;
pub use canonicalize::Canonicalizer;
pub use confidence::{evidence_strength, ConfidenceScorer, EvidenceIndex};
pub use config::ScoringConfig;
pub use error::{Result, ScoringError};
pub use metrics::RunMetrics;
pub use penalty::conflict_penalties;
pub use pipeline::{Batch, Pipeline, PipelineOutput};
pub use relation::{build_edges, heuristic_relation, Judgment, NoJudge};
pub use resolver::{resolve_contradictions, ContradictionResolver};
pub use verification::verify_snippet;
pub use weighting::{evidence_weight, source_weight};
