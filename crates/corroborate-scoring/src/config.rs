//! Configuration for weighting, clustering, verification and scoring
//!
//! Every field has a documented default. Overrides are deep-merged onto the
//! defaults, so a config that names a single provider weight keeps every
//! other default table entry.

use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight of the strength component in the composite score
pub const STRENGTH_WEIGHT: f64 = 0.65;
/// Weight of the diversity component in the composite score
pub const DIVERSITY_WEIGHT: f64 = 0.20;
/// Weight of the verification component in the composite score
pub const VERIFICATION_WEIGHT: f64 = 0.15;
/// Geometric decay applied to the i-th strongest evidence weight
pub const REDUNDANCY_DECAY: f64 = 0.85;

/// Penalty for the claim a resolution leans towards
pub const LEANING_PENALTY: f64 = 0.95;
/// Penalty for a claim whose resolution leans towards another member
pub const OPPOSED_PENALTY: f64 = 0.68;
/// Penalty for a resolved cluster that leans nowhere
pub const UNDECIDED_PENALTY: f64 = 0.78;
/// Penalty for any claim touched by a contradiction without a resolution
pub const UNRESOLVED_PENALTY: f64 = 0.80;

/// Provider weight used when the provider table is empty
pub const FALLBACK_PROVIDER_WEIGHT: f64 = 0.7;
/// Source type weight used when the table has no `other` entry
pub const FALLBACK_TYPE_WEIGHT: f64 = 0.5;

/// Top-level configuration for the scoring core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Trust per search provider
    pub provider_weights: BTreeMap<String, f64>,

    /// Trust per source type (`paper`, `preprint`, ..., `other`)
    pub source_type_weights: BTreeMap<String, f64>,

    /// Multiplicative trust per domain (neutral 1.0 when absent)
    pub domain_overrides: BTreeMap<String, f64>,

    /// Near-duplicate merging
    pub clustering: ClusteringConfig,

    /// Snippet verification
    pub verification: VerificationConfig,

    /// Composite score weights and evidence thresholds
    pub confidence: ConfidenceConfig,

    /// Conflict penalty tiers
    pub conflict_penalty: ConflictPenaltyConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let provider_weights = [("semantic_scholar", 1.0), ("arxiv", 0.9), ("duckduckgo", 0.7)];
        let source_type_weights = [
            ("paper", 1.0),
            ("preprint", 0.9),
            ("report", 0.8),
            ("blog", 0.6),
            ("news", 0.6),
            ("other", 0.5),
        ];
        let domain_overrides = [("arxiv.org", 0.9), ("ibm.com", 0.8)];

        let table = |entries: &[(&str, f64)]| -> BTreeMap<String, f64> {
            entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        };

        Self {
            provider_weights: table(&provider_weights),
            source_type_weights: table(&source_type_weights),
            domain_overrides: table(&domain_overrides),
            clustering: ClusteringConfig::default(),
            verification: VerificationConfig::default(),
            confidence: ConfidenceConfig::default(),
            conflict_penalty: ConflictPenaltyConfig::default(),
        }
    }
}

/// Near-duplicate claim merging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// TF-IDF cosine similarity at or above which two claims merge
    pub similarity_threshold: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
        }
    }
}

/// Snippet verification policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Minimum fuzzy score (0-100) for a snippet to count as verified
    ///
    /// The score is normalized Levenshtein similarity against the best
    /// matching word window, so 92 tolerates roughly one edit in twelve characters.
    pub fuzzy_threshold: u32,

    /// Keep evidence whose snippet could not be verified (at reliability 1)
    pub keep_unverified: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 85,
            keep_unverified: false,
        }
    }
}

/// Composite score weights and the thresholds that flag thin evidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Weight of the strength component
    pub strength_weight: f64,
    /// Weight of the diversity component
    pub diversity_weight: f64,
    /// Weight of the verification component
    pub verification_weight: f64,
    /// Geometric decay for redundant evidence
    pub redundancy_decay: f64,
    /// Strength below this flags `needs_more_evidence`
    pub min_strength: f64,
    /// Diversity below this flags `needs_more_evidence`
    pub min_diversity: f64,
    /// Conflict penalty below this flags `needs_more_evidence`
    pub min_conflict_penalty: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            strength_weight: STRENGTH_WEIGHT,
            diversity_weight: DIVERSITY_WEIGHT,
            verification_weight: VERIFICATION_WEIGHT,
            redundancy_decay: REDUNDANCY_DECAY,
            min_strength: 0.25,
            min_diversity: 0.45,
            min_conflict_penalty: 0.8,
        }
    }
}

/// Multiplicative penalties for claims touched by contradictions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictPenaltyConfig {
    /// The claim the resolution leans towards
    pub leaning: f64,
    /// Another member of the cluster is leaning
    pub opposed: f64,
    /// Resolved, but no member is leaning
    pub undecided: f64,
    /// Contradiction edge without a resolution
    pub unresolved: f64,
}

impl Default for ConflictPenaltyConfig {
    fn default() -> Self {
        Self {
            leaning: LEANING_PENALTY,
            opposed: OPPOSED_PENALTY,
            undecided: UNDECIDED_PENALTY,
            unresolved: UNRESOLVED_PENALTY,
        }
    }
}

impl ScoringConfig {
    /// Load configuration from a TOML string, deep-merged onto the defaults
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let overrides: toml::Value = toml::from_str(toml_str)?;
        let overrides = serde_json::to_value(overrides)?;
        Self::merged(overrides)
    }

    /// Load configuration from a JSON string, deep-merged onto the defaults
    pub fn from_json(json_str: &str) -> Result<Self> {
        let overrides: serde_json::Value = serde_json::from_str(json_str)?;
        Self::merged(overrides)
    }

    /// Like [`ScoringConfig::from_toml`], but malformed input yields the defaults
    pub fn from_toml_or_default(toml_str: &str) -> Self {
        Self::from_toml(toml_str).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed scoring config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Like [`ScoringConfig::from_json`], but malformed input yields the defaults
    pub fn from_json_or_default(json_str: &str) -> Self {
        Self::from_json(json_str).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed scoring config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScoringError::Config(e.to_string()))
    }

    /// Create a strict configuration (merge only close paraphrases, demand close snippet matches)
    pub fn strict() -> Self {
        Self {
            clustering: ClusteringConfig {
                similarity_threshold: 0.9,
            },
            verification: VerificationConfig {
                fuzzy_threshold: 92,
                keep_unverified: false,
            },
            ..Self::default()
        }
    }

    /// Create a permissive configuration (looser merging, unverified evidence kept at reliability 1)
    pub fn permissive() -> Self {
        Self {
            clustering: ClusteringConfig {
                similarity_threshold: 0.7,
            },
            verification: VerificationConfig {
                fuzzy_threshold: 75,
                keep_unverified: true,
            },
            ..Self::default()
        }
    }

    /// Report values that are out of range
    ///
    /// Out-of-range values never abort scoring (they are clamped where used);
    /// this is for callers that want to surface bad config early.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let tables = [
            ("provider_weights", &self.provider_weights),
            ("source_type_weights", &self.source_type_weights),
            ("domain_overrides", &self.domain_overrides),
        ];
        for (name, table) in tables {
            for (key, value) in table {
                if !value.is_finite() || *value < 0.0 {
                    problems.push(format!("{}.{} = {} is not a non-negative number", name, key, value));
                }
            }
        }

        if !(0.0..=1.0).contains(&self.clustering.similarity_threshold) {
            problems.push(format!(
                "clustering.similarity_threshold = {} is outside [0, 1]",
                self.clustering.similarity_threshold
            ));
        }
        if self.verification.fuzzy_threshold > 100 {
            problems.push(format!(
                "verification.fuzzy_threshold = {} exceeds 100",
                self.verification.fuzzy_threshold
            ));
        }
        let decay = self.confidence.redundancy_decay;
        if !(decay > 0.0 && decay <= 1.0) {
            problems.push(format!("confidence.redundancy_decay = {} is outside (0, 1]", decay));
        }

        let penalties = [
            ("leaning", self.conflict_penalty.leaning),
            ("opposed", self.conflict_penalty.opposed),
            ("undecided", self.conflict_penalty.undecided),
            ("unresolved", self.conflict_penalty.unresolved),
        ];
        for (name, value) in penalties {
            if !(0.0..=1.0).contains(&value) {
                problems.push(format!("conflict_penalty.{} = {} is outside [0, 1]", name, value));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ScoringError::Config(problems.join("; ")))
        }
    }

    fn merged(overrides: serde_json::Value) -> Result<Self> {
        let mut base = serde_json::to_value(Self::default())?;
        deep_merge(&mut base, overrides);
        Ok(serde_json::from_value(base)?)
    }
}

/// Merge `overrides` into `base`: objects recurse, everything else replaces
fn deep_merge(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value)
                    }
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider_weights["duckduckgo"], 0.7);
        assert_eq!(config.source_type_weights["other"], 0.5);
        assert_eq!(config.clustering.similarity_threshold, 0.8);
        assert_eq!(config.verification.fuzzy_threshold, 85);
        assert_eq!(config.conflict_penalty.unresolved, 0.80);
    }

    #[test]
    fn test_partial_toml_deep_merges() {
        let config = ScoringConfig::from_toml(
            r#"
            [provider_weights]
            openalex = 0.85

            [clustering]
            similarity_threshold = 0.6
            "#,
        )
        .unwrap();

        assert_eq!(config.provider_weights["openalex"], 0.85);
        // Defaults survive alongside the override
        assert_eq!(config.provider_weights["semantic_scholar"], 1.0);
        assert_eq!(config.clustering.similarity_threshold, 0.6);
        assert_eq!(config.verification.fuzzy_threshold, 85);
    }

    #[test]
    fn test_json_override_replaces_single_field() {
        let config = ScoringConfig::from_json(
            r#"{"verification": {"keep_unverified": true}, "domain_overrides": {"example.com": 0.3}}"#,
        )
        .unwrap();

        assert!(config.verification.keep_unverified);
        assert_eq!(config.verification.fuzzy_threshold, 85);
        assert_eq!(config.domain_overrides["example.com"], 0.3);
        assert_eq!(config.domain_overrides["arxiv.org"], 0.9);
    }

    #[test]
    fn test_malformed_toml_is_an_error_in_strict_mode() {
        let result = ScoringConfig::from_toml("[clustering\nsimilarity_threshold = ");
        assert!(matches!(result, Err(ScoringError::TomlParse(_))));
    }

    #[test]
    fn test_malformed_input_yields_defaults_in_lenient_mode() {
        assert_eq!(ScoringConfig::from_toml_or_default("not = [valid"), ScoringConfig::default());
        assert_eq!(ScoringConfig::from_json_or_default("{oops"), ScoringConfig::default());
        // Well-formed but wrongly typed values are malformed too
        assert_eq!(
            ScoringConfig::from_json_or_default(r#"{"clustering": {"similarity_threshold": "high"}}"#),
            ScoringConfig::default()
        );
    }

    #[test]
    fn test_validate_reports_out_of_range_values() {
        let mut config = ScoringConfig::default();
        config.clustering.similarity_threshold = 1.5;
        config.provider_weights.insert("bad".to_string(), -1.0);
        config.conflict_penalty.opposed = 2.0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("similarity_threshold"));
        assert!(err.contains("provider_weights.bad"));
        assert!(err.contains("conflict_penalty.opposed"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ScoringConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ScoringConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_presets() {
        let strict = ScoringConfig::strict();
        let permissive = ScoringConfig::permissive();

        assert!(strict.validate().is_ok());
        assert!(permissive.validate().is_ok());
        assert!(strict.clustering.similarity_threshold > permissive.clustering.similarity_threshold);
        assert!(strict.verification.fuzzy_threshold > permissive.verification.fuzzy_threshold);
        assert!(permissive.verification.keep_unverified);
        assert_eq!(strict.confidence, ConfidenceConfig::default());
    }
}
