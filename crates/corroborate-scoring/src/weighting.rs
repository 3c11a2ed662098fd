//! Source and evidence trust weights
//!
//! Pure, total functions over the config tables. A missing or unusable table
//! entry degrades to its documented fallback instead of failing:
//!
//! | Lookup | Fallback |
//! |--------|----------|
//! | provider | lowest-trust known provider (0.7 if the table is empty) |
//! | source type | the `other` entry (0.5 if absent) |
//! | domain | 1.0 (neutral) |

use crate::config::{ScoringConfig, FALLBACK_PROVIDER_WEIGHT, FALLBACK_TYPE_WEIGHT};
use corroborate_domain::{EvidenceCard, Source, SourceId, SourceType};
use std::collections::HashMap;

/// Lower bound of a source weight
pub const MIN_SOURCE_WEIGHT: f64 = 0.1;
/// Upper bound of a source weight
pub const MAX_SOURCE_WEIGHT: f64 = 1.0;
/// Sources with less text than this are treated as low-information
pub const THIN_SOURCE_CHARS: usize = 1000;
/// Reliability cap for evidence from low-information sources
pub const THIN_SOURCE_MAX_RELIABILITY: u8 = 2;

/// Clamp that maps NaN to `min`
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn usable(weight: f64) -> Option<f64> {
    (weight.is_finite() && weight >= 0.0).then_some(weight)
}

fn provider_weight(provider: Option<&str>, config: &ScoringConfig) -> f64 {
    provider
        .and_then(|p| config.provider_weights.get(p).copied())
        .and_then(usable)
        .unwrap_or_else(|| {
            config
                .provider_weights
                .values()
                .copied()
                .filter_map(usable)
                .reduce(f64::min)
                .unwrap_or(FALLBACK_PROVIDER_WEIGHT)
        })
}

fn type_weight(source_type: SourceType, config: &ScoringConfig) -> f64 {
    let table = &config.source_type_weights;
    table
        .get(source_type.as_str())
        .copied()
        .and_then(usable)
        .or_else(|| table.get(SourceType::Other.as_str()).copied().and_then(usable))
        .unwrap_or(FALLBACK_TYPE_WEIGHT)
}

fn domain_weight(domain: Option<&str>, config: &ScoringConfig) -> f64 {
    domain
        .and_then(|d| config.domain_overrides.get(d).copied())
        .and_then(usable)
        .unwrap_or(1.0)
}

/// Compute a source's trust weight, always within [0.1, 1.0]
///
/// # Examples
///
/// ```
/// use corroborate_scoring::{weighting::source_weight, ScoringConfig};
/// use corroborate_domain::SourceType;
///
/// let config = ScoringConfig::default();
/// let w = source_weight(Some("arxiv"), SourceType::Preprint, Some("arxiv.org"), &config);
/// assert!((w - 0.9 * 0.9 * 0.9).abs() < 1e-12);
/// ```
pub fn source_weight(
    provider: Option<&str>,
    source_type: SourceType,
    domain: Option<&str>,
    config: &ScoringConfig,
) -> f64 {
    let weight = provider_weight(provider, config)
        * type_weight(source_type, config)
        * domain_weight(domain, config);
    clamp(weight, MIN_SOURCE_WEIGHT, MAX_SOURCE_WEIGHT)
}

/// Compute an evidence card's weight from its source weight and reliability (1-5)
pub fn evidence_weight(source_weight: f64, reliability: u8) -> f64 {
    clamp(source_weight * (f64::from(reliability) / 5.0), 0.0, 1.0)
}

/// Cap reliability for evidence taken from a low-information source
///
/// Short pages are mostly navigation noise. This is the single downgrade the
/// surrounding pipeline may apply before weighting.
pub fn thin_source_reliability(reliability: u8, source_text_len: usize) -> u8 {
    if source_text_len < THIN_SOURCE_CHARS && reliability > THIN_SOURCE_MAX_RELIABILITY {
        THIN_SOURCE_MAX_RELIABILITY
    } else {
        reliability
    }
}

/// Lowercased host of a URL, without credentials or port
pub fn domain_of(url: &str) -> Option<String> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = host.split(':').next().unwrap_or("");
    (!host.is_empty()).then(|| host.to_lowercase())
}

/// Infer a source type from its URL when the provider gave none (or `other`)
pub fn infer_source_type(url: &str, hint: Option<SourceType>) -> SourceType {
    if let Some(hint) = hint.filter(|t| *t != SourceType::Other) {
        return hint;
    }

    let domain = domain_of(url).unwrap_or_default();
    let lowered = url.to_lowercase();
    let domain_has = |tokens: &[&str]| tokens.iter().any(|t| domain.contains(t));

    if domain.contains("arxiv.org") {
        SourceType::Preprint
    } else if domain_has(&["medium.com", "substack.com", "blog"]) {
        SourceType::Blog
    } else if domain_has(&["news", "nytimes", "reuters", "bbc", "cnn"]) {
        SourceType::News
    } else if ["/docs/", "/documentation/", "/manual/"]
        .iter()
        .any(|t| lowered.contains(t))
    {
        SourceType::Documentation
    } else if domain.ends_with(".gov") || domain.ends_with(".edu") {
        SourceType::Report
    } else {
        SourceType::Other
    }
}

/// Fill in `source_weight` on every source
pub fn weigh_sources(mut sources: Vec<Source>, config: &ScoringConfig) -> Vec<Source> {
    for source in &mut sources {
        source.source_weight = source_weight(
            source.provider.as_deref(),
            source.source_type,
            source.domain.as_deref(),
            config,
        );
    }
    sources
}

/// Fill in `evidence_weight` on every card from its owning source
///
/// Cards whose source is missing from `sources` are weighted as if their
/// source had the minimum source weight.
pub fn weigh_evidence(mut evidence: Vec<EvidenceCard>, sources: &[Source]) -> Vec<EvidenceCard> {
    let by_id: HashMap<&SourceId, f64> =
        sources.iter().map(|s| (&s.id, s.source_weight)).collect();

    for card in &mut evidence {
        let source_weight = by_id.get(&card.source_id).copied().unwrap_or_else(|| {
            tracing::debug!(
                "Evidence {} references unknown source {}, using minimum weight",
                card.id,
                card.source_id
            );
            MIN_SOURCE_WEIGHT
        });
        card.evidence_weight = evidence_weight(source_weight, card.reliability);
    }
    evidence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_inputs() {
        let config = ScoringConfig::default();
        let w = source_weight(Some("semantic_scholar"), SourceType::Paper, Some("arxiv.org"), &config);
        assert!((w - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_provider_uses_lowest_known() {
        let config = ScoringConfig::default();
        let unknown = source_weight(Some("gopher"), SourceType::Paper, None, &config);
        let missing = source_weight(None, SourceType::Paper, None, &config);
        assert!((unknown - 0.7).abs() < 1e-12);
        assert_eq!(unknown, missing);
    }

    #[test]
    fn test_unknown_type_uses_other() {
        let mut config = ScoringConfig::default();
        config.source_type_weights.remove("documentation");
        let w = source_weight(Some("semantic_scholar"), SourceType::Documentation, None, &config);
        assert!((w - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_tables_use_constant_fallbacks() {
        let mut config = ScoringConfig::default();
        config.provider_weights.clear();
        config.source_type_weights.clear();
        config.domain_overrides.clear();

        let w = source_weight(Some("arxiv"), SourceType::Paper, Some("arxiv.org"), &config);
        assert!((w - 0.7 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unusable_entries_are_ignored() {
        let mut config = ScoringConfig::default();
        config.provider_weights.insert("broken".to_string(), f64::NAN);
        config.domain_overrides.insert("evil.example".to_string(), -3.0);

        let w = source_weight(Some("broken"), SourceType::Paper, Some("evil.example"), &config);
        assert!((w - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_source_weight_clamped() {
        let mut config = ScoringConfig::default();
        config.domain_overrides.insert("huge.example".to_string(), 50.0);
        config.domain_overrides.insert("tiny.example".to_string(), 0.0);

        assert_eq!(source_weight(None, SourceType::Paper, Some("huge.example"), &config), 1.0);
        assert_eq!(source_weight(None, SourceType::Paper, Some("tiny.example"), &config), 0.1);
    }

    #[test]
    fn test_evidence_weight() {
        assert!((evidence_weight(0.9, 4) - 0.72).abs() < 1e-12);
        assert_eq!(evidence_weight(1.0, 5), 1.0);
        assert_eq!(evidence_weight(1.0, 9), 1.0);
        assert_eq!(evidence_weight(0.5, 0), 0.0);
    }

    #[test]
    fn test_thin_source_reliability() {
        assert_eq!(thin_source_reliability(5, 200), 2);
        assert_eq!(thin_source_reliability(1, 200), 1);
        assert_eq!(thin_source_reliability(5, 5000), 5);
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://ArXiv.org/abs/2401.1").as_deref(), Some("arxiv.org"));
        assert_eq!(domain_of("http://user@host.example:8080/x").as_deref(), Some("host.example"));
        assert_eq!(domain_of("example.com?q=1").as_deref(), Some("example.com"));
        assert_eq!(domain_of(""), None);
    }

    #[test]
    fn test_infer_source_type() {
        assert_eq!(infer_source_type("https://arxiv.org/abs/1", None), SourceType::Preprint);
        assert_eq!(infer_source_type("https://foo.substack.com/p/x", None), SourceType::Blog);
        assert_eq!(infer_source_type("https://www.reuters.com/tech", None), SourceType::News);
        assert_eq!(infer_source_type("https://lib.io/docs/intro", None), SourceType::Documentation);
        assert_eq!(infer_source_type("https://www.nist.gov/x", None), SourceType::Report);
        assert_eq!(infer_source_type("https://example.com", Some(SourceType::Other)), SourceType::Other);
        assert_eq!(infer_source_type("https://arxiv.org/abs/1", Some(SourceType::Paper)), SourceType::Paper);
    }

    #[test]
    fn test_weigh_evidence_uses_owning_source() {
        let config = ScoringConfig::default();
        let sources = weigh_sources(
            vec![Source::new("S1", "https://arxiv.org/abs/1")
                .with_provider("semantic_scholar")
                .with_source_type(SourceType::Paper)],
            &config,
        );
        let evidence = weigh_evidence(
            vec![EvidenceCard::new("E1", "S1", 5), EvidenceCard::new("E2", "S404", 5)],
            &sources,
        );

        assert_eq!(sources[0].source_weight, 1.0);
        assert_eq!(evidence[0].evidence_weight, 1.0);
        assert!((evidence[1].evidence_weight - MIN_SOURCE_WEIGHT).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_weight() -> impl Strategy<Value = f64> {
        prop_oneof![
            -10.0..10.0f64,
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ]
    }

    fn any_source_type() -> impl Strategy<Value = SourceType> {
        prop_oneof![
            Just(SourceType::Paper),
            Just(SourceType::Preprint),
            Just(SourceType::Blog),
            Just(SourceType::Report),
            Just(SourceType::Documentation),
            Just(SourceType::News),
            Just(SourceType::Other),
        ]
    }

    proptest! {
        /// Property: source weight stays in [0.1, 1.0] for any tables and keys
        #[test]
        fn test_source_weight_bounds(
            provider in proptest::option::of("[a-z_]{0,12}"),
            domain in proptest::option::of("[a-z.]{0,12}"),
            source_type in any_source_type(),
            provider_value in any_weight(),
            type_value in any_weight(),
            domain_value in any_weight(),
        ) {
            let mut config = ScoringConfig::default();
            if let Some(p) = &provider {
                config.provider_weights.insert(p.clone(), provider_value);
            }
            config.source_type_weights.insert(source_type.as_str().to_string(), type_value);
            if let Some(d) = &domain {
                config.domain_overrides.insert(d.clone(), domain_value);
            }

            let w = source_weight(provider.as_deref(), source_type, domain.as_deref(), &config);
            prop_assert!((MIN_SOURCE_WEIGHT..=MAX_SOURCE_WEIGHT).contains(&w), "weight {} out of range", w);
        }

        /// Property: evidence weight stays in [0, 1]
        #[test]
        fn test_evidence_weight_bounds(source_w in any_weight(), reliability in 0u8..=10) {
            let w = evidence_weight(source_w, reliability);
            prop_assert!((0.0..=1.0).contains(&w));
        }
    }
}
