//! Snippet verification and per-card verification quality

use crate::config::VerificationConfig;
use crate::weighting::clamp;
use corroborate_domain::{Verification, VerificationMethod};

/// Ceiling for fuzzy verification quality, below exact-match certainty
pub const FUZZY_QUALITY_CAP: f64 = 0.95;

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Verify that `snippet` actually occurs in `text`
///
/// Both sides are whitespace-normalized and lowercased. A verbatim substring
/// is an exact match (score 100). Otherwise the snippet is compared against
/// every window of the text with the snippet's word count (plus or minus
/// one word) and the best normalized Levenshtein similarity, scaled to
/// 0-100, must reach `fuzzy_threshold`. One wrong character in a 36-character
/// snippet scores about 97.
pub fn verify_snippet(text: &str, snippet: &str, fuzzy_threshold: u32) -> Verification {
    let text = normalize(text);
    let snippet = normalize(snippet);
    if text.is_empty() || snippet.is_empty() {
        return Verification::unverified(None);
    }
    if text.contains(&snippet) {
        return Verification::exact();
    }

    let score = best_window_similarity(&text, &snippet) * 100.0;
    if score >= f64::from(fuzzy_threshold.min(100)) {
        Verification::fuzzy(score)
    } else {
        Verification::unverified(Some(score))
    }
}

fn best_window_similarity(text: &str, snippet: &str) -> f64 {
    let words: Vec<&str> = text.split(' ').collect();
    let target = snippet.split(' ').count();
    let min_len = target.saturating_sub(1).max(1);
    let max_len = (target + 1).min(words.len());

    let mut best = 0.0f64;
    for len in min_len..=max_len {
        for window in words.windows(len) {
            let candidate = window.join(" ");
            best = best.max(strsim::normalized_levenshtein(&candidate, snippet));
        }
    }
    if max_len < min_len {
        // Text is shorter than any window; compare whole strings
        best = strsim::normalized_levenshtein(text, snippet);
    }
    best
}

/// Quality of a single card's verification, in [0, 1]
///
/// Exact matches count fully; fuzzy matches are capped below exact certainty.
pub fn verification_quality(verification: &Verification) -> f64 {
    if !verification.verified {
        return 0.0;
    }
    match verification.method {
        VerificationMethod::Exact => 1.0,
        VerificationMethod::Fuzzy => {
            clamp(verification.score.unwrap_or(0.0) / 100.0, 0.0, FUZZY_QUALITY_CAP)
        }
        VerificationMethod::None => 0.0,
    }
}

impl VerificationConfig {
    /// Whether evidence with this verification outcome is kept
    pub fn admits(&self, verification: &Verification) -> bool {
        verification.verified || self.keep_unverified
    }

    /// Reliability to record for admitted evidence
    ///
    /// Unverified evidence that is kept anyway is pinned to the lowest rating.
    pub fn admitted_reliability(&self, verification: &Verification, reliability: u8) -> u8 {
        if verification.verified {
            reliability.clamp(1, 5)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_exact() {
        let text = "Synthetic data can improve coverage.";
        let snippet = "Synthetic   data can IMPROVE coverage.";
        let v = verify_snippet(text, snippet, 85);

        assert!(v.verified);
        assert_eq!(v.method, VerificationMethod::Exact);
        assert_eq!(v.score, Some(100.0));
    }

    #[test]
    fn test_verification_fuzzy() {
        let text = "Synthetic data can improve coverage in certain domains.";
        let snippet = "synthetic data improve coverage";
        let v = verify_snippet(text, snippet, 80);

        assert!(v.verified);
        assert_eq!(v.method, VerificationMethod::Fuzzy);
        assert!(v.score.unwrap() >= 80.0);
    }

    #[test]
    fn test_verification_scores_edit_distance() {
        let text = "Synthetic data can improve coverage in certain domains.";
        let snippet = "synthetic data can improve coverrage";
        let v = verify_snippet(text, snippet, 92);

        // One insertion against the 36-character snippet
        assert!(v.verified);
        assert_eq!(v.method, VerificationMethod::Fuzzy);
        assert!((v.score.unwrap() - 100.0 * (1.0 - 1.0 / 36.0)).abs() < 1e-9);
    }

    #[test]
    fn test_verification_rejects_unrelated_snippet() {
        let text = "The quarterly report covers revenue and hiring.";
        let snippet = "model collapse after recursive training";
        let v = verify_snippet(text, snippet, 85);

        assert!(!v.verified);
        assert_eq!(v.method, VerificationMethod::None);
        assert!(v.score.unwrap() < 85.0);
    }

    #[test]
    fn test_verification_empty_inputs() {
        assert_eq!(verify_snippet("", "x", 85), Verification::unverified(None));
        assert_eq!(verify_snippet("text", "   ", 85), Verification::unverified(None));
    }

    #[test]
    fn test_snippet_longer_than_text() {
        let v = verify_snippet("short text", "short text that goes on and on", 99);
        assert!(!v.verified);
        assert!(v.score.is_some());
    }

    #[test]
    fn test_verification_quality() {
        assert_eq!(verification_quality(&Verification::exact()), 1.0);
        assert_eq!(verification_quality(&Verification::fuzzy(90.0)), 0.9);
        assert_eq!(verification_quality(&Verification::fuzzy(100.0)), FUZZY_QUALITY_CAP);
        assert_eq!(verification_quality(&Verification::unverified(Some(99.0))), 0.0);
        // Inconsistent record: verified but no method
        let odd = Verification {
            verified: true,
            method: VerificationMethod::None,
            score: None,
        };
        assert_eq!(verification_quality(&odd), 0.0);
    }

    #[test]
    fn test_admission_policy() {
        let strict = VerificationConfig::default();
        let lenient = VerificationConfig {
            keep_unverified: true,
            ..VerificationConfig::default()
        };
        let unverified = Verification::unverified(Some(40.0));

        assert!(!strict.admits(&unverified));
        assert!(lenient.admits(&unverified));
        assert_eq!(lenient.admitted_reliability(&unverified, 4), 1);
        assert_eq!(strict.admitted_reliability(&Verification::exact(), 4), 4);
    }
}
