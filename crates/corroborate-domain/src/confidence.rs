//! Confidence component breakdown

use serde::{Deserialize, Serialize};

/// The four orthogonal factors folded into a claim's composite score
///
/// Each factor lies in [0.0, 1.0]. `conflict_penalty` is multiplicative and
/// defaults to 1.0 (no penalty) for claims outside any contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceComponents {
    /// Saturating aggregate of evidence weights
    pub strength: f64,
    /// Independence of the supporting sources
    pub diversity: f64,
    /// Mean snippet verification quality
    pub verification: f64,
    /// Discount from unresolved or losing contradictions
    pub conflict_penalty: f64,
}

impl Default for ConfidenceComponents {
    fn default() -> Self {
        Self {
            strength: 0.0,
            diversity: 0.0,
            verification: 0.0,
            conflict_penalty: 1.0,
        }
    }
}

impl ConfidenceComponents {
    /// Round every component to `decimals` places
    ///
    /// Keeps ledger output stable across platforms that differ in the last
    /// bits of floating point results.
    pub fn rounded(self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        let round = |v: f64| (v * factor).round() / factor;
        Self {
            strength: round(self.strength),
            diversity: round(self.diversity),
            verification: round(self.verification),
            conflict_penalty: round(self.conflict_penalty),
        }
    }
}
