//! Claim canonicalization - merging near-duplicate claims of the same type
//!
//! Claims are partitioned by claim type. Within a partition, statements are
//! compared by TF-IDF cosine similarity and any pair at or above the
//! threshold is unioned; merges are transitive. Each multi-member cluster
//! collapses into its highest-scoring member, which absorbs the others'
//! statements as aliases and their supporting evidence.
//!
//! The merge pass repeats until it merges nothing, so the output is a fixed
//! point: canonicalizing it again returns it unchanged.

use crate::confidence::{provisional_rating, ConfidenceScorer, EvidenceIndex};
use crate::similarity::similarity_matrix;
use corroborate_domain::{Claim, ClaimType};
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// Index-based disjoint set over `0..n`
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    /// Create `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    /// Representative of `x`'s set (iterative, with path halving)
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Join the sets of `a` and `b`; the smaller root index stays the root
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[child] = root;
        true
    }

    /// Members of every set, ordered by smallest member
    pub fn clusters(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for i in 0..self.parent.len() {
            let root = self.find(i);
            by_root.entry(root).or_default().push(i);
        }
        by_root.into_values().collect()
    }
}

fn dedupe_keep_order<T: Clone + Eq + Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Claims of one type, tagged with their position in the pass input
type Group = Vec<(usize, Claim)>;

type MergeFn = fn(&Canonicalizer, Vec<Group>, &EvidenceIndex) -> Vec<Group>;

/// Non-empty per-type groups in `ClaimType::ALL` order
fn group_by_type(claims: Vec<Claim>) -> Vec<Group> {
    let mut groups: BTreeMap<ClaimType, Group> =
        ClaimType::ALL.iter().map(|t| (*t, Vec::new())).collect();
    for (position, claim) in claims.into_iter().enumerate() {
        if let Some(group) = groups.get_mut(&claim.claim_type) {
            group.push((position, claim));
        }
    }
    groups.into_values().filter(|g| !g.is_empty()).collect()
}

/// Merges near-duplicate claims
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer {
    similarity_threshold: f64,
    scorer: ConfidenceScorer,
}

impl Canonicalizer {
    /// Create a canonicalizer; `scorer` provides the strength formula used to
    /// re-estimate merged survivors
    pub fn new(similarity_threshold: f64, scorer: ConfidenceScorer) -> Self {
        Self {
            similarity_threshold,
            scorer,
        }
    }

    /// Canonicalize a batch of claims
    ///
    /// Survivors and untouched claims keep their original relative order.
    pub fn canonicalize(&self, claims: Vec<Claim>, index: &EvidenceIndex) -> Vec<Claim> {
        self.fixed_point(claims, index, Self::merge_groups)
    }

    fn fixed_point(&self, claims: Vec<Claim>, index: &EvidenceIndex, merge: MergeFn) -> Vec<Claim> {
        let mut claims = claims;
        loop {
            let before = claims.len();
            claims = self.merge_pass(claims, index, merge);
            if claims.len() == before {
                return claims;
            }
            tracing::debug!(
                "Canonicalization merged {} claims, repeating pass",
                before - claims.len()
            );
        }
    }

    fn merge_pass(&self, claims: Vec<Claim>, index: &EvidenceIndex, merge: MergeFn) -> Vec<Claim> {
        if claims.len() <= 1 {
            return claims;
        }

        let merged = merge(self, group_by_type(claims), index);
        let mut out: Vec<(usize, Claim)> = merged.into_iter().flatten().collect();
        out.sort_by_key(|(position, _)| *position);
        out.into_iter().map(|(_, claim)| claim).collect()
    }

    #[cfg(feature = "parallel")]
    fn merge_groups(&self, groups: Vec<Group>, index: &EvidenceIndex) -> Vec<Group> {
        use rayon::prelude::*;
        groups
            .into_par_iter()
            .map(|group| self.merge_group(group, index))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn merge_groups(&self, groups: Vec<Group>, index: &EvidenceIndex) -> Vec<Group> {
        self.merge_sequential(groups, index)
    }

    #[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
    fn merge_sequential(&self, groups: Vec<Group>, index: &EvidenceIndex) -> Vec<Group> {
        groups
            .into_iter()
            .map(|group| self.merge_group(group, index))
            .collect()
    }

    fn merge_group(&self, group: Group, index: &EvidenceIndex) -> Group {
        if group.len() <= 1 {
            return group;
        }

        let statements: Vec<&str> = group.iter().map(|(_, c)| c.statement.as_str()).collect();
        let sim = similarity_matrix(&statements);

        let mut sets = UnionFind::new(group.len());
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                if sim[i][j] >= self.similarity_threshold {
                    sets.union(i, j);
                }
            }
        }

        let clusters = sets.clusters();
        let mut slots: Vec<Option<(usize, Claim)>> = group.into_iter().map(Some).collect();
        let mut out = Vec::with_capacity(clusters.len());

        for members in clusters {
            let mut taken: Vec<(usize, Claim)> =
                members.iter().filter_map(|&i| slots[i].take()).collect();
            if taken.len() == 1 {
                out.extend(taken);
                continue;
            }

            // Highest score first; stable sort keeps earliest position on ties
            taken.sort_by(|(_, a), (_, b)| b.confidence_score.total_cmp(&a.confidence_score));
            let mut taken = taken.into_iter();
            if let Some(survivor) = taken.next() {
                let absorbed = taken.map(|(_, claim)| claim).collect();
                out.push(self.merge_cluster(survivor, absorbed, index));
            }
        }
        out
    }

    fn merge_cluster(
        &self,
        (position, mut survivor): (usize, Claim),
        absorbed: Vec<Claim>,
        index: &EvidenceIndex,
    ) -> (usize, Claim) {

        let aliases = absorbed
            .iter()
            .map(|c| c.statement.clone())
            .chain(survivor.aliases.iter().cloned())
            .chain(absorbed.iter().flat_map(|c| c.aliases.iter().cloned()));
        let aliases = dedupe_keep_order(aliases)
            .into_iter()
            .filter(|alias| alias != &survivor.statement)
            .collect();

        let supported_by = dedupe_keep_order(
            survivor
                .supported_by
                .iter()
                .chain(absorbed.iter().flat_map(|c| c.supported_by.iter()))
                .cloned(),
        );

        tracing::debug!(
            "Merged {} near-duplicate claims into {} ({})",
            absorbed.len(),
            survivor.id,
            survivor.claim_type
        );

        survivor.aliases = aliases;
        survivor.supported_by = supported_by;
        survivor.confidence_score = self.scorer.provisional_score(&survivor, index);
        survivor.confidence = provisional_rating(survivor.confidence_score);
        (position, survivor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corroborate_domain::{EvidenceCard, EvidenceId, Polarity};

    fn claim(id: &str, claim_type: ClaimType, statement: &str, evidence: &[&str], score: f64) -> Claim {
        Claim::new(
            id,
            claim_type,
            statement,
            Polarity::Neutral,
            evidence.iter().map(|e| EvidenceId::from(*e)).collect(),
        )
        .with_score(score)
    }

    fn index(weights: &[(&str, f64)]) -> EvidenceIndex {
        let evidence: Vec<EvidenceCard> = weights
            .iter()
            .map(|(id, w)| EvidenceCard::new(*id, "S1", 3).with_weight(*w))
            .collect();
        EvidenceIndex::new(&[], &evidence)
    }

    fn canonicalizer(threshold: f64) -> Canonicalizer {
        Canonicalizer::new(threshold, ConfidenceScorer::default())
    }

    #[test]
    fn test_union_find_transitive() {
        let mut sets = UnionFind::new(5);
        sets.union(3, 1);
        sets.union(1, 4);
        assert_eq!(sets.find(4), 1);
        assert!(!sets.union(3, 4));
        assert_eq!(sets.clusters(), vec![vec![0], vec![1, 3, 4], vec![2]]);
    }

    #[test]
    fn test_merges_similar_claims() {
        let claims = vec![
            claim("C1", ClaimType::DataQuality, "Synthetic data improves coverage.", &["E1"], 0.6),
            claim("C2", ClaimType::DataQuality, "Synthetic data improves data coverage.", &["E2"], 0.4),
        ];
        let out = canonicalizer(0.4).canonicalize(claims, &index(&[("E1", 0.6), ("E2", 0.4)]));

        assert_eq!(out.len(), 1);
        let survivor = &out[0];
        assert_eq!(survivor.id.as_str(), "C1");
        assert_eq!(survivor.aliases, vec!["Synthetic data improves data coverage.".to_string()]);
        assert_eq!(survivor.supported_by, vec![EvidenceId::from("E1"), EvidenceId::from("E2")]);
        assert!((survivor.confidence_score - 0.736).abs() < 1e-12);
        assert_eq!(survivor.confidence, 4);
    }

    #[test]
    fn test_never_merges_across_types() {
        let claims = vec![
            claim("C1", ClaimType::Bias, "Synthetic data amplifies bias.", &["E1"], 0.5),
            claim("C2", ClaimType::Evaluation, "Synthetic data amplifies bias.", &["E2"], 0.5),
        ];
        let out = canonicalizer(0.1).canonicalize(claims.clone(), &index(&[]));
        assert_eq!(out, claims);
    }

    #[test]
    fn test_survivor_tie_breaks_on_position() {
        let claims = vec![
            claim("C1", ClaimType::Bias, "Models inherit labeler bias.", &[], 0.5),
            claim("C2", ClaimType::Bias, "Models inherit labeler bias.", &[], 0.5),
        ];
        let out = canonicalizer(0.8).canonicalize(claims, &index(&[]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id.as_str(), "C1");
        // Identical statement is not recorded as an alias of itself
        assert!(out[0].aliases.is_empty());
    }

    #[test]
    fn test_merge_unions_aliases_and_evidence() {
        let mut c3 = claim("C3", ClaimType::OpsRisk, "Pipeline drift breaks retraining jobs", &["E3", "E1"], 0.2);
        c3.aliases.push("Older alias".to_string());
        let claims = vec![
            claim("C1", ClaimType::OpsRisk, "Pipeline drift breaks retraining", &["E1"], 0.3),
            claim("C2", ClaimType::OpsRisk, "Unrelated latency regressions", &["E2"], 0.9),
            c3,
        ];
        let out = canonicalizer(0.7).canonicalize(claims, &index(&[("E1", 0.5), ("E2", 0.5), ("E3", 0.5)]));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id.as_str(), "C1");
        assert_eq!(out[1].id.as_str(), "C2");
        assert_eq!(
            out[0].aliases,
            vec!["Pipeline drift breaks retraining jobs".to_string(), "Older alias".to_string()]
        );
        assert_eq!(out[0].supported_by, vec![EvidenceId::from("E1"), EvidenceId::from("E3")]);
    }

    #[test]
    fn test_singleton_groups_pass_through() {
        let claims = vec![claim("C1", ClaimType::Bias, "Only one", &["E1"], 0.1)];
        let out = canonicalizer(0.0).canonicalize(claims.clone(), &index(&[("E1", 0.9)]));
        assert_eq!(out, claims);
    }

    #[test]
    fn test_idempotent() {
        let claims = vec![
            claim("C1", ClaimType::DataQuality, "Synthetic data improves coverage.", &["E1"], 0.6),
            claim("C2", ClaimType::DataQuality, "Synthetic data improves data coverage.", &["E2"], 0.4),
            claim("C3", ClaimType::DataQuality, "Label noise rises with generation depth.", &["E3"], 0.3),
            claim("C4", ClaimType::Bias, "Minority dialects get underrepresented.", &["E3"], 0.3),
        ];
        let idx = index(&[("E1", 0.6), ("E2", 0.4), ("E3", 0.3)]);
        let canon = canonicalizer(0.4);

        let once = canon.canonicalize(claims, &idx);
        let twice = canon.canonicalize(once.clone(), &idx);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }
}
