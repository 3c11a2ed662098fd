//! TF-IDF cosine similarity between claim statements.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Lowercased runs of two or more word characters, stop words removed.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 2)
        .map(|w| w.to_lowercase())
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// Pairwise cosine similarity matrix over TF-IDF vectors of `documents`.
///
/// idf is smoothed (`ln((1 + n) / (1 + df)) + 1`) and vectors are L2
/// normalized. A document with no terms has similarity 0 to everything,
/// itself included.
pub fn similarity_matrix(documents: &[&str]) -> Vec<Vec<f64>> {
    let n = documents.len();
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

    let mut df: HashMap<&str, usize> = HashMap::new();
    for tokens in &tokenized {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    let vectors: Vec<BTreeMap<&str, f64>> = tokenized
        .iter()
        .map(|tokens| {
            let mut tf: BTreeMap<&str, f64> = BTreeMap::new();
            for token in tokens {
                *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
            }
            for (term, value) in tf.iter_mut() {
                let doc_freq = df.get(term).copied().unwrap_or(0) as f64;
                let idf = ((1.0 + n as f64) / (1.0 + doc_freq)).ln() + 1.0;
                *value *= idf;
            }
            let norm = tf.values().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for value in tf.values_mut() {
                    *value /= norm;
                }
            }
            tf
        })
        .collect();

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let sim = cosine(&vectors[i], &vectors[j]);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }
    matrix
}

fn cosine(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, v)| large.get(term).map(|w| v * w))
        .sum();
    dot.clamp(0.0, 1.0)
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "a" | "about" | "above" | "after" | "again" | "against" | "all" | "also" | "am"
            | "an" | "and" | "any" | "are" | "as" | "at" | "be" | "because" | "been"
            | "before" | "being" | "below" | "between" | "both" | "but" | "by" | "can"
            | "could" | "did" | "do" | "does" | "doing" | "down" | "during" | "each"
            | "either" | "etc" | "few" | "for" | "from" | "further" | "had" | "has"
            | "have" | "having" | "he" | "her" | "here" | "hers" | "him" | "his" | "how"
            | "however" | "i" | "ie" | "if" | "in" | "into" | "is" | "it" | "its"
            | "itself" | "may" | "me" | "might" | "more" | "most" | "much" | "must" | "my"
            | "neither" | "no" | "nor" | "not" | "of" | "off" | "often" | "on" | "once"
            | "only" | "or" | "other" | "our" | "ours" | "out" | "over" | "own" | "per"
            | "same" | "she" | "should" | "so" | "some" | "such" | "than" | "that" | "the"
            | "their" | "theirs" | "them" | "then" | "there" | "these" | "they" | "this"
            | "those" | "through" | "thus" | "to" | "too" | "under" | "until" | "up"
            | "upon" | "us" | "very" | "was" | "we" | "were" | "what" | "when" | "where"
            | "whether" | "which" | "while" | "who" | "whom" | "why" | "will" | "with"
            | "within" | "without" | "would" | "yet" | "you" | "your" | "yours"
    )
}
