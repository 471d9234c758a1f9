//! Pure statistical similarity: token Jaccard, character n-gram overlap,
//! and token-order agreement, combined by configured weights.

use std::collections::{HashMap, HashSet};

use crate::config::{ConfigError, StatWeights};
use crate::text;

/// Cheap, deterministic similarity over surface text features. No I/O.
#[derive(Debug, Clone)]
pub struct StatisticalScorer {
    weights: StatWeights,
}

impl StatisticalScorer {
    /// Creates a scorer with validated weights.
    pub fn new(weights: StatWeights) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// The configured weights.
    pub fn weights(&self) -> StatWeights {
        self.weights
    }

    /// Weighted similarity in [0, 1]. Symmetric; identical inputs score 1.0
    /// (including the empty-vs-empty case, defined as maximal similarity).
    pub fn score(&self, a: &str, b: &str) -> f32 {
        let na = text::normalize(a);
        let nb = text::normalize(b);

        // Identical normalized texts are maximally similar by definition,
        // including the empty-vs-empty case. Short identical texts would
        // otherwise lose the word-order component to its neutral 0.5.
        if na == nb {
            return 1.0;
        }

        let score = self.weights.jaccard * jaccard_tokens(&na, &nb)
            + self.weights.ngram2 * ngram_jaccard(&na, &nb, 2)
            + self.weights.ngram3 * ngram_jaccard(&na, &nb, 3)
            + self.weights.word_order * word_order(&na, &nb);

        score.clamp(0.0, 1.0)
    }
}

impl Default for StatisticalScorer {
    fn default() -> Self {
        Self {
            weights: StatWeights::default(),
        }
    }
}

fn set_jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Jaccard over stopword-filtered token sets. Both empty means both texts
/// carried no content tokens, treated as identical.
pub fn jaccard_tokens(na: &str, nb: &str) -> f32 {
    let set_a: HashSet<String> = text::tokenize(na).into_iter().collect();
    let set_b: HashSet<String> = text::tokenize(nb).into_iter().collect();
    set_jaccard(&set_a, &set_b)
}

/// Jaccard over character n-gram sets, robust to small lexical edits.
pub fn ngram_jaccard(na: &str, nb: &str, n: usize) -> f32 {
    let set_a: HashSet<String> = text::char_ngrams(na, n).into_iter().collect();
    let set_b: HashSet<String> = text::char_ngrams(nb, n).into_iter().collect();
    set_jaccard(&set_a, &set_b)
}

/// Token-order similarity over tokens common to both texts.
///
/// Compares positional indices of common tokens; the mean absolute position
/// difference is normalized by the longer sequence. Fewer than two common
/// tokens is insufficient signal, which yields the neutral 0.5 rather than
/// "no similarity".
pub fn word_order(na: &str, nb: &str) -> f32 {
    let tokens_a = text::tokenize(na);
    let tokens_b = text::tokenize(nb);

    let set_a: HashSet<&String> = tokens_a.iter().collect();
    let set_b: HashSet<&String> = tokens_b.iter().collect();
    let common: HashSet<&&String> = set_a.intersection(&set_b).collect();

    if common.len() < 2 {
        return 0.5;
    }

    let pos_a: HashMap<&String, usize> = tokens_a
        .iter()
        .enumerate()
        .filter(|(_, t)| common.contains(&t))
        .map(|(i, t)| (t, i))
        .collect();
    let pos_b: HashMap<&String, usize> = tokens_b
        .iter()
        .enumerate()
        .filter(|(_, t)| common.contains(&t))
        .map(|(i, t)| (t, i))
        .collect();

    let diffs: Vec<f32> = common
        .iter()
        .filter_map(|t| {
            let pa = pos_a.get(**t)?;
            let pb = pos_b.get(**t)?;
            Some((*pa as f32 - *pb as f32).abs())
        })
        .collect();

    if diffs.is_empty() {
        return 0.5;
    }

    let avg_diff = diffs.iter().sum::<f32>() / diffs.len() as f32;
    let max_possible = tokens_a.len().max(tokens_b.len()) as f32;
    if max_possible == 0.0 {
        return 0.5;
    }

    1.0 - (avg_diff / max_possible)
}
