//! Fuzzy string similarity for the probabilistic match tier.
//!
//! Scores are normalized Levenshtein ratios on a 0-100 integer scale, the
//! same scale the accept/review thresholds in `MatchingConfig` use. Inputs
//! are expected to be canonical (normalized) names.

use strsim::normalized_levenshtein;

/// Similarity between two canonical names, 0-100.
pub fn similarity_score(a: &str, b: &str) -> u32 {
    (normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// Best-scoring item among `items`, with its score. Ties keep the first
/// item in iteration order so repeated runs stay deterministic.
pub fn best_match<T>(target: &str, items: impl IntoIterator<Item = (String, T)>) -> Option<(T, u32)> {
    let mut best: Option<(T, u32)> = None;
    for (name, item) in items {
        let score = similarity_score(target, &name);
        match &best {
            Some((_, best_score)) if *best_score >= score => {}
            _ => best = Some((item, score)),
        }
    }
    best
}

/// All items scoring at or above `threshold`, sorted by descending score.
/// Sorting is stable, so equal scores keep iteration order.
pub fn rank_matches<T>(
    target: &str,
    items: impl IntoIterator<Item = (String, T)>,
    threshold: u32,
) -> Vec<(T, u32)> {
    let mut ranked: Vec<(T, u32)> = items
        .into_iter()
        .filter_map(|(name, item)| {
            let score = similarity_score(target, &name);
            (score >= threshold).then_some((item, score))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
