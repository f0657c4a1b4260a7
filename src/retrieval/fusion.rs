//! Fuses vector and keyword passes into one weighted ranking.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::RagConfig;
use crate::knowledge::ScoredChunk;

/// Normalizes both score lists, applies the configured gains, sums per
/// chunk id, and filters by a loosened similarity gate.
///
/// Fused scores are not comparable to raw cosine similarity, so the filter
/// threshold is `min_similarity * 0.7` rather than the vector pass's own
/// gate. The weights are tunable gains and need not sum to one.
#[derive(Clone, Debug)]
pub struct HybridFusion {
    vector_weight: f64,
    keyword_weight: f64,
    min_fused_score: f64,
}

impl HybridFusion {
    /// Fraction of `min_similarity` applied to fused scores.
    const FUSED_THRESHOLD_RATIO: f64 = 0.7;

    pub fn new(config: &RagConfig) -> Self {
        Self {
            vector_weight: config.vector_weight,
            keyword_weight: config.keyword_weight,
            min_fused_score: config.min_similarity * Self::FUSED_THRESHOLD_RATIO,
        }
    }

    /// Combines the two passes. A chunk present in only one list receives
    /// only that list's weighted score. Returns results sorted by
    /// descending fused score with ties broken by chunk id, so downstream
    /// ordering is deterministic. Empty inputs fuse to an empty list.
    pub fn fuse(&self, vector: Vec<ScoredChunk>, keyword: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
        let vector_count = vector.len();
        let keyword_count = keyword.len();

        let mut fused: FxHashMap<String, ScoredChunk> = FxHashMap::default();

        let vector_scores = normalize_scores(&vector);
        for (result, normalized) in vector.into_iter().zip(vector_scores) {
            fused.insert(
                result.chunk.id.clone(),
                ScoredChunk::new(result.chunk, normalized * self.vector_weight),
            );
        }

        let keyword_scores = normalize_scores(&keyword);
        for (result, normalized) in keyword.into_iter().zip(keyword_scores) {
            let weighted = normalized * self.keyword_weight;
            fused
                .entry(result.chunk.id.clone())
                .and_modify(|existing| existing.score += weighted)
                .or_insert_with(|| ScoredChunk::new(result.chunk, weighted));
        }

        let mut results: Vec<ScoredChunk> = fused
            .into_values()
            .filter(|result| result.score >= self.min_fused_score)
            .collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });

        debug!(
            vector = vector_count,
            keyword = keyword_count,
            filtered = results.len(),
            threshold = self.min_fused_score,
            "hybrid fusion complete"
        );
        results
    }
}

/// Min-max scales scores to `[0, 1]` over the list. When every score is
/// equal the range is zero, so all normalized scores become 1.0.
fn normalize_scores(results: &[ScoredChunk]) -> Vec<f64> {
    if results.is_empty() {
        return Vec::new();
    }

    let mut min = results[0].score;
    let mut max = results[0].score;
    for result in results {
        min = min.min(result.score);
        max = max.max(result.score);
    }

    let range = max - min;
    if range == 0.0 {
        return vec![1.0; results.len()];
    }
    results.iter().map(|r| (r.score - min) / range).collect()
}
