//! Cosine-similarity scoring against the query embedding.

use std::sync::Arc;

use tracing::debug;

use crate::knowledge::{Chunk, ScoredChunk};

/// Cosine similarity between two vectors, in `[-1, 1]`.
///
/// Mismatched lengths or a zero-norm vector yield 0.0 rather than an
/// error: corrupt stored embeddings must not take down retrieval.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        debug!(len_a = a.len(), len_b = b.len(), "similarity skipped: length mismatch");
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        debug!(norm_a, norm_b, "similarity skipped: zero norm");
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scores candidate chunks by cosine similarity and keeps those at or
/// above the configured minimum. Pure and deterministic.
#[derive(Clone, Debug)]
pub struct VectorScorer {
    min_similarity: f64,
}

impl VectorScorer {
    pub fn new(min_similarity: f64) -> Self {
        Self { min_similarity }
    }

    pub fn score(&self, chunks: &[Arc<Chunk>], query_embedding: &[f64]) -> Vec<ScoredChunk> {
        let results: Vec<ScoredChunk> = chunks
            .iter()
            .filter_map(|chunk| {
                let similarity = cosine_similarity(query_embedding, &chunk.embedding);
                (similarity >= self.min_similarity)
                    .then(|| ScoredChunk::new(Arc::clone(chunk), similarity))
            })
            .collect();

        debug!(
            matches = results.len(),
            threshold = self.min_similarity,
            "vector search pass complete"
        );
        results
    }
}
