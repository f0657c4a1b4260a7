//! Embedding collaborator contract and a deterministic mock for tests.

use async_trait::async_trait;
use std::hash::Hasher;

use crate::types::Result;

/// Maps text to a fixed-length numeric vector.
///
/// Production deployments back this with a hosted embedding model; the
/// engine treats the call as opaque and propagates failures as
/// [`crate::types::RulesmithError::Embedding`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;
}

/// Deterministic hashed bag-of-words embedder for tests and local runs.
///
/// Each lowercased word is hashed into one of `dimensions` buckets and the
/// resulting count vector is L2-normalized, so texts sharing vocabulary get
/// high cosine similarity and disjoint texts stay near zero. Never fails.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dimensions: 64 }
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions.max(1);
        self
    }

    fn bucket(&self, word: &str) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        hasher.write(word.as_bytes());
        (hasher.finish() as usize) % self.dimensions
    }

    fn embed_sync(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimensions];
        for word in text.to_lowercase().split(|c: char| !c.is_ascii_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            vector[self.bucket(word)] += 1.0;
        }
        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        Ok(self.embed_sync(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_text_embeds_identically() {
        let provider = MockEmbeddingProvider::new();
        let a = provider.embed("the slime marker").await.unwrap();
        let b = provider.embed("the slime marker").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn vectors_are_unit_length() {
        let provider = MockEmbeddingProvider::new().with_dimensions(16);
        let v = provider.embed("noise roll in the vents").await.unwrap();
        let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_text_embeds_to_zero_vector() {
        let provider = MockEmbeddingProvider::new().with_dimensions(8);
        let v = provider.embed("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
