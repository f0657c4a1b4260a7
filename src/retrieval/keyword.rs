//! Request-local TF-IDF keyword scoring.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::knowledge::{Chunk, ScoredChunk};

/// Words too common to carry relevance signal.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should",
];

/// Lowercase alphanumeric tokens, minus stop words and tokens shorter
/// than three characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .map(str::to_lowercase)
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Scores candidate chunks against the query with TF-IDF statistics.
///
/// The corpus for document frequency is the current candidate set, not a
/// global index, so scores are request-local and not comparable across
/// requests or games. That keeps the scorer stateless per request and is a
/// deliberate, tunable simplification.
#[derive(Clone, Debug, Default)]
pub struct KeywordScorer;

impl KeywordScorer {
    pub fn new() -> Self {
        Self
    }

    /// Returns one scored entry per chunk containing at least one query
    /// token; zero-score chunks are excluded. An empty or all-stop-word
    /// query yields an empty result.
    pub fn score(&self, chunks: &[Arc<Chunk>], query: &str) -> Vec<ScoredChunk> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Vec::new();
        }

        let results: Vec<ScoredChunk> = chunks
            .iter()
            .filter_map(|chunk| {
                let score = self.tf_idf_score(&query_terms, chunk, chunks);
                (score > 0.0).then(|| ScoredChunk::new(Arc::clone(chunk), score))
            })
            .collect();

        debug!(matches = results.len(), "keyword search pass complete");
        results
    }

    fn tf_idf_score(&self, query_terms: &[String], chunk: &Chunk, all_chunks: &[Arc<Chunk>]) -> f64 {
        let chunk_tokens = tokenize(&chunk.content);
        if chunk_tokens.is_empty() {
            return 0.0;
        }

        let mut term_freq: FxHashMap<&str, usize> = FxHashMap::default();
        for token in &chunk_tokens {
            *term_freq.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut score = 0.0;
        for term in query_terms {
            let freq = term_freq.get(term.as_str()).copied().unwrap_or(0);
            if freq == 0 {
                continue;
            }
            let tf = freq as f64 / chunk_tokens.len() as f64;
            score += tf * self.inverse_document_frequency(term, all_chunks);
        }
        score
    }

    /// `ln(candidates / documents-containing-term)`, with document
    /// frequency counted by substring match over the lowercased content.
    fn inverse_document_frequency(&self, term: &str, all_chunks: &[Arc<Chunk>]) -> f64 {
        let docs_with_term = all_chunks
            .iter()
            .filter(|chunk| chunk.content.to_lowercase().contains(term))
            .count();

        if docs_with_term == 0 {
            return 0.0;
        }
        (all_chunks.len() as f64 / docs_with_term as f64).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(file: &str, content: &str) -> Arc<Chunk> {
        Arc::new(Chunk::new("nemesis", file, content, vec![1.0]))
    }

    #[test]
    fn tokenizer_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("The Slime marker is ON a door!");
        assert_eq!(tokens, vec!["slime", "marker", "door"]);
    }

    #[test]
    fn tokenizer_lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("Fire/Explosion: roll 2d6");
        assert_eq!(tokens, vec!["fire", "explosion", "roll", "2d6"]);
    }

    #[test]
    fn chunk_without_query_terms_is_excluded() {
        let scorer = KeywordScorer::new();
        let chunks = vec![
            chunk("slime.md", "Slime markers block movement."),
            chunk("fire.md", "Fire spreads between rooms."),
        ];
        let results = scorer.score(&chunks, "slime marker");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.source_file, "slime.md");
    }

    #[test]
    fn higher_term_frequency_scores_at_least_as_high() {
        let scorer = KeywordScorer::new();
        // A third chunk without the terms keeps their IDF above zero.
        let chunks = vec![
            chunk("dense.md", "Noise roll noise roll noise roll."),
            chunk("sparse.md", "Noise roll happens once here in longer filler text."),
            chunk("combat.md", "Combat against intruders uses contact cards."),
        ];
        let results = scorer.score(&chunks, "noise roll");
        assert_eq!(results.len(), 2);
        let dense = results.iter().find(|r| r.chunk.source_file == "dense.md").unwrap();
        let sparse = results.iter().find(|r| r.chunk.source_file == "sparse.md").unwrap();
        assert!(dense.score >= sparse.score);
    }

    #[test]
    fn stop_word_only_query_yields_nothing() {
        let scorer = KeywordScorer::new();
        let chunks = vec![chunk("slime.md", "Slime markers block movement.")];
        assert!(scorer.score(&chunks, "the and of").is_empty());
        assert!(scorer.score(&chunks, "").is_empty());
    }
}
