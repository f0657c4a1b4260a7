//! Property tests for the scoring and selection invariants.

use std::sync::Arc;

use proptest::prelude::*;

use rulesmith::knowledge::{Chunk, ScoredChunk};
use rulesmith::retrieval::{cosine_similarity, BudgetSelector};

fn vector() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, 1..24)
}

fn scored_chunks() -> impl Strategy<Value = Vec<ScoredChunk>> {
    prop::collection::vec((1usize..200, 0.0f64..1.0), 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (tokens, score))| {
                let mut chunk = Chunk::new("game", format!("file-{index}.md"), "text", vec![1.0]);
                chunk.token_count = tokens;
                ScoredChunk::new(Arc::new(chunk), score)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn self_similarity_is_one_for_nonzero_vectors(v in vector()) {
        prop_assume!(v.iter().any(|x| *x != 0.0));
        let sim = cosine_similarity(&v, &v);
        prop_assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn similarity_is_symmetric(a in vector(), b in vector()) {
        prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn mismatched_lengths_always_score_zero(a in vector(), b in vector()) {
        prop_assume!(a.len() != b.len());
        prop_assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn budget_is_never_exceeded(results in scored_chunks(), budget in 0usize..500) {
        let context = BudgetSelector::new(budget).select(results);
        prop_assert!(context.total_tokens <= budget);
        let sum: usize = context.selected.iter().map(|r| r.chunk.token_count).sum();
        prop_assert_eq!(sum, context.total_tokens);
    }

    #[test]
    fn selection_is_a_score_ordered_prefix(results in scored_chunks(), budget in 0usize..500) {
        // Greedy policy: the selector never skips a higher-scored chunk
        // that fits in favor of a lower-scored one.
        let context = BudgetSelector::new(budget).select(results);
        for pair in context.selected.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
