//! Greedy token-budget packing and context assembly.

use std::fmt::Write as _;

use tracing::debug;

use crate::knowledge::ScoredChunk;

/// The chunks chosen for the generation context and their combined size.
#[derive(Clone, Debug)]
pub struct SelectedContext {
    pub selected: Vec<ScoredChunk>,
    pub total_tokens: usize,
}

/// Packs the highest-scoring chunks into a token budget.
///
/// Selection is greedy in score order and stops at the first chunk that
/// would overflow the budget; later, lower-scored chunks are never
/// considered even if they would fit individually. This favors the most
/// relevant chunks over budget utilization and is intentionally not a
/// knapsack optimization.
#[derive(Clone, Debug)]
pub struct BudgetSelector {
    max_tokens: usize,
}

impl BudgetSelector {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn select(&self, mut results: Vec<ScoredChunk>) -> SelectedContext {
        // Stable: ties keep the fusion output order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut selected = Vec::new();
        let mut total_tokens = 0;
        for result in results {
            if total_tokens + result.chunk.token_count > self.max_tokens {
                break;
            }
            total_tokens += result.chunk.token_count;
            selected.push(result);
        }

        debug!(
            selected = selected.len(),
            total_tokens,
            budget = self.max_tokens,
            "token budget selection complete"
        );
        SelectedContext {
            selected,
            total_tokens,
        }
    }
}

/// Renders the selected chunks into the text handed to the answer
/// generator, labelling each with its source file and fused score.
pub fn render_context(selected: &[ScoredChunk]) -> String {
    let mut context = String::new();
    for (index, result) in selected.iter().enumerate() {
        let _ = writeln!(
            context,
            "Source {} (Similarity: {:.2}, File: {}):",
            index + 1,
            result.score,
            result.chunk.source_file
        );
        context.push_str(&result.chunk.content);
        context.push_str("\n\n");
    }
    context
}
