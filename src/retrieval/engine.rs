//! End-to-end retrieval: embed, score, fuse, and pack a context.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::knowledge::{Chunk, ChunkStore, ScoredChunk};
use crate::retrieval::budget::{render_context, BudgetSelector};
use crate::retrieval::fusion::HybridFusion;
use crate::retrieval::keyword::KeywordScorer;
use crate::retrieval::vector::VectorScorer;
use crate::types::Result;

/// The assembled generation context for a successful retrieval.
#[derive(Clone, Debug)]
pub struct KnowledgeContext {
    /// Rendered context text handed to the answer generator.
    pub text: String,
    /// The chunks behind the text, in selection order.
    pub selected: Vec<ScoredChunk>,
    pub total_tokens: usize,
}

/// Outcome of a retrieval request.
///
/// Callers branch on the tag instead of inspecting error shapes: the two
/// empty-handed cases are ordinary outcomes that deserve a graceful
/// user-facing message, not failures.
#[derive(Clone, Debug)]
pub enum KnowledgeOutcome {
    /// Relevant chunks were found and packed into a context.
    Found(KnowledgeContext),
    /// The store holds no chunks at all for this game.
    NoKnowledgeForGame,
    /// Chunks exist but none survived the fused-score filter.
    NoRelevantMatch { chunks_considered: usize },
}

/// Runs the hybrid retrieval pipeline for one request.
///
/// The vector and keyword passes are pure functions of the shared
/// candidate list, so they run concurrently on blocking threads and join
/// before fusion. All state is request-scoped; the engine itself is cheap
/// to share across requests.
pub struct RetrievalEngine {
    store: Arc<dyn ChunkStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: RagConfig,
}

impl RetrievalEngine {
    pub fn new(
        store: Arc<dyn ChunkStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: RagConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    pub async fn retrieve(&self, game_name: &str, query: &str) -> Result<KnowledgeOutcome> {
        let query_embedding = self.embedder.embed(query).await?;

        let chunks = self.store.chunks_for_game(game_name).await?;
        if chunks.is_empty() {
            info!(game = game_name, "no stored knowledge for game");
            return Ok(KnowledgeOutcome::NoKnowledgeForGame);
        }
        let total_candidates = chunks.len();
        info!(game = game_name, candidates = total_candidates, "retrieved candidate chunks");

        let candidates: Arc<Vec<Arc<Chunk>>> =
            Arc::new(chunks.into_iter().map(Arc::new).collect());

        let vector_scorer = VectorScorer::new(self.config.min_similarity);
        let vector_candidates = Arc::clone(&candidates);
        let vector_task = tokio::task::spawn_blocking(move || {
            vector_scorer.score(&vector_candidates, &query_embedding)
        });

        let keyword_scorer = KeywordScorer::new();
        let keyword_candidates = Arc::clone(&candidates);
        let keyword_query = query.to_string();
        let keyword_task = tokio::task::spawn_blocking(move || {
            keyword_scorer.score(&keyword_candidates, &keyword_query)
        });

        let (vector_results, keyword_results) = tokio::join!(vector_task, keyword_task);
        let vector_results = vector_results.unwrap_or_else(|err| {
            warn!(error = %err, "vector scoring task failed");
            Vec::new()
        });
        let keyword_results = keyword_results.unwrap_or_else(|err| {
            warn!(error = %err, "keyword scoring task failed");
            Vec::new()
        });

        let fused = HybridFusion::new(&self.config).fuse(vector_results, keyword_results);
        if fused.is_empty() {
            info!(
                game = game_name,
                candidates = total_candidates,
                threshold = self.config.min_similarity,
                "no chunks above fused threshold"
            );
            return Ok(KnowledgeOutcome::NoRelevantMatch {
                chunks_considered: total_candidates,
            });
        }

        let context = BudgetSelector::new(self.config.max_context_tokens).select(fused);
        info!(
            game = game_name,
            selected = context.selected.len(),
            total_tokens = context.total_tokens,
            budget = self.config.max_context_tokens,
            "assembled retrieval context"
        );

        Ok(KnowledgeOutcome::Found(KnowledgeContext {
            text: render_context(&context.selected),
            selected: context.selected,
            total_tokens: context.total_tokens,
        }))
    }
}
