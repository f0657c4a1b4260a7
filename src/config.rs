//! Retrieval and ingestion tuning knobs.
//!
//! Constructed once at process start and passed by reference into each
//! component; there is no global cached configuration. Defaults mirror the
//! production deployment and every knob can be overridden from the
//! environment via [`RagConfig::from_env`].

/// Numeric knobs consumed by the retrieval engine and ingestion pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct RagConfig {
    /// Minimum cosine similarity for a chunk to survive the vector pass.
    /// The hybrid filter uses `min_similarity * 0.7` on fused scores.
    pub min_similarity: f64,
    /// Gain applied to normalized vector scores during fusion.
    pub vector_weight: f64,
    /// Gain applied to normalized keyword scores during fusion.
    pub keyword_weight: f64,
    /// Token budget for the assembled generation context.
    pub max_context_tokens: usize,
    /// Advisory per-chunk token ceiling; oversized chunks are logged at
    /// ingestion time, not rejected.
    pub max_chunk_tokens: usize,
    /// Upper bound on concurrent embedding calls during ingestion.
    pub ingest_concurrency: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.65,
            vector_weight: 0.7,
            keyword_weight: 0.3,
            max_context_tokens: 2000,
            max_chunk_tokens: 500,
            ingest_concurrency: 4,
        }
    }
}

impl RagConfig {
    /// Builds a config from defaults overlaid with `RAG_*` environment
    /// variables (`RAG_MIN_SIMILARITY`, `RAG_VECTOR_WEIGHT`,
    /// `RAG_KEYWORD_WEIGHT`, `RAG_MAX_TOKENS`, `MAX_CHUNK_TOKENS`,
    /// `INGEST_CONCURRENCY`). Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            min_similarity: env_parse("RAG_MIN_SIMILARITY", defaults.min_similarity),
            vector_weight: env_parse("RAG_VECTOR_WEIGHT", defaults.vector_weight),
            keyword_weight: env_parse("RAG_KEYWORD_WEIGHT", defaults.keyword_weight),
            max_context_tokens: env_parse("RAG_MAX_TOKENS", defaults.max_context_tokens),
            max_chunk_tokens: env_parse("MAX_CHUNK_TOKENS", defaults.max_chunk_tokens),
            ingest_concurrency: env_parse("INGEST_CONCURRENCY", defaults.ingest_concurrency),
        }
    }

    #[must_use]
    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, vector_weight: f64, keyword_weight: f64) -> Self {
        self.vector_weight = vector_weight;
        self.keyword_weight = keyword_weight;
        self
    }

    #[must_use]
    pub fn with_max_context_tokens(mut self, max_context_tokens: usize) -> Self {
        self.max_context_tokens = max_context_tokens;
        self
    }

    #[must_use]
    pub fn with_ingest_concurrency(mut self, ingest_concurrency: usize) -> Self {
        self.ingest_concurrency = ingest_concurrency.max(1);
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
