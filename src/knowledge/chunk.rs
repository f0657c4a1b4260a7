//! The unit of stored, pre-embedded rule text.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A unit of pre-embedded rule text tied to a game and source file.
///
/// Immutable once stored; re-ingesting the same source file produces the
/// same id and overwrites the previous record rather than mutating it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable hex SHA-256 of `"{game_name}:{source_file}"`.
    pub id: String,
    pub game_name: String,
    pub source_file: String,
    pub content: String,
    pub embedding: Vec<f64>,
    /// Rough token estimate (about four characters per token).
    pub token_count: usize,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Chunk {
    /// Builds a chunk with a derived id, token estimate, and timestamps.
    pub fn new(
        game_name: impl Into<String>,
        source_file: impl Into<String>,
        content: impl Into<String>,
        embedding: Vec<f64>,
    ) -> Self {
        let game_name = game_name.into();
        let source_file = source_file.into();
        let content = content.into();
        let now = Utc::now().timestamp();
        Self {
            id: Self::chunk_id(&game_name, &source_file),
            token_count: Self::estimate_tokens(&content),
            game_name,
            source_file,
            content,
            embedding,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stable chunk id for a game + source file pair.
    pub fn chunk_id(game_name: &str, source_file: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(game_name.as_bytes());
        hasher.update(b":");
        hasher.update(source_file.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Cheap token-count estimate used for budget packing.
    pub fn estimate_tokens(content: &str) -> usize {
        content.len() / 4
    }
}

/// A chunk paired with its relevance score in one scoring pass.
///
/// Request-scoped and never persisted; the score's meaning depends on the
/// pass that produced it (raw cosine, TF-IDF, or fused).
#[derive(Clone, Debug)]
pub struct ScoredChunk {
    pub chunk: Arc<Chunk>,
    pub score: f64,
}

impl ScoredChunk {
    pub fn new(chunk: Arc<Chunk>, score: f64) -> Self {
        Self { chunk, score }
    }
}
