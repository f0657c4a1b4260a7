//! Chunk storage collaborator contract and an in-memory backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::knowledge::Chunk;
use crate::types::{Result, RulesmithError};

/// Unified contract for chunk storage backends.
///
/// Saving a chunk whose id already exists overwrites the stored record;
/// chunks are superseded on re-ingestion, never mutated in place.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert or overwrite a single chunk.
    async fn save_chunk(&self, chunk: Chunk) -> Result<()>;

    /// Insert or overwrite a batch of chunks. The batch is all-or-nothing
    /// from the caller's perspective: a failure fails the ingestion job.
    async fn save_chunks(&self, chunks: Vec<Chunk>) -> Result<()>;

    /// All stored chunks for a game, in no particular order.
    async fn chunks_for_game(&self, game_name: &str) -> Result<Vec<Chunk>>;
}

/// Map-backed store for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    chunks: RwLock<FxHashMap<String, Chunk>>,
}

impl MemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn save_chunk(&self, chunk: Chunk) -> Result<()> {
        self.chunks.write().insert(chunk.id.clone(), chunk);
        Ok(())
    }

    async fn save_chunks(&self, chunks: Vec<Chunk>) -> Result<()> {
        if chunks.is_empty() {
            return Err(RulesmithError::Store(
                "refusing to batch-save an empty chunk set".to_string(),
            ));
        }
        let mut guard = self.chunks.write();
        for chunk in chunks {
            guard.insert(chunk.id.clone(), chunk);
        }
        Ok(())
    }

    async fn chunks_for_game(&self, game_name: &str) -> Result<Vec<Chunk>> {
        Ok(self
            .chunks
            .read()
            .values()
            .filter(|chunk| chunk.game_name == game_name)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(game: &str, file: &str) -> Chunk {
        Chunk::new(game, file, "Some rule text.", vec![1.0, 0.0])
    }

    #[tokio::test]
    async fn save_overwrites_same_source() {
        let store = MemoryChunkStore::new();
        store.save_chunk(chunk("nemesis", "rules/fire.md")).await.unwrap();
        store.save_chunk(chunk("nemesis", "rules/fire.md")).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn chunks_are_scoped_by_game() {
        let store = MemoryChunkStore::new();
        store.save_chunk(chunk("nemesis", "rules/fire.md")).await.unwrap();
        store.save_chunk(chunk("gloomhaven", "rules/fire.md")).await.unwrap();

        let found = store.chunks_for_game("nemesis").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].game_name, "nemesis");
        assert!(store.chunks_for_game("root").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let store = MemoryChunkStore::new();
        assert!(store.save_chunks(Vec::new()).await.is_err());
    }
}
