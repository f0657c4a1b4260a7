//! Stored rule-text chunks and the store collaborator contract.

pub mod chunk;
pub mod store;

pub use chunk::{Chunk, ScoredChunk};
pub use store::{ChunkStore, MemoryChunkStore};
