//! ```text
//! Rule files ──► ingestion::IngestionProcessor ──► knowledge::ChunkStore
//!                         │                              │
//!                         └─► embedding provider         │
//!                                                        ▼
//! Question ──► retrieval::RetrievalEngine ──► KnowledgeOutcome
//!                  │  (vector ∥ keyword → fusion → budget)
//!                  ▼
//! Assembled context ──► answer provider ──► generated text
//!                                                │
//!                                                ▼
//!                       citations::CitationResolver ──► AssistantResponse
//! ```
//!
//! Rulesmith is the retrieval-and-grounding core of a board game rules
//! assistant. It ranks pre-embedded rule chunks against a question with a
//! hybrid of cosine similarity and request-local TF-IDF, packs the best
//! chunks into a token budget, and resolves `[[REFERENCE-ID]]` citation
//! markers in the generated answer into ordered footnotes.
//!
//! Model invocations, storage backends, and transport are collaborator
//! traits ([`embedding::EmbeddingProvider`], [`knowledge::ChunkStore`],
//! [`answer::AnswerProvider`], [`citations::ReferenceLookup`]); the crate
//! ships in-memory/mock implementations for tests and local runs.

pub mod answer;
pub mod assistant;
pub mod citations;
pub mod config;
pub mod embedding;
pub mod ingestion;
pub mod knowledge;
pub mod retrieval;
pub mod types;

pub use assistant::{Assistant, AssistantResponse};
pub use citations::{CitationResolver, ProcessedResponse, ReferenceInfo};
pub use config::RagConfig;
pub use knowledge::{Chunk, ScoredChunk};
pub use retrieval::{KnowledgeContext, KnowledgeOutcome, RetrievalEngine};
pub use types::{Result, RulesmithError};
