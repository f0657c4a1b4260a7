//! Crate-wide error type shared by all components.

use thiserror::Error;

/// Errors surfaced by the retrieval, citation, and ingestion components.
///
/// Reference-lookup failures never appear here: the citation resolver
/// downgrades them to placeholder footnotes. Likewise "no relevant
/// knowledge" is not an error but a [`crate::retrieval::KnowledgeOutcome`]
/// variant.
#[derive(Debug, Error)]
pub enum RulesmithError {
    /// The embedding collaborator failed; retrieval cannot proceed.
    #[error("embedding call failed: {0}")]
    Embedding(String),

    /// The chunk store failed to read or write.
    #[error("chunk store error: {0}")]
    Store(String),

    /// The answer-generation collaborator failed.
    #[error("answer generation failed: {0}")]
    Generation(String),

    /// A batch ingestion job could not run to completion.
    #[error("ingestion failed: {0}")]
    Ingestion(String),

    /// The file provider returned nothing ingestible for the game.
    #[error("no supported knowledge files found for game: {game}")]
    NoSupportedFiles { game: String },
}

pub type Result<T> = std::result::Result<T, RulesmithError>;
