//! Hybrid retrieval: vector and keyword scoring, fusion, budget packing.

pub mod budget;
pub mod engine;
pub mod fusion;
pub mod keyword;
pub mod vector;

pub use budget::{BudgetSelector, SelectedContext};
pub use engine::{KnowledgeContext, KnowledgeOutcome, RetrievalEngine};
pub use fusion::HybridFusion;
pub use keyword::KeywordScorer;
pub use vector::{cosine_similarity, VectorScorer};
