//! Answer-generation collaborator contract.

pub mod prompt;

pub use prompt::{PromptTemplates, QuestionType};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Everything the generation collaborator needs to produce an answer.
///
/// `knowledge` is the budget-packed retrieval context and `system_prompt`
/// is the game-specific template from [`PromptTemplates`]; the engine only
/// constructs this input and consumes the returned text for citation
/// resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub game_name: String,
    pub system_prompt: String,
    pub knowledge: String,
    pub question: String,
}

/// Opaque text-generation call.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn generate_answer(&self, request: &AnswerRequest) -> Result<String>;
}
