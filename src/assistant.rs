//! The question pipeline: retrieve, generate, resolve citations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::answer::{AnswerProvider, AnswerRequest, PromptTemplates};
use crate::citations::{CitationResolver, ReferenceInfo};
use crate::retrieval::{KnowledgeOutcome, RetrievalEngine};
use crate::types::Result;

/// Final answer text with its ordered footnote list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceInfo>,
}

/// Wires the retrieval engine, answer provider, and citation resolver
/// into the per-question flow. Each question is processed independently
/// and statelessly.
pub struct Assistant {
    engine: RetrievalEngine,
    answers: Arc<dyn AnswerProvider>,
    citations: CitationResolver,
    templates: PromptTemplates,
}

impl Assistant {
    pub fn new(
        engine: RetrievalEngine,
        answers: Arc<dyn AnswerProvider>,
        citations: CitationResolver,
    ) -> Self {
        Self {
            engine,
            answers,
            citations,
            templates: PromptTemplates::new(),
        }
    }

    /// Answers a question about a game's rules.
    ///
    /// The two empty-handed retrieval outcomes become graceful fallback
    /// answers rather than errors; embedding, store, and generation
    /// failures propagate.
    pub async fn answer_question(&self, game_name: &str, question: &str) -> Result<AssistantResponse> {
        info!(game = game_name, question, "processing question");

        let context = match self.engine.retrieve(game_name, question).await? {
            KnowledgeOutcome::Found(context) => context,
            KnowledgeOutcome::NoKnowledgeForGame => {
                info!(game = game_name, "answering with no-knowledge fallback");
                return Ok(AssistantResponse {
                    answer: no_knowledge_answer(game_name),
                    references: Vec::new(),
                });
            }
            KnowledgeOutcome::NoRelevantMatch { chunks_considered } => {
                info!(
                    game = game_name,
                    chunks_considered, "answering with no-match fallback"
                );
                return Ok(AssistantResponse {
                    answer: no_match_answer(game_name),
                    references: Vec::new(),
                });
            }
        };

        let request = AnswerRequest {
            game_name: game_name.to_string(),
            system_prompt: self.templates.for_question(game_name, question),
            knowledge: context.text,
            question: question.to_string(),
        };
        let generated = self.answers.generate_answer(&request).await?;

        let processed = self.citations.process(game_name, &generated).await;
        info!(
            game = game_name,
            references = processed.references.len(),
            "question answered"
        );

        Ok(AssistantResponse {
            answer: processed.response,
            references: processed.references,
        })
    }
}

fn no_match_answer(game_name: &str) -> String {
    format!(
        "I don't have any specific information about that topic in my knowledge base for \
         {game_name}. This might be something we haven't covered yet, or your question might \
         need to be more specific. Feel free to try rephrasing your question or asking about \
         a different aspect of the game!"
    )
}

fn no_knowledge_answer(game_name: &str) -> String {
    format!(
        "I don't have a knowledge base for {game_name} yet, so I can't answer questions about \
         it. Please check back once its rules have been ingested."
    )
}
