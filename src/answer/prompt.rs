//! Prompt templates tuned to the shape of the question.
//!
//! Broad questions ("how does combat work?") get a comprehensive template;
//! narrow ones ("can I move through walls?") get a focused template that
//! leads with a direct answer. Detection is a substring check against two
//! fixed pattern lists, broad patterns first so "how does" wins over
//! "does".

use tracing::debug;

/// System-explanation questions versus specific yes/no-style queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionType {
    Broad,
    Narrow,
}

const BROAD_PATTERNS: &[&str] = &[
    "how does",
    "how do",
    "explain",
    "what is",
    "tell me about",
    "work",
    "system",
    "mechanic",
    "overview",
    "breakdown",
    "walk me through",
    "give me",
    "describe",
    "what are all",
];

const NARROW_PATTERNS: &[&str] = &[
    "how are",
    "how is",
    "what happens when",
    "can i",
    "can you",
    "do i",
    "does",
    "is it possible",
    "what causes",
    "when does",
    "where do",
    "which",
    "what deck",
    "how many",
    "what room",
    "should i",
    "must i",
    "am i allowed",
    "is there a way",
];

/// Classifies a question; unclear questions default to broad so the
/// answer errs on the comprehensive side.
pub fn detect_question_type(question: &str) -> QuestionType {
    let question = question.to_lowercase();

    if BROAD_PATTERNS.iter().any(|p| question.contains(p)) {
        return QuestionType::Broad;
    }
    if NARROW_PATTERNS.iter().any(|p| question.contains(p)) {
        return QuestionType::Narrow;
    }
    QuestionType::Broad
}

/// Static prompt templates with a `{game}` placeholder.
#[derive(Clone, Debug, Default)]
pub struct PromptTemplates;

impl PromptTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Template matching the detected shape of the question, with the
    /// game name substituted in.
    pub fn for_question(&self, game_name: &str, question: &str) -> String {
        let question_type = detect_question_type(question);
        debug!(?question_type, "question type detected");

        let template = match question_type {
            QuestionType::Broad => self.broad_template(),
            QuestionType::Narrow => self.narrow_template(),
        };
        template.replace("{game}", game_name)
    }

    fn common_template(&self, mission: &str, opening_style: &str) -> String {
        format!(
            "You are an expert on {{game}} board game rules. {mission}\n\
             \n\
             CORE PRINCIPLES:\n\
             - Answer ONLY using information explicitly stated in the provided context\n\
             - Do NOT add details, assumptions, or logical inferences not directly stated in the rules\n\
             - If specific mechanics aren't explained in the context, simply state what IS covered\n\
             - Stick strictly to the exact wording and information provided\n\
             \n\
             RESPONSE FORMATTING:\n\
             - **Bold section headers** like \"**Combat Resolution**\", \"**Movement Rules**\", \"**Victory Conditions**\"\n\
             - Use bullet points (\u{2022}) only for actual lists of items, steps, or key points\n\
             - Write explanatory content as natural paragraphs, not bullet points\n\
             - **Bold important game terms** like **Action Points**, **Status Effects**, **Card Types**\n\
             - Avoid numbered lists - use bullet points sparingly and only when listing discrete items\n\
             \n\
             TONE AND STYLE:\n\
             - {opening_style}\n\
             - Use clear, natural language transitions\n\
             - Be conversational but authoritative\n\
             - Only include examples that are explicitly mentioned in the provided context\n\
             - Never invent steps, procedures, or details not stated in the rules"
        )
    }

    fn narrow_template(&self) -> String {
        let common = self.common_template(
            "Answer the specific question asked using the provided knowledge base.",
            "Start with a direct, clear answer to the question",
        );
        format!(
            "{common}\n\n\
             FOCUSED RESPONSE STRATEGY:\n\
             \u{2022} Lead with a direct answer using only the provided information\n\
             \u{2022} List only the specific details explicitly stated in the context\n\
             \u{2022} Do NOT add implied steps, assumed procedures, or invented details\n\
             \u{2022} If the context doesn't fully answer the question, state what IS covered without padding\n\
             \n\
             STRUCTURE:\n\
             - **Direct Answer**: Clear, immediate response to the question\n\
             - **Key Details**: Specific rules or mechanics (use paragraphs for explanations, bullets only for lists)\n\
             - **Context** (if needed): Brief related information\n\
             - **Practical Note**: How this applies in gameplay"
        )
    }

    fn broad_template(&self) -> String {
        let common = self.common_template(
            "Provide a comprehensive explanation using the provided knowledge base.",
            "Begin with a clear overview of the system or mechanic",
        );
        format!(
            "{common}\n\n\
             COMPREHENSIVE RESPONSE STRATEGY:\n\
             \u{2022} Begin with an overview using only information from the provided context\n\
             \u{2022} Break down only the components explicitly mentioned in the rules\n\
             \u{2022} Explain relationships only when they are directly stated\n\
             \u{2022} Include only examples and cases explicitly mentioned in the context\n\
             \u{2022} Only mention connections that are directly stated in the rules\n\
             \n\
             STRUCTURE:\n\
             - **Overview**: Brief introduction using only provided information (write as paragraphs)\n\
             - **Core Components**: Only elements explicitly mentioned in the context (use bullets for lists, paragraphs for explanations)\n\
             - **Key Rules**: Only mechanics and restrictions directly stated (write as paragraphs unless listing multiple items)\n\
             - **Examples**: Only scenarios explicitly mentioned in the rules\n\
             - **Related Systems**: Only connections explicitly stated in the context"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broad_patterns_win_over_narrow() {
        // "how does" contains "does"; broad patterns are checked first.
        assert_eq!(detect_question_type("How does combat work?"), QuestionType::Broad);
        assert_eq!(detect_question_type("Explain the noise system"), QuestionType::Broad);
        assert_eq!(
            detect_question_type("What are all the victory conditions?"),
            QuestionType::Broad
        );
    }

    #[test]
    fn narrow_questions_are_detected() {
        assert_eq!(detect_question_type("Can I move through walls?"), QuestionType::Narrow);
        assert_eq!(detect_question_type("How many actions do I get?"), QuestionType::Narrow);
        assert_eq!(
            detect_question_type("What happens when the fire spreads?"),
            QuestionType::Narrow
        );
    }

    #[test]
    fn unclear_questions_default_to_broad() {
        assert_eq!(detect_question_type("Slime?"), QuestionType::Broad);
    }

    #[test]
    fn templates_substitute_game_name() {
        let templates = PromptTemplates::new();
        let prompt = templates.for_question("Nemesis", "Can I move through walls?");
        assert!(prompt.starts_with("You are an expert on Nemesis board game rules."));
        assert!(prompt.contains("FOCUSED RESPONSE STRATEGY"));
        assert!(!prompt.contains("{game}"));

        let broad = templates.for_question("Nemesis", "How does combat work?");
        assert!(broad.contains("COMPREHENSIVE RESPONSE STRATEGY"));
    }
}
