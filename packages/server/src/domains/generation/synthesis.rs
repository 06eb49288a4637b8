use tracing::{info, warn};

use super::parsing::parse_flashcards;
use super::stage::{DegradeReason, Stage, StageResult};
use super::types::{truncate_chars, FlashcardCandidate, PipelinePolicy};
use crate::kernel::{BaseAI, CompletionRequest};

const SYSTEM_PROMPT: &str =
    "You are an educational assistant that creates high-quality flashcards.";

/// Ask the model for `count` flashcards about `query`, grounded in `content`.
///
/// Blank content short-circuits without a model call.
pub async fn synthesize(
    ai: &dyn BaseAI,
    content: &str,
    query: &str,
    count: usize,
    policy: &PipelinePolicy,
) -> StageResult<Vec<FlashcardCandidate>> {
    if content.trim().is_empty() {
        info!(query = %query, "No content available for flashcard generation");
        return StageResult::Completed(Vec::new());
    }

    let request = CompletionRequest {
        model: policy.model.clone(),
        system: SYSTEM_PROMPT.to_string(),
        user: build_prompt(
            query,
            truncate_chars(content, policy.prompt_char_budget),
            count,
        ),
        max_tokens: policy.max_tokens,
        temperature: policy.temperature,
    };

    let response = match ai.complete(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(query = %query, error = %e, "Flashcard completion failed");
            return StageResult::degraded(Stage::Synthesis, DegradeReason::Provider(e.to_string()));
        }
    };

    let cards = parse_flashcards(&response, count);
    if cards.is_empty() {
        warn!(
            query = %query,
            response_chars = response.chars().count(),
            "Model response contained no flashcards"
        );
        return StageResult::degraded(Stage::Synthesis, DegradeReason::Unparsable);
    }

    info!(query = %query, flashcards = cards.len(), "Flashcards synthesized");
    StageResult::Completed(cards)
}

fn build_prompt(query: &str, content: &str, count: usize) -> String {
    format!(
        "Based on the following content and search query, generate {count} educational flashcards.\n\
         \n\
         Search Query: {query}\n\
         Content: {content}\n\
         \n\
         Generate flashcards in the following format:\n\
         - Each flashcard should have a clear question and answer\n\
         - Questions should be educational and relevant to the search query\n\
         - Answers should be concise but informative\n\
         - Cover different aspects of the topic\n\
         \n\
         Return the flashcards as a JSON array with 'question' and 'answer' fields."
    )
}
