use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A validated, not-yet-persisted question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardCandidate {
    pub question: String,
    pub answer: String,
}

impl FlashcardCandidate {
    /// Build a candidate, rejecting blank sides.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Option<Self> {
        let question = question.into().trim().to_string();
        let answer = answer.into().trim().to_string();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self { question, answer })
    }
}

/// Tunables for one pipeline. The defaults are cost/latency policy, not
/// protocol requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePolicy {
    /// Search results kept (and requested) per query
    pub result_limit: usize,
    /// Characters kept from each fetched page
    pub page_char_budget: usize,
    /// Characters of aggregated content sent to the model
    pub prompt_char_budget: usize,
    pub fetch_timeout: Duration,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Largest `num_flashcards` a caller may ask for
    pub max_flashcards: usize,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            result_limit: 5,
            page_char_budget: 1000,
            prompt_char_budget: 2000,
            fetch_timeout: Duration::from_secs(10),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            max_flashcards: 20,
        }
    }
}

/// First `max` characters of `text` (characters, not bytes).
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
