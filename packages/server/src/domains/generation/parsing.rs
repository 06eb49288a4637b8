//! Parsing of free-form model output into flashcards.
//!
//! Two strategies, tried in order. Each returns `None` when it found nothing
//! it recognises, so the caller can fall through without error handling.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::types::FlashcardCandidate;

lazy_static! {
    // Greedy: first '[' to last ']', across lines
    static ref JSON_ARRAY: Regex = Regex::new(r"(?s)\[.*\]").expect("valid regex");
}

const QUESTION_PREFIXES: [&str; 2] = ["Q:", "Question:"];
const ANSWER_PREFIXES: [&str; 2] = ["A:", "Answer:"];

/// Structured parse: the first bracketed span, read as a JSON array of
/// `{question, answer}` objects. Malformed elements are dropped.
///
/// `None` when there is no bracketed span, it is not valid JSON, or it is not
/// an array. An array with no valid elements is `Some(vec![])`.
pub fn parse_structured(text: &str) -> Option<Vec<FlashcardCandidate>> {
    let span = JSON_ARRAY.find(text)?;
    let Value::Array(items) = serde_json::from_str::<Value>(span.as_str()).ok()? else {
        return None;
    };

    Some(items.iter().filter_map(candidate_from_value).collect())
}

fn candidate_from_value(value: &Value) -> Option<FlashcardCandidate> {
    let object = value.as_object()?;
    let question = coerce_to_string(object.get("question")?)?;
    let answer = coerce_to_string(object.get("answer")?)?;
    FlashcardCandidate::new(question, answer)
}

/// Strings verbatim, other scalars and containers as JSON text, null as absent.
fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Fallback parse: `Q:`/`Question:` lines followed by `A:`/`Answer:` lines.
///
/// A question waits in a single pending slot until an answer line pairs with
/// it. Answers with nothing pending are ignored, and a question still pending
/// at the end of input is dropped. `None` when no pair was found.
pub fn parse_line_pairs(text: &str) -> Option<Vec<FlashcardCandidate>> {
    let mut cards = Vec::new();
    let mut pending: Option<String> = None;

    for line in text.lines().map(str::trim) {
        if let Some(question) = strip_any_prefix(line, &QUESTION_PREFIXES) {
            pending = Some(question.to_string()).filter(|q| !q.is_empty());
        } else if let Some(answer) = strip_any_prefix(line, &ANSWER_PREFIXES) {
            if let Some(question) = pending.take() {
                cards.extend(FlashcardCandidate::new(question, answer));
            }
        }
    }

    if cards.is_empty() {
        None
    } else {
        Some(cards)
    }
}

/// Text after the first colon, trimmed, if `line` starts with any prefix.
fn strip_any_prefix<'a>(line: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find(|prefix| line.starts_with(*prefix))
        .and_then(|_| line.split_once(':'))
        .map(|(_, rest)| rest.trim())
}

/// Structured first, then line pairs, capped at `count`. Empty when neither
/// strategy recognised anything.
pub fn parse_flashcards(text: &str, count: usize) -> Vec<FlashcardCandidate> {
    let mut cards = parse_structured(text)
        .or_else(|| parse_line_pairs(text))
        .unwrap_or_default();
    cards.truncate(count);
    cards
}
