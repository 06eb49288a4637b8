//! Generation domain - turns a free-text query into flashcard candidates
//!
//! Pipeline: web search → page text extraction → LLM synthesis → parsing.
//! Every stage absorbs its own operational failures (see [`StageResult`]);
//! only missing configuration surfaces as an error.

pub mod extraction;
pub mod parsing;
pub mod pipeline;
pub mod retrieval;
pub mod stage;
pub mod synthesis;
pub mod types;

pub use pipeline::FlashcardPipeline;
pub use stage::{DegradeReason, GenerationError, Stage, StageResult};
pub use types::{FlashcardCandidate, PipelinePolicy};
