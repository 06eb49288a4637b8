//! Uniform outcome type for pipeline stages.
//!
//! A stage never returns `Err`: it either completes with a payload or reports
//! that it degraded, and why. Configuration problems are not stage outcomes at
//! all; they are rejected up front as [`GenerationError::NotConfigured`].

use std::fmt;
use thiserror::Error;

/// Which part of the pipeline produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieval,
    Extraction,
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Retrieval => "retrieval",
            Stage::Extraction => "extraction",
            Stage::Synthesis => "synthesis",
        };
        f.write_str(name)
    }
}

/// Classification of an absorbed failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// The external provider answered with an error or an unusable body.
    Provider(String),
    /// Nothing usable came back from the network (all fetches failed).
    Transport(String),
    /// The model answered but neither parse strategy found flashcards.
    Unparsable,
    /// Something panicked; caught by the orchestrator.
    Panicked(String),
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::Provider(msg) => write!(f, "provider error: {}", msg),
            DegradeReason::Transport(msg) => write!(f, "transport error: {}", msg),
            DegradeReason::Unparsable => f.write_str("model output could not be parsed"),
            DegradeReason::Panicked(msg) => write!(f, "panicked: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageResult<T> {
    Completed(T),
    Degraded { stage: Stage, reason: DegradeReason },
}

impl<T: Default> StageResult<T> {
    pub fn degraded(stage: Stage, reason: DegradeReason) -> Self {
        StageResult::Degraded { stage, reason }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageResult::Degraded { .. })
    }

    /// The payload, or its empty default when the stage degraded.
    pub fn into_payload(self) -> T {
        match self {
            StageResult::Completed(payload) => payload,
            StageResult::Degraded { .. } => T::default(),
        }
    }
}

/// Errors that stop generation before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Flashcard generation is not configured: {0} is missing")]
    NotConfigured(&'static str),
    #[error("Flashcard generation is unavailable: {0}")]
    ClientSetup(String),
}
