//! Server dependencies for handlers (using traits for testability)
//!
//! Generation providers sit behind the kernel traits so tests can swap in
//! the mocks from `test_dependencies`.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::domains::generation::{FlashcardPipeline, GenerationError};

/// Server dependencies accessible to route handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
    /// Flashcard generation, or the reason it is unavailable (missing API keys)
    pub generation: Result<Arc<FlashcardPipeline>, GenerationError>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        jwt_service: Arc<JwtService>,
        generation: Result<Arc<FlashcardPipeline>, GenerationError>,
    ) -> Self {
        Self {
            db_pool,
            jwt_service,
            generation,
        }
    }

    /// The generation pipeline, if it was configured at startup.
    pub fn pipeline(&self) -> Result<&FlashcardPipeline, GenerationError> {
        self.generation.as_deref().map_err(Clone::clone)
    }
}
