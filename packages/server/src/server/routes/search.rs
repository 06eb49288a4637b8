//! Keyword search plus the flashcard generation endpoints.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::decks::actions::save_generated_flashcards;
use crate::domains::decks::Deck;
use crate::domains::flashcards::Flashcard;
use crate::domains::generation::FlashcardCandidate;
use crate::domains::users::User;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
pub const MAX_SEARCH_LIMIT: i64 = 100;
pub const DEFAULT_FLASHCARD_COUNT: usize = 5;

fn default_true() -> bool {
    true
}

fn default_count() -> usize {
    DEFAULT_FLASHCARD_COUNT
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_true")]
    pub include_users: bool,
    #[serde(default = "default_true")]
    pub include_decks: bool,
    #[serde(default = "default_true")]
    pub include_flashcards: bool,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Serialize)]
pub struct SearchResults {
    pub users: Vec<User>,
    pub decks: Vec<Deck>,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub query: String,
    #[serde(default = "default_count")]
    pub num_flashcards: usize,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub flashcards: Vec<FlashcardCandidate>,
    pub query: String,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SaveGeneratedRequest {
    pub flashcards: Vec<FlashcardPair>,
    pub deck_name: String,
    pub query: Option<String>,
}

/// A pair as sent back by clients; validated into a [`FlashcardCandidate`].
#[derive(Debug, Deserialize)]
pub struct FlashcardPair {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SaveGeneratedResponse {
    pub deck: Deck,
    pub flashcards: Vec<Flashcard>,
    pub count: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_handler))
        .route("/generate-flashcards", post(generate_handler))
        .route("/save-generated-flashcards", post(save_generated_handler))
}

fn search_limit(requested: Option<i64>) -> ApiResult<i64> {
    match requested {
        None => Ok(DEFAULT_SEARCH_LIMIT),
        Some(limit) if (1..=MAX_SEARCH_LIMIT).contains(&limit) => Ok(limit),
        Some(_) => Err(ApiError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_SEARCH_LIMIT
        ))),
    }
}

/// Own flashcards, own or public decks, and users for admins only.
async fn search_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchResults>> {
    let user = auth.load(&state.db_pool).await?;

    let term = params.query.trim();
    if term.is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }
    let limit = search_limit(params.limit)?;

    let mut results = SearchResults::default();
    if params.include_flashcards {
        results.flashcards = Flashcard::search_owned(term, user.id, limit, &state.db_pool).await?;
    }
    if params.include_decks {
        results.decks = Deck::search_visible(term, user.id, limit, &state.db_pool).await?;
    }
    if params.include_users && user.is_admin {
        results.users = User::search(term, limit, &state.db_pool).await?;
    }

    Ok(Json(results))
}

async fn generate_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let user = auth.load(&state.db_pool).await?;
    let pipeline = state.server_deps.pipeline()?;

    let query = body.query.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }
    let max = pipeline.policy().max_flashcards;
    if !(1..=max).contains(&body.num_flashcards) {
        return Err(ApiError::Validation(format!(
            "num_flashcards must be between 1 and {}",
            max
        )));
    }

    info!(user_id = %user.id, query = %query, num_flashcards = body.num_flashcards, "Flashcard generation requested");
    let flashcards = pipeline.run(&query, body.num_flashcards).await;

    Ok(Json(GenerateResponse {
        count: flashcards.len(),
        flashcards,
        query,
    }))
}

async fn save_generated_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SaveGeneratedRequest>,
) -> ApiResult<Json<SaveGeneratedResponse>> {
    let user = auth.load(&state.db_pool).await?;

    let deck_name = body.deck_name.trim();
    if deck_name.is_empty() {
        return Err(ApiError::Validation("deck_name must not be empty".to_string()));
    }
    if body.flashcards.is_empty() {
        return Err(ApiError::Validation("flashcards must not be empty".to_string()));
    }

    let candidates = body
        .flashcards
        .into_iter()
        .enumerate()
        .map(|(i, pair)| {
            FlashcardCandidate::new(pair.question, pair.answer).ok_or_else(|| {
                ApiError::Validation(format!(
                    "flashcards[{}] needs a non-empty question and answer",
                    i
                ))
            })
        })
        .collect::<ApiResult<Vec<_>>>()?;

    let saved = save_generated_flashcards(
        user.id,
        deck_name,
        body.query.as_deref(),
        &candidates,
        &state.db_pool,
    )
    .await?;

    Ok(Json(SaveGeneratedResponse {
        count: saved.flashcards.len(),
        deck: saved.deck,
        flashcards: saved.flashcards,
    }))
}
