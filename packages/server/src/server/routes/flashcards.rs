use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::common::{DeckId, FlashcardId, PaginationArgs, UserId};
use crate::domains::decks::Deck;
use crate::domains::flashcards::{Flashcard, FlashcardChanges};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;
use crate::server::routes::decks::owned_deck;

#[derive(Debug, Deserialize)]
pub struct CreateFlashcardRequest {
    pub question: String,
    pub answer: String,
    pub deck_id: Option<DeckId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlashcardRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub deck_id: Option<DeckId>,
}

#[derive(Debug, Deserialize)]
pub struct ListFlashcardsQuery {
    pub deck_id: Option<DeckId>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_flashcards_handler).post(create_flashcard_handler))
        .route(
            "/:id",
            get(get_flashcard_handler)
                .put(update_flashcard_handler)
                .delete(delete_flashcard_handler),
        )
}

fn non_empty(field: &str, value: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

async fn create_flashcard_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateFlashcardRequest>,
) -> ApiResult<(StatusCode, Json<Flashcard>)> {
    let user = auth.load(&state.db_pool).await?;
    let question = non_empty("Question", &body.question)?;
    let answer = non_empty("Answer", &body.answer)?;

    if let Some(deck_id) = body.deck_id {
        owned_deck(deck_id, user.id, &state).await?;
    }

    let flashcard =
        Flashcard::create(user.id, &question, &answer, body.deck_id, &state.db_pool).await?;

    info!(flashcard_id = %flashcard.id, user_id = %user.id, "Flashcard created");
    Ok((StatusCode::CREATED, Json(flashcard)))
}

async fn list_flashcards_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFlashcardsQuery>,
) -> ApiResult<Json<Vec<Flashcard>>> {
    let user = auth.load(&state.db_pool).await?;
    let page = PaginationArgs {
        skip: query.skip,
        limit: query.limit,
    }
    .validate()
    .map_err(|e| ApiError::Validation(e.to_string()))?;

    Ok(Json(
        Flashcard::find_by_owner(user.id, query.deck_id, page, &state.db_pool).await?,
    ))
}

/// Owner, or anyone authenticated when the card's deck is public.
async fn get_flashcard_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FlashcardId>,
) -> ApiResult<Json<Flashcard>> {
    let user = auth.load(&state.db_pool).await?;
    let flashcard = Flashcard::find_by_id(id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Flashcard"))?;

    if !flashcard.is_owned_by(user.id) && !in_public_deck(&flashcard, &state).await? {
        return Err(ApiError::forbidden());
    }

    Ok(Json(flashcard))
}

async fn update_flashcard_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FlashcardId>,
    Json(body): Json<UpdateFlashcardRequest>,
) -> ApiResult<Json<Flashcard>> {
    let user = auth.load(&state.db_pool).await?;
    owned_flashcard(id, user.id, &state).await?;

    if let Some(deck_id) = body.deck_id {
        owned_deck(deck_id, user.id, &state).await?;
    }

    let changes = FlashcardChanges {
        question: body
            .question
            .as_deref()
            .map(|q| non_empty("Question", q))
            .transpose()?,
        answer: body
            .answer
            .as_deref()
            .map(|a| non_empty("Answer", a))
            .transpose()?,
        deck_id: body.deck_id,
    };

    let flashcard = Flashcard::update(id, &changes, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Flashcard"))?;

    Ok(Json(flashcard))
}

async fn delete_flashcard_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FlashcardId>,
) -> ApiResult<StatusCode> {
    let user = auth.load(&state.db_pool).await?;
    owned_flashcard(id, user.id, &state).await?;

    if !Flashcard::delete(id, &state.db_pool).await? {
        return Err(ApiError::not_found("Flashcard"));
    }

    info!(flashcard_id = %id, user_id = %user.id, "Flashcard deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn owned_flashcard(id: FlashcardId, user_id: UserId, state: &AppState) -> ApiResult<Flashcard> {
    let flashcard = Flashcard::find_by_id(id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Flashcard"))?;

    if !flashcard.is_owned_by(user_id) {
        return Err(ApiError::forbidden());
    }
    Ok(flashcard)
}

async fn in_public_deck(flashcard: &Flashcard, state: &AppState) -> ApiResult<bool> {
    let Some(deck_id) = flashcard.deck_id else {
        return Ok(false);
    };
    Ok(Deck::find_by_id(deck_id, &state.db_pool)
        .await?
        .is_some_and(|deck| deck.is_public))
}
