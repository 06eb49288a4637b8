use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{DeckId, PaginationArgs, UserId};
use crate::domains::decks::{Deck, DeckChanges};
use crate::domains::flashcards::Flashcard;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeckRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeckWithFlashcards {
    #[serde(flatten)]
    pub deck: Deck,
    pub flashcards: Vec<Flashcard>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_decks_handler).post(create_deck_handler))
        .route("/public", get(list_public_decks_handler))
        .route(
            "/:id",
            get(get_deck_handler)
                .put(update_deck_handler)
                .delete(delete_deck_handler),
        )
}

fn validated_name(name: &str) -> ApiResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Deck name must not be empty".to_string()));
    }
    Ok(name)
}

async fn create_deck_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateDeckRequest>,
) -> ApiResult<(StatusCode, Json<Deck>)> {
    let user = auth.load(&state.db_pool).await?;
    let name = validated_name(&body.name)?;

    let deck = Deck::create(
        user.id,
        name,
        body.description.as_deref(),
        body.is_public,
        &state.db_pool,
    )
    .await?;

    info!(deck_id = %deck.id, user_id = %user.id, "Deck created");
    Ok((StatusCode::CREATED, Json(deck)))
}

async fn list_decks_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(args): Query<PaginationArgs>,
) -> ApiResult<Json<Vec<Deck>>> {
    let user = auth.load(&state.db_pool).await?;
    let page = args.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    Ok(Json(Deck::find_by_owner(user.id, page, &state.db_pool).await?))
}

async fn list_public_decks_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(args): Query<PaginationArgs>,
) -> ApiResult<Json<Vec<Deck>>> {
    auth.load(&state.db_pool).await?;
    let page = args.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    Ok(Json(Deck::find_public(page, &state.db_pool).await?))
}

/// Owner, or anyone authenticated when the deck is public.
async fn get_deck_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeckId>,
) -> ApiResult<Json<DeckWithFlashcards>> {
    let user = auth.load(&state.db_pool).await?;
    let deck = Deck::find_by_id(id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Deck"))?;

    if !deck.is_visible_to(user.id) {
        return Err(ApiError::forbidden());
    }

    let flashcards = Flashcard::find_by_deck(deck.id, &state.db_pool).await?;
    Ok(Json(DeckWithFlashcards { deck, flashcards }))
}

async fn update_deck_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeckId>,
    Json(body): Json<UpdateDeckRequest>,
) -> ApiResult<Json<Deck>> {
    let user = auth.load(&state.db_pool).await?;
    owned_deck(id, user.id, &state).await?;

    let name = body
        .name
        .as_deref()
        .map(validated_name)
        .transpose()?
        .map(String::from);

    let changes = DeckChanges {
        name,
        description: body.description,
        is_public: body.is_public,
    };

    let deck = Deck::update(id, &changes, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Deck"))?;

    Ok(Json(deck))
}

/// Flashcards in the deck are removed with it.
async fn delete_deck_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DeckId>,
) -> ApiResult<StatusCode> {
    let user = auth.load(&state.db_pool).await?;
    owned_deck(id, user.id, &state).await?;

    if !Deck::delete(id, &state.db_pool).await? {
        return Err(ApiError::not_found("Deck"));
    }

    info!(deck_id = %id, user_id = %user.id, "Deck deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 404 when missing, 403 when someone else's.
pub(crate) async fn owned_deck(
    id: DeckId,
    user_id: UserId,
    state: &AppState,
) -> ApiResult<Deck> {
    let deck = Deck::find_by_id(id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Deck"))?;

    if !deck.is_owned_by(user_id) {
        return Err(ApiError::forbidden());
    }
    Ok(deck)
}
