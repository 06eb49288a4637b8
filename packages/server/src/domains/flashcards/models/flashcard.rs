use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use crate::common::{contains_pattern, DeckId, FlashcardId, UserId, ValidatedPagination};

/// Flashcard model - SQL persistence layer
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Flashcard {
    pub id: FlashcardId,
    pub question: String,
    pub answer: String,
    pub user_id: UserId,
    pub deck_id: Option<DeckId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct FlashcardChanges {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub deck_id: Option<DeckId>,
}

impl Flashcard {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub async fn find_by_id(id: FlashcardId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM flashcards WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// The user's own flashcards, optionally restricted to one deck.
    pub async fn find_by_owner(
        user_id: UserId,
        deck_id: Option<DeckId>,
        page: ValidatedPagination,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM flashcards
             WHERE user_id = $1
               AND ($2::uuid IS NULL OR deck_id = $2)
             ORDER BY created_at DESC
             OFFSET $3 LIMIT $4",
        )
        .bind(user_id)
        .bind(deck_id)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// All flashcards in a deck, in creation order.
    pub async fn find_by_deck(deck_id: DeckId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM flashcards WHERE deck_id = $1 ORDER BY created_at, id",
        )
        .bind(deck_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create<'e>(
        user_id: UserId,
        question: &str,
        answer: &str,
        deck_id: Option<DeckId>,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO flashcards (id, question, answer, user_id, deck_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(FlashcardId::new())
        .bind(question)
        .bind(answer)
        .bind(user_id)
        .bind(deck_id)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: FlashcardId,
        changes: &FlashcardChanges,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE flashcards
             SET question = COALESCE($2, question),
                 answer = COALESCE($3, answer),
                 deck_id = COALESCE($4, deck_id),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.question)
        .bind(&changes.answer)
        .bind(changes.deck_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: FlashcardId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM flashcards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring match on question or answer, own cards only.
    pub async fn search_owned(
        term: &str,
        user_id: UserId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM flashcards
             WHERE user_id = $2
               AND (question ILIKE $1 OR answer ILIKE $1)
             ORDER BY created_at DESC
             LIMIT $3",
        )
        .bind(contains_pattern(term))
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
