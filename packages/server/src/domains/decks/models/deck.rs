use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use crate::common::{contains_pattern, DeckId, UserId, ValidatedPagination};

/// Deck model - SQL persistence layer
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct DeckChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl Deck {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Owners always see their decks; anyone else only public ones.
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.is_public || self.is_owned_by(user_id)
    }

    pub async fn find_by_id(id: DeckId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM decks WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_owner(
        user_id: UserId,
        page: ValidatedPagination,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM decks
             WHERE user_id = $1
             ORDER BY created_at DESC
             OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_public(page: ValidatedPagination, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM decks
             WHERE is_public = TRUE
             ORDER BY created_at DESC
             OFFSET $1 LIMIT $2",
        )
        .bind(page.offset)
        .bind(page.limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Block other transactions resolving the same owner and name until this
    /// transaction ends. Deck names are not unique, so find-or-create must
    /// hold this lock to avoid creating the deck twice.
    pub async fn lock_name<'e>(
        user_id: UserId,
        name: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("deck:{}:{}", user_id, name))
            .execute(executor)
            .await?;
        Ok(())
    }

    /// The owner's deck with exactly this name, oldest first if duplicated.
    pub async fn find_owned_by_name<'e>(
        user_id: UserId,
        name: &str,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM decks
             WHERE user_id = $1 AND name = $2
             ORDER BY created_at
             LIMIT 1",
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn create<'e>(
        user_id: UserId,
        name: &str,
        description: Option<&str>,
        is_public: bool,
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO decks (id, name, description, is_public, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(DeckId::new())
        .bind(name)
        .bind(description)
        .bind(is_public)
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: DeckId, changes: &DeckChanges, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE decks
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 is_public = COALESCE($4, is_public),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.is_public)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete a deck; its flashcards go with it (ON DELETE CASCADE).
    pub async fn delete(id: DeckId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM decks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring match on name or description, limited to
    /// decks the user owns or that are public.
    pub async fn search_visible(
        term: &str,
        user_id: UserId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM decks
             WHERE (user_id = $2 OR is_public = TRUE)
               AND (name ILIKE $1 OR description ILIKE $1)
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
