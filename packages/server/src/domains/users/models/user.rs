use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{contains_pattern, UserId};

/// User model - SQL persistence layer
///
/// The password hash never leaves the server: it is skipped when serialized.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user may change about themselves; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub hashed_password: Option<String>,
}

impl User {
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Any user (other than `except`) already holding this email or username.
    pub async fn find_conflicting(
        email: Option<&str>,
        username: Option<&str>,
        except: Option<UserId>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM users
             WHERE (email = $1 OR username = $2)
               AND ($3::uuid IS NULL OR id <> $3)
             LIMIT 1",
        )
        .bind(email)
        .bind(username)
        .bind(except)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(
        email: &str,
        username: &str,
        hashed_password: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, email, username, hashed_password)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(email)
        .bind(username)
        .bind(hashed_password)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: UserId, changes: &UserChanges, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET email = COALESCE($2, email),
                 username = COALESCE($3, username),
                 hashed_password = COALESCE($4, hashed_password),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.username)
        .bind(&changes.hashed_password)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete a user and, by cascade, their decks and flashcards.
    /// Returns false when no such user existed.
    pub async fn delete(id: UserId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring match on username or email.
    pub async fn search(term: &str, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM users
             WHERE username ILIKE $1 OR email ILIKE $1
             ORDER BY username
             LIMIT $2",
        )
        .bind(contains_pattern(term))
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
