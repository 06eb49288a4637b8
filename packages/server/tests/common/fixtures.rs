//! Test fixtures for creating users directly in the database.

use flashcards_core::domains::auth::hash_password;
use flashcards_core::domains::users::User;
use uuid::Uuid;

use super::TestHarness;

pub const TEST_PASSWORD: &str = "password123";

/// A persisted user plus a valid access token for them.
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn token(&self) -> Option<&str> {
        Some(self.token.as_str())
    }
}

/// Emails and usernames are unique per call; tests share one database.
pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

pub async fn create_user(ctx: &TestHarness) -> TestUser {
    create_user_with_role(ctx, false).await
}

pub async fn create_admin(ctx: &TestHarness) -> TestUser {
    create_user_with_role(ctx, true).await
}

async fn create_user_with_role(ctx: &TestHarness, is_admin: bool) -> TestUser {
    let username = unique_name("user");
    let email = format!("{}@example.com", username);
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let mut user = User::create(&email, &username, &hashed, &ctx.db_pool)
        .await
        .unwrap();

    if is_admin {
        user = sqlx::query_as::<_, User>("UPDATE users SET is_admin = TRUE WHERE id = $1 RETURNING *")
            .bind(user.id)
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    }

    let token = ctx.jwt_service.create_token(user.id, user.is_admin).unwrap();
    TestUser { user, token }
}

pub async fn deactivate(ctx: &TestHarness, user: &TestUser) {
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.user.id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();
}
