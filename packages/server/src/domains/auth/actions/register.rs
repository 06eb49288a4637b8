//! Register action

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::domains::auth::password::hash_password;
use crate::domains::users::User;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Result of a registration attempt
#[derive(Debug)]
pub enum RegisterResult {
    Registered(User),
    Invalid { reason: String },
    /// Email or username already belongs to someone
    Taken { field: &'static str },
}

/// Create an account. Email and username must be unique.
pub async fn register(
    email: &str,
    username: &str,
    password: &str,
    pool: &PgPool,
) -> Result<RegisterResult> {
    let email = email.trim();
    let username = username.trim();

    if let Some(reason) = validate_registration(email, username, password) {
        return Ok(RegisterResult::Invalid { reason });
    }

    if let Some(existing) = User::find_conflicting(Some(email), Some(username), None, pool).await? {
        let field = if existing.email == email { "Email" } else { "Username" };
        return Ok(RegisterResult::Taken { field });
    }

    let hashed = hash_password(password)?;
    let user = User::create(email, username, &hashed, pool).await?;

    info!(user_id = %user.id, "Registered user");
    Ok(RegisterResult::Registered(user))
}

/// Shape checks on the raw input; `None` when acceptable.
pub fn validate_registration(email: &str, username: &str, password: &str) -> Option<String> {
    if !email.contains('@') {
        return Some("A valid email address is required".to_string());
    }
    if username.is_empty() {
        return Some("Username must not be empty".to_string());
    }
    validate_password(password)
}

pub fn validate_password(password: &str) -> Option<String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    None
}
