//! Login action

use anyhow::Result;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::domains::auth::password::verify_password;
use crate::domains::auth::JwtService;
use crate::domains::users::User;

/// Result of a login attempt
#[derive(Debug)]
pub enum LoginResult {
    Authenticated { access_token: String, user: User },
    /// Unknown email or wrong password (indistinguishable to the caller)
    InvalidCredentials,
    Inactive,
}

/// Check credentials and issue an access token.
pub async fn login(
    email: &str,
    password: &str,
    jwt_service: &JwtService,
    pool: &PgPool,
) -> Result<LoginResult> {
    let Some(user) = User::find_by_email(email.trim(), pool).await? else {
        return Ok(LoginResult::InvalidCredentials);
    };

    if !verify_password(password, &user.hashed_password)? {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Ok(LoginResult::InvalidCredentials);
    }

    if !user.is_active {
        return Ok(LoginResult::Inactive);
    }

    let access_token = jwt_service.create_token(user.id, user.is_admin)?;
    info!(user_id = %user.id, "User logged in");

    Ok(LoginResult::Authenticated { access_token, user })
}
