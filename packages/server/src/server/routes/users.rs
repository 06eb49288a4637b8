use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::common::UserId;
use crate::domains::auth::actions::validate_password;
use crate::domains::auth::hash_password;
use crate::domains::users::{User, UserChanges};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route(
            "/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
}

async fn me_handler(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<User>> {
    Ok(Json(auth.load(&state.db_pool).await?))
}

/// Self or admin.
async fn get_user_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> ApiResult<Json<User>> {
    let caller = auth.load(&state.db_pool).await?;
    if caller.id != id && !caller.is_admin {
        return Err(ApiError::forbidden());
    }

    User::find_by_id(id, &state.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

/// Self only.
async fn update_user_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let caller = auth.load(&state.db_pool).await?;
    if caller.id != id {
        return Err(ApiError::forbidden());
    }

    let email = body.email.map(|e| e.trim().to_string());
    let username = body.username.map(|u| u.trim().to_string());

    if email.as_deref().is_some_and(|e| !e.contains('@')) {
        return Err(ApiError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if username.as_deref().is_some_and(str::is_empty) {
        return Err(ApiError::Validation("Username must not be empty".to_string()));
    }

    if let Some(existing) =
        User::find_conflicting(email.as_deref(), username.as_deref(), Some(id), &state.db_pool)
            .await?
    {
        let field = if Some(&existing.email) == email.as_ref() {
            "Email"
        } else {
            "Username"
        };
        return Err(ApiError::Conflict(format!("{} already registered", field)));
    }

    let hashed_password = match body.password {
        Some(password) => {
            if let Some(reason) = validate_password(&password) {
                return Err(ApiError::Validation(reason));
            }
            Some(hash_password(&password)?)
        }
        None => None,
    };

    let changes = UserChanges {
        email,
        username,
        hashed_password,
    };

    let user = User::update(id, &changes, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    info!(user_id = %user.id, "User updated");
    Ok(Json(user))
}

/// Self or admin. Cascades to the user's decks and flashcards.
async fn delete_user_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> ApiResult<StatusCode> {
    let caller = auth.load(&state.db_pool).await?;
    if caller.id != id && !caller.is_admin {
        return Err(ApiError::forbidden());
    }

    if !User::delete(id, &state.db_pool).await? {
        return Err(ApiError::not_found("User"));
    }

    info!(user_id = %id, deleted_by = %caller.id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
