use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::domains::auth::actions::{login, register, LoginResult, RegisterResult};
use crate::domains::users::User;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
}

async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    match register(&body.email, &body.username, &body.password, &state.db_pool).await? {
        RegisterResult::Registered(user) => Ok((StatusCode::CREATED, Json(user))),
        RegisterResult::Invalid { reason } => Err(ApiError::Validation(reason)),
        RegisterResult::Taken { field } => {
            Err(ApiError::Conflict(format!("{} already registered", field)))
        }
    }
}

async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let jwt_service = &state.server_deps.jwt_service;
    match login(&body.email, &body.password, jwt_service, &state.db_pool).await? {
        LoginResult::Authenticated { access_token, .. } => Ok(Json(TokenResponse {
            access_token,
            token_type: "bearer",
        })),
        LoginResult::InvalidCredentials => Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        )),
        LoginResult::Inactive => Err(ApiError::BadRequest("Inactive user".to_string())),
    }
}
