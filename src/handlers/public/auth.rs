use axum::{extract::State, Form};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{generate_jwt, Token};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;

/// OAuth2 password form. `username` carries the email address.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/auth/login
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> ApiResult<Token> {
    let user = UserService::new(state.pool.clone())
        .authenticate(form.username.trim(), &form.password)
        .await?
        .ok_or_else(|| {
            warn!("Failed login for {}", form.username);
            ApiError::bad_request("Incorrect email or password")
        })?;

    if !user.is_active {
        return Err(ApiError::bad_request("Inactive user"));
    }

    let token = Token::bearer(generate_jwt(user.id, &state.config.security)?);
    info!("User {} logged in", user.id);
    Ok(ApiResponse::success(token))
}
