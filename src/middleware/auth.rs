use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::validate_jwt;
use crate::database::models::User;
use crate::error::ApiError;
use crate::services::UserService;
use crate::state::AppState;

/// Authenticated user, inserted into request extensions by `jwt_auth_middleware`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    /// 403 unless the user is a superuser.
    pub fn require_superuser(&self) -> Result<(), ApiError> {
        if self.0.is_superuser {
            Ok(())
        } else {
            Err(ApiError::forbidden("The user doesn't have enough privileges"))
        }
    }
}

/// Validates the bearer token, loads the user and rejects inactive accounts.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, &state.config.security).map_err(|e| {
        warn!("Rejected token: {}", e);
        ApiError::unauthorized("Could not validate credentials")
    })?;
    let user_id = claims.user_id()?;

    let user = UserService::new(state.pool.clone())
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Could not validate credentials"))?;
    if !user.is_active {
        return Err(ApiError::unauthorized("Inactive user"));
    }

    debug!("Authenticated user {}", user.id);
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
