//! Endpoints that do not require a bearer token.

pub mod auth;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Community Directory API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/api/v1/auth/login (public - token acquisition)",
                "members": "/api/v1/members[/:id]",
                "life_events": "/api/v1/life-events[/:id]",
                "businesses": "/api/v1/businesses[/:id]",
                "restaurants": "/api/v1/restaurants[/:id]",
                "masjids": "/api/v1/masjids[/:id]",
                "educations": "/api/v1/educations[/:id]",
                "users": "/api/v1/users",
                "analytics": "/api/v1/analytics/dashboard, /api/v1/analytics/members/statistics",
            }
        }
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
